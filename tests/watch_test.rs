mod common;

use std::{sync::Arc, time::Duration};

use common::*;
use contract_bindings::{
    contract::staking::{StakedFilter, StakingEvents},
    BindingError, DecodedLog, Filterer, WatchOpts,
};
use ethers::providers::{Http, Provider};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};

fn opts_from(block: u64) -> WatchOpts {
    WatchOpts {
        from_block: Some(block),
        poll_interval: Duration::from_secs(60),
        ..WatchOpts::default()
    }
}

#[tokio::test]
async fn forwards_events_until_unsubscribed() -> anyhow::Result<()> {
    let (client, mock) = mocked();
    let contract = addr(2);
    respond_in_order(
        &mock,
        vec![
            block_number(5),
            logs(&[staked_log(contract, addr(9), 10, 10, 4)]),
        ],
    );

    let (sink, mut events) = mpsc::channel(8);
    let subscription = Filterer::new(client, contract).watch::<StakedFilter>(sink, opts_from(1));

    let received = timeout(Duration::from_secs(5), events.recv()).await?.unwrap();
    assert_eq!(received.event.user, addr(9));
    assert_eq!(received.block_number(), Some(4));

    subscription.unsubscribe().await?;
    Ok(())
}

#[tokio::test]
async fn skips_unknown_logs_when_requested() -> anyhow::Result<()> {
    let (client, mock) = mocked();
    let contract = addr(2);
    respond_in_order(
        &mock,
        vec![
            block_number(5),
            logs(&[
                unknown_log(contract, 2),
                staked_log(contract, addr(7), 1, 1, 3),
            ]),
        ],
    );

    let (sink, mut events) = mpsc::channel(8);
    let opts = WatchOpts {
        skip_unknown: true,
        ..opts_from(1)
    };
    let subscription = Filterer::new(client, contract).watch_all::<StakingEvents>(sink, opts);

    let received = timeout(Duration::from_secs(5), events.recv()).await?.unwrap();
    assert!(matches!(
        received.event,
        StakingEvents::StakedFilter(ref staked) if staked.user == addr(7)
    ));

    subscription.unsubscribe().await?;
    Ok(())
}

#[tokio::test]
async fn undecodable_log_stops_watch_by_default() -> anyhow::Result<()> {
    let (client, mock) = mocked();
    let contract = addr(2);
    respond_in_order(
        &mock,
        vec![block_number(5), logs(&[unknown_log(contract, 2)])],
    );

    let (sink, _events) = mpsc::channel(8);
    let subscription =
        Filterer::new(client, contract).watch_all::<StakingEvents>(sink, opts_from(1));

    let result = timeout(Duration::from_secs(5), subscription.wait()).await?;
    assert!(matches!(result, Err(BindingError::Decode(_))));
    Ok(())
}

#[tokio::test]
async fn rpc_failure_ends_subscription_with_error() -> anyhow::Result<()> {
    let (client, _mock) = mocked();

    let (sink, _events) = mpsc::channel::<DecodedLog<StakedFilter>>(8);
    let subscription = Filterer::new(client, addr(2)).watch(sink, WatchOpts::default());

    let result = timeout(Duration::from_secs(5), subscription.wait()).await?;
    assert!(matches!(result, Err(BindingError::Middleware(_))));
    Ok(())
}

#[tokio::test]
async fn closed_sink_ends_subscription_cleanly() -> anyhow::Result<()> {
    let (client, mock) = mocked();
    let contract = addr(2);
    respond_in_order(
        &mock,
        vec![
            block_number(5),
            logs(&[staked_log(contract, addr(9), 10, 10, 4)]),
        ],
    );

    let (sink, events) = mpsc::channel(8);
    drop(events);
    let subscription = Filterer::new(client, contract).watch::<StakedFilter>(sink, opts_from(1));

    timeout(Duration::from_secs(5), subscription.wait()).await??;
    Ok(())
}

#[tokio::test]
async fn confirmed_head_below_start_skips_log_queries() -> anyhow::Result<()> {
    let (client, mock) = mocked();
    // head = 5 且需要 3 个确认，只处理到区块 2，起点为 4 时无需查询
    respond_in_order(&mock, vec![block_number(5)]);

    let (sink, _events) = mpsc::channel::<DecodedLog<StakedFilter>>(8);
    let opts = WatchOpts {
        confirmations: 3,
        ..opts_from(4)
    };
    let subscription = Filterer::new(client, addr(2)).watch(sink, opts);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!subscription.is_finished());
    subscription.unsubscribe().await?;
    Ok(())
}

/// 接受连接但从不响应的节点
async fn stalled_node() -> anyhow::Result<Provider<Http>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}", listener.local_addr()?);
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    Ok(Provider::<Http>::try_from(url.as_str())?)
}

#[tokio::test]
async fn unsubscribe_interrupts_stalled_head_request() -> anyhow::Result<()> {
    let provider = stalled_node().await?;

    let (sink, _events) = mpsc::channel::<DecodedLog<StakedFilter>>(8);
    let subscription = Filterer::new(Arc::new(provider), addr(2)).watch(sink, WatchOpts::default());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!subscription.is_finished());

    timeout(Duration::from_secs(3), subscription.unsubscribe()).await??;
    Ok(())
}

#[tokio::test]
async fn dropping_subscription_interrupts_stalled_request() -> anyhow::Result<()> {
    let provider = stalled_node().await?;

    let (sink, mut events) = mpsc::channel::<DecodedLog<StakedFilter>>(8);
    let subscription = Filterer::new(Arc::new(provider), addr(2)).watch(sink, opts_from(1));
    tokio::time::sleep(Duration::from_millis(200)).await;
    drop(subscription);

    // 任务退出后 sink 被释放，接收端随之关闭
    assert!(timeout(Duration::from_secs(3), events.recv()).await?.is_none());
    Ok(())
}
