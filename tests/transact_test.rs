mod common;

use std::time::Duration;

use common::*;
use contract_bindings::{opts, BindingError, Session, Staking, TransactOpts};
use ethers::{
    providers::Middleware,
    types::{H256, U256, U64},
};
use serde_json::{json, Value};
use tokio::time::timeout;

/// gas、gas price、nonce 都预先指定，节点只会收到发送与确认相关的请求
fn preset(confirmations: usize) -> TransactOpts {
    TransactOpts {
        gas: Some(U256::from(100_000)),
        gas_price: Some(U256::from(1_000_000_000u64)),
        nonce: Some(U256::zero()),
        ..TransactOpts::default()
    }
    .with_confirmations(confirmations)
}

#[tokio::test]
async fn transact_returns_successful_receipt() -> anyhow::Result<()> {
    let (client, mock) = mocked_fast_poll();
    let hash = H256::repeat_byte(0x11);
    respond_in_order(
        &mock,
        vec![json!(hash), mined_transaction(hash, 10), receipt(hash, 10, 1)],
    );

    let staking = Staking::new(addr(2), client);
    let receipt = timeout(
        Duration::from_secs(5),
        opts::transact(staking.claim_rewards(), &preset(1)),
    )
    .await??;

    assert_eq!(receipt.transaction_hash, hash);
    assert_eq!(receipt.status, Some(U64::one()));
    Ok(())
}

#[tokio::test]
async fn reverted_status_is_an_error() -> anyhow::Result<()> {
    let (client, mock) = mocked_fast_poll();
    let hash = H256::repeat_byte(0x22);
    respond_in_order(
        &mock,
        vec![json!(hash), mined_transaction(hash, 10), receipt(hash, 10, 0)],
    );

    let staking = Staking::new(addr(2), client);
    let result = timeout(
        Duration::from_secs(5),
        opts::transact(staking.stake(U256::from(5)), &preset(1)),
    )
    .await?;

    assert!(matches!(result, Err(BindingError::Reverted(h)) if h == hash));
    Ok(())
}

#[tokio::test]
async fn dropped_transaction_has_no_receipt() -> anyhow::Result<()> {
    let (client, mock) = mocked_fast_poll();
    let hash = H256::repeat_byte(0x33);
    // 节点始终查不到该交易，多准备几次响应覆盖重试
    let mut responses = vec![json!(hash)];
    responses.extend(std::iter::repeat(Value::Null).take(10));
    respond_in_order(&mock, responses);

    let staking = Staking::new(addr(2), client);
    let result = timeout(
        Duration::from_secs(5),
        opts::transact(staking.claim_rewards(), &preset(1)),
    )
    .await?;

    assert!(matches!(result, Err(BindingError::NoReceipt(h)) if h == hash));
    Ok(())
}

#[tokio::test]
async fn waits_for_requested_confirmations() -> anyhow::Result<()> {
    let (client, mock) = mocked_fast_poll();
    let hash = H256::repeat_byte(0x44);
    respond_in_order(
        &mock,
        vec![
            json!(hash),
            mined_transaction(hash, 10),
            receipt(hash, 10, 1),
            // 第一次查询时只有 1 个确认
            block_number(10),
            block_number(20),
        ],
    );

    let staking = Staking::new(addr(2), client.clone());
    let receipt = timeout(
        Duration::from_secs(5),
        opts::transact(staking.claim_rewards(), &preset(2)),
    )
    .await??;

    assert_eq!(receipt.block_number, Some(U64::from(10)));
    // 两个区块高度响应都已被消费
    assert!(client.get_block_number().await.is_err());
    Ok(())
}

#[tokio::test]
async fn session_transact_applies_preset_opts() -> anyhow::Result<()> {
    let (client, mock) = mocked_fast_poll();
    let hash = H256::repeat_byte(0x55);
    respond_in_order(
        &mock,
        vec![json!(hash), mined_transaction(hash, 7), receipt(hash, 7, 1)],
    );

    let session = Session::new(Staking::new(addr(2), client)).with_transact_opts(preset(1));
    let receipt = timeout(
        Duration::from_secs(5),
        session.transact(|staking| staking.unstake(U256::from(1))),
    )
    .await??;

    assert_eq!(receipt.transaction_hash, hash);
    assert_eq!(session.transact_opts().gas, Some(U256::from(100_000)));
    Ok(())
}
