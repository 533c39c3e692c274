//! 轮询式事件监听：把新区块中的事件解码后转发到 sink

use std::{future::Future, time::Duration};

use ethers::{
    contract::{EthEvent, EthLogDecode},
    providers::Middleware,
    types::{Filter, H256},
};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    error::BindingError,
    filter::{block_ranges, decode_log, DecodedLog, Filterer, DEFAULT_LOG_CHUNK_SIZE},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOpts {
    /// 为空时从当前已确认区块的下一个开始
    pub from_block: Option<u64>,
    pub poll_interval: Duration,
    /// 只处理 head - confirmations 之前的区块
    pub confirmations: u64,
    pub chunk_size: u64,
    pub topic1: Option<H256>,
    /// 跳过无法解码的日志而不是终止监听
    pub skip_unknown: bool,
}

impl Default for WatchOpts {
    fn default() -> Self {
        WatchOpts {
            from_block: None,
            poll_interval: Duration::from_secs(7),
            confirmations: 0,
            chunk_size: DEFAULT_LOG_CHUNK_SIZE,
            topic1: None,
            skip_unknown: false,
        }
    }
}

/// 监听任务的句柄；drop 时同样会让任务退出
#[derive(Debug)]
pub struct Subscription {
    quit: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), BindingError>>,
}

impl Subscription {
    /// 通知任务退出并等待其结束，返回任务期间遇到的错误
    pub async fn unsubscribe(mut self) -> Result<(), BindingError> {
        if let Some(quit) = self.quit.take() {
            let _ = quit.send(());
        }
        join(self.handle).await
    }

    /// 等待任务自行结束（sink 关闭或出错）
    pub async fn wait(self) -> Result<(), BindingError> {
        let Subscription { quit, handle } = self;
        let result = join(handle).await;
        drop(quit);
        result
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn join(handle: JoinHandle<Result<(), BindingError>>) -> Result<(), BindingError> {
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(BindingError::Subscription(e.to_string())),
    }
}

impl<M: Middleware + 'static> Filterer<M> {
    /// 监听单个事件类型
    pub fn watch<E>(&self, sink: mpsc::Sender<DecodedLog<E>>, opts: WatchOpts) -> Subscription
    where
        E: EthEvent + Send + 'static,
    {
        self.spawn_watch(self.event_filter::<E>(), sink, opts)
    }

    /// 监听合约全部事件，解码为事件枚举
    pub fn watch_all<D>(&self, sink: mpsc::Sender<DecodedLog<D>>, opts: WatchOpts) -> Subscription
    where
        D: EthLogDecode + Send + 'static,
    {
        self.spawn_watch(self.contract_filter(), sink, opts)
    }

    fn spawn_watch<D>(
        &self,
        filter: Filter,
        sink: mpsc::Sender<DecodedLog<D>>,
        opts: WatchOpts,
    ) -> Subscription
    where
        D: EthLogDecode + Send + 'static,
    {
        let (quit_tx, quit_rx) = oneshot::channel();
        let filterer = self.clone();
        let handle =
            tokio::spawn(async move { filterer.watch_loop(filter, sink, opts, quit_rx).await });

        Subscription {
            quit: Some(quit_tx),
            handle,
        }
    }

    async fn watch_loop<D: EthLogDecode>(
        self,
        filter: Filter,
        sink: mpsc::Sender<DecodedLog<D>>,
        opts: WatchOpts,
        mut quit: oneshot::Receiver<()>,
    ) -> Result<(), BindingError> {
        let filter = match opts.topic1 {
            Some(topic) => filter.topic1(topic),
            None => filter,
        };
        let mut next_block = match opts.from_block {
            Some(block) => block,
            None => match until_quit(self.head(), &mut quit).await {
                Some(head) => head?
                    .saturating_sub(opts.confirmations)
                    .saturating_add(1),
                None => return self.unsubscribed(),
            },
        };
        info!(address = ?self.address, next_block, "开始监听事件 / watch started");

        loop {
            let confirmed = match until_quit(self.head(), &mut quit).await {
                Some(head) => head?.saturating_sub(opts.confirmations),
                None => return self.unsubscribed(),
            };

            for (from, to) in block_ranges(next_block, confirmed, opts.chunk_size) {
                let fetch = self.fetch_range(&filter, from, to);
                let logs = match until_quit(fetch, &mut quit).await {
                    Some(logs) => logs?,
                    None => return self.unsubscribed(),
                };
                for raw in logs {
                    let event = match decode_log::<D>(&raw) {
                        Ok(event) => event,
                        Err(e) if opts.skip_unknown => {
                            warn!(
                                error = %e,
                                tx = ?raw.transaction_hash,
                                "跳过无法解码的日志 / skipping undecodable log"
                            );
                            continue;
                        }
                        Err(e) => return Err(e),
                    };

                    tokio::select! {
                        sent = sink.send(DecodedLog { event, raw }) => {
                            if sent.is_err() {
                                debug!("sink 已关闭 / sink closed");
                                return Ok(());
                            }
                        }
                        _ = &mut quit => return self.unsubscribed(),
                    }
                }
                next_block = to.saturating_add(1);
            }

            tokio::select! {
                _ = &mut quit => return self.unsubscribed(),
                _ = sink.closed() => {
                    debug!("sink 已关闭 / sink closed");
                    return Ok(());
                }
                _ = tokio::time::sleep(opts.poll_interval) => {}
            }
        }
    }

    fn unsubscribed(&self) -> Result<(), BindingError> {
        info!(address = ?self.address, "已取消订阅 / unsubscribed");
        Ok(())
    }
}

/// RPC 卡住时也能及时取消；收到退出信号或发送端被 drop 时返回 `None`
async fn until_quit<F: Future>(
    fut: F,
    quit: &mut oneshot::Receiver<()>,
) -> Option<F::Output> {
    tokio::select! {
        output = fut => Some(output),
        _ = quit => None,
    }
}
