//! 事件日志查询（Filterer）与惰性解码迭代器

use std::{marker::PhantomData, sync::Arc};

use ethers::{
    abi::RawLog,
    contract::{Contract, EthEvent, EthLogDecode},
    providers::Middleware,
    types::{Address, Filter, Log, H256, U256},
};
use tracing::debug;

use crate::error::BindingError;

/// 单次 eth_getLogs 默认覆盖的区块数，公共节点普遍有范围上限
pub const DEFAULT_LOG_CHUNK_SIZE: u64 = 5_000;

/// 解码后的事件，保留原始日志以便取区块号、交易哈希等位置信息
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog<D> {
    pub event: D,
    pub raw: Log,
}

impl<D> DecodedLog<D> {
    pub fn block_number(&self) -> Option<u64> {
        self.raw.block_number.map(|n| n.as_u64())
    }

    pub fn transaction_hash(&self) -> Option<H256> {
        self.raw.transaction_hash
    }

    pub fn log_index(&self) -> Option<U256> {
        self.raw.log_index
    }

    /// 链重组后被移除的日志
    pub fn removed(&self) -> bool {
        self.raw.removed.unwrap_or(false)
    }
}

pub fn decode_log<D: EthLogDecode>(log: &Log) -> Result<D, BindingError> {
    let raw = RawLog {
        topics: log.topics.clone(),
        data: log.data.to_vec(),
    };
    Ok(D::decode_log(&raw)?)
}

/// 按需解码的日志迭代器，解码失败的条目以 `Err` 返回，不会中断后续条目
pub struct EventIter<D> {
    logs: std::vec::IntoIter<Log>,
    _event: PhantomData<D>,
}

impl<D> EventIter<D> {
    pub fn new(logs: Vec<Log>) -> Self {
        EventIter {
            logs: logs.into_iter(),
            _event: PhantomData,
        }
    }
}

impl<D: EthLogDecode> Iterator for EventIter<D> {
    type Item = Result<DecodedLog<D>, BindingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.logs.next()?;
        Some(decode_log::<D>(&raw).map(|event| DecodedLog { event, raw }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.logs.size_hint()
    }
}

impl<D: EthLogDecode> ExactSizeIterator for EventIter<D> {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOpts {
    pub from_block: u64,
    /// 为空表示查询到最新区块
    pub to_block: Option<u64>,
    /// 0 表示不分段
    pub chunk_size: u64,
    /// 第一个 indexed 参数
    pub topic1: Option<H256>,
}

impl Default for FilterOpts {
    fn default() -> Self {
        FilterOpts {
            from_block: 0,
            to_block: None,
            chunk_size: DEFAULT_LOG_CHUNK_SIZE,
            topic1: None,
        }
    }
}

impl FilterOpts {
    pub fn range(from_block: u64, to_block: u64) -> Self {
        FilterOpts {
            from_block,
            to_block: Some(to_block),
            ..FilterOpts::default()
        }
    }

    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn topic1(mut self, topic: H256) -> Self {
        self.topic1 = Some(topic);
        self
    }

    /// 按 indexed address 参数过滤（如 Staked 的 user）
    pub fn indexed_address(self, address: Address) -> Self {
        self.topic1(H256::from(address))
    }
}

/// 把闭区间 [from, to] 切成不超过 `chunk` 个区块的闭区间
pub fn block_ranges(from: u64, to: u64, chunk: u64) -> Vec<(u64, u64)> {
    if from > to {
        return Vec::new();
    }
    if chunk == 0 {
        return vec![(from, to)];
    }

    let mut ranges = Vec::new();
    let mut start = from;
    loop {
        let end = start.saturating_add(chunk - 1).min(to);
        ranges.push((start, end));
        if end == to {
            break;
        }
        start = end + 1;
    }
    ranges
}

/// 绑定到某个合约地址的日志查询器
#[derive(Debug)]
pub struct Filterer<M> {
    pub(crate) client: Arc<M>,
    pub(crate) address: Address,
}

impl<M> Clone for Filterer<M> {
    fn clone(&self) -> Self {
        Filterer {
            client: self.client.clone(),
            address: self.address,
        }
    }
}

impl<M: Middleware> Filterer<M> {
    pub fn new(client: Arc<M>, address: Address) -> Self {
        Filterer { client, address }
    }

    pub fn from_contract(contract: &Contract<M>) -> Self {
        Filterer::new(contract.client(), contract.address())
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn client(&self) -> &Arc<M> {
        &self.client
    }

    /// 单个事件类型的过滤条件（topic0 = 事件签名）
    pub fn event_filter<E: EthEvent>(&self) -> Filter {
        Filter::new()
            .address(self.address)
            .topic0(E::signature())
    }

    /// 合约全部事件
    pub fn contract_filter(&self) -> Filter {
        Filter::new().address(self.address)
    }

    pub async fn head(&self) -> Result<u64, BindingError> {
        let number = self
            .client
            .get_block_number()
            .await
            .map_err(BindingError::middleware)?;
        Ok(number.as_u64())
    }

    pub(crate) async fn fetch_range(
        &self,
        filter: &Filter,
        from: u64,
        to: u64,
    ) -> Result<Vec<Log>, BindingError> {
        let range = filter.clone().from_block(from).to_block(to);
        let logs = self
            .client
            .get_logs(&range)
            .await
            .map_err(BindingError::middleware)?;
        debug!(from, to, count = logs.len(), "获取日志 / fetched logs");
        Ok(logs)
    }

    /// 按 `opts` 分段拉取原始日志
    pub async fn fetch(
        &self,
        filter: &Filter,
        opts: &FilterOpts,
    ) -> Result<Vec<Log>, BindingError> {
        let to_block = match opts.to_block {
            Some(to_block) => to_block,
            None => self.head().await?,
        };
        let filter = match opts.topic1 {
            Some(topic) => filter.clone().topic1(topic),
            None => filter.clone(),
        };

        let mut logs = Vec::new();
        for (from, to) in block_ranges(opts.from_block, to_block, opts.chunk_size) {
            logs.extend(self.fetch_range(&filter, from, to).await?);
        }
        Ok(logs)
    }

    pub async fn logs<E: EthEvent>(&self, opts: &FilterOpts) -> Result<EventIter<E>, BindingError> {
        let filter = self.event_filter::<E>();
        Ok(EventIter::new(self.fetch(&filter, opts).await?))
    }

    /// 解码为合约的事件枚举（如 `StakingEvents`）
    pub async fn all_logs<D: EthLogDecode>(
        &self,
        opts: &FilterOpts,
    ) -> Result<EventIter<D>, BindingError> {
        let filter = self.contract_filter();
        Ok(EventIter::new(self.fetch(&filter, opts).await?))
    }
}
