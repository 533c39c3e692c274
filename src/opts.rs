//! 只读调用与交易发送的通用参数（Caller / Transactor）

use ethers::{
    abi::Detokenize,
    contract::builders::ContractCall,
    providers::Middleware,
    types::{Address, BlockId, TransactionReceipt, U256, U64},
};
use tracing::{debug, info, warn};

use crate::error::BindingError;

/// 估算失败时使用的 gas 上限
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;
/// 估算结果上浮 10%
pub const DEFAULT_GAS_MARGIN_PERCENT: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOpts {
    pub from: Option<Address>,
    pub block: Option<BlockId>,
}

impl CallOpts {
    pub fn at_block(block: impl Into<BlockId>) -> Self {
        CallOpts {
            from: None,
            block: Some(block.into()),
        }
    }

    pub fn apply<M: Middleware, D: Detokenize>(
        &self,
        mut call: ContractCall<M, D>,
    ) -> ContractCall<M, D> {
        if let Some(from) = self.from {
            call = call.from(from);
        }
        if let Some(block) = self.block {
            call = call.block(block);
        }
        call
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactOpts {
    pub from: Option<Address>,
    /// 为空时自动估算
    pub gas: Option<U256>,
    pub gas_price: Option<U256>,
    pub value: Option<U256>,
    pub nonce: Option<U256>,
    pub gas_margin_percent: u64,
    pub confirmations: usize,
}

impl Default for TransactOpts {
    fn default() -> Self {
        TransactOpts {
            from: None,
            gas: None,
            gas_price: None,
            value: None,
            nonce: None,
            gas_margin_percent: DEFAULT_GAS_MARGIN_PERCENT,
            confirmations: 1,
        }
    }
}

impl TransactOpts {
    pub fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations;
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// 估算值加上余量 (limit * (100 + margin) / 100)
    pub fn padded_gas(&self, estimate: U256) -> U256 {
        estimate.saturating_mul(U256::from(100 + self.gas_margin_percent)) / U256::from(100)
    }

    /// 填充交易字段；未指定 gas 时先估算，估算失败退回默认值
    pub async fn prepare<M: Middleware, D: Detokenize>(
        &self,
        mut call: ContractCall<M, D>,
    ) -> ContractCall<M, D> {
        if let Some(from) = self.from {
            call = call.from(from);
        }
        if let Some(value) = self.value {
            call = call.value(value);
        }
        if let Some(gas_price) = self.gas_price {
            call = call.gas_price(gas_price);
        }
        if let Some(nonce) = self.nonce {
            call.tx.set_nonce(nonce);
        }

        let gas = match self.gas {
            Some(gas) => gas,
            None => match call.estimate_gas().await {
                Ok(estimate) => {
                    let padded = self.padded_gas(estimate);
                    debug!(%estimate, %padded, "估算 gas 限制 / estimated gas limit");
                    padded
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "估算 gas 失败，使用默认值 / gas estimation failed, using default"
                    );
                    U256::from(DEFAULT_GAS_LIMIT)
                }
            },
        };
        call.gas(gas)
    }
}

pub async fn call<M, D>(call: ContractCall<M, D>, opts: &CallOpts) -> Result<D, BindingError>
where
    M: Middleware,
    D: Detokenize,
{
    opts.apply(call)
        .call()
        .await
        .map_err(BindingError::from_contract)
}

/// 发送交易并等待确认；没有收据或 status 为 0 都视为失败
pub async fn transact<M, D>(
    call: ContractCall<M, D>,
    opts: &TransactOpts,
) -> Result<TransactionReceipt, BindingError>
where
    M: Middleware,
    D: Detokenize,
{
    let call = opts.prepare(call).await;
    let pending = call.send().await.map_err(BindingError::from_contract)?;
    let tx_hash = *pending;
    info!(?tx_hash, "交易已发送 / transaction sent");

    let receipt = pending
        .confirmations(opts.confirmations)
        .await?
        .ok_or(BindingError::NoReceipt(tx_hash))?;

    if receipt.status == Some(U64::zero()) {
        warn!(?tx_hash, "交易执行失败 / transaction reverted");
        return Err(BindingError::Reverted(tx_hash));
    }

    info!(
        ?tx_hash,
        block = ?receipt.block_number,
        gas_used = ?receipt.gas_used,
        "交易已确认 / transaction confirmed"
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_estimate_by_margin() {
        let opts = TransactOpts::default();
        assert_eq!(opts.padded_gas(U256::from(100_000)), U256::from(110_000));

        let opts = TransactOpts {
            gas_margin_percent: 0,
            ..TransactOpts::default()
        };
        assert_eq!(opts.padded_gas(U256::from(21_000)), U256::from(21_000));
    }

    #[test]
    fn padding_saturates_instead_of_overflowing() {
        let opts = TransactOpts::default();
        assert_eq!(opts.padded_gas(U256::MAX), U256::MAX / U256::from(100));
    }

    #[test]
    fn default_waits_one_confirmation() {
        let opts = TransactOpts::default();
        assert_eq!(opts.confirmations, 1);
        assert_eq!(opts.with_confirmations(3).confirmations, 3);
    }
}
