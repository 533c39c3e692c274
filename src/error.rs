use ethers::{
    abi::AbiDecode,
    contract::ContractError,
    providers::{Middleware, ProviderError},
    types::{Bytes, H256},
};
use thiserror::Error;

/// 绑定层统一错误类型
#[derive(Debug, Error)]
pub enum BindingError {
    /// 合约调用失败，节点返回的 revert 数据原样保留，供 `decode_revert` 解析
    #[error("合约调用失败 / Contract call failed: {reason}")]
    Contract { reason: String, revert: Option<Bytes> },

    #[error("中间件错误 / Middleware error: {0}")]
    Middleware(String),

    #[error("RPC 错误 / Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("日志解码失败 / Log decode failed: {0}")]
    Decode(#[from] ethers::abi::Error),

    #[error("交易没有收据 / Transaction {0:?} has no receipt")]
    NoReceipt(H256),

    #[error("交易执行失败 / Transaction {0:?} reverted")]
    Reverted(H256),

    #[error("配置错误 / Config error: {0}")]
    Config(String),

    #[error("订阅任务异常退出 / Subscription task aborted: {0}")]
    Subscription(String),
}

impl BindingError {
    pub fn from_contract<M: Middleware>(err: ContractError<M>) -> Self {
        let revert = match &err {
            ContractError::Revert(data) => Some(data.clone()),
            _ => None,
        };
        BindingError::Contract {
            reason: err.to_string(),
            revert,
        }
    }

    pub fn middleware<E: std::error::Error>(err: E) -> Self {
        BindingError::Middleware(err.to_string())
    }

    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            BindingError::Contract { revert, .. } => revert.as_ref(),
            _ => None,
        }
    }

    /// 用合约生成的错误枚举（如 `StakingErrors`）解析 revert 数据
    pub fn decode_revert<E: AbiDecode>(&self) -> Option<E> {
        self.revert_data().and_then(|data| E::decode(data).ok())
    }
}
