//! GasPriceOracle / Staking / WalletManager 合约绑定
//!
//! - `contract`：由内嵌 ABI 生成的绑定及链上状态快照
//! - `opts` / `session`：只读调用与交易发送参数
//! - `filter` / `watch`：历史事件查询与实时监听
//! - `create2`：智能账户地址预测

pub mod config;
pub mod contract;
pub mod create2;
pub mod error;
pub mod filter;
pub mod opts;
pub mod session;
pub mod watch;

pub use config::Config;
pub use contract::{
    admin_status, AccountLookup, AdminControls, AdminStatus, GasPriceOracle, PriceSnapshot,
    RewardSchedule, StakePosition, Staking, WalletManager,
};
pub use error::BindingError;
pub use filter::{decode_log, DecodedLog, EventIter, FilterOpts, Filterer};
pub use opts::{CallOpts, TransactOpts};
pub use session::Session;
pub use watch::{Subscription, WatchOpts};
