//! 合约绑定：每个子模块内嵌一份 ABI，由 `abigen!` 生成调用、事件与错误类型

pub mod admin;
pub mod gas_price_oracle;
pub mod staking;
pub mod wallet_manager;

pub use admin::{
    admin_status, implementation_address, AdminControls, AdminStatus, IMPLEMENTATION_SLOT,
};
pub use gas_price_oracle::{
    GasPriceOracle, GasPriceOracleErrors, GasPriceOracleEvents, PriceSnapshot,
};
pub use staking::{RewardSchedule, StakePosition, Staking, StakingErrors, StakingEvents};
pub use wallet_manager::{AccountLookup, WalletManager, WalletManagerErrors, WalletManagerEvents};
