use ethers::prelude::*;

use crate::error::BindingError;

// 合约 ABI 定义 - 由 GasPriceOracle 编译产物导出，请勿手动修改
abigen!(
    GasPriceOracle,
    r#"[
        {"inputs": [], "stateMutability": "nonpayable", "type": "constructor"},
        {
            "inputs": [{"internalType": "address", "name": "account", "type": "address"}],
            "name": "OwnableUnauthorizedAccount",
            "type": "error"
        },
        {
            "inputs": [{"internalType": "address", "name": "owner", "type": "address"}],
            "name": "OwnableInvalidOwner",
            "type": "error"
        },
        {"inputs": [], "name": "EnforcedPause", "type": "error"},
        {"inputs": [], "name": "ExpectedPause", "type": "error"},
        {
            "inputs": [{"internalType": "address", "name": "caller", "type": "address"}],
            "name": "UnauthorizedUpdater",
            "type": "error"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "price", "type": "uint256"}],
            "name": "InvalidPrice",
            "type": "error"
        },
        {
            "inputs": [
                {"internalType": "uint256", "name": "deviationBps", "type": "uint256"},
                {"internalType": "uint256", "name": "thresholdBps", "type": "uint256"}
            ],
            "name": "DeviationTooHigh",
            "type": "error"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": false, "internalType": "uint256", "name": "oldPrice", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "newPrice", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "timestamp", "type": "uint256"}
            ],
            "name": "PriceUpdated",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": false, "internalType": "uint256", "name": "currentPrice", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "proposedPrice", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "deviationBps", "type": "uint256"}
            ],
            "name": "PriceDeviationRejected",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": false, "internalType": "uint256", "name": "oldPrice", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "newPrice", "type": "uint256"}
            ],
            "name": "FallbackPriceUpdated",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": false, "internalType": "uint256", "name": "oldThresholdBps", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "newThresholdBps", "type": "uint256"}
            ],
            "name": "DeviationThresholdUpdated",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": false, "internalType": "uint256", "name": "oldMaxAge", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "newMaxAge", "type": "uint256"}
            ],
            "name": "MaxPriceAgeUpdated",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "oldUpdater", "type": "address"},
                {"indexed": true, "internalType": "address", "name": "newUpdater", "type": "address"}
            ],
            "name": "UpdaterChanged",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "previousOwner", "type": "address"},
                {"indexed": true, "internalType": "address", "name": "newOwner", "type": "address"}
            ],
            "name": "OwnershipTransferred",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [{"indexed": false, "internalType": "address", "name": "account", "type": "address"}],
            "name": "Paused",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [{"indexed": false, "internalType": "address", "name": "account", "type": "address"}],
            "name": "Unpaused",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [{"indexed": true, "internalType": "address", "name": "implementation", "type": "address"}],
            "name": "Upgraded",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [{"indexed": false, "internalType": "uint64", "name": "version", "type": "uint64"}],
            "name": "Initialized",
            "type": "event"
        },
        {
            "inputs": [
                {"internalType": "address", "name": "initialOwner", "type": "address"},
                {"internalType": "address", "name": "initialUpdater", "type": "address"},
                {"internalType": "uint256", "name": "initialPrice", "type": "uint256"},
                {"internalType": "uint256", "name": "initialFallbackPrice", "type": "uint256"}
            ],
            "name": "initialize",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "owner",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "newOwner", "type": "address"}],
            "name": "transferOwnership",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "renounceOwnership",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "paused",
            "outputs": [{"internalType": "bool", "name": "", "type": "bool"}],
            "stateMutability": "view",
            "type": "function"
        },
        {"inputs": [], "name": "pause", "outputs": [], "stateMutability": "nonpayable", "type": "function"},
        {"inputs": [], "name": "unpause", "outputs": [], "stateMutability": "nonpayable", "type": "function"},
        {
            "inputs": [],
            "name": "proxiableUUID",
            "outputs": [{"internalType": "bytes32", "name": "", "type": "bytes32"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [
                {"internalType": "address", "name": "newImplementation", "type": "address"},
                {"internalType": "bytes", "name": "data", "type": "bytes"}
            ],
            "name": "upgradeToAndCall",
            "outputs": [],
            "stateMutability": "payable",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "getPrice",
            "outputs": [
                {"internalType": "uint256", "name": "price", "type": "uint256"},
                {"internalType": "uint256", "name": "updatedAt", "type": "uint256"},
                {"internalType": "bool", "name": "isValid", "type": "bool"}
            ],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "latestPrice",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "lastUpdatedAt",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "fallbackPrice",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "deviationThresholdBps",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "maxPriceAge",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "updater",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "newPrice", "type": "uint256"}],
            "name": "updatePrice",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "newFallbackPrice", "type": "uint256"}],
            "name": "setFallbackPrice",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "newThresholdBps", "type": "uint256"}],
            "name": "setDeviationThreshold",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "newMaxAge", "type": "uint256"}],
            "name": "setMaxPriceAge",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "newUpdater", "type": "address"}],
            "name": "setUpdater",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        }
    ]"#
);

/// 预言机当前价格及其判定参数的一次性快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSnapshot {
    pub price: U256,
    pub updated_at: U256,
    pub is_valid: bool,
    pub fallback_price: U256,
    pub deviation_threshold_bps: U256,
    pub max_price_age: U256,
}

impl PriceSnapshot {
    /// 距上次更新的秒数，时钟回拨时为 0
    pub fn age(&self, now: u64) -> U256 {
        U256::from(now).saturating_sub(self.updated_at)
    }

    /// `max_price_age` 为 0 表示不限制
    pub fn is_stale(&self, now: u64) -> bool {
        !self.max_price_age.is_zero() && self.age(now) > self.max_price_age
    }
}

impl<M: Middleware> GasPriceOracle<M> {
    pub async fn snapshot(&self) -> Result<PriceSnapshot, BindingError> {
        let (price, updated_at, is_valid) = self
            .get_price()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let fallback_price = self
            .fallback_price()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let deviation_threshold_bps = self
            .deviation_threshold_bps()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let max_price_age = self
            .max_price_age()
            .call()
            .await
            .map_err(BindingError::from_contract)?;

        Ok(PriceSnapshot {
            price,
            updated_at,
            is_valid,
            fallback_price,
            deviation_threshold_bps,
            max_price_age,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(updated_at: u64, max_price_age: u64) -> PriceSnapshot {
        PriceSnapshot {
            price: U256::from(30_000_000_000u64),
            updated_at: U256::from(updated_at),
            is_valid: true,
            fallback_price: U256::from(25_000_000_000u64),
            deviation_threshold_bps: U256::from(500),
            max_price_age: U256::from(max_price_age),
        }
    }

    #[test]
    fn stale_once_older_than_max_age() {
        let snap = snapshot(1_000, 300);
        assert!(!snap.is_stale(1_300));
        assert!(snap.is_stale(1_301));
    }

    #[test]
    fn zero_max_age_never_stale() {
        assert!(!snapshot(0, 0).is_stale(u64::MAX));
    }

    #[test]
    fn age_saturates_when_clock_behind() {
        assert_eq!(snapshot(2_000, 300).age(1_000), U256::zero());
    }

    #[test]
    fn event_signatures_match_abi() {
        assert_eq!(
            PriceUpdatedFilter::abi_signature(),
            "PriceUpdated(uint256,uint256,uint256)"
        );
        assert_eq!(
            UpdaterChangedFilter::abi_signature(),
            "UpdaterChanged(address,address)"
        );
    }
}
