use ethers::prelude::*;

use crate::error::BindingError;

// 合约 ABI 定义 - 由 Staking 编译产物导出，请勿手动修改
abigen!(
    Staking,
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
        {"inputs": [], "name": "ZeroAmount", "type": "error"},
        {
            "inputs": [
                {"internalType": "uint256", "name": "requested", "type": "uint256"},
                {"internalType": "uint256", "name": "available", "type": "uint256"}
            ],
            "name": "InsufficientStake",
            "type": "error"
        },
        {
            "inputs": [
                {"internalType": "uint256", "name": "requested", "type": "uint256"},
                {"internalType": "uint256", "name": "available", "type": "uint256"}
            ],
            "name": "InsufficientRewards",
            "type": "error"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "user", "type": "address"},
                {"indexed": false, "internalType": "uint256", "name": "amount", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "totalStaked", "type": "uint256"}
            ],
            "name": "Staked",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "user", "type": "address"},
                {"indexed": false, "internalType": "uint256", "name": "amount", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "totalStaked", "type": "uint256"}
            ],
            "name": "Unstaked",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "user", "type": "address"},
                {"indexed": false, "internalType": "uint256", "name": "reward", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "comboBonus", "type": "uint256"}
            ],
            "name": "RewardsClaimed",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "user", "type": "address"},
                {"indexed": false, "internalType": "uint256", "name": "comboCount", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "bonusBps", "type": "uint256"}
            ],
            "name": "ComboAchieved",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [{"indexed": true, "internalType": "address", "name": "user", "type": "address"}],
            "name": "ComboReset",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "uint256", "name": "quarter", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "rewardRate", "type": "uint256"}
            ],
            "name": "QuarterAdvanced",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": false, "internalType": "uint256", "name": "oldRate", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "newRate", "type": "uint256"}
            ],
            "name": "RewardRateUpdated",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": false, "internalType": "uint256", "name": "bonusBps", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "window", "type": "uint256"},
                {"indexed": false, "internalType": "uint256", "name": "maxCount", "type": "uint256"}
            ],
            "name": "ComboParamsUpdated",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [{"indexed": false, "internalType": "uint256", "name": "decayBps", "type": "uint256"}],
            "name": "DecayParamsUpdated",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "funder", "type": "address"},
                {"indexed": false, "internalType": "uint256", "name": "amount", "type": "uint256"}
            ],
            "name": "RewardsFunded",
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
                {"internalType": "address", "name": "stakingTokenAddress", "type": "address"},
                {"internalType": "address", "name": "rewardTokenAddress", "type": "address"},
                {"internalType": "uint256", "name": "initialRewardRate", "type": "uint256"}
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
            "name": "stakingToken",
            "outputs": [{"internalType": "contract IERC20", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "rewardToken",
            "outputs": [{"internalType": "contract IERC20", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "amount", "type": "uint256"}],
            "name": "stake",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "amount", "type": "uint256"}],
            "name": "unstake",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "claimRewards",
            "outputs": [{"internalType": "uint256", "name": "reward", "type": "uint256"}],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "user", "type": "address"}],
            "name": "pendingRewards",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "user", "type": "address"}],
            "name": "getStakeInfo",
            "outputs": [
                {"internalType": "uint256", "name": "amount", "type": "uint256"},
                {"internalType": "uint256", "name": "stakedAt", "type": "uint256"},
                {"internalType": "uint256", "name": "lastClaimAt", "type": "uint256"},
                {"internalType": "uint256", "name": "comboCount", "type": "uint256"},
                {"internalType": "uint256", "name": "lastComboAt", "type": "uint256"}
            ],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "user", "type": "address"}],
            "name": "isComboEligible",
            "outputs": [{"internalType": "bool", "name": "", "type": "bool"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "totalStaked",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "baseRewardRate",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "currentRewardRate",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "currentQuarter",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "quarterlyDecayBps",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "comboBonusBps",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "comboWindow",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "maxComboCount",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "newRate", "type": "uint256"}],
            "name": "setBaseRewardRate",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "decayBps", "type": "uint256"}],
            "name": "setDecayParams",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [
                {"internalType": "uint256", "name": "bonusBps", "type": "uint256"},
                {"internalType": "uint256", "name": "window", "type": "uint256"},
                {"internalType": "uint256", "name": "maxCount", "type": "uint256"}
            ],
            "name": "setComboParams",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "uint256", "name": "amount", "type": "uint256"}],
            "name": "fundRewards",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        }
    ]"#
);

/// 单个地址的质押状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakePosition {
    pub user: Address,
    pub amount: U256,
    pub staked_at: U256,
    pub last_claim_at: U256,
    pub combo_count: U256,
    pub last_combo_at: U256,
    pub pending_rewards: U256,
    pub combo_eligible: bool,
}

impl StakePosition {
    pub fn has_stake(&self) -> bool {
        !self.amount.is_zero()
    }
}

/// 奖励曲线参数（季度衰减 + 连击加成），数值均为链上原值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSchedule {
    pub base_reward_rate: U256,
    pub current_reward_rate: U256,
    pub current_quarter: U256,
    pub quarterly_decay_bps: U256,
    pub combo_bonus_bps: U256,
    pub combo_window: U256,
    pub max_combo_count: U256,
    pub total_staked: U256,
}

impl<M: Middleware> Staking<M> {
    pub async fn position(&self, user: Address) -> Result<StakePosition, BindingError> {
        let (amount, staked_at, last_claim_at, combo_count, last_combo_at) = self
            .get_stake_info(user)
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let pending_rewards = self
            .pending_rewards(user)
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let combo_eligible = self
            .is_combo_eligible(user)
            .call()
            .await
            .map_err(BindingError::from_contract)?;

        Ok(StakePosition {
            user,
            amount,
            staked_at,
            last_claim_at,
            combo_count,
            last_combo_at,
            pending_rewards,
            combo_eligible,
        })
    }

    pub async fn schedule(&self) -> Result<RewardSchedule, BindingError> {
        let base_reward_rate = self
            .base_reward_rate()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let current_reward_rate = self
            .current_reward_rate()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let current_quarter = self
            .current_quarter()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let quarterly_decay_bps = self
            .quarterly_decay_bps()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let combo_bonus_bps = self
            .combo_bonus_bps()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let combo_window = self
            .combo_window()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let max_combo_count = self
            .max_combo_count()
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        let total_staked = self
            .total_staked()
            .call()
            .await
            .map_err(BindingError::from_contract)?;

        Ok(RewardSchedule {
            base_reward_rate,
            current_reward_rate,
            current_quarter,
            quarterly_decay_bps,
            combo_bonus_bps,
            combo_window,
            max_combo_count,
            total_staked,
        })
    }
}
