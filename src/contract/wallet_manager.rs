use ethers::prelude::*;

use crate::error::BindingError;

// 合约 ABI 定义 - 由 WalletManager 编译产物导出，请勿手动修改
abigen!(
    WalletManager,
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
        {"inputs": [], "name": "ZeroAddress", "type": "error"},
        {
            "inputs": [{"internalType": "address", "name": "account", "type": "address"}],
            "name": "AccountAlreadyDeployed",
            "type": "error"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "account", "type": "address"},
                {"indexed": true, "internalType": "address", "name": "owner", "type": "address"},
                {"indexed": false, "internalType": "uint256", "name": "salt", "type": "uint256"}
            ],
            "name": "AccountCreated",
            "type": "event"
        },
        {
            "anonymous": false,
            "inputs": [
                {"indexed": true, "internalType": "address", "name": "oldImplementation", "type": "address"},
                {"indexed": true, "internalType": "address", "name": "newImplementation", "type": "address"}
            ],
            "name": "AccountImplementationUpdated",
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
                {"internalType": "address", "name": "entryPointAddress", "type": "address"},
                {"internalType": "address", "name": "implementation", "type": "address"}
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
            "name": "entryPoint",
            "outputs": [{"internalType": "contract IEntryPoint", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "accountImplementation",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [
                {"internalType": "address", "name": "owner", "type": "address"},
                {"internalType": "uint256", "name": "salt", "type": "uint256"}
            ],
            "name": "createAccount",
            "outputs": [{"internalType": "address", "name": "account", "type": "address"}],
            "stateMutability": "nonpayable",
            "type": "function"
        },
        {
            "inputs": [
                {"internalType": "address", "name": "owner", "type": "address"},
                {"internalType": "uint256", "name": "salt", "type": "uint256"}
            ],
            "name": "getAddress",
            "outputs": [{"internalType": "address", "name": "", "type": "address"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "account", "type": "address"}],
            "name": "isManagedAccount",
            "outputs": [{"internalType": "bool", "name": "", "type": "bool"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "owner", "type": "address"}],
            "name": "accountsOf",
            "outputs": [{"internalType": "address[]", "name": "", "type": "address[]"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [],
            "name": "accountCount",
            "outputs": [{"internalType": "uint256", "name": "", "type": "uint256"}],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [{"internalType": "address", "name": "newImplementation", "type": "address"}],
            "name": "setAccountImplementation",
            "outputs": [],
            "stateMutability": "nonpayable",
            "type": "function"
        }
    ]"#
);

/// 某个 (owner, salt) 对应的智能账户地址，以及是否已部署
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLookup {
    pub owner: Address,
    pub salt: U256,
    pub address: Address,
    pub deployed: bool,
}

impl<M: Middleware> WalletManager<M> {
    pub async fn lookup_account(
        &self,
        owner: Address,
        salt: U256,
    ) -> Result<AccountLookup, BindingError> {
        let address = self
            .get_address(owner, salt)
            .call()
            .await
            .map_err(BindingError::from_contract)?;
        // 有代码即视为已部署
        let code = self
            .client()
            .get_code(address, None)
            .await
            .map_err(BindingError::middleware)?;

        Ok(AccountLookup {
            owner,
            salt,
            address,
            deployed: !code.is_empty(),
        })
    }
}
