use std::time::Duration;

use ethers::types::Address;

use crate::{error::BindingError, filter::DEFAULT_LOG_CHUNK_SIZE};

pub const DEFAULT_CONFIRMATIONS: usize = 1;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 7;

/// 运行配置，来源于环境变量或 `.env`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
    pub oracle_address: Option<Address>,
    pub staking_address: Option<Address>,
    pub wallet_manager_address: Option<Address>,
    pub private_key: Option<String>,
    pub confirmations: usize,
    pub poll_interval: Duration,
    pub log_chunk_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rpc_url: None,
            chain_id: None,
            oracle_address: None,
            staking_address: None,
            wallet_manager_address: None,
            private_key: None,
            confirmations: DEFAULT_CONFIRMATIONS,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            log_chunk_size: DEFAULT_LOG_CHUNK_SIZE,
        }
    }
}

impl Config {
    /// 先加载 `.env`（不存在时忽略），再读取进程环境变量
    pub fn from_env() -> Result<Self, BindingError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, BindingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // 空字符串视为未设置
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let defaults = Config::default();
        Ok(Config {
            rpc_url: get("RPC_URL"),
            chain_id: get("CHAIN_ID").map(|v| parse_number("CHAIN_ID", &v)).transpose()?,
            oracle_address: get("GAS_PRICE_ORACLE_ADDRESS")
                .map(|v| parse_address("GAS_PRICE_ORACLE_ADDRESS", &v))
                .transpose()?,
            staking_address: get("STAKING_ADDRESS")
                .map(|v| parse_address("STAKING_ADDRESS", &v))
                .transpose()?,
            wallet_manager_address: get("WALLET_MANAGER_ADDRESS")
                .map(|v| parse_address("WALLET_MANAGER_ADDRESS", &v))
                .transpose()?,
            private_key: get("PRIVATE_KEY"),
            confirmations: match get("CONFIRMATIONS") {
                Some(v) => parse_number("CONFIRMATIONS", &v)? as usize,
                None => defaults.confirmations,
            },
            poll_interval: match get("POLL_INTERVAL_SECS") {
                Some(v) => Duration::from_secs(parse_number("POLL_INTERVAL_SECS", &v)?),
                None => defaults.poll_interval,
            },
            log_chunk_size: match get("LOG_CHUNK_SIZE") {
                Some(v) => parse_number("LOG_CHUNK_SIZE", &v)?,
                None => defaults.log_chunk_size,
            },
        })
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, BindingError> {
    value
        .parse::<u64>()
        .map_err(|e| BindingError::Config(format!("{key}={value}: {e}")))
}

fn parse_address(key: &str, value: &str) -> Result<Address, BindingError> {
    value
        .parse::<Address>()
        .map_err(|e| BindingError::Config(format!("{key}={value}: {e}")))
}

/// 私钥格式：0x 开头，后跟 64 位十六进制字符
pub fn validate_private_key(input: &str) -> bool {
    input.starts_with("0x") && input.len() == 66 && hex::decode(&input[2..]).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_all_keys() {
        let config = Config::from_lookup(lookup(&[
            ("RPC_URL", "http://127.0.0.1:8545"),
            ("CHAIN_ID", "31337"),
            ("GAS_PRICE_ORACLE_ADDRESS", "0x1111111111111111111111111111111111111111"),
            ("STAKING_ADDRESS", "0x2222222222222222222222222222222222222222"),
            ("WALLET_MANAGER_ADDRESS", "0x3333333333333333333333333333333333333333"),
            ("CONFIRMATIONS", "3"),
            ("POLL_INTERVAL_SECS", "2"),
            ("LOG_CHUNK_SIZE", "1000"),
        ]))
        .unwrap();

        assert_eq!(config.rpc_url.as_deref(), Some("http://127.0.0.1:8545"));
        assert_eq!(config.chain_id, Some(31337));
        assert_eq!(
            config.staking_address,
            Some("0x2222222222222222222222222222222222222222".parse().unwrap())
        );
        assert_eq!(config.confirmations, 3);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.log_chunk_size, 1000);
    }

    #[test]
    fn blank_values_are_unset() {
        let config =
            Config::from_lookup(lookup(&[("RPC_URL", "  "), ("PRIVATE_KEY", "")])).unwrap();
        assert!(config.rpc_url.is_none());
        assert!(config.private_key.is_none());
    }

    #[test]
    fn rejects_malformed_address() {
        let err = Config::from_lookup(lookup(&[("STAKING_ADDRESS", "0x1234")])).unwrap_err();
        assert!(matches!(err, BindingError::Config(msg) if msg.starts_with("STAKING_ADDRESS")));
    }

    #[test]
    fn rejects_non_numeric_chain_id() {
        assert!(Config::from_lookup(lookup(&[("CHAIN_ID", "mainnet")])).is_err());
    }

    #[test]
    fn private_key_format() {
        let key = format!("0x{}", "ab".repeat(32));
        assert!(validate_private_key(&key));
        assert!(!validate_private_key(&key[2..]));
        assert!(!validate_private_key(&format!("0x{}", "zz".repeat(32))));
        assert!(!validate_private_key("0x1234"));
    }
}
