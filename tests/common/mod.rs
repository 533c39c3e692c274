#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use contract_bindings::contract::staking::StakedFilter;
use ethers::{
    abi::{encode, Token},
    contract::EthEvent,
    providers::{MockProvider, Provider},
    types::{Address, Bytes, Log, Transaction, TransactionReceipt, H256, U256, U64},
};
use serde_json::{json, Value};

pub type MockClient = Provider<MockProvider>;

pub fn mocked() -> (Arc<MockClient>, MockProvider) {
    let (provider, mock) = Provider::mocked();
    (Arc::new(provider), mock)
}

/// 轮询间隔缩短到 10ms，等待交易确认时不会拖慢测试
pub fn mocked_fast_poll() -> (Arc<MockClient>, MockProvider) {
    let (provider, mock) = Provider::mocked();
    (Arc::new(provider.interval(Duration::from_millis(10))), mock)
}

/// MockProvider 后进先出，这里按调用顺序传入，倒序压栈
pub fn respond_in_order(mock: &MockProvider, responses: Vec<Value>) {
    for value in responses.into_iter().rev() {
        mock.push::<Value, _>(value).unwrap();
    }
}

pub fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// eth_call 返回值
pub fn returns(tokens: &[Token]) -> Value {
    json!(Bytes::from(encode(tokens)))
}

pub fn uint(value: u64) -> Token {
    Token::Uint(U256::from(value))
}

pub fn block_number(number: u64) -> Value {
    json!(U64::from(number))
}

pub fn logs(logs: &[Log]) -> Value {
    json!(logs)
}

pub fn staked_log(contract: Address, user: Address, amount: u64, total: u64, block: u64) -> Log {
    Log {
        address: contract,
        topics: vec![StakedFilter::signature(), H256::from(user)],
        data: encode(&[uint(amount), uint(total)]).into(),
        block_number: Some(U64::from(block)),
        transaction_hash: Some(H256::repeat_byte(block as u8)),
        log_index: Some(U256::zero()),
        ..Default::default()
    }
}

/// topic0 不属于任何已知事件
pub fn unknown_log(contract: Address, block: u64) -> Log {
    Log {
        address: contract,
        topics: vec![H256::repeat_byte(0xee)],
        data: Bytes::default(),
        block_number: Some(U64::from(block)),
        ..Default::default()
    }
}

/// eth_getTransactionByHash：已打包进 `block`
pub fn mined_transaction(hash: H256, block: u64) -> Value {
    json!(Transaction {
        hash,
        block_number: Some(U64::from(block)),
        ..Default::default()
    })
}

/// eth_getTransactionReceipt
pub fn receipt(hash: H256, block: u64, status: u64) -> Value {
    json!(TransactionReceipt {
        transaction_hash: hash,
        block_number: Some(U64::from(block)),
        status: Some(U64::from(status)),
        ..Default::default()
    })
}
