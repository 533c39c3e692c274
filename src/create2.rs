//! 智能账户的确定性地址计算 (EIP-1014 CREATE2)
//!
//! 账户以 ERC1967 代理形式部署：
//! `initCode = proxyCreationCode ++ abi.encode(implementation, abi.encodeCall(initialize, (owner)))`

use ethers::{
    abi::{encode, Token},
    types::{Address, U256},
    utils::{get_create2_address, id},
};

/// uint256 salt 的 32 字节大端表示，与合约中的 `bytes32(salt)` 一致
pub fn salt_bytes(salt: U256) -> [u8; 32] {
    let mut buffer = [0u8; 32];
    salt.to_big_endian(&mut buffer);
    buffer
}

/// keccak256(0xff ++ deployer ++ salt ++ keccak256(init_code))[12:]
pub fn create2_address(deployer: Address, salt: [u8; 32], init_code: &[u8]) -> Address {
    get_create2_address(deployer, salt, init_code)
}

/// 账户的 `initialize(address owner)` 调用数据
pub fn initialize_calldata(owner: Address) -> Vec<u8> {
    let mut data = id("initialize(address)").to_vec();
    data.extend(encode(&[Token::Address(owner)]));
    data
}

pub fn account_init_code(
    proxy_creation_code: &[u8],
    implementation: Address,
    owner: Address,
) -> Vec<u8> {
    let mut code = Vec::with_capacity(proxy_creation_code.len() + 160);
    code.extend_from_slice(proxy_creation_code);
    code.extend(encode(&[
        Token::Address(implementation),
        Token::Bytes(initialize_calldata(owner)),
    ]));
    code
}

/// 本地预测 `createAccount(owner, salt)` 会部署到的地址，无需 RPC
pub fn predict_account_address(
    factory: Address,
    proxy_creation_code: &[u8],
    implementation: Address,
    owner: Address,
    salt: U256,
) -> Address {
    let init_code = account_init_code(proxy_creation_code, implementation, owner);
    create2_address(factory, salt_bytes(salt), &init_code)
}
