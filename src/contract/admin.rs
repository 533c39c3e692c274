//! 三个合约共用的 Ownable / Pausable / UUPS 管理接口

use std::sync::Arc;

use ethers::{
    contract::builders::ContractCall,
    providers::Middleware,
    types::{Address, Bytes, H256},
};

use super::{GasPriceOracle, Staking, WalletManager};
use crate::error::BindingError;

/// ERC1967 实现合约存储槽：`keccak256("eip1967.proxy.implementation") - 1`
pub const IMPLEMENTATION_SLOT: H256 = H256([
    0x36, 0x08, 0x94, 0xa1, 0x3b, 0xa1, 0xa3, 0x21, 0x06, 0x67, 0xc8, 0x28, 0x49, 0x2d, 0xb9, 0x8d,
    0xca, 0x3e, 0x20, 0x76, 0xcc, 0x37, 0x35, 0xa9, 0x20, 0xa3, 0xca, 0x50, 0x5d, 0x38, 0x2b, 0xbc,
]);

/// 统一访问各合约的所有权、暂停与升级方法
pub trait AdminControls<M: Middleware> {
    fn contract_address(&self) -> Address;
    fn contract_client(&self) -> Arc<M>;
    fn admin_owner(&self) -> ContractCall<M, Address>;
    fn admin_paused(&self) -> ContractCall<M, bool>;
    fn admin_pause(&self) -> ContractCall<M, ()>;
    fn admin_unpause(&self) -> ContractCall<M, ()>;
    fn admin_transfer_ownership(&self, new_owner: Address) -> ContractCall<M, ()>;
    fn admin_renounce_ownership(&self) -> ContractCall<M, ()>;
    fn admin_upgrade(&self, implementation: Address, data: Bytes) -> ContractCall<M, ()>;
}

macro_rules! impl_admin_controls {
    ($($binding:ident),* $(,)?) => {
        $(
            impl<M: Middleware> AdminControls<M> for $binding<M> {
                fn contract_address(&self) -> Address {
                    self.address()
                }

                fn contract_client(&self) -> Arc<M> {
                    self.client()
                }

                fn admin_owner(&self) -> ContractCall<M, Address> {
                    self.owner()
                }

                fn admin_paused(&self) -> ContractCall<M, bool> {
                    self.paused()
                }

                fn admin_pause(&self) -> ContractCall<M, ()> {
                    self.pause()
                }

                fn admin_unpause(&self) -> ContractCall<M, ()> {
                    self.unpause()
                }

                fn admin_transfer_ownership(&self, new_owner: Address) -> ContractCall<M, ()> {
                    self.transfer_ownership(new_owner)
                }

                fn admin_renounce_ownership(&self) -> ContractCall<M, ()> {
                    self.renounce_ownership()
                }

                fn admin_upgrade(
                    &self,
                    implementation: Address,
                    data: Bytes,
                ) -> ContractCall<M, ()> {
                    self.upgrade_to_and_call(implementation, data)
                }
            }
        )*
    };
}

impl_admin_controls!(GasPriceOracle, Staking, WalletManager);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStatus {
    pub address: Address,
    pub owner: Address,
    pub paused: bool,
    /// 未使用代理时为零地址
    pub implementation: Address,
}

pub async fn admin_status<M, C>(contract: &C) -> Result<AdminStatus, BindingError>
where
    M: Middleware,
    C: AdminControls<M> + ?Sized,
{
    let owner = contract
        .admin_owner()
        .call()
        .await
        .map_err(BindingError::from_contract)?;
    let paused = contract
        .admin_paused()
        .call()
        .await
        .map_err(BindingError::from_contract)?;
    let address = contract.contract_address();
    let client = contract.contract_client();
    let implementation = implementation_address(client.as_ref(), address).await?;

    Ok(AdminStatus {
        address,
        owner,
        paused,
        implementation,
    })
}

/// 读取 ERC1967 代理当前指向的实现合约
pub async fn implementation_address<M: Middleware>(
    client: &M,
    proxy: Address,
) -> Result<Address, BindingError> {
    let word = client
        .get_storage_at(proxy, IMPLEMENTATION_SLOT, None)
        .await
        .map_err(BindingError::middleware)?;
    Ok(Address::from_slice(&word.as_bytes()[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{
        providers::{MockProvider, Provider},
        types::U256,
        utils::{id, keccak256},
    };

    #[test]
    fn implementation_slot_matches_eip1967() {
        let hashed = U256::from_big_endian(&keccak256("eip1967.proxy.implementation"));
        let slot = U256::from_big_endian(IMPLEMENTATION_SLOT.as_bytes());
        assert_eq!(slot, hashed - U256::one());
    }

    fn selector<M: Middleware>(call: ContractCall<M, ()>) -> [u8; 4] {
        let data = call.calldata().unwrap();
        [data[0], data[1], data[2], data[3]]
    }

    #[test]
    fn admin_calls_share_selectors_across_bindings() {
        let (provider, _mock) = Provider::<MockProvider>::mocked();
        let client = Arc::new(provider);
        let bindings: Vec<Box<dyn AdminControls<Provider<MockProvider>>>> = vec![
            Box::new(GasPriceOracle::new(Address::repeat_byte(1), client.clone())),
            Box::new(Staking::new(Address::repeat_byte(2), client.clone())),
            Box::new(WalletManager::new(Address::repeat_byte(3), client)),
        ];
        let new_owner = Address::repeat_byte(0xab);
        let implementation = Address::repeat_byte(0xcd);

        for (i, binding) in bindings.iter().enumerate() {
            assert_eq!(binding.contract_address(), Address::repeat_byte(i as u8 + 1));
            assert_eq!(selector(binding.admin_pause()), id("pause()"));
            assert_eq!(selector(binding.admin_unpause()), id("unpause()"));
            assert_eq!(selector(binding.admin_renounce_ownership()), id("renounceOwnership()"));

            let transfer = binding.admin_transfer_ownership(new_owner);
            let data = transfer.calldata().unwrap();
            assert_eq!(&data[..4], &id("transferOwnership(address)"));
            assert_eq!(&data[16..36], new_owner.as_bytes());

            let upgrade = binding.admin_upgrade(implementation, Bytes::from(vec![0xde, 0xad]));
            let data = upgrade.calldata().unwrap();
            assert_eq!(&data[..4], &id("upgradeToAndCall(address,bytes)"));
            assert_eq!(&data[16..36], implementation.as_bytes());
        }
    }
}
