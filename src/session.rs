use std::ops::Deref;

use ethers::{
    abi::Detokenize, contract::builders::ContractCall, providers::Middleware,
    types::TransactionReceipt,
};

use crate::{
    error::BindingError,
    opts::{self, CallOpts, TransactOpts},
};

/// 合约绑定 + 预设的调用/交易参数
///
/// ```ignore
/// let session = Session::new(staking).with_transact_opts(TransactOpts::default().with_confirmations(2));
/// let rate = session.call(|c| c.current_reward_rate()).await?;
/// let receipt = session.transact(|c| c.claim_rewards()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Session<C> {
    contract: C,
    call_opts: CallOpts,
    transact_opts: TransactOpts,
}

impl<C> Session<C> {
    pub fn new(contract: C) -> Self {
        Session {
            contract,
            call_opts: CallOpts::default(),
            transact_opts: TransactOpts::default(),
        }
    }

    pub fn with_call_opts(mut self, call_opts: CallOpts) -> Self {
        self.call_opts = call_opts;
        self
    }

    pub fn with_transact_opts(mut self, transact_opts: TransactOpts) -> Self {
        self.transact_opts = transact_opts;
        self
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    pub fn call_opts(&self) -> &CallOpts {
        &self.call_opts
    }

    pub fn transact_opts(&self) -> &TransactOpts {
        &self.transact_opts
    }

    pub fn into_inner(self) -> C {
        self.contract
    }

    pub async fn call<M, D, F>(&self, build: F) -> Result<D, BindingError>
    where
        M: Middleware,
        D: Detokenize,
        F: FnOnce(&C) -> ContractCall<M, D>,
    {
        opts::call(build(&self.contract), &self.call_opts).await
    }

    pub async fn transact<M, D, F>(&self, build: F) -> Result<TransactionReceipt, BindingError>
    where
        M: Middleware,
        D: Detokenize,
        F: FnOnce(&C) -> ContractCall<M, D>,
    {
        opts::transact(build(&self.contract), &self.transact_opts).await
    }
}

impl<C> Deref for Session<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.contract
    }
}
