use crate::node::runtime::Runtime;
use crate::primitives::{AccountId, AccountInfo, Address, DAppInfo};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn account(account: AccountId, runtime: Arc<Mutex<Runtime>>) -> AccountInfo {
    tracing::debug!(%account, "Received state_account request");
    runtime.lock().await.account(&account)
}

pub async fn registered_dapp(contract: Address, runtime: Arc<Mutex<Runtime>>) -> Option<DAppInfo> {
    tracing::debug!(%contract, "Received state_registeredDapp request");
    runtime.lock().await.registered_dapp(&contract)
}
