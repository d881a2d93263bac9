use crate::api::response::Health;
use crate::config::Network;
use crate::node::NODE_NAME;
use crate::node::runtime::Runtime;
use crate::primitives::{AccountId, Nonce};
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn chain(network: Network) -> String {
    tracing::debug!("Received system_chain request");
    network.chain_name()
}

pub fn name() -> &'static str {
    tracing::debug!("Received system_name request");
    NODE_NAME
}

pub fn health() -> Health {
    Health {
        peers: 0,
        is_syncing: false,
        should_have_peers: false,
    }
}

pub async fn account_next_index(account: AccountId, runtime: Arc<Mutex<Runtime>>) -> Nonce {
    tracing::debug!(%account, "Received system_accountNextIndex request");
    runtime.lock().await.account_next_index(&account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyring::DevAccount;
    use crate::node::runtime::GenesisConfig;
    use crate::primitives::BlockHash;

    #[test]
    fn report_chain_name_per_network() {
        assert_eq!(chain(Network::Shibuya), "Shibuya Testnet");
    }

    #[tokio::test]
    async fn fresh_account_starts_at_zero() {
        let runtime = Runtime::new(&GenesisConfig::dev(), BlockHash::digest("genesis"));
        let runtime = Arc::new(Mutex::new(runtime));
        let nonce = account_next_index(DevAccount::Dave.account_id(), runtime).await;
        assert_eq!(nonce, 0);
    }
}
