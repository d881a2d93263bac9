mod chain;
mod state;
mod submit_extrinsic;
mod system;

use crate::api::request::Request;
use crate::config::Network;
use crate::network::server::{Handler, ServerError, ServerResponse, Subscriber};
use crate::node::chain::Chain;
use crate::node::runtime::Runtime;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Answers the node RPC methods. Locks are always taken runtime first,
/// then chain.
pub struct NodeApiHandler {
    network: Network,
    runtime: Arc<Mutex<Runtime>>,
    chain: Arc<Mutex<Chain>>,
}

impl NodeApiHandler {
    pub fn new(network: Network, runtime: Arc<Mutex<Runtime>>, chain: Arc<Mutex<Chain>>) -> Self {
        Self {
            network,
            runtime,
            chain,
        }
    }
}

impl Handler<Request> for NodeApiHandler {
    async fn handle_request(
        &self,
        request: Request,
        subscriber: Subscriber,
    ) -> Result<ServerResponse, ServerError> {
        match request {
            Request::SystemChain => {
                let response = system::chain(self.network);
                ServerResponse::new(response)
            }
            Request::SystemName => ServerResponse::new(system::name()),
            Request::SystemHealth => ServerResponse::new(system::health()),
            Request::SystemAccountNextIndex(account) => {
                let runtime = Arc::clone(&self.runtime);
                let response = system::account_next_index(account, runtime).await;
                ServerResponse::new(response)
            }
            Request::ChainGetBlockHash(number) => {
                let chain = Arc::clone(&self.chain);
                let response = chain::get_block_hash(number, chain).await;
                ServerResponse::new(response)
            }
            Request::ChainGetFinalizedHead => {
                let chain = Arc::clone(&self.chain);
                let response = chain::get_finalized_head(chain).await;
                ServerResponse::new(response)
            }
            Request::StateAccount(account) => {
                let runtime = Arc::clone(&self.runtime);
                let response = state::account(account, runtime).await;
                ServerResponse::new(response)
            }
            Request::StateRegisteredDapp(contract) => {
                let runtime = Arc::clone(&self.runtime);
                let response = state::registered_dapp(contract, runtime).await;
                ServerResponse::new(response)
            }
            Request::AuthorSubmitAndWatchExtrinsic(extrinsic) => {
                let runtime = Arc::clone(&self.runtime);
                let chain = Arc::clone(&self.chain);
                let response =
                    submit_extrinsic::handle_request(extrinsic, runtime, chain, subscriber).await?;
                ServerResponse::new(response)
            }
        }
    }
}
