use crate::api::handler::NodeApiHandler;
use crate::api::request::Request;
use crate::config::Network;
use crate::network::server::{self, ServerError};
use crate::node::chain::Chain;
use crate::node::runtime::{GenesisConfig, Runtime};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(thiserror::Error, Debug)]
pub enum NodeError {
    #[error("Server Error: {0}")]
    ServerError(#[from] ServerError),
}

pub fn dev_handler(network: Network) -> NodeApiHandler {
    let chain = Chain::new(network);
    let runtime = Runtime::new(&GenesisConfig::dev(), chain.genesis_hash());
    tracing::debug!(%network, genesis_hash = %chain.genesis_hash(), "Built dev chain");
    NodeApiHandler::new(
        network,
        Arc::new(Mutex::new(runtime)),
        Arc::new(Mutex::new(chain)),
    )
}

pub async fn start_node(network: Network, port: u16) -> Result<(), NodeError> {
    tracing::debug!("Starting a local {} node", network);
    let handler = Arc::new(dev_handler(network));
    server::start_server::<Request, _>(port, handler).await?;
    Ok(())
}

/// Serves a fresh dev chain on an already bound listener.
pub async fn serve_node(listener: TcpListener, network: Network) -> Result<(), NodeError> {
    let handler = Arc::new(dev_handler(network));
    server::serve::<Request, _>(listener, handler).await?;
    Ok(())
}
