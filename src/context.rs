use crate::config::{Config, Network};
use crate::keyring::{DevAccount, Keypair};
use crate::network::client::{Client, ClientError, TcpClient};
use crate::rpc::RpcApi;
use crate::suite::{SuiteReport, TestCase, run_suite};
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error("Client error: {0}")]
    ClientError(#[from] ClientError),
}

/// Connection and funded signers shared by every case of a suite.
pub struct TestContext<C> {
    pub network: Network,
    pub api: RpcApi<C>,
    pub alice: Keypair,
    pub bob: Keypair,
}

impl<C> TestContext<C>
where
    C: Client + Send + Sync,
{
    pub async fn new(
        network: Network,
        client: C,
        finality_timeout: Duration,
    ) -> Result<Self, ContextError> {
        let api = RpcApi::new(client)
            .await?
            .with_finality_timeout(finality_timeout);
        Ok(Self {
            network,
            api,
            alice: DevAccount::Alice.pair(),
            bob: DevAccount::Bob.pair(),
        })
    }
}

/// Suite title built from the raw network id, e.g. `astar RPC`.
pub fn suite_title(network: Network) -> String {
    format!("{network} RPC")
}

/// Connects to `config.endpoint`, runs `cases` in order on that single
/// connection and releases it once the last case is done.
pub async fn describe_with_network(
    config: &Config,
    title: &str,
    cases: &[TestCase<TcpClient>],
) -> Result<SuiteReport, ContextError> {
    tracing::info!(network = %config.network, endpoint = %config.endpoint, "Connecting to rpc node");
    let client = TcpClient::connect(config.endpoint.as_str()).await?;
    let context = TestContext::new(config.network, client, config.finality_timeout).await?;

    let health = context.api.system_health().await?;
    tracing::debug!(?health, "Node health");

    let report = run_suite(&context, title, cases).await;
    drop(context);
    tracing::debug!(title, "Released rpc connection");
    Ok(report)
}
