use crate::api::request::Request;
use crate::api::response::{Health, TxStatus};
use crate::extrinsic::SignedExtrinsic;
use crate::network::client::{Client, ClientError, Subscription};
use crate::primitives::{AccountId, AccountInfo, Address, BlockHash, BlockNumber, DAppInfo, Nonce};
use std::time::Duration;

pub const DEFAULT_FINALITY_TIMEOUT: Duration = Duration::from_secs(60);

/// Typed view over the node RPC methods used by the suite.
pub struct RpcApi<C> {
    client: C,
    genesis_hash: BlockHash,
    finality_timeout: Duration,
}

impl<C> RpcApi<C>
where
    C: Client + Send + Sync,
{
    pub async fn new(client: C) -> Result<Self, ClientError> {
        let genesis_hash: Option<BlockHash> =
            client.request(Request::ChainGetBlockHash(Some(0))).await?;
        let genesis_hash = genesis_hash.ok_or(ClientError::MissingGenesis)?;
        tracing::debug!(%genesis_hash, "Fetched genesis hash");
        Ok(Self {
            client,
            genesis_hash,
            finality_timeout: DEFAULT_FINALITY_TIMEOUT,
        })
    }

    pub fn with_finality_timeout(mut self, finality_timeout: Duration) -> Self {
        self.finality_timeout = finality_timeout;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn genesis_hash(&self) -> &BlockHash {
        &self.genesis_hash
    }

    pub fn finality_timeout(&self) -> Duration {
        self.finality_timeout
    }

    pub async fn system_chain(&self) -> Result<String, ClientError> {
        self.client.request(Request::SystemChain).await
    }

    pub async fn system_name(&self) -> Result<String, ClientError> {
        self.client.request(Request::SystemName).await
    }

    pub async fn system_health(&self) -> Result<Health, ClientError> {
        self.client.request(Request::SystemHealth).await
    }

    pub async fn system_account_next_index(&self, account: &AccountId) -> Result<Nonce, ClientError> {
        let request = Request::SystemAccountNextIndex(account.clone());
        self.client.request(request).await
    }

    pub async fn chain_get_block_hash(
        &self,
        number: Option<BlockNumber>,
    ) -> Result<Option<BlockHash>, ClientError> {
        self.client.request(Request::ChainGetBlockHash(number)).await
    }

    pub async fn chain_get_finalized_head(&self) -> Result<BlockHash, ClientError> {
        self.client.request(Request::ChainGetFinalizedHead).await
    }

    /// `system.account` storage entry.
    pub async fn account(&self, account: &AccountId) -> Result<AccountInfo, ClientError> {
        self.client
            .request(Request::StateAccount(account.clone()))
            .await
    }

    /// `dappsStaking.registeredDapps` storage entry.
    pub async fn registered_dapp(&self, contract: &Address) -> Result<Option<DAppInfo>, ClientError> {
        self.client
            .request(Request::StateRegisteredDapp(contract.clone()))
            .await
    }

    pub async fn submit_and_watch(
        &self,
        extrinsic: SignedExtrinsic,
    ) -> Result<Subscription<TxStatus>, ClientError> {
        self.client
            .subscribe(Request::AuthorSubmitAndWatchExtrinsic(extrinsic))
            .await
    }
}
