use crate::api::response::TxStatus;
use crate::extrinsic::{Call, SignedExtrinsic};
use crate::keyring::Keypair;
use crate::network::client::{Client, ClientError, Subscription};
use crate::primitives::{BlockHash, DispatchError};
use crate::rpc::RpcApi;
use std::fmt;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum TxError {
    #[error("Client error: {0}")]
    ClientError(#[from] ClientError),
    #[error("Extrinsic was not finalized within {0:?}")]
    Timeout(Duration),
    #[error("Status subscription closed before a terminal status")]
    ConnectionClosed,
}

/// Terminal state of a submitted extrinsic.
#[derive(Clone, Debug, PartialEq)]
pub enum TxOutcome {
    Finalized {
        block_hash: BlockHash,
    },
    DispatchFailed {
        block_hash: BlockHash,
        error: DispatchError,
    },
    Rejected {
        reason: String,
    },
}

impl TxOutcome {
    pub fn is_finalized(&self) -> bool {
        matches!(self, TxOutcome::Finalized { .. })
    }
}

impl fmt::Display for TxOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxOutcome::Finalized { block_hash } => write!(f, "finalized in {block_hash}"),
            TxOutcome::DispatchFailed { block_hash, error } => {
                write!(f, "dispatch failed in {block_hash}: {error}")
            }
            TxOutcome::Rejected { reason } => write!(f, "rejected: {reason}"),
        }
    }
}

/// Signs `call` with the signer's next nonce, submits it and waits until the
/// node reports a terminal status or the api's finality timeout elapses.
pub async fn send_transaction<C>(
    api: &RpcApi<C>,
    call: Call,
    signer: &Keypair,
) -> Result<TxOutcome, TxError>
where
    C: Client + Send + Sync,
{
    let nonce = api.system_account_next_index(signer.account_id()).await?;
    let extrinsic = SignedExtrinsic::sign(call, nonce, api.genesis_hash(), signer);
    let tx_hash = extrinsic.hash();
    tracing::debug!(%tx_hash, signer = %signer.account_id(), nonce, "Submitting extrinsic");

    let subscription = match api.submit_and_watch(extrinsic).await {
        Ok(subscription) => subscription,
        Err(ClientError::Rpc(error)) => {
            tracing::warn!(%tx_hash, %error, "Extrinsic rejected by node");
            return Ok(TxOutcome::Rejected {
                reason: error.message,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let timeout = api.finality_timeout();
    let outcome = tokio::time::timeout(timeout, wait_for_finality(subscription))
        .await
        .map_err(|_| TxError::Timeout(timeout))??;
    tracing::debug!(%tx_hash, %outcome, "Extrinsic reached terminal status");
    Ok(outcome)
}

async fn wait_for_finality(
    mut subscription: Subscription<TxStatus>,
) -> Result<TxOutcome, TxError> {
    while let Some(status) = subscription.next().await {
        match status? {
            TxStatus::Ready => tracing::trace!("Extrinsic is ready"),
            TxStatus::InBlock { block_hash, .. } => {
                tracing::debug!(%block_hash, "Extrinsic included in block")
            }
            TxStatus::Finalized {
                block_hash,
                dispatch_error: None,
            } => return Ok(TxOutcome::Finalized { block_hash }),
            TxStatus::Finalized {
                block_hash,
                dispatch_error: Some(error),
            } => return Ok(TxOutcome::DispatchFailed { block_hash, error }),
            TxStatus::Dropped => {
                return Ok(TxOutcome::Rejected {
                    reason: "Dropped".to_string(),
                });
            }
            TxStatus::Invalid { reason } => return Ok(TxOutcome::Rejected { reason }),
        }
    }
    Err(TxError::ConnectionClosed)
}

pub mod balances {
    use crate::extrinsic::{BalancesCall, Call};
    use crate::primitives::{Address, Balance};

    pub fn transfer(dest: Address, value: Balance) -> Call {
        Call::Balances(BalancesCall::Transfer { dest, value })
    }
}

pub mod dapps_staking {
    use crate::extrinsic::{Call, DappsStakingCall};
    use crate::primitives::Address;

    pub fn register(contract: Address) -> Call {
        Call::DappsStaking(DappsStakingCall::Register { contract })
    }

    pub fn unregister(contract: Address) -> Call {
        Call::DappsStaking(DappsStakingCall::Unregister { contract })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::Request;
    use crate::api::response::RpcError;
    use crate::keyring::DevAccount;
    use crate::network::client::test_utils::TestClient;
    use crate::primitives::Address;

    fn genesis() -> BlockHash {
        BlockHash::digest("genesis")
    }

    fn block() -> BlockHash {
        BlockHash::digest("block 1")
    }

    fn transfer() -> Call {
        balances::transfer(Address::Id(DevAccount::Charlie.account_id()), 100)
    }

    /// Client answering the genesis, nonce and submission requests.
    fn submitting_client() -> TestClient {
        TestClient::new()
            .with_response(genesis())
            .with_response(7u64)
            .with_response(3u64)
    }

    #[tokio::test]
    async fn resolve_finalized_extrinsic() {
        let client = submitting_client()
            .with_notification(TxStatus::Ready)
            .with_notification(TxStatus::InBlock {
                block_hash: block(),
                dispatch_error: None,
            })
            .with_notification(TxStatus::Finalized {
                block_hash: block(),
                dispatch_error: None,
            });
        let api = RpcApi::new(client).await.unwrap();

        let outcome = send_transaction(&api, transfer(), &DevAccount::Alice.pair())
            .await
            .unwrap();
        assert_eq!(outcome, TxOutcome::Finalized { block_hash: block() });
        assert!(outcome.is_finalized());
    }

    #[tokio::test]
    async fn sign_with_next_account_index() {
        let client = submitting_client().with_notification(TxStatus::Finalized {
            block_hash: block(),
            dispatch_error: None,
        });
        let api = RpcApi::new(client).await.unwrap();
        let alice = DevAccount::Alice.pair();

        send_transaction(&api, transfer(), &alice).await.unwrap();

        let requests = api.client().requests.lock().await;
        assert_eq!(
            requests[1],
            Request::SystemAccountNextIndex(alice.account_id().clone())
        );
        match &requests[2] {
            Request::AuthorSubmitAndWatchExtrinsic(extrinsic) => {
                assert_eq!(extrinsic.nonce, 7);
                assert_eq!(extrinsic.call, transfer());
                assert!(extrinsic.verify(&genesis()).is_ok());
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[tokio::test]
    async fn report_dispatch_error() {
        let error = DispatchError::new("Balances", "InsufficientBalance");
        let client = submitting_client().with_notification(TxStatus::Finalized {
            block_hash: block(),
            dispatch_error: Some(error.clone()),
        });
        let api = RpcApi::new(client).await.unwrap();

        let outcome = send_transaction(&api, transfer(), &DevAccount::Bob.pair())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TxOutcome::DispatchFailed {
                block_hash: block(),
                error
            }
        );
        assert!(!outcome.is_finalized());
    }

    #[tokio::test]
    async fn report_rejected_submission() {
        let client = TestClient::new()
            .with_response(genesis())
            .with_response(0u64)
            .with_error(RpcError::new(1010, "Invalid Transaction: Transaction is outdated"));
        let api = RpcApi::new(client).await.unwrap();

        let outcome = send_transaction(&api, transfer(), &DevAccount::Alice.pair())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TxOutcome::Rejected {
                reason: "Invalid Transaction: Transaction is outdated".to_string()
            }
        );
    }

    #[tokio::test]
    async fn report_invalid_status() {
        let client = submitting_client()
            .with_notification(TxStatus::Ready)
            .with_notification(TxStatus::Invalid {
                reason: "Stale".to_string(),
            });
        let api = RpcApi::new(client).await.unwrap();

        let outcome = send_transaction(&api, transfer(), &DevAccount::Alice.pair())
            .await
            .unwrap();
        assert_eq!(
            outcome,
            TxOutcome::Rejected {
                reason: "Stale".to_string()
            }
        );
    }

    #[tokio::test]
    async fn fail_when_subscription_closes_early() {
        let client = submitting_client().with_notification(TxStatus::Ready);
        let api = RpcApi::new(client).await.unwrap();

        let outcome = send_transaction(&api, transfer(), &DevAccount::Alice.pair()).await;
        assert!(matches!(outcome, Err(TxError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn time_out_without_finality() {
        let client = submitting_client()
            .with_notification(TxStatus::Ready)
            .keep_open();
        let api = RpcApi::new(client)
            .await
            .unwrap()
            .with_finality_timeout(Duration::from_millis(50));

        let outcome = send_transaction(&api, transfer(), &DevAccount::Alice.pair()).await;
        assert!(matches!(outcome, Err(TxError::Timeout(_))));
    }
}
