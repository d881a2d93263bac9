use crate::api::response::{INVALID_TRANSACTION, RpcError, TxStatus};
use crate::extrinsic::SignedExtrinsic;
use crate::network::server::{ServerError, Subscriber};
use crate::node::chain::Chain;
use crate::node::runtime::Runtime;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Validates the extrinsic, seals it into its own block and finalizes that
/// block, notifying `subscriber` at every step. Returns the subscription id.
pub async fn handle_request(
    extrinsic: SignedExtrinsic,
    runtime: Arc<Mutex<Runtime>>,
    chain: Arc<Mutex<Chain>>,
    subscriber: Subscriber,
) -> Result<u64, ServerError> {
    let tx_hash = extrinsic.hash();
    tracing::debug!(%tx_hash, signer = %extrinsic.signer, "Received author_submitAndWatchExtrinsic request");

    let mut runtime = runtime.lock().await;
    if let Err(e) = runtime.validate(&extrinsic) {
        tracing::warn!(%tx_hash, "Rejecting extrinsic. {}", e);
        let error = RpcError::new(INVALID_TRANSACTION, format!("Invalid Transaction: {e}"));
        return Err(ServerError::Rejected(error));
    }
    subscriber.notify(TxStatus::Ready)?;

    let mut chain = chain.lock().await;
    let block_number = chain.best().number + 1;
    let dispatch_error = runtime.apply(&extrinsic, block_number).err();
    let block_hash = chain.seal_block(vec![tx_hash]).hash;
    subscriber.notify(TxStatus::InBlock {
        block_hash,
        dispatch_error: dispatch_error.clone(),
    })?;

    chain.finalize(&block_hash);
    subscriber.notify(TxStatus::Finalized {
        block_hash,
        dispatch_error,
    })?;
    Ok(subscriber.id())
}
