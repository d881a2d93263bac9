use crate::node::chain::Chain;
use crate::primitives::{BlockHash, BlockNumber};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Hash of block `number`, or of the best block when no number is given.
pub async fn get_block_hash(
    number: Option<BlockNumber>,
    chain: Arc<Mutex<Chain>>,
) -> Option<BlockHash> {
    tracing::debug!(?number, "Received chain_getBlockHash request");
    let chain = chain.lock().await;
    match number {
        Some(number) => chain.block(number).map(|block| block.hash),
        None => Some(chain.best().hash),
    }
}

pub async fn get_finalized_head(chain: Arc<Mutex<Chain>>) -> BlockHash {
    tracing::debug!("Received chain_getFinalizedHead request");
    chain.lock().await.finalized_head()
}
