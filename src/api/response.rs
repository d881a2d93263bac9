use crate::primitives::{BlockHash, DispatchError};

/// Error code for extrinsics rejected by the transaction pool.
pub const INVALID_TRANSACTION: i32 = 1010;
pub const PARSE_ERROR: i32 = -32700;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(serde::Serialize, serde::Deserialize, thiserror::Error, Debug, Clone, PartialEq)]
#[error("RPC error ({code}): {message}")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum ResponseFrame {
    Result {
        id: u64,
        result: serde_json::Value,
    },
    Error {
        id: u64,
        error: RpcError,
    },
    Notification {
        subscription: u64,
        params: serde_json::Value,
    },
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub peers: u32,
    pub is_syncing: bool,
    pub should_have_peers: bool,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum TxStatus {
    Ready,
    InBlock {
        block_hash: BlockHash,
        dispatch_error: Option<DispatchError>,
    },
    Finalized {
        block_hash: BlockHash,
        dispatch_error: Option<DispatchError>,
    },
    Dropped,
    Invalid {
        reason: String,
    },
}
