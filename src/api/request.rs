use crate::extrinsic::SignedExtrinsic;
use crate::primitives::{AccountId, Address, BlockNumber};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "method", content = "params")]
pub enum Request {
    #[serde(rename = "system_chain")]
    SystemChain,
    #[serde(rename = "system_name")]
    SystemName,
    #[serde(rename = "system_health")]
    SystemHealth,
    #[serde(rename = "system_accountNextIndex")]
    SystemAccountNextIndex(AccountId),
    #[serde(rename = "chain_getBlockHash")]
    ChainGetBlockHash(Option<BlockNumber>),
    #[serde(rename = "chain_getFinalizedHead")]
    ChainGetFinalizedHead,
    #[serde(rename = "state_account")]
    StateAccount(AccountId),
    #[serde(rename = "state_registeredDapp")]
    StateRegisteredDapp(Address),
    #[serde(rename = "author_submitAndWatchExtrinsic")]
    AuthorSubmitAndWatchExtrinsic(SignedExtrinsic),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct RequestFrame<R> {
    pub id: u64,
    pub request: R,
}
