//! Request/response shapes exchanged with the driving consensus layer.

use crate::{Code, Tag};

/// Log line for a query that found a record.
pub const EXISTS: &str = "exists";

/// Log line for a query that found nothing.
pub const DOES_NOT_EXIST: &str = "does not exist";

/// Proof index reported when a proof was requested but not computed.
pub const NO_PROOF_INDEX: i64 = -1;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfoResponse {
    pub last_block_height: i64,
    pub last_block_app_hash: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckTxResponse {
    pub code: Code,
    pub log: String,
    pub gas_wanted: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeliverTxResponse {
    pub code: Code,
    pub log: String,
    pub tags: Vec<Tag>,
}

impl DeliverTxResponse {
    pub fn tag(&self, key: &[u8]) -> Option<&[u8]> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_slice())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitResponse {
    pub data: [u8; crate::APP_HASH_LEN],
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryRequest {
    /// Member ID, without the store namespace.
    pub data: Vec<u8>,
    pub prove: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryResponse {
    /// Echo of the queried key; only set for proof requests.
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
    pub log: String,
    pub index: i64,
}

impl QueryResponse {
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }
}
