use std::fmt;

use crate::MemberId;

/// Store key holding the JSON-encoded [crate::Snapshot].
pub const STATE_KEY: &[u8] = b"stateKey";

/// Namespace prepended to every member ID before it reaches the store.
pub const MEMBER_PREFIX: &[u8] = b"lrpsMemberKey:";

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    /// Aggregate snapshot (entry count, height, app hash).
    Snapshot,
    /// A member record, keyed by its opaque ID.
    Member(MemberId),
}

impl Key {
    /// Raw store key bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Snapshot => STATE_KEY.to_vec(),
            Self::Member(id) => {
                let mut key = Vec::with_capacity(MEMBER_PREFIX.len() + id.as_ref().len());
                key.extend_from_slice(MEMBER_PREFIX);
                key.extend_from_slice(id.as_ref());
                key
            }
        }
    }
}

/// Outcome code for a delivered (or checked) transaction.
///
/// Rejections are ordinary results, not faults: the ledger is left untouched and the driver
/// decides what to do with the code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Code {
    #[default]
    Ok = 0,
    FormatError = 1,
    MemberNotFoundError = 2,
    NoCardError = 3,
}

impl Code {
    pub fn is_ok(&self) -> bool {
        matches!(self, Code::Ok)
    }

    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Code::Ok => "ok",
            Code::FormatError => "formatError",
            Code::MemberNotFoundError => "memberNotFoundError",
            Code::NoCardError => "noCardError",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value result tag attached to a delivered transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Tag {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}",
            String::from_utf8_lossy(&self.key),
            String::from_utf8_lossy(&self.value)
        )
    }
}
