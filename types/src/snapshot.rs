use commonware_codec::{varint::SInt, Encode};
use commonware_utils::{from_hex_formatted, hex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Length of the commit digest.
pub const APP_HASH_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("corrupt snapshot: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Aggregate ledger metadata, persisted once per commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Aggregate entry count. Replaced (not accumulated) by every `init` transaction.
    #[serde(rename = "size")]
    pub entry_count: i64,
    pub height: i64,
    #[serde(serialize_with = "serialize_hex", deserialize_with = "deserialize_hex")]
    pub app_hash: Vec<u8>,
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex(bytes))
}

fn deserialize_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let value = String::deserialize(deserializer)?;
    from_hex_formatted(&value).ok_or_else(|| serde::de::Error::custom("expected a hex string"))
}

impl Snapshot {
    /// Decode a persisted snapshot. Missing or empty bytes yield the zero snapshot.
    pub fn from_bytes(bytes: Option<&[u8]>) -> Result<Self, SnapshotError> {
        match bytes {
            None => Ok(Self::default()),
            Some(bytes) if bytes.is_empty() => Ok(Self::default()),
            Some(bytes) => serde_json::from_slice(bytes).map_err(SnapshotError::Corrupt),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec(self).map_err(SnapshotError::Encode)
    }

    /// Advance to the next commit: recompute the digest from the entry count and bump the height.
    pub fn advance(&mut self) -> [u8; APP_HASH_LEN] {
        let hash = app_hash(self.entry_count);
        self.app_hash = hash.to_vec();
        self.height = self.height.saturating_add(1);
        hash
    }
}

/// Commit digest for an entry count: its zig-zag varint encoding in a zeroed 8-byte buffer.
///
/// Counts whose encoding needs more than eight bytes (beyond 2^55) keep only the first eight.
pub fn app_hash(entry_count: i64) -> [u8; APP_HASH_LEN] {
    let encoded = SInt(entry_count).encode();
    let len = encoded.len().min(APP_HASH_LEN);
    let mut hash = [0u8; APP_HASH_LEN];
    hash[..len].copy_from_slice(&encoded[..len]);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_hash_is_zigzag_varint() {
        assert_eq!(app_hash(0), [0; 8]);
        assert_eq!(app_hash(1), [2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(app_hash(2), [4, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(app_hash(-1), [1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(app_hash(64), [0x80, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(app_hash(300), [0xd8, 0x04, 0, 0, 0, 0, 0, 0]);
        assert_eq!(app_hash(-300), [0xd7, 0x04, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn app_hash_truncates_past_eight_bytes() {
        // 2^55 - 1 is the largest count whose encoding fits the digest exactly.
        let largest = (1i64 << 55) - 1;
        assert_eq!(SInt(largest).encode().len(), APP_HASH_LEN);
        assert_eq!(app_hash(largest)[..], SInt(largest).encode()[..]);

        let wide = SInt(i64::MAX).encode();
        assert!(wide.len() > APP_HASH_LEN);
        assert_eq!(app_hash(i64::MAX)[..], wide[..APP_HASH_LEN]);
    }

    #[test]
    fn app_hash_never_panics_on_extremes() {
        assert_eq!(app_hash(i64::MAX).len(), APP_HASH_LEN);
        assert_eq!(app_hash(i64::MIN).len(), APP_HASH_LEN);
        assert_ne!(app_hash(i64::MAX), app_hash(i64::MIN));
    }

    #[test]
    fn advance_bumps_height_once() {
        let mut snapshot = Snapshot {
            entry_count: 2,
            ..Default::default()
        };
        let first = snapshot.advance();
        let second = snapshot.advance();
        assert_eq!(first, second);
        assert_eq!(snapshot.height, 2);
        assert_eq!(snapshot.app_hash, first.to_vec());
    }

    #[test]
    fn missing_or_empty_bytes_load_zero_snapshot() {
        assert_eq!(Snapshot::from_bytes(None).unwrap(), Snapshot::default());
        assert_eq!(Snapshot::from_bytes(Some(&[][..])).unwrap(), Snapshot::default());
    }

    #[test]
    fn persisted_field_names() {
        let snapshot = Snapshot {
            entry_count: 3,
            height: 7,
            app_hash: app_hash(3).to_vec(),
        };
        let bytes = snapshot.to_bytes().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["size"], 3);
        assert_eq!(json["height"], 7);
        assert_eq!(json["app_hash"], "0600000000000000");
        assert_eq!(Snapshot::from_bytes(Some(bytes.as_slice())).unwrap(), snapshot);
    }

    #[test]
    fn corrupt_bytes_are_reported() {
        let err = Snapshot::from_bytes(Some(&b"{\"size\":"[..])).expect_err("truncated json");
        assert!(matches!(err, SnapshotError::Corrupt(_)));
        let err = Snapshot::from_bytes(Some(&b"\x00\x01"[..])).expect_err("binary garbage");
        assert!(matches!(err, SnapshotError::Corrupt(_)));
        let err = Snapshot::from_bytes(Some(&br#"{"size":1,"height":1,"app_hash":"zz"}"#[..]))
            .expect_err("non-hex digest");
        assert!(matches!(err, SnapshotError::Corrupt(_)));
    }
}
