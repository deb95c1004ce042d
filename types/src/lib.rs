//! Common types for the limited rock/paper/scissor ledger.
//!
//! Everything here is pure data: hands, member records, the transaction grammar, the persisted
//! snapshot, and the request/response shapes exchanged with the driving consensus layer. The
//! execution crate owns all state mutation.

pub mod api;
pub mod execution;
mod hand;
mod member;
mod snapshot;
mod transaction;

pub use execution::{Code, Key, Tag, MEMBER_PREFIX, STATE_KEY};
pub use hand::{Hand, HANDS};
pub use member::{Cards, Member, MemberId, STARTING_CARDS, STARTING_STARS};
pub use snapshot::{app_hash, Snapshot, SnapshotError, APP_HASH_LEN};
pub use transaction::{ParseError, Play, RoundId, Transaction, INIT_PREFIX, PLAY_PREFIX};
