use anyhow::Result;
use lrps_types::{Code, Hand, MemberId, ParseError, Tag, Transaction};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::state::{State, Status};

mod handlers;

/// Tag carrying the round ID of a play transaction.
pub const TAG_ROUND_ID: &[u8] = b"roundID";

/// Tag carrying the winner of a play transaction (empty on a tie).
pub const TAG_WINNER: &[u8] = b"winner";

/// Why a transaction was rejected. The ledger is never modified by a rejected transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("malformed transaction: {0}")]
    Format(#[from] ParseError),
    #[error("member {0} not found")]
    MemberNotFound(MemberId),
    #[error("member {member} has no {hand} cards left")]
    NoCard { member: MemberId, hand: Hand },
}

impl Rejection {
    pub fn code(&self) -> Code {
        match self {
            Rejection::Format(_) => Code::FormatError,
            Rejection::MemberNotFound(_) => Code::MemberNotFoundError,
            Rejection::NoCard { .. } => Code::NoCardError,
        }
    }
}

/// Effects of an accepted transaction beyond its pending store writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub tags: Vec<Tag>,
    /// Replacement for the aggregate entry count, if the transaction sets one.
    pub entry_count: Option<i64>,
}

/// Result of running one transaction. The outer `Result` of [Layer::execute] is reserved for
/// store faults.
pub type Execution = std::result::Result<Applied, Rejection>;

/// Write-buffering view over a [State].
///
/// Reads fall through to the underlying state unless the key was touched by this layer. Nothing
/// reaches the underlying state until the caller applies [Layer::commit].
pub struct Layer<'a, S: State> {
    state: &'a S,
    pending: BTreeMap<Vec<u8>, Status>,
}

impl<'a, S: State> Layer<'a, S> {
    pub fn new(state: &'a S) -> Self {
        Self {
            state,
            pending: BTreeMap::new(),
        }
    }

    pub fn execute(&mut self, transaction: &Transaction) -> Result<Execution> {
        match transaction {
            Transaction::Init { members } => self.handle_init(members),
            Transaction::Play(play) => self.handle_play(play),
        }
    }

    pub fn commit(self) -> Vec<(Vec<u8>, Status)> {
        self.pending.into_iter().collect()
    }
}

impl<'a, S: State> State for Layer<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.state.get(key)?,
        })
    }

    fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.pending.insert(key, Status::Update(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.pending.insert(key.to_vec(), Status::Delete);
        Ok(())
    }
}
