//! Transaction grammar.
//!
//! ```text
//! init:<id>(,<id>)*
//! play:<roundID>:<id>=<hand>,<id>=<hand>      hand ∈ {rock,paper,scissor}
//! ```
//!
//! Payloads are raw bytes; IDs are not required to be UTF-8.

use std::fmt;
use thiserror::Error;

use crate::{Hand, MemberId};

pub const INIT_PREFIX: &[u8] = b"init:";
pub const PLAY_PREFIX: &[u8] = b"play:";

const LIST_SEPARATOR: u8 = b',';
const ROUND_SEPARATOR: u8 = b':';
const HAND_SEPARATOR: u8 = b'=';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown transaction prefix")]
    UnknownPrefix,
    #[error("empty member id")]
    EmptyMemberId,
    #[error("missing ':' after round id")]
    MissingRoundSeparator,
    #[error("empty round id")]
    EmptyRoundId,
    #[error("expected 2 moves, got {0}")]
    MoveCount(usize),
    #[error("missing '=' in move")]
    MissingHandSeparator,
    #[error("unknown hand: {0}")]
    UnknownHand(String),
    #[error("member {0} plays against itself")]
    SelfPlay(MemberId),
}

/// Round identifier carried through to the result tags.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoundId(Vec<u8>);

impl RoundId {
    pub fn new(id: impl Into<Vec<u8>>) -> Self {
        Self(id.into())
    }
}

impl AsRef<[u8]> for RoundId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// A single round between two distinct members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Play {
    pub round: RoundId,
    pub moves: [(MemberId, Hand); 2],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transaction {
    /// Register (or reset) every listed member.
    Init { members: Vec<MemberId> },
    Play(Play),
}

impl Transaction {
    pub fn parse(payload: &[u8]) -> Result<Self, ParseError> {
        if let Some(body) = payload.strip_prefix(INIT_PREFIX) {
            return parse_init(body);
        }
        if let Some(body) = payload.strip_prefix(PLAY_PREFIX) {
            return parse_play(body).map(Transaction::Play);
        }
        Err(ParseError::UnknownPrefix)
    }

    /// Canonical payload bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Transaction::Init { members } => {
                out.extend_from_slice(INIT_PREFIX);
                for (i, id) in members.iter().enumerate() {
                    if i > 0 {
                        out.push(LIST_SEPARATOR);
                    }
                    out.extend_from_slice(id.as_ref());
                }
            }
            Transaction::Play(play) => {
                out.extend_from_slice(PLAY_PREFIX);
                out.extend_from_slice(play.round.as_ref());
                out.push(ROUND_SEPARATOR);
                for (i, (id, hand)) in play.moves.iter().enumerate() {
                    if i > 0 {
                        out.push(LIST_SEPARATOR);
                    }
                    out.extend_from_slice(id.as_ref());
                    out.push(HAND_SEPARATOR);
                    out.extend_from_slice(hand.as_str().as_bytes());
                }
            }
        }
        out
    }
}

fn split_once(bytes: &[u8], separator: u8) -> Option<(&[u8], &[u8])> {
    let at = bytes.iter().position(|b| *b == separator)?;
    Some((&bytes[..at], &bytes[at + 1..]))
}

fn parse_init(body: &[u8]) -> Result<Transaction, ParseError> {
    let members = body
        .split(|b| *b == LIST_SEPARATOR)
        .map(|id| {
            if id.is_empty() {
                Err(ParseError::EmptyMemberId)
            } else {
                Ok(MemberId::new(id))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Transaction::Init { members })
}

fn parse_move(entry: &[u8]) -> Result<(MemberId, Hand), ParseError> {
    let (id, hand) = split_once(entry, HAND_SEPARATOR).ok_or(ParseError::MissingHandSeparator)?;
    if id.is_empty() {
        return Err(ParseError::EmptyMemberId);
    }
    let hand = Hand::from_token(hand)
        .ok_or_else(|| ParseError::UnknownHand(String::from_utf8_lossy(hand).into_owned()))?;
    Ok((MemberId::new(id), hand))
}

fn parse_play(body: &[u8]) -> Result<Play, ParseError> {
    let (round, moves) =
        split_once(body, ROUND_SEPARATOR).ok_or(ParseError::MissingRoundSeparator)?;
    if round.is_empty() {
        return Err(ParseError::EmptyRoundId);
    }

    let entries: Vec<&[u8]> = moves.split(|b| *b == LIST_SEPARATOR).collect();
    let [first, second] = entries.as_slice() else {
        return Err(ParseError::MoveCount(entries.len()));
    };
    let first = parse_move(first)?;
    let second = parse_move(second)?;
    if first.0 == second.0 {
        return Err(ParseError::SelfPlay(first.0));
    }

    Ok(Play {
        round: RoundId::new(round),
        moves: [first, second],
    })
}
