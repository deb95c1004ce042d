//! Execution layer for the limited rock/paper/scissor ledger.
//!
//! This crate contains the deterministic transaction execution logic ([`Layer`]), the round
//! resolution rules ([`game`]), and the [`Application`] lifecycle the consensus driver calls into.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside execution.
//! - Do not use randomness of any kind; outcomes depend only on the store and the transaction
//!   bytes.
//! - Avoid iteration order of hash-based collections influencing outputs.
//!
//! ## Storage invariants
//! A transaction either applies all of its writes or none of them. The persisted snapshot is only
//! rewritten on commit, so a replica that restarts between commits resumes from the last block.
//!
//! ## Minimal pipeline (example)
//! ```rust
//! use lrps_execution::{Application, Memory};
//! use lrps_types::{api::QueryRequest, Code};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut app = Application::new(Memory::default())?;
//! app.begin_block();
//! assert_eq!(app.deliver_tx(b"init:alice,bob")?.code, Code::Ok);
//! assert_eq!(app.deliver_tx(b"play:r1:alice=rock,bob=scissor")?.code, Code::Ok);
//! app.end_block();
//! let digest = app.commit()?;
//! assert_eq!(digest.data, [4, 0, 0, 0, 0, 0, 0, 0]);
//!
//! let response = app.query(&QueryRequest { data: b"alice".to_vec(), prove: false })?;
//! assert!(response.exists());
//! # Ok(())
//! # }
//! ```

mod application;
pub mod game;
mod layer;
pub mod ledger;
mod state;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


pub use application::{Application, SharedApplication};
pub use layer::{Applied, Execution, Layer, Rejection, TAG_ROUND_ID, TAG_WINNER};
pub use state::{Memory, State, Status};
