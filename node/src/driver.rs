//! Feeds a transaction log through the application lifecycle, one block at a time.

use anyhow::Result;
use commonware_utils::hex;
use lrps_execution::{Application, State};
use lrps_types::{
    api::{CommitResponse, QueryRequest, QueryResponse},
    Code,
};
use std::num::NonZeroUsize;
use tracing::{debug, info, warn};

use crate::ValidatedConfig;

/// One line of a transaction log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Transaction(Vec<u8>),
    /// A blank line: close the current block.
    Boundary,
}

/// Split a newline-delimited log into entries. A trailing `\r` is stripped from every line.
pub fn parse_log(bytes: &[u8]) -> Vec<Entry> {
    let mut lines: Vec<&[u8]> = bytes.split(|b| *b == b'\n').collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
        .into_iter()
        .enumerate()
        .map(|(number, line)| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() {
                return Entry::Boundary;
            }
            if std::str::from_utf8(line).is_err() {
                warn!(line = number + 1, "transaction is not valid utf-8");
            }
            Entry::Transaction(line.to_vec())
        })
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub blocks: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub last_commit: Option<CommitResponse>,
}

pub struct Driver<S: State> {
    application: Application<S>,
    block_size: NonZeroUsize,
    commit_empty_blocks: bool,
}

impl<S: State> Driver<S> {
    /// Load the application over `store` and perform the startup handshake.
    pub fn new(store: S, config: &ValidatedConfig) -> Result<Self> {
        let mut application = Application::new(store)?;
        let handshake = application.info();
        info!(
            height = handshake.last_block_height,
            app_hash = %hex(&handshake.last_block_app_hash),
            "handshake"
        );
        if handshake.last_block_height == 0 {
            application.init_chain();
        }
        Ok(Self {
            application,
            block_size: config.block_size,
            commit_empty_blocks: config.commit_empty_blocks,
        })
    }

    pub fn application(&self) -> &Application<S> {
        &self.application
    }

    pub fn into_application(self) -> Application<S> {
        self.application
    }

    /// Execute every entry, committing a block whenever it fills or a boundary is reached.
    pub fn run(&mut self, entries: impl IntoIterator<Item = Entry>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut block = Vec::with_capacity(self.block_size.get());
        for entry in entries {
            match entry {
                Entry::Transaction(tx) => {
                    block.push(tx);
                    if block.len() == self.block_size.get() {
                        self.execute_block(std::mem::take(&mut block), &mut summary)?;
                    }
                }
                Entry::Boundary => {
                    self.execute_block(std::mem::take(&mut block), &mut summary)?;
                }
            }
        }
        if !block.is_empty() {
            self.execute_block(block, &mut summary)?;
        }
        info!(
            blocks = summary.blocks,
            accepted = summary.accepted,
            rejected = summary.rejected,
            "replay finished"
        );
        Ok(summary)
    }

    fn execute_block(&mut self, block: Vec<Vec<u8>>, summary: &mut RunSummary) -> Result<()> {
        if block.is_empty() && !self.commit_empty_blocks {
            debug!("skipping empty block");
            return Ok(());
        }

        self.application.begin_block();
        for tx in &block {
            let response = self.application.deliver_tx(tx)?;
            if response.code == Code::Ok {
                summary.accepted += 1;
                debug!(tx = %String::from_utf8_lossy(tx), tags = response.tags.len(), "accepted");
            } else {
                summary.rejected += 1;
                debug!(
                    tx = %String::from_utf8_lossy(tx),
                    code = %response.code,
                    log = %response.log,
                    "rejected"
                );
            }
        }
        self.application.end_block();
        let commit = self.application.commit()?;

        summary.blocks += 1;
        summary.last_commit = Some(commit);
        info!(
            height = self.application.snapshot().height,
            transactions = block.len(),
            "block committed"
        );
        Ok(())
    }

    pub fn query(&self, key: &[u8], prove: bool) -> Result<QueryResponse> {
        self.application.query(&QueryRequest {
            data: key.to_vec(),
            prove,
        })
    }
}
