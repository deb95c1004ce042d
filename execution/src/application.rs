//! Lifecycle surface driven by the consensus layer.
//!
//! The driver calls, in order: `info`, `init_chain`, then per block `begin_block`,
//! `deliver_tx`*, `end_block`, `commit`. `query` and `check_tx` may be interleaved anywhere.
//! Every method is synchronous and must be called by a single writer; see [SharedApplication]
//! for hosts that cannot guarantee that.

use anyhow::{anyhow, Context as _, Result};
use commonware_utils::hex;
use lrps_types::{
    api::{
        CheckTxResponse, CommitResponse, DeliverTxResponse, InfoResponse, QueryRequest,
        QueryResponse, DOES_NOT_EXIST, EXISTS, NO_PROOF_INDEX,
    },
    Code, Key, MemberId, Snapshot, Transaction,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::{layer::Layer, State};

/// Gas reported for every well-formed transaction.
const GAS_PER_TRANSACTION: i64 = 1;

pub struct Application<S: State> {
    store: S,
    snapshot: Snapshot,
}

impl<S: State> Application<S> {
    /// Load the application over `store`.
    ///
    /// An absent snapshot starts from zero. A snapshot that cannot be decoded is fatal.
    pub fn new(store: S) -> Result<Self> {
        let bytes = store
            .get(&Key::Snapshot.to_bytes())
            .context("read snapshot")?;
        let snapshot = Snapshot::from_bytes(bytes.as_deref()).context("load snapshot")?;
        info!(
            height = snapshot.height,
            entry_count = snapshot.entry_count,
            "loaded snapshot"
        );
        Ok(Self { store, snapshot })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn info(&self) -> InfoResponse {
        InfoResponse {
            last_block_height: self.snapshot.height,
            last_block_app_hash: self.snapshot.app_hash.clone(),
        }
    }

    /// Options are accepted and ignored.
    pub fn set_option(&mut self, key: &str, value: &str) {
        debug!(key, value, "ignoring option");
    }

    pub fn init_chain(&mut self) {}

    pub fn begin_block(&mut self) {}

    pub fn end_block(&mut self) {}

    /// Stateless admission check: only the transaction grammar is validated.
    pub fn check_tx(&self, tx: &[u8]) -> CheckTxResponse {
        match Transaction::parse(tx) {
            Ok(_) => CheckTxResponse {
                code: Code::Ok,
                log: String::new(),
                gas_wanted: GAS_PER_TRANSACTION,
            },
            Err(err) => CheckTxResponse {
                code: Code::FormatError,
                log: err.to_string(),
                gas_wanted: 0,
            },
        }
    }

    /// Apply one transaction atomically.
    ///
    /// Rejections are reported through the response code and leave the ledger untouched. The
    /// returned error is reserved for store faults, which the driver must treat as fatal.
    pub fn deliver_tx(&mut self, tx: &[u8]) -> Result<DeliverTxResponse> {
        let transaction = match Transaction::parse(tx) {
            Ok(transaction) => transaction,
            Err(err) => {
                debug!(code = %Code::FormatError, %err, "rejected transaction");
                return Ok(DeliverTxResponse {
                    code: Code::FormatError,
                    log: err.to_string(),
                    tags: Vec::new(),
                });
            }
        };

        let mut layer = Layer::new(&self.store);
        let execution = layer.execute(&transaction).context("execute transaction")?;
        let applied = match execution {
            Ok(applied) => applied,
            Err(rejection) => {
                debug!(code = %rejection.code(), %rejection, "rejected transaction");
                return Ok(DeliverTxResponse {
                    code: rejection.code(),
                    log: rejection.to_string(),
                    tags: Vec::new(),
                });
            }
        };

        let changes = layer.commit();
        self.store
            .apply(changes)
            .context("apply transaction changes")?;
        if let Some(entry_count) = applied.entry_count {
            self.snapshot.entry_count = entry_count;
        }
        debug!(tags = applied.tags.len(), "delivered transaction");

        Ok(DeliverTxResponse {
            code: Code::Ok,
            log: String::new(),
            tags: applied.tags,
        })
    }

    /// Close the current block: recompute the app hash from the entry count and persist.
    pub fn commit(&mut self) -> Result<CommitResponse> {
        let mut next = self.snapshot.clone();
        let app_hash = next.advance();
        let bytes = next.to_bytes().context("encode snapshot")?;
        self.store
            .insert(Key::Snapshot.to_bytes(), bytes)
            .context("persist snapshot")?;
        self.snapshot = next;

        info!(
            height = self.snapshot.height,
            entry_count = self.snapshot.entry_count,
            app_hash = %hex(&app_hash),
            "committed"
        );
        Ok(CommitResponse { data: app_hash })
    }

    /// Look up a member record by ID.
    pub fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let key = Key::Member(MemberId::new(request.data.clone()));
        let value = self.store.get(&key.to_bytes()).context("query store")?;
        let log = if value.is_some() { EXISTS } else { DOES_NOT_EXIST };

        let mut response = QueryResponse {
            value,
            log: log.to_string(),
            ..Default::default()
        };
        if request.prove {
            response.key = Some(request.data.clone());
            response.index = NO_PROOF_INDEX;
        }
        Ok(response)
    }
}

/// [Application] behind a single lock, for hosts that may call in concurrently.
///
/// Every call, reads included, takes the same lock so transactions are applied in the order the
/// lock is acquired.
pub struct SharedApplication<S: State> {
    inner: Arc<Mutex<Application<S>>>,
}

impl<S: State> Clone for SharedApplication<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: State> SharedApplication<S> {
    pub fn new(application: Application<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(application)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Application<S>>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("application lock poisoned"))
    }

    pub fn info(&self) -> Result<InfoResponse> {
        Ok(self.lock()?.info())
    }

    pub fn set_option(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.set_option(key, value);
        Ok(())
    }

    pub fn init_chain(&self) -> Result<()> {
        self.lock()?.init_chain();
        Ok(())
    }

    pub fn begin_block(&self) -> Result<()> {
        self.lock()?.begin_block();
        Ok(())
    }

    pub fn check_tx(&self, tx: &[u8]) -> Result<CheckTxResponse> {
        Ok(self.lock()?.check_tx(tx))
    }

    pub fn deliver_tx(&self, tx: &[u8]) -> Result<DeliverTxResponse> {
        self.lock()?.deliver_tx(tx)
    }

    pub fn end_block(&self) -> Result<()> {
        self.lock()?.end_block();
        Ok(())
    }

    pub fn commit(&self) -> Result<CommitResponse> {
        self.lock()?.commit()
    }

    pub fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        self.lock()?.query(request)
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.lock()?.snapshot().clone())
    }
}
