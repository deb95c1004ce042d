use anyhow::Result;
use std::collections::BTreeMap;

/// Byte-keyed storage the ledger is persisted in.
///
/// Implementations are owned by the host; any error they return is treated as fatal.
pub trait State {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    fn apply(&mut self, changes: Vec<(Vec<u8>, Status)>) -> Result<()> {
        for (key, status) in changes {
            match status {
                Status::Update(value) => self.insert(key, value)?,
                Status::Delete => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

/// Pending change to a single key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Update(Vec<u8>),
    Delete,
}

/// In-memory store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    state: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Memory {
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Entries whose key starts with `prefix`, in key order.
    pub fn scan<'a>(&'a self, prefix: &'a [u8]) -> impl Iterator<Item = (&'a [u8], &'a [u8])> {
        self.state
            .range(prefix.to_vec()..)
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.as_slice(), value.as_slice()))
    }
}

impl State for Memory {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.state.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.state.remove(key);
        Ok(())
    }
}
