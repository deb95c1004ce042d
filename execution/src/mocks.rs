//! Test helpers shared by this crate and the node.

use crate::{Memory, State};
use anyhow::{bail, Result};
use lrps_types::{Hand, HANDS};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Store that fails once a configured number of operations has succeeded.
#[derive(Clone, Debug, Default)]
pub struct FailingState {
    inner: Memory,
    fail_reads: bool,
    writes_left: Option<usize>,
}

impl FailingState {
    pub fn new(inner: Memory) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Every read fails.
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Allow `count` more writes (inserts or deletes), then fail every write.
    pub fn fail_writes_after(mut self, count: usize) -> Self {
        self.writes_left = Some(count);
        self
    }

    pub fn inner(&self) -> &Memory {
        &self.inner
    }

    fn write(&mut self) -> Result<()> {
        match self.writes_left.as_mut() {
            Some(0) => bail!("injected write failure"),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl State for FailingState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if self.fail_reads {
            bail!("injected read failure");
        }
        self.inner.get(key)
    }

    fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.write()?;
        self.inner.insert(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.write()?;
        self.inner.delete(key)
    }
}

/// Member IDs `m0..m{count}`.
pub fn member_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("m{i}")).collect()
}

/// Deterministic transaction log for `seed`.
///
/// Starts with an `init` of every member and then mixes plays (mostly well-formed, some naming
/// unknown members) with the occasional malformed payload or re-`init` of a subset.
pub fn workload(seed: u64, members: usize, count: usize) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let ids = member_ids(members);
    let mut transactions = Vec::with_capacity(count + 1);
    transactions.push(format!("init:{}", ids.join(",")).into_bytes());

    for round in 0..count {
        let roll = rng.gen_range(0..100);
        let tx = if roll < 80 {
            let mut pair = ids.choose_multiple(&mut rng, 2);
            let (Some(a), Some(b)) = (pair.next(), pair.next()) else {
                continue;
            };
            format!(
                "play:r{round}:{a}={},{b}={}",
                random_hand(&mut rng),
                random_hand(&mut rng)
            )
        } else if roll < 88 {
            let a = ids.choose(&mut rng).map(String::as_str).unwrap_or("m0");
            format!("play:r{round}:{a}=rock,ghost{round}=paper")
        } else if roll < 96 {
            let garbage = [
                "play:r:m0",
                "play:r:m0=rock",
                "play:r:m0=lizard,m1=rock",
                "init:",
                "stake:m0",
                "",
            ];
            garbage.choose(&mut rng).copied().unwrap_or("").to_string()
        } else {
            let subset: Vec<&str> = ids
                .iter()
                .filter(|_| rng.gen_bool(0.5))
                .map(String::as_str)
                .collect();
            if subset.is_empty() {
                continue;
            }
            format!("init:{}", subset.join(","))
        };
        transactions.push(tx.into_bytes());
    }
    transactions
}

fn random_hand(rng: &mut StdRng) -> Hand {
    *HANDS.choose(rng).unwrap_or(&Hand::Rock)
}
