//! In-memory ledger
//!
//! Holds the committed world state, private collections and the block chain.
//! Every `submit` runs one invocation against a fresh `TxContext` and either
//! commits its whole write-set as a new block or commits nothing.

use crate::block::{Block, PrivateWriteHash, WriteOp};
use crate::context::{StateReader, TxContext, WriteSet};
use crate::error::LedgerError;
use crate::hash::{calculate_block_hash, sha256_hex, verify_chain, ChainError, GENESIS};
use crate::identity::ClientIdentity;
use crate::iterator::KeyValue;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Source of transaction timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerClock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl LedgerClock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            LedgerClock::System => Utc::now(),
            LedgerClock::Fixed(at) => *at,
        }
    }
}

/// Receives each block before it is applied to state
pub trait BlockSink {
    fn append(&mut self, block: &Block) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Caller identity plus off-ledger input for one invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    pub identity: ClientIdentity,
    pub transient: HashMap<String, Vec<u8>>,
}

impl Invocation {
    pub fn new(identity: ClientIdentity) -> Self {
        Self {
            identity,
            transient: HashMap::new(),
        }
    }

    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }
}

#[derive(Default)]
pub struct MemoryLedger {
    world: BTreeMap<String, Vec<u8>>,
    private: HashMap<String, BTreeMap<String, Vec<u8>>>,
    blocks: Vec<Block>,
    clock: LedgerClock,
    sink: Option<Box<dyn BlockSink>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(mut self, clock: LedgerClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn BlockSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Pin the clock to a fixed instant
    pub fn set_time(&mut self, at: DateTime<Utc>) {
        self.clock = LedgerClock::Fixed(at);
    }

    /// Move the clock forward, pinning it if it was following system time
    pub fn advance(&mut self, by: Duration) {
        self.clock = LedgerClock::Fixed(self.clock.now() + by);
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Run a state-changing invocation; commit on `Ok`, discard on `Err`
    pub fn submit<T, E, F>(&mut self, invocation: Invocation, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut TxContext<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let tx_id = Uuid::new_v4().simple().to_string();
        let timestamp = self.clock.now();
        let creator = invocation.identity.msp_id.clone();

        let mut ctx = TxContext::new(
            &*self,
            invocation.identity,
            invocation.transient,
            tx_id.clone(),
            timestamp,
        );

        let output = match f(&mut ctx) {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(tx_id = %tx_id, "invocation failed, write-set discarded");
                return Err(err);
            }
        };

        let write_set = ctx.into_write_set()?;
        self.commit(tx_id, timestamp, creator, write_set)?;
        Ok(output)
    }

    /// Run a read-only invocation; any writes it buffers are discarded
    pub fn evaluate<T, E, F>(&self, invocation: Invocation, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut TxContext<'_>) -> Result<T, E>,
        E: From<LedgerError>,
    {
        let tx_id = Uuid::new_v4().simple().to_string();
        let mut ctx = TxContext::new(
            self,
            invocation.identity,
            invocation.transient,
            tx_id.clone(),
            self.clock.now(),
        );

        let output = f(&mut ctx)?;
        let write_set = ctx.into_write_set()?;
        if !write_set.is_empty() {
            tracing::debug!(tx_id = %tx_id, "query buffered writes; discarded");
        }
        Ok(output)
    }

    fn commit(
        &mut self,
        tx_id: String,
        timestamp: DateTime<Utc>,
        creator: String,
        write_set: WriteSet,
    ) -> Result<(), LedgerError> {
        let number = self.blocks.len() as u64 + 1;
        let prev_hash = self
            .blocks
            .last()
            .map(|b| b.hash.clone())
            .unwrap_or_else(|| GENESIS.to_string());

        let writes: Vec<WriteOp> = write_set
            .writes
            .iter()
            .map(|(key, value)| WriteOp {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        let private_writes: Vec<PrivateWriteHash> = write_set
            .private_writes
            .iter()
            .map(|((collection, key), value)| PrivateWriteHash {
                collection: collection.clone(),
                key_hash: sha256_hex(key),
                value_hash: value.as_ref().map(sha256_hex),
            })
            .collect();

        let mut block = Block {
            number,
            prev_hash,
            hash: String::new(),
            tx_id,
            timestamp,
            creator,
            writes,
            private_writes,
            events: write_set.events,
        };
        block.hash = calculate_block_hash(&block);

        // Persist before applying so a failing sink leaves state untouched
        if let Some(sink) = self.sink.as_mut() {
            sink.append(&block).map_err(|e| LedgerError::SinkFailed {
                number,
                reason: e.to_string(),
            })?;
        }

        apply_writes(&mut self.world, &block.writes);
        for ((collection, key), value) in write_set.private_writes {
            let partition = self.private.entry(collection).or_default();
            match value {
                Some(value) => partition.insert(key, value),
                None => partition.remove(&key),
            };
        }

        tracing::debug!(
            number = block.number,
            tx_id = %block.tx_id,
            writes = block.writes.len(),
            events = block.events.len(),
            "block committed"
        );
        self.blocks.push(block);
        Ok(())
    }

    /// Rebuild public state from a verified chain of blocks.
    ///
    /// Private collections are not part of the chain and start empty.
    pub fn replay(blocks: Vec<Block>) -> Result<Self, LedgerError> {
        verify_chain(&blocks)?;

        let mut ledger = Self::new();
        for block in &blocks {
            apply_writes(&mut ledger.world, &block.writes);
        }
        ledger.blocks = blocks;

        tracing::info!(height = ledger.height(), "ledger replayed");
        Ok(ledger)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn height(&self) -> u64 {
        self.blocks.len() as u64
    }

    pub fn last_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Verify the hash chain of every committed block
    pub fn verify(&self) -> Result<(), ChainError> {
        verify_chain(&self.blocks)
    }

    /// Number of committed public keys
    pub fn state_size(&self) -> usize {
        self.world.len()
    }
}

fn apply_writes(world: &mut BTreeMap<String, Vec<u8>>, writes: &[WriteOp]) {
    for write in writes {
        match &write.value {
            Some(value) => world.insert(write.key.clone(), value.clone()),
            None => world.remove(&write.key),
        };
    }
}

impl StateReader for MemoryLedger {
    fn get_committed(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.world.get(key).cloned())
    }

    fn scan_committed(&self, prefix: &str) -> Result<Vec<KeyValue>, LedgerError> {
        Ok(self
            .world
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn get_committed_private(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self
            .private
            .get(collection)
            .and_then(|partition| partition.get(key))
            .cloned())
    }
}
