//! AcadChain Ledger - keyed world state with atomic invocations
//!
//! Everything the contract layer needs from the underlying ledger lives here.
//!
//! # Key Types
//! - `CompositeKey`: namespace plus ordered components, scannable by prefix
//! - `TxContext`: one invocation's buffered write-set, identity, clock and events
//! - `StateIterator`: snapshot range iterator that must be drained or released
//! - `MemoryLedger`: committed state and the hash-chained blocks behind it
//! - `Block`: one committed invocation

pub mod block;
pub mod context;
pub mod error;
pub mod hash;
pub mod identity;
pub mod iterator;
pub mod key;
pub mod memory;

pub use block::{Block, ContractEvent, PrivateWriteHash, WriteOp};
pub use context::{StateReader, TxContext, WriteSet};
pub use error::LedgerError;
pub use hash::{calculate_block_hash, sha256_hex, verify_chain, ChainError, GENESIS};
pub use identity::ClientIdentity;
pub use iterator::{KeyValue, QueryMetadata, StateIterator};
pub use key::CompositeKey;
pub use memory::{BlockSink, Invocation, LedgerClock, MemoryLedger};
