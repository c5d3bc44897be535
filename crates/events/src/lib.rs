//! AcadChain Events - JSONL block journal
//!
//! Committed blocks are appended to date-rotated JSONL files. The journal is
//! attached to a `MemoryLedger` as its `BlockSink`, and read back with
//! `JournalReader` to rebuild state through `MemoryLedger::replay`.

pub mod error;
pub mod reader;
pub mod store;

pub use error::JournalError;
pub use reader::JournalReader;
pub use store::BlockJournal;
