//! JSONL block journal - append-only writer

use crate::error::JournalError;
use acad_ledger::{Block, BlockSink};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only JSONL block journal, one file per block date
pub struct BlockJournal {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
    last_number: Option<u64>,
}

impl BlockJournal {
    /// Open a journal rooted at the given directory
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        Ok(Self {
            base_path,
            current_file: None,
            current_date: None,
            last_number: None,
        })
    }

    /// Resume numbering after an existing chain
    pub fn resume_after(mut self, last_number: u64) -> Self {
        self.last_number = Some(last_number);
        self
    }

    /// Append a block to the journal
    pub fn append(&mut self, block: &Block) -> Result<(), JournalError> {
        let expected = self.last_number.map_or(1, |n| n + 1);
        if block.number != expected {
            return Err(JournalError::OutOfOrder {
                expected,
                actual: block.number,
            });
        }

        let date = block.timestamp.format("%Y-%m-%d").to_string();
        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }

        if let Some(ref mut writer) = self.current_file {
            let json = serde_json::to_string(block)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        self.last_number = Some(block.number);
        tracing::debug!(number = block.number, file = %date, "block journaled");
        Ok(())
    }

    fn rotate_file(&mut self, date: &str) -> Result<(), JournalError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());
        Ok(())
    }

    /// Flush and close the current file
    pub fn close(&mut self) -> Result<(), JournalError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl BlockSink for BlockJournal {
    fn append(&mut self, block: &Block) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        BlockJournal::append(self, block).map_err(Into::into)
    }
}

impl Drop for BlockJournal {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
