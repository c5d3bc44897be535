//! JSONL block reader - sequential reader for replay

use crate::error::JournalError;
use acad_ledger::Block;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sequential block reader
pub struct JournalReader {
    files: Vec<PathBuf>,
}

impl JournalReader {
    /// Create a reader over every journal file in a directory
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().is_some_and(|ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        files.sort();
        Ok(Self { files })
    }

    /// Read all blocks from all files in order
    pub fn read_all(&self) -> Result<Vec<Block>, JournalError> {
        let mut blocks = Vec::new();
        for file_path in &self.files {
            self.read_file(file_path, |block| blocks.push(block))?;
        }
        Ok(blocks)
    }

    /// Last block in the journal, if any
    pub fn last_block(&self) -> Result<Option<Block>, JournalError> {
        let mut last = None;
        if let Some(file_path) = self.files.last() {
            self.read_file(file_path, |block| last = Some(block))?;
        }
        Ok(last)
    }

    /// Count total blocks across all files
    pub fn count(&self) -> Result<usize, JournalError> {
        let mut count = 0;
        for file_path in &self.files {
            let reader = BufReader::new(File::open(file_path)?);
            for line in reader.lines() {
                if !line?.trim().is_empty() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    fn read_file(&self, file_path: &Path, mut visit: impl FnMut(Block)) -> Result<(), JournalError> {
        let reader = BufReader::new(File::open(file_path)?);
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let block: Block = serde_json::from_str(&line).map_err(|_| JournalError::InvalidLine {
                file: file_path.display().to_string(),
                line: index + 1,
            })?;
            visit(block);
        }
        Ok(())
    }
}
