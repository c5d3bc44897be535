//! Snapshot range iterators and pagination metadata

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Key and value produced by a range scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Pagination state returned alongside a page of results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    pub fetched_records_count: usize,
    /// Opaque continuation token; empty when the scan is exhausted
    pub bookmark: String,
}

impl QueryMetadata {
    pub fn has_more(&self) -> bool {
        !self.bookmark.is_empty()
    }
}

/// Iterator over a snapshot of the state, in key byte-order.
///
/// The owning transaction counts open iterators. An iterator is released
/// when it is drained, closed, or dropped; a transaction that finishes with
/// an iterator still open fails to commit.
#[derive(Debug)]
pub struct StateIterator {
    items: std::vec::IntoIter<KeyValue>,
    open: Option<Rc<Cell<usize>>>,
}

impl StateIterator {
    pub(crate) fn new(items: Vec<KeyValue>, open: Rc<Cell<usize>>) -> Self {
        open.set(open.get() + 1);
        Self {
            items: items.into_iter(),
            open: Some(open),
        }
    }

    /// Release the iterator without draining it
    pub fn close(mut self) {
        self.release();
    }

    /// Entries not yet yielded
    pub fn remaining(&self) -> usize {
        self.items.len()
    }

    fn release(&mut self) {
        if let Some(open) = self.open.take() {
            open.set(open.get().saturating_sub(1));
        }
    }
}

impl Iterator for StateIterator {
    type Item = KeyValue;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.items.next();
        if next.is_none() {
            self.release();
        }
        next
    }
}

impl Drop for StateIterator {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kv(key: &str) -> KeyValue {
        KeyValue {
            key: key.into(),
            value: vec![0],
        }
    }

    #[test]
    fn test_drain_releases() {
        let open = Rc::new(Cell::new(0));
        let mut iter = StateIterator::new(vec![kv("a"), kv("b")], open.clone());
        assert_eq!(open.get(), 1);
        assert_eq!(iter.next().map(|e| e.key), Some("a".to_string()));
        assert_eq!(open.get(), 1);
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert_eq!(open.get(), 0);
    }

    #[test]
    fn test_close_and_drop_release() {
        let open = Rc::new(Cell::new(0));
        let first = StateIterator::new(vec![kv("a")], open.clone());
        let second = StateIterator::new(vec![kv("b")], open.clone());
        assert_eq!(open.get(), 2);
        first.close();
        assert_eq!(open.get(), 1);
        drop(second);
        assert_eq!(open.get(), 0);
    }

    #[test]
    fn test_metadata_has_more() {
        let done = QueryMetadata::default();
        assert!(!done.has_more());
        let more = QueryMetadata {
            fetched_records_count: 10,
            bookmark: "00ff".into(),
        };
        assert!(more.has_more());
    }
}
