//! Per-invocation transaction context
//!
//! A `TxContext` buffers every write of one invocation on top of a committed
//! snapshot. Reads see the invocation's own pending writes. Nothing reaches the
//! committed state until the ledger accepts the whole write-set.

use crate::block::ContractEvent;
use crate::error::LedgerError;
use crate::identity::ClientIdentity;
use crate::iterator::{KeyValue, QueryMetadata, StateIterator};
use crate::key::CompositeKey;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Read access to committed state
pub trait StateReader {
    /// Committed value for `key`
    fn get_committed(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Committed entries whose key starts with `prefix`, in key order
    fn scan_committed(&self, prefix: &str) -> Result<Vec<KeyValue>, LedgerError>;

    /// Committed value in a private collection
    fn get_committed_private(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError>;
}

/// Everything an invocation wants to commit
#[derive(Debug, Default)]
pub struct WriteSet {
    pub writes: BTreeMap<String, Option<Vec<u8>>>,
    pub private_writes: BTreeMap<(String, String), Option<Vec<u8>>>,
    pub events: Vec<ContractEvent>,
}

impl WriteSet {
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.private_writes.is_empty() && self.events.is_empty()
    }
}

/// Store, identity and clock handed to every operation
pub struct TxContext<'a> {
    state: &'a dyn StateReader,
    identity: ClientIdentity,
    transient: HashMap<String, Vec<u8>>,
    tx_id: String,
    timestamp: DateTime<Utc>,
    write_set: WriteSet,
    open_iterators: Rc<Cell<usize>>,
}

impl<'a> TxContext<'a> {
    pub fn new(
        state: &'a dyn StateReader,
        identity: ClientIdentity,
        transient: HashMap<String, Vec<u8>>,
        tx_id: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            state,
            identity,
            transient,
            tx_id,
            timestamp,
            write_set: WriteSet::default(),
            open_iterators: Rc::new(Cell::new(0)),
        }
    }

    // === Public state ===

    pub fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        check_key(key)?;
        match self.write_set.writes.get(key) {
            Some(pending) => Ok(pending.clone()),
            None => self.state.get_committed(key),
        }
    }

    pub fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        check_key(key)?;
        self.write_set.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    pub fn del_state(&mut self, key: &str) -> Result<(), LedgerError> {
        check_key(key)?;
        self.write_set.writes.insert(key.to_string(), None);
        Ok(())
    }

    /// Scan all entries under a namespace and leading components
    pub fn get_state_by_partial_composite_key(
        &self,
        namespace: &str,
        components: &[&str],
    ) -> Result<StateIterator, LedgerError> {
        let prefix = CompositeKey::new(namespace, components.iter().copied())?.encode();
        let entries = self.merged_scan(&prefix)?;
        Ok(StateIterator::new(entries, self.open_iterators.clone()))
    }

    /// Scan one page of entries under a namespace and leading components.
    ///
    /// `bookmark` is the token returned with the previous page, or empty for
    /// the first page.
    pub fn get_state_by_partial_composite_key_with_pagination(
        &self,
        namespace: &str,
        components: &[&str],
        page_size: usize,
        bookmark: &str,
    ) -> Result<(StateIterator, QueryMetadata), LedgerError> {
        let prefix = CompositeKey::new(namespace, components.iter().copied())?.encode();
        let mut entries = self.merged_scan(&prefix)?;

        if !bookmark.is_empty() {
            let after = decode_bookmark(bookmark)?;
            if !after.starts_with(&prefix) {
                return Err(LedgerError::InvalidBookmark(bookmark.to_string()));
            }
            entries.retain(|entry| entry.key > after);
        }

        let has_more = entries.len() > page_size;
        entries.truncate(page_size);

        let metadata = QueryMetadata {
            fetched_records_count: entries.len(),
            bookmark: match entries.last() {
                Some(last) if has_more => hex::encode(last.key.as_bytes()),
                _ => String::new(),
            },
        };

        Ok((
            StateIterator::new(entries, self.open_iterators.clone()),
            metadata,
        ))
    }

    fn merged_scan(&self, prefix: &str) -> Result<Vec<KeyValue>, LedgerError> {
        let mut merged: BTreeMap<String, Vec<u8>> = self
            .state
            .scan_committed(prefix)?
            .into_iter()
            .map(|kv| (kv.key, kv.value))
            .collect();

        for (key, pending) in self.write_set.writes.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match pending {
                Some(value) => merged.insert(key.clone(), value.clone()),
                None => merged.remove(key),
            };
        }

        tracing::debug!(tx_id = %self.tx_id, entries = merged.len(), "range scan");

        Ok(merged
            .into_iter()
            .map(|(key, value)| KeyValue { key, value })
            .collect())
    }

    // === Private collections ===

    pub fn get_private_data(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        check_key(key)?;
        match self
            .write_set
            .private_writes
            .get(&(collection.to_string(), key.to_string()))
        {
            Some(pending) => Ok(pending.clone()),
            None => self.state.get_committed_private(collection, key),
        }
    }

    pub fn put_private_data(
        &mut self,
        collection: &str,
        key: &str,
        value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        check_key(key)?;
        self.write_set
            .private_writes
            .insert((collection.to_string(), key.to_string()), Some(value));
        Ok(())
    }

    // === Invocation metadata ===

    /// Value passed off-ledger with the invocation; never committed
    pub fn transient(&self, key: &str) -> Option<&[u8]> {
        self.transient.get(key).map(Vec::as_slice)
    }

    pub fn client_identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Emit a named event with a JSON payload
    pub fn set_event<T: Serialize>(&mut self, name: &str, payload: &T) -> Result<(), LedgerError> {
        let payload = serde_json::to_value(payload)?;
        self.write_set.events.push(ContractEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }

    /// Pending events, in emission order
    pub fn events(&self) -> &[ContractEvent] {
        &self.write_set.events
    }

    /// Finish the invocation and hand back its write-set
    pub fn into_write_set(self) -> Result<WriteSet, LedgerError> {
        let open = self.open_iterators.get();
        if open > 0 {
            return Err(LedgerError::IteratorLeak {
                tx_id: self.tx_id,
                open,
            });
        }
        Ok(self.write_set)
    }
}

fn check_key(key: &str) -> Result<(), LedgerError> {
    if key.is_empty() {
        return Err(LedgerError::EmptyKey);
    }
    Ok(())
}

fn decode_bookmark(bookmark: &str) -> Result<String, LedgerError> {
    hex::decode(bookmark)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| LedgerError::InvalidBookmark(bookmark.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FixedState {
        entries: BTreeMap<String, Vec<u8>>,
    }

    impl StateReader for FixedState {
        fn get_committed(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
            Ok(self.entries.get(key).cloned())
        }

        fn scan_committed(&self, prefix: &str) -> Result<Vec<KeyValue>, LedgerError> {
            Ok(self
                .entries
                .iter()
                .filter(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| KeyValue {
                    key: k.clone(),
                    value: v.clone(),
                })
                .collect())
        }

        fn get_committed_private(&self, _: &str, _: &str) -> Result<Option<Vec<u8>>, LedgerError> {
            Ok(None)
        }
    }

    fn key(ns: &str, parts: &[&str]) -> String {
        CompositeKey::new(ns, parts.iter().copied()).unwrap().encode()
    }

    fn state_with(keys: &[String]) -> FixedState {
        let mut state = FixedState::default();
        for k in keys {
            state.entries.insert(k.clone(), vec![0]);
        }
        state
    }

    fn ctx(state: &FixedState) -> TxContext<'_> {
        TxContext::new(
            state,
            ClientIdentity::new("registrar", "NITWarangalMSP"),
            HashMap::new(),
            "tx-1".into(),
            Utc::now(),
        )
    }

    #[test]
    fn test_reads_see_pending_writes() {
        let state = state_with(&["a".to_string()]);
        let mut tx = ctx(&state);

        assert_eq!(tx.get_state("a").unwrap(), Some(vec![0]));
        tx.put_state("a", b"new".to_vec()).unwrap();
        assert_eq!(tx.get_state("a").unwrap(), Some(b"new".to_vec()));
        tx.del_state("a").unwrap();
        assert_eq!(tx.get_state("a").unwrap(), None);
    }

    #[test]
    fn test_empty_key_rejected() {
        let state = FixedState::default();
        let mut tx = ctx(&state);
        assert_eq!(tx.put_state("", vec![1]), Err(LedgerError::EmptyKey));
    }

    #[test]
    fn test_scan_merges_pending_writes() {
        let state = state_with(&[key("idx", &["CSE", "1"]), key("idx", &["CSE", "2"])]);
        let mut tx = ctx(&state);
        tx.del_state(&key("idx", &["CSE", "1"])).unwrap();
        tx.put_state(&key("idx", &["CSE", "3"]), vec![0]).unwrap();
        tx.put_state(&key("idx", &["ECE", "4"]), vec![0]).unwrap();

        let ids: Vec<String> = tx
            .get_state_by_partial_composite_key("idx", &["CSE"])
            .unwrap()
            .map(|kv| CompositeKey::parse(&kv.key).unwrap().components()[1].clone())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_pagination() {
        let keys: Vec<String> = (1..=5).map(|i| key("idx", &["CSE", &i.to_string()])).collect();
        let state = state_with(&keys);
        let tx = ctx(&state);

        let (page, meta) = tx
            .get_state_by_partial_composite_key_with_pagination("idx", &["CSE"], 2, "")
            .unwrap();
        assert_eq!(page.count(), 2);
        assert_eq!(meta.fetched_records_count, 2);
        assert!(meta.has_more());

        let (page, meta) = tx
            .get_state_by_partial_composite_key_with_pagination("idx", &["CSE"], 2, &meta.bookmark)
            .unwrap();
        assert_eq!(page.map(|kv| kv.key).collect::<Vec<_>>(), keys[2..4].to_vec());
        assert!(meta.has_more());

        let (page, meta) = tx
            .get_state_by_partial_composite_key_with_pagination("idx", &["CSE"], 2, &meta.bookmark)
            .unwrap();
        assert_eq!(page.count(), 1);
        assert!(!meta.has_more());
    }

    #[test]
    fn test_bad_bookmark() {
        let state = FixedState::default();
        let tx = ctx(&state);
        let result = tx.get_state_by_partial_composite_key_with_pagination("idx", &[], 10, "zz");
        assert!(matches!(result, Err(LedgerError::InvalidBookmark(_))));

        let foreign = hex::encode(key("other", &["x"]).as_bytes());
        let result = tx.get_state_by_partial_composite_key_with_pagination("idx", &[], 10, &foreign);
        assert!(matches!(result, Err(LedgerError::InvalidBookmark(_))));
    }

    #[test]
    fn test_open_iterator_blocks_commit() {
        let state = state_with(&[key("idx", &["a"])]);
        let tx = ctx(&state);
        let iter = tx.get_state_by_partial_composite_key("idx", &[]).unwrap();
        // Keep the iterator alive past the end of the invocation
        let leaked = std::mem::ManuallyDrop::new(iter);
        let result = tx.into_write_set();
        assert!(matches!(result, Err(LedgerError::IteratorLeak { open: 1, .. })));
        drop(std::mem::ManuallyDrop::into_inner(leaked));
    }

    #[test]
    fn test_events_recorded() {
        let state = FixedState::default();
        let mut tx = ctx(&state);
        tx.set_event("StudentCreated", &serde_json::json!({"rollNumber": "21CS1001"}))
            .unwrap();
        assert_eq!(tx.events().len(), 1);
        let ws = tx.into_write_set().unwrap();
        assert_eq!(ws.events[0].name, "StudentCreated");
    }
}
