//! Keyed store adapter and secondary index maintainer
//!
//! Entities are stored as JSON under `namespace~id`. Each entity declares the
//! secondary index entries its current version implies; `insert`, `replace`
//! and `remove` keep those entries in step with the primary record. Index
//! values are a one-byte marker or, for unique indexes, the owning id. Readers
//! always re-fetch the entity by primary key.

use crate::error::{ContractError, ContractResult};
use acad_core::validation;
use acad_ledger::{CompositeKey, QueryMetadata, TxContext};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Value stored under a non-unique index key
const MARKER: [u8; 1] = [0x00];

/// A record type with a primary key and derived lookup paths
pub trait Entity: Serialize + DeserializeOwned {
    /// Label used in errors and logs
    const KIND: &'static str;

    /// Namespace of the primary key
    const NAMESPACE: &'static str;

    /// Every index namespace this entity writes to
    const INDEXES: &'static [&'static str];

    fn id(&self) -> &str;

    /// Index entries implied by this version of the entity
    fn index_entries(&self) -> Vec<IndexEntry>;
}

/// One secondary index position
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexEntry {
    pub namespace: &'static str,
    pub components: Vec<String>,
    /// Unique indexes store the owning id instead of a marker
    pub unique: bool,
}

impl IndexEntry {
    /// Non-unique entry; the owning id must be the last component
    pub fn new(namespace: &'static str, components: Vec<String>) -> Self {
        Self {
            namespace,
            components,
            unique: false,
        }
    }

    /// Unique entry pointing back at the owning id
    pub fn unique(namespace: &'static str, components: Vec<String>) -> Self {
        Self {
            namespace,
            components,
            unique: true,
        }
    }

    fn key(&self) -> ContractResult<String> {
        Ok(CompositeKey::new(self.namespace, self.components.iter().cloned())?.encode())
    }
}

/// One page of entities from an index scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedQueryResult<T> {
    pub records: Vec<T>,
    pub fetched_records_count: usize,
    pub bookmark: String,
    pub has_more: bool,
}

impl<T> PaginatedQueryResult<T> {
    fn new(records: Vec<T>, metadata: QueryMetadata) -> Self {
        Self {
            records,
            fetched_records_count: metadata.fetched_records_count,
            has_more: metadata.has_more(),
            bookmark: metadata.bookmark,
        }
    }

    /// Drop records the caller may not see; pagination state is kept
    pub fn retain(mut self, keep: impl FnMut(&T) -> bool) -> Self {
        self.records.retain(keep);
        self
    }
}

pub fn primary_key<T: Entity>(id: &str) -> ContractResult<String> {
    validation::validate_key_component(T::KIND, id)?;
    Ok(CompositeKey::new(T::NAMESPACE, [id])?.encode())
}

/// Caller-supplied lookup components must be usable as key parts
fn check_lookup(components: &[&str]) -> ContractResult<()> {
    for component in components {
        validation::validate_key_component("lookup key", component)?;
    }
    Ok(())
}

pub fn load<T: Entity>(ctx: &TxContext<'_>, id: &str) -> ContractResult<Option<T>> {
    match ctx.get_state(&primary_key::<T>(id)?)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub fn require<T: Entity>(ctx: &TxContext<'_>, id: &str) -> ContractResult<T> {
    load(ctx, id)?.ok_or_else(|| ContractError::not_found(T::KIND, id))
}

pub fn exists<T: Entity>(ctx: &TxContext<'_>, id: &str) -> ContractResult<bool> {
    Ok(ctx.get_state(&primary_key::<T>(id)?)?.is_some())
}

/// Write a new entity and all of its index entries
pub fn insert<T: Entity>(ctx: &mut TxContext<'_>, entity: &T) -> ContractResult<()> {
    if exists::<T>(ctx, entity.id())? {
        return Err(ContractError::already_exists(T::KIND, entity.id()));
    }

    ctx.put_state(&primary_key::<T>(entity.id())?, serde_json::to_vec(entity)?)?;
    for entry in entity.index_entries() {
        put_index(ctx, &entry, entity.id())?;
    }

    tracing::debug!(kind = T::KIND, id = entity.id(), "entity inserted");
    Ok(())
}

/// Replace an entity: write the primary record, delete index entries the old
/// version implied but the new one does not, then write the new entries.
///
/// Callers validate every precondition before calling this.
pub fn replace<T: Entity>(ctx: &mut TxContext<'_>, old: &T, new: &T) -> ContractResult<()> {
    if old.id() != new.id() {
        return Err(ContractError::Conflict(format!(
            "{} id cannot change from {} to {}",
            T::KIND,
            old.id(),
            new.id()
        )));
    }

    let before: BTreeSet<IndexEntry> = old.index_entries().into_iter().collect();
    let after: BTreeSet<IndexEntry> = new.index_entries().into_iter().collect();

    ctx.put_state(&primary_key::<T>(new.id())?, serde_json::to_vec(new)?)?;

    for stale in before.difference(&after) {
        ctx.del_state(&stale.key()?)?;
        tracing::debug!(kind = T::KIND, id = new.id(), index = stale.namespace, "stale index entry removed");
    }
    for fresh in after.difference(&before) {
        put_index(ctx, fresh, new.id())?;
        tracing::debug!(kind = T::KIND, id = new.id(), index = fresh.namespace, "index entry written");
    }

    Ok(())
}

/// Delete an entity and every index entry it implies
pub fn remove<T: Entity>(ctx: &mut TxContext<'_>, entity: &T) -> ContractResult<()> {
    for entry in entity.index_entries() {
        ctx.del_state(&entry.key()?)?;
    }
    ctx.del_state(&primary_key::<T>(entity.id())?)?;

    tracing::debug!(kind = T::KIND, id = entity.id(), "entity removed");
    Ok(())
}

fn put_index(ctx: &mut TxContext<'_>, entry: &IndexEntry, id: &str) -> ContractResult<()> {
    let value = if entry.unique {
        id.as_bytes().to_vec()
    } else {
        MARKER.to_vec()
    };
    ctx.put_state(&entry.key()?, value)?;
    Ok(())
}

/// Id an index entry points at: the stored back-pointer, or the key's last component
fn target_id(key: &str, value: &[u8]) -> ContractResult<String> {
    if value != MARKER {
        return Ok(String::from_utf8_lossy(value).into_owned());
    }
    let parsed = CompositeKey::parse(key)?;
    parsed
        .last_component()
        .map(str::to_string)
        .ok_or_else(|| ContractError::Conflict(format!("index entry {} has no id", parsed)))
}

/// Owning id recorded under a unique index position
pub fn unique_lookup(
    ctx: &TxContext<'_>,
    namespace: &'static str,
    components: &[&str],
) -> ContractResult<Option<String>> {
    check_lookup(components)?;
    let key = CompositeKey::new(namespace, components.iter().copied())?.encode();
    match ctx.get_state(&key)? {
        Some(value) => Ok(Some(target_id(&key, &value)?)),
        None => Ok(None),
    }
}

/// Ids under an index prefix, in key order
pub fn index_ids(
    ctx: &TxContext<'_>,
    namespace: &'static str,
    prefix: &[&str],
) -> ContractResult<Vec<String>> {
    check_lookup(prefix)?;
    ctx.get_state_by_partial_composite_key(namespace, prefix)?
        .map(|kv| target_id(&kv.key, &kv.value))
        .collect()
}

/// Entities under an index prefix, re-fetched by primary key
pub fn scan<T: Entity>(
    ctx: &TxContext<'_>,
    namespace: &'static str,
    prefix: &[&str],
) -> ContractResult<Vec<T>> {
    let ids = index_ids(ctx, namespace, prefix)?;
    resolve(ctx, ids)
}

/// One page of entities under an index prefix
pub fn scan_page<T: Entity>(
    ctx: &TxContext<'_>,
    namespace: &'static str,
    prefix: &[&str],
    page_size: usize,
    bookmark: &str,
) -> ContractResult<PaginatedQueryResult<T>> {
    check_lookup(prefix)?;
    let (iter, metadata) = ctx.get_state_by_partial_composite_key_with_pagination(
        namespace, prefix, page_size, bookmark,
    )?;
    let ids = iter
        .map(|kv| target_id(&kv.key, &kv.value))
        .collect::<ContractResult<Vec<_>>>()?;
    Ok(PaginatedQueryResult::new(resolve(ctx, ids)?, metadata))
}

fn resolve<T: Entity>(ctx: &TxContext<'_>, ids: Vec<String>) -> ContractResult<Vec<T>> {
    let mut entities = Vec::with_capacity(ids.len());
    for id in ids {
        match load::<T>(ctx, &id)? {
            Some(entity) => entities.push(entity),
            None => tracing::warn!(kind = T::KIND, id = %id, "index entry points at missing record"),
        }
    }
    Ok(entities)
}

/// Mismatches between primary records and their index entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexAudit {
    /// Entries a primary record implies but the store lacks
    pub missing: Vec<String>,
    /// Entries in the store no primary record implies
    pub dangling: Vec<String>,
}

impl IndexAudit {
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.dangling.is_empty()
    }
}

/// Check every index entry of `T` against the primary records
pub fn audit_indexes<T: Entity>(ctx: &TxContext<'_>) -> ContractResult<IndexAudit> {
    let mut audit = IndexAudit::default();

    let entities: Vec<T> = ctx
        .get_state_by_partial_composite_key(T::NAMESPACE, &[])?
        .map(|kv| serde_json::from_slice(&kv.value))
        .collect::<Result<_, _>>()?;

    let mut expected = BTreeSet::new();
    for entity in &entities {
        for entry in entity.index_entries() {
            let key = entry.key()?;
            let present = ctx.get_state(&key)?;
            let pointer_ok = match &present {
                Some(value) => target_id(&key, value)? == entity.id(),
                None => false,
            };
            if !pointer_ok {
                audit.missing.push(CompositeKey::parse(&key)?.to_string());
            }
            expected.insert(key);
        }
    }

    for namespace in T::INDEXES {
        for kv in ctx.get_state_by_partial_composite_key(namespace, &[])? {
            if !expected.contains(&kv.key) {
                audit.dangling.push(CompositeKey::parse(&kv.key)?.to_string());
            }
        }
    }

    Ok(audit)
}
