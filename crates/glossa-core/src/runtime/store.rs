// crates/glossa-core/src/runtime/store.rs
// ============================================================================
// Module: Glossa In-Memory Translation Store
// Description: Mutex-protected translation store for tests and embedding.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! [`InMemoryTranslationStore`] keeps records in an ordered map keyed by
//! their natural key. An atomic unit works on a copy of the map that
//! replaces the live map only when the unit succeeds. Query, commit and
//! rollback counts are exposed through [`StoreStats`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use tracing::debug;

use crate::core::record::RecordKey;
use crate::core::record::TranslationFilter;
use crate::core::record::TranslationRecord;
use crate::interfaces::StoreError;
use crate::interfaces::TranslationStore;
use crate::interfaces::TranslationWriter;

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Round-trip counters of a translation store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Lookups issued, inside or outside atomic units.
    pub queries: u64,
    /// Atomic units committed.
    pub commits: u64,
    /// Atomic units rolled back.
    pub rollbacks: u64,
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Shared state behind the store mutex.
#[derive(Debug, Default)]
struct MemoryState {
    /// Stored records keyed by natural key.
    records: BTreeMap<RecordKey, TranslationRecord>,
    /// Round-trip counters.
    stats: StoreStats,
}

/// In-memory translation store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTranslationStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryTranslationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the round-trip counters.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the store mutex is poisoned.
    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        Ok(self.lock()?.stats)
    }

    /// Returns every stored record in key order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the store mutex is poisoned.
    pub fn records(&self) -> Result<Vec<TranslationRecord>, StoreError> {
        Ok(self.lock()?.records.values().cloned().collect())
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the store mutex is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.records.len())
    }

    /// Locks the store state.
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Io("translation store mutex poisoned".to_string()))
    }
}

impl TranslationStore for InMemoryTranslationStore {
    fn query(&self, filter: &TranslationFilter) -> Result<Vec<TranslationRecord>, StoreError> {
        let mut guard = self.lock()?;
        guard.stats.queries += 1;
        Ok(select(&guard.records, filter))
    }

    fn atomically(
        &self,
        work: &mut dyn FnMut(&mut dyn TranslationWriter) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let mut writer = MemoryWriter {
            records: guard.records.clone(),
            queries: 0,
        };
        let outcome = work(&mut writer);
        guard.stats.queries += writer.queries;
        match outcome {
            Ok(()) => {
                guard.records = writer.records;
                guard.stats.commits += 1;
                debug!(records = guard.records.len(), "in-memory translation unit committed");
                Ok(())
            }
            Err(err) => {
                guard.stats.rollbacks += 1;
                debug!(error = %err, "in-memory translation unit rolled back");
                Err(err)
            }
        }
    }
}

/// Working copy handed to one atomic unit.
struct MemoryWriter {
    /// Records as seen by the unit.
    records: BTreeMap<RecordKey, TranslationRecord>,
    /// Lookups issued by the unit.
    queries: u64,
}

impl TranslationWriter for MemoryWriter {
    fn query(&mut self, filter: &TranslationFilter) -> Result<Vec<TranslationRecord>, StoreError> {
        self.queries += 1;
        Ok(select(&self.records, filter))
    }

    fn bulk_delete(&mut self, records: &[TranslationRecord]) -> Result<usize, StoreError> {
        Ok(records.iter().filter(|record| self.records.remove(&record.key()).is_some()).count())
    }

    fn bulk_insert(&mut self, records: &[TranslationRecord]) -> Result<usize, StoreError> {
        let mut batch = BTreeSet::new();
        for record in records {
            let key = record.key();
            if self.records.contains_key(&key) || !batch.insert(key) {
                return Err(StoreError::Conflict(format!(
                    "record for {} field `{}` in `{}` already exists",
                    record.owner(),
                    record.field,
                    record.language
                )));
            }
        }
        for record in records {
            self.records.insert(record.key(), record.clone());
        }
        Ok(records.len())
    }
}

/// Returns the records of `records` selected by `filter`.
fn select(
    records: &BTreeMap<RecordKey, TranslationRecord>,
    filter: &TranslationFilter,
) -> Vec<TranslationRecord> {
    records.values().filter(|record| filter.matches(record)).cloned().collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;
    use crate::core::identifiers::EntityRef;
    use crate::core::language::LanguageTag;

    fn record(id: &str, field: &str, text: &str) -> TranslationRecord {
        TranslationRecord::new(
            &EntityRef::new("places.city", id),
            field,
            LanguageTag::parse("de").unwrap(),
            text,
        )
    }

    #[test]
    fn duplicate_keys_in_one_batch_conflict() {
        let store = InMemoryTranslationStore::new();
        let batch = [record("1", "name", "Wien"), record("1", "name", "Vienna")];
        let err =
            store.atomically(&mut |writer| writer.bulk_insert(&batch).map(|_| ())).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.len().unwrap(), 0);
        assert_eq!(store.stats().unwrap().rollbacks, 1);
    }

    #[test]
    fn failed_unit_leaves_records_untouched() {
        let store = InMemoryTranslationStore::new();
        let seed = [record("1", "name", "Wien")];
        store.atomically(&mut |writer| writer.bulk_insert(&seed).map(|_| ())).unwrap();
        let err = store
            .atomically(&mut |writer| {
                writer.bulk_delete(&seed)?;
                Err(StoreError::Store("boom".to_string()))
            })
            .unwrap_err();
        assert_eq!(err, StoreError::Store("boom".to_string()));
        assert_eq!(store.records().unwrap(), seed.to_vec());
        let stats = store.stats().unwrap();
        assert_eq!((stats.commits, stats.rollbacks), (1, 1));
    }
}
