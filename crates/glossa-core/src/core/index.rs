// crates/glossa-core/src/core/index.rs
// ============================================================================
// Module: Glossa Instance Index
// Description: Deduplicated (type, identity) -> live entity handle mapping.
// Purpose: Single source of truth for which instance represents an entity.
// Dependencies: crate::core::{identifiers, language, record}
// ============================================================================

//! ## Overview
//! The graph walker produces one [`InstanceIndex`] per call. Every overlay
//! and write goes through index lookups rather than through the path that
//! reached an entity, so an entity reachable along several relation paths is
//! read, translated, and written exactly once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::identifiers::EntityHandle;
use crate::core::identifiers::EntityId;
use crate::core::identifiers::EntityRef;
use crate::core::identifiers::EntityType;
use crate::core::language::LanguageTag;
use crate::core::record::TranslationFilter;

// ============================================================================
// SECTION: Instance Index
// ============================================================================

/// Two-level mapping: entity type -> (identity -> handle).
///
/// # Invariants
/// - Each (type, identity) appears at most once; the first insert wins.
/// - Iteration is ordered by type, then identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceIndex {
    /// Handles grouped by type.
    entries: BTreeMap<EntityType, BTreeMap<EntityId, EntityHandle>>,
}

impl InstanceIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `handle` for `entity`; returns false when already present.
    pub fn insert(&mut self, entity: EntityRef, handle: EntityHandle) -> bool {
        let ids = self.entries.entry(entity.entity_type).or_default();
        if ids.contains_key(&entity.entity_id) {
            return false;
        }
        ids.insert(entity.entity_id, handle);
        true
    }

    /// Returns the handle for (`entity_type`, `entity_id`).
    #[must_use]
    pub fn get(&self, entity_type: &EntityType, entity_id: &EntityId) -> Option<EntityHandle> {
        self.entries.get(entity_type).and_then(|ids| ids.get(entity_id)).copied()
    }

    /// Returns the handle for `entity`.
    #[must_use]
    pub fn lookup(&self, entity: &EntityRef) -> Option<EntityHandle> {
        self.get(&entity.entity_type, &entity.entity_id)
    }

    /// Returns true when `entity` is indexed.
    #[must_use]
    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.lookup(entity).is_some()
    }

    /// Returns the number of indexed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Returns true when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of distinct entity types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the identities indexed for `entity_type` in order.
    #[must_use]
    pub fn ids(&self, entity_type: &EntityType) -> Vec<&EntityId> {
        self.entries.get(entity_type).map(|ids| ids.keys().collect()).unwrap_or_default()
    }

    /// Iterates every indexed entity with its handle.
    pub fn iter(&self) -> impl Iterator<Item = (EntityRef, EntityHandle)> + '_ {
        self.entries.iter().flat_map(|(entity_type, ids)| {
            ids.iter().map(move |(entity_id, handle)| {
                (EntityRef::new(entity_type.clone(), entity_id.clone()), *handle)
            })
        })
    }

    /// Builds the disjunctive lookup filter for every indexed entity.
    #[must_use]
    pub fn filter(&self, language: LanguageTag) -> TranslationFilter {
        let mut filter = TranslationFilter::new(language);
        for (entity, _) in self.iter() {
            filter.insert(&entity);
        }
        filter
    }
}
