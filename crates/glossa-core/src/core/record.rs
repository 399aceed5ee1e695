// crates/glossa-core/src/core/record.rs
// ============================================================================
// Module: Glossa Translation Records
// Description: Persisted translation record shape and bulk lookup filters.
// Purpose: Define the sparse per-language store contents and how they are queried.
// Dependencies: crate::core::{identifiers, language}, serde
// ============================================================================

//! ## Overview
//! A [`TranslationRecord`] holds one translated field value of one entity in
//! one language. Records are keyed by their [`RecordKey`]; no two stored
//! records share a key. A [`TranslationFilter`] selects every record of one
//! language belonging to a set of entities and is the only lookup shape the
//! engine issues against a store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::EntityId;
use crate::core::identifiers::EntityRef;
use crate::core::identifiers::EntityType;
use crate::core::language::LanguageTag;

// ============================================================================
// SECTION: Records
// ============================================================================

/// One translated field value.
///
/// # Invariants
/// - `(entity_type, entity_id, field, language)` is unique within a store.
/// - Records are replaced wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Owning entity type.
    pub entity_type: EntityType,
    /// Owning entity identity.
    pub entity_id: EntityId,
    /// Translated field name.
    pub field: String,
    /// Language of `text`.
    pub language: LanguageTag,
    /// Translated text.
    pub text: String,
}

impl TranslationRecord {
    /// Creates a record for `owner`.
    #[must_use]
    pub fn new(
        owner: &EntityRef,
        field: impl Into<String>,
        language: LanguageTag,
        text: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: owner.entity_type.clone(),
            entity_id: owner.entity_id.clone(),
            field: field.into(),
            language,
            text: text.into(),
        }
    }

    /// Returns the owning entity reference.
    #[must_use]
    pub fn owner(&self) -> EntityRef {
        EntityRef::new(self.entity_type.clone(), self.entity_id.clone())
    }

    /// Returns the natural key of the record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey {
            entity_type: self.entity_type.clone(),
            entity_id: self.entity_id.clone(),
            field: self.field.clone(),
            language: self.language.clone(),
        }
    }
}

/// Natural key of a [`TranslationRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    /// Owning entity type.
    pub entity_type: EntityType,
    /// Owning entity identity.
    pub entity_id: EntityId,
    /// Translated field name.
    pub field: String,
    /// Record language.
    pub language: LanguageTag,
}

// ============================================================================
// SECTION: Filters
// ============================================================================

/// Disjunctive lookup over (type, identity) pairs in one language.
///
/// # Invariants
/// - Matches a record iff its language equals `language` and its owner is
///   one of the listed pairs.
/// - Types with no identities are never present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFilter {
    /// Language to match.
    language: LanguageTag,
    /// Owner identities grouped by type.
    targets: BTreeMap<EntityType, BTreeSet<EntityId>>,
}

impl TranslationFilter {
    /// Creates a filter that matches nothing yet.
    #[must_use]
    pub const fn new(language: LanguageTag) -> Self {
        Self {
            language,
            targets: BTreeMap::new(),
        }
    }

    /// Adds one owner to the filter.
    pub fn insert(&mut self, owner: &EntityRef) {
        self.targets
            .entry(owner.entity_type.clone())
            .or_default()
            .insert(owner.entity_id.clone());
    }

    /// Returns the filtered language.
    #[must_use]
    pub const fn language(&self) -> &LanguageTag {
        &self.language
    }

    /// Iterates owners grouped by type in deterministic order.
    pub fn targets(&self) -> impl Iterator<Item = (&EntityType, &BTreeSet<EntityId>)> {
        self.targets.iter()
    }

    /// Returns the number of (type, identity) pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.targets.values().map(BTreeSet::len).sum()
    }

    /// Returns true when the filter cannot match any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns true when `record` is selected by this filter.
    #[must_use]
    pub fn matches(&self, record: &TranslationRecord) -> bool {
        record.language == self.language
            && self
                .targets
                .get(&record.entity_type)
                .is_some_and(|ids| ids.contains(&record.entity_id))
    }
}
