// crates/glossa-core/src/core/identifiers.rs
// ============================================================================
// Module: Glossa Identifiers
// Description: Opaque identifiers for entity types, entity identities, and handles.
// Purpose: Provide strongly typed, serializable keys for translation routing.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Entities are addressed by an [`EntityRef`], the pair of an [`EntityType`]
//! and an [`EntityId`]. Identities are compared as opaque strings and are
//! scoped to their type: the same identity under two types names two
//! unrelated entities. [`EntityHandle`] addresses a live, in-memory instance
//! inside an object store and is never persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Entity type identifier (for example `places.country`).
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    /// Creates a new entity type identifier.
    #[must_use]
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self(entity_type.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EntityType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Entity identity value, scoped to an [`EntityType`].
///
/// # Invariants
/// - Opaque UTF-8 string; numeric primary keys use their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new entity identity.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// Reference to a translatable record: its type plus its identity.
///
/// # Invariants
/// - Ordering is by type first, then identity, for deterministic iteration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity type identifier.
    pub entity_type: EntityType,
    /// Entity identity within the type.
    pub entity_id: EntityId,
}

impl EntityRef {
    /// Creates a new entity reference.
    #[must_use]
    pub fn new(entity_type: impl Into<EntityType>, entity_id: impl Into<EntityId>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity_type, self.entity_id)
    }
}

/// Handle to a live entity instance held by an object store.
///
/// # Invariants
/// - Only meaningful for the object store that issued it.
/// - Never serialized; handles do not survive the store instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(usize);

impl EntityHandle {
    /// Creates a handle from a raw slot index.
    #[must_use]
    pub const fn new(slot: usize) -> Self {
        Self(slot)
    }

    /// Returns the raw slot index.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
