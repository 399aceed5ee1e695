// crates/glossa-core/src/interfaces/mod.rs
// ============================================================================
// Module: Glossa Interfaces
// Description: Backend-agnostic interfaces for object graphs and translation storage.
// Purpose: Define the contract surfaces used by the Glossa runtime.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Glossa never owns entities or translation rows. It walks entities held by
//! an [`ObjectStore`] and reads or replaces records held by a
//! [`TranslationStore`]. Implementations must fail closed: a relation that
//! cannot be resolved is an error, never an empty result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::identifiers::EntityHandle;
use crate::core::identifiers::EntityRef;
use crate::core::identifiers::EntityType;
use crate::core::record::TranslationFilter;
use crate::core::record::TranslationRecord;

// ============================================================================
// SECTION: Object Store
// ============================================================================

/// Object store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectStoreError {
    /// Handle does not address a live entity.
    #[error("no live entity for handle {handle}")]
    MissingHandle {
        /// Offending handle.
        handle: EntityHandle,
    },
    /// Relation is not declared on the entity type.
    #[error("entity type `{entity_type}` has no relation `{relation}`")]
    UnknownRelation {
        /// Owner entity type.
        entity_type: EntityType,
        /// Requested relation name.
        relation: String,
    },
    /// Entity is not of the requested concrete type.
    #[error("entity {entity} is not of type `{expected}`")]
    TypeMismatch {
        /// Entity that was accessed.
        entity: EntityRef,
        /// Requested entity type.
        expected: String,
    },
    /// Backend reported an error.
    #[error("object store error: {0}")]
    Store(String),
}

/// Resolved value of a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Related {
    /// To-one relation; `None` when the foreign key is empty.
    One(Option<EntityHandle>),
    /// To-many relation in store order.
    Many(Vec<EntityHandle>),
}

impl Related {
    /// Flattens the relation value into handles.
    #[must_use]
    pub fn into_handles(self) -> Vec<EntityHandle> {
        match self {
            Self::One(handle) => handle.into_iter().collect(),
            Self::Many(handles) => handles,
        }
    }
}

/// Live entity graph with identity-mapped instances.
///
/// Handles returned by one store are only valid for that store. Relation
/// resolution returns handles of already-live instances when the entity has
/// been loaded before, so every (type, identity) maps to one handle.
pub trait ObjectStore {
    /// Borrows the entity behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::MissingHandle`] for unknown handles.
    fn entity(&self, handle: EntityHandle) -> Result<&dyn Entity, ObjectStoreError>;

    /// Mutably borrows the entity behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::MissingHandle`] for unknown handles.
    fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut dyn Entity, ObjectStoreError>;

    /// Loads an entity by identity.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when the backend fails.
    fn load(&mut self, entity: &EntityRef) -> Result<Option<EntityHandle>, ObjectStoreError>;

    /// Loads every entity of `entity_type` accepted by `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when the backend fails.
    fn load_by_filter(
        &mut self,
        entity_type: &EntityType,
        filter: &dyn Fn(&dyn Entity) -> bool,
    ) -> Result<Vec<EntityHandle>, ObjectStoreError>;

    /// Resolves `relation` of `owner`, loading it when it is not loaded yet.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when the relation is unknown or the
    /// backend fails.
    fn related(&mut self, owner: EntityHandle, relation: &str)
    -> Result<Related, ObjectStoreError>;

    /// Returns true when `relation` of `owner` is already loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when the relation is unknown.
    fn is_prefetched(&self, owner: EntityHandle, relation: &str)
    -> Result<bool, ObjectStoreError>;
}

// ============================================================================
// SECTION: Translation Store
// ============================================================================

/// Translation store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("translation store io error: {0}")]
    Io(String),
    /// Insert collides with an existing record key.
    #[error("translation store conflict: {0}")]
    Conflict(String),
    /// Store data version is incompatible.
    #[error("translation store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("translation store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("translation store error: {0}")]
    Store(String),
}

/// Operations available inside one atomic unit of a [`TranslationStore`].
pub trait TranslationWriter {
    /// Returns every record selected by `filter` as seen by this unit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn query(&mut self, filter: &TranslationFilter) -> Result<Vec<TranslationRecord>, StoreError>;

    /// Deletes records by natural key; returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when deletion fails.
    fn bulk_delete(&mut self, records: &[TranslationRecord]) -> Result<usize, StoreError>;

    /// Inserts records; returns the number inserted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when a natural key already exists.
    fn bulk_insert(&mut self, records: &[TranslationRecord]) -> Result<usize, StoreError>;
}

/// Sparse per-language translation storage.
pub trait TranslationStore {
    /// Returns every record selected by `filter` in one round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn query(&self, filter: &TranslationFilter) -> Result<Vec<TranslationRecord>, StoreError>;

    /// Runs `work` as one atomic unit: committed when it returns `Ok`, rolled
    /// back entirely when it returns `Err`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work` unchanged, or [`StoreError`] when
    /// the unit cannot be opened or committed.
    fn atomically(
        &self,
        work: &mut dyn FnMut(&mut dyn TranslationWriter) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;
}
