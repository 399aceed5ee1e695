// crates/glossa-core/src/runtime/error.rs
// ============================================================================
// Module: Glossa Runtime Errors
// Description: Umbrella error for translation reads, writes, and sessions.
// Purpose: Report every failure with its entity, relation, and path context.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! [`TranslationError`] is returned by every runtime entry point. Language,
//! hierarchy, object store, and translation store failures convert into it
//! unchanged; traversal failures carry the relation path at which they were
//! detected (the empty path denotes the root context).

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::hierarchy::HierarchyError;
use crate::core::identifiers::EntityRef;
use crate::core::identifiers::EntityType;
use crate::core::language::LanguageError;
use crate::interfaces::ObjectStoreError;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Translation runtime errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - No variant is produced after a partial store mutation; write-path
///   failures surface before the atomic unit or roll it back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// Requested language does not resolve.
    #[error(transparent)]
    Language(#[from] LanguageError),
    /// Relation paths are malformed or exceed limits.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    /// Context is neither a single entity nor a homogeneous collection.
    #[error("invalid translation context: {reason}")]
    InvalidContext {
        /// Validation failure detail.
        reason: String,
    },
    /// An included entity type declares no translatable fields.
    #[error("entity type `{entity_type}` is not translatable (relation path `{path}`)")]
    NotTranslatable {
        /// Offending entity type.
        entity_type: EntityType,
        /// Relation path at which the entity was included.
        path: String,
    },
    /// A requested relation is not declared on the entity type.
    #[error("entity type `{entity_type}` has no relation `{relation}` (relation path `{path}`)")]
    UnknownRelation {
        /// Owner entity type.
        entity_type: EntityType,
        /// Requested relation name.
        relation: String,
        /// Relation path of the owner.
        path: String,
    },
    /// A to-many relation was not loaded ahead of a write.
    #[error("relation `{relation}` of {entity} must be prefetched (relation path `{path}`)")]
    UnprefetchedRelation {
        /// Owner entity.
        entity: EntityRef,
        /// Unloaded relation name.
        relation: String,
        /// Relation path of the owner.
        path: String,
    },
    /// Object store failure.
    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),
    /// Translation store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
