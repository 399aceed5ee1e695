// crates/glossa-core/src/core/mod.rs
// ============================================================================
// Module: Glossa Core Types
// Description: Identifiers, languages, relation hierarchies, and translation records.
// Purpose: Provide the stable vocabulary shared by interfaces and runtime.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what is translated (entities and their translatable
//! fields), which relations are followed (relation hierarchies), in which
//! language (language tags and the registry), and what is persisted
//! (translation records). They carry no I/O.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod entity;
pub mod hierarchy;
pub mod identifiers;
pub mod index;
pub mod language;
pub mod record;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use entity::Entity;
pub use entity::Model;
pub use entity::RelationKind;
pub use entity::RelationSpec;
pub use entity::TranslatableField;
pub use hierarchy::DEFAULT_MAX_RELATION_DEPTH;
pub use hierarchy::DEFAULT_MAX_RELATION_PATHS;
pub use hierarchy::HierarchyError;
pub use hierarchy::HierarchyLimits;
pub use hierarchy::HierarchyNode;
pub use hierarchy::PATH_SEPARATOR;
pub use hierarchy::RelationHierarchy;
pub use hierarchy::join_path;
pub use identifiers::EntityHandle;
pub use identifiers::EntityId;
pub use identifiers::EntityRef;
pub use identifiers::EntityType;
pub use index::InstanceIndex;
pub use language::LanguageError;
pub use language::LanguageRegistry;
pub use language::LanguageTag;
pub use language::base_subtag;
pub use language::normalize_language;
pub use record::RecordKey;
pub use record::TranslationFilter;
pub use record::TranslationRecord;
