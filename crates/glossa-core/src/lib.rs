// crates/glossa-core/src/lib.rs
// ============================================================================
// Module: Glossa Core Library
// Description: Public API surface for the Glossa translation overlay engine.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Glossa overlays per-language text onto graphs of structured entities
//! without duplicating entities per language. Canonical entities live in an
//! object store; translated field values live in a sparse translation store
//! keyed by (entity type, identity, field, language). Reads merge stored
//! values onto live entities, and writes extract field values back out and
//! replace the stored set atomically.
//!
//! A call compiles dotted relation paths into a hierarchy, walks the live
//! graph once into an instance index, and issues at most one translation
//! lookup, regardless of graph depth or breadth.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ObjectStore;
pub use interfaces::ObjectStoreError;
pub use interfaces::Related;
pub use interfaces::StoreError;
pub use interfaces::TranslationStore;
pub use interfaces::TranslationWriter;
pub use runtime::Context;
pub use runtime::ContextInfo;
pub use runtime::ContextKind;
pub use runtime::EntityGraph;
pub use runtime::InMemoryTranslationStore;
pub use runtime::OverlayReport;
pub use runtime::PrefetchPolicy;
pub use runtime::StoreStats;
pub use runtime::TranslationError;
pub use runtime::TranslationSession;
pub use runtime::Translator;
pub use runtime::TranslatorConfig;
pub use runtime::WriteReport;
