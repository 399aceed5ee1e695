// crates/glossa-core/src/runtime/mod.rs
// ============================================================================
// Module: Glossa Runtime
// Description: Graph walker, store gateway, overlay paths, sessions, and translator.
// Purpose: Execute translation reads and writes against live entity graphs.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! Runtime modules implement the read path (walk, fetch, overlay), the
//! write path (strict walk, stage, atomic replace), and the session that
//! reuses one walk across both. In-memory implementations of both
//! interfaces live here as well.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod engine;
pub mod error;
pub mod gateway;
pub mod graph;
pub mod overlay;
pub mod session;
pub mod store;
pub mod walker;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::Translator;
pub use engine::TranslatorConfig;
pub use error::TranslationError;
pub use gateway::fetch_translations;
pub use graph::EntityGraph;
pub use overlay::OverlayReport;
pub use overlay::WriteReport;
pub use overlay::apply_translations;
pub use overlay::discard_translations;
pub use overlay::stage_translations;
pub use overlay::write_translations;
pub use session::TranslationSession;
pub use store::InMemoryTranslationStore;
pub use store::StoreStats;
pub use walker::Context;
pub use walker::ContextInfo;
pub use walker::ContextKind;
pub use walker::PrefetchPolicy;
pub use walker::build_index;
