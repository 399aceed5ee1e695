// crates/glossa-store-sqlite/src/lib.rs
// ============================================================================
// Module: Glossa SQLite Translation Store
// Description: Durable TranslationStore backend using SQLite.
// Purpose: Persist sparse per-language translation records.
// Dependencies: glossa-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`TranslationStore`] implementation.
//! Records live in one table keyed by (entity type, identity, field,
//! language); bulk lookups run as a single statement and replacements run
//! inside one `SQLite` transaction.
//!
//! [`TranslationStore`]: glossa_core::TranslationStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_TEXT_BYTES;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::SqliteTranslationStore;
