// crates/glossa-config/src/lib.rs
// ============================================================================
// Module: Glossa Config Library
// Description: Canonical config model, validation, and runtime construction.
// Purpose: Single source of truth for glossa.toml semantics.
// Dependencies: glossa-core, glossa-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `glossa-config` defines the canonical configuration model for Glossa. It
//! provides strict, fail-closed validation and turns a validated config into
//! a [`glossa_core::LanguageRegistry`], a [`glossa_core::TranslatorConfig`],
//! and the selected translation store backend.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
