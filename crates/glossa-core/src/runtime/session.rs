// crates/glossa-core/src/runtime/session.rs
// ============================================================================
// Module: Glossa Translation Session
// Description: Reusable index plus cached records for one context and language.
// Purpose: Apply, update, and discard repeatedly without re-walking the graph.
// Dependencies: crate::{core, interfaces, runtime}, tracing
// ============================================================================

//! ## Overview
//! A [`TranslationSession`] walks its context once, in strict prefetch mode,
//! and keeps the resulting instance index. Records are fetched on the first
//! [`TranslationSession::apply`] and cached; [`TranslationSession::update`]
//! and [`TranslationSession::discard`] change storage and drop the cache.
//!
//! The index holds handles of the object store the session was opened
//! against; every later call must pass that same store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;

use crate::core::index::InstanceIndex;
use crate::core::language::LanguageTag;
use crate::core::record::TranslationRecord;
use crate::interfaces::ObjectStore;
use crate::interfaces::TranslationStore;
use crate::runtime::error::TranslationError;
use crate::runtime::gateway::fetch_translations;
use crate::runtime::overlay::OverlayReport;
use crate::runtime::overlay::WriteReport;
use crate::runtime::overlay::apply_translations;
use crate::runtime::overlay::discard_translations;
use crate::runtime::overlay::stage_translations;
use crate::runtime::overlay::write_translations;

// ============================================================================
// SECTION: Session
// ============================================================================

/// Stateful translation bundle for one context and language.
///
/// # Invariants
/// - The index is never rebuilt.
/// - `cached` is `None` after any storage change made through the session.
#[derive(Debug)]
pub struct TranslationSession<'s, S: ?Sized> {
    /// Translation store.
    store: &'s S,
    /// Resolved session language.
    language: LanguageTag,
    /// Strictly built instance index.
    index: InstanceIndex,
    /// Records fetched by the last `apply`.
    cached: Option<Vec<TranslationRecord>>,
}

impl<'s, S> TranslationSession<'s, S>
where
    S: TranslationStore + ?Sized,
{
    /// Creates a session over a prebuilt index.
    #[must_use]
    pub const fn new(store: &'s S, language: LanguageTag, index: InstanceIndex) -> Self {
        Self {
            store,
            language,
            index,
            cached: None,
        }
    }

    /// Returns the session language.
    #[must_use]
    pub const fn language(&self) -> &LanguageTag {
        &self.language
    }

    /// Returns the session index.
    #[must_use]
    pub const fn index(&self) -> &InstanceIndex {
        &self.index
    }

    /// Returns true when records are cached.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Overlays the session records, fetching them on first use.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] when the fetch or the overlay fails.
    pub fn apply<O>(&mut self, objects: &mut O) -> Result<OverlayReport, TranslationError>
    where
        O: ObjectStore + ?Sized,
    {
        let records = match self.cached.take() {
            Some(records) => records,
            None => fetch_translations(self.store, &self.index, &self.language)?,
        };
        let report = apply_translations(objects, &self.index, &records);
        self.cached = Some(records);
        report
    }

    /// Replaces stored records with the current in-memory field values.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] when staging or the store write fails.
    pub fn update<O>(&mut self, objects: &O) -> Result<WriteReport, TranslationError>
    where
        O: ObjectStore + ?Sized,
    {
        let staged = stage_translations(objects, &self.index, &self.language)?;
        self.cached = None;
        let report = write_translations(self.store, &self.index, &self.language, &staged)?;
        debug!(language = %self.language, "session cache invalidated by update");
        Ok(report)
    }

    /// Deletes every stored record of the session entities in its language.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Store`] when the store write fails.
    pub fn discard(&mut self) -> Result<WriteReport, TranslationError> {
        self.cached = None;
        let report = discard_translations(self.store, &self.index, &self.language)?;
        debug!(language = %self.language, "session cache invalidated by discard");
        Ok(report)
    }
}
