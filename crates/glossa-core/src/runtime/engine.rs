// crates/glossa-core/src/runtime/engine.rs
// ============================================================================
// Module: Glossa Translator
// Description: Public read, write, and session entry points.
// Purpose: Sequence language resolution, hierarchy compilation, walk, and I/O.
// Dependencies: crate::{core, interfaces, runtime}, tracing
// ============================================================================

//! ## Overview
//! [`Translator`] is the single canonical execution path. Every entry point
//! resolves the language first, compiles the relation paths second, and only
//! then touches the object graph or the translation store, so malformed
//! input never causes partial work.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;

use crate::core::hierarchy::HierarchyLimits;
use crate::core::hierarchy::RelationHierarchy;
use crate::core::index::InstanceIndex;
use crate::core::language::LanguageRegistry;
use crate::core::language::LanguageTag;
use crate::core::record::TranslationRecord;
use crate::interfaces::ObjectStore;
use crate::interfaces::TranslationStore;
use crate::runtime::error::TranslationError;
use crate::runtime::gateway::fetch_translations;
use crate::runtime::overlay::OverlayReport;
use crate::runtime::overlay::WriteReport;
use crate::runtime::overlay::apply_translations;
use crate::runtime::overlay::stage_translations;
use crate::runtime::overlay::write_translations;
use crate::runtime::session::TranslationSession;
use crate::runtime::walker::Context;
use crate::runtime::walker::PrefetchPolicy;
use crate::runtime::walker::build_index;

// ============================================================================
// SECTION: Translator Configuration
// ============================================================================

/// Configuration for the [`Translator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Prefetch policy for read-path walks; writes are always strict.
    pub read_prefetch: PrefetchPolicy,
    /// Bounds on relation paths per call.
    pub limits: HierarchyLimits,
}

// ============================================================================
// SECTION: Translator
// ============================================================================

/// Translation overlay engine bound to one translation store.
#[derive(Debug)]
pub struct Translator<S> {
    /// Translation store implementation.
    store: S,
    /// Supported languages and the process default.
    languages: LanguageRegistry,
    /// Translator configuration.
    config: TranslatorConfig,
}

impl<S> Translator<S>
where
    S: TranslationStore,
{
    /// Creates a translator.
    #[must_use]
    pub const fn new(store: S, languages: LanguageRegistry, config: TranslatorConfig) -> Self {
        Self {
            store,
            languages,
            config,
        }
    }

    /// Returns the translation store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the language registry.
    #[must_use]
    pub const fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    /// Returns the translator configuration.
    #[must_use]
    pub const fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Overlays stored translations onto `context` and the entities reached
    /// through `paths`, in place.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] when the language, paths, context, or
    /// graph are invalid, or when a store fails.
    pub fn apply<O, I, T>(
        &self,
        objects: &mut O,
        context: &Context,
        paths: I,
        language: Option<&str>,
    ) -> Result<OverlayReport, TranslationError>
    where
        O: ObjectStore + ?Sized,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let (language, index) =
            self.prepare(objects, context, paths, language, self.config.read_prefetch)?;
        let records = fetch_translations(&self.store, &index, &language)?;
        apply_translations(objects, &index, &records)
    }

    /// Replaces stored translations in the language with the current field
    /// values of `context` and the entities reached through `paths`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] when validation or the walk fails (the
    /// store is untouched) or when the atomic replacement fails (the store
    /// is rolled back).
    pub fn update<O, I, T>(
        &self,
        objects: &mut O,
        context: &Context,
        paths: I,
        language: Option<&str>,
    ) -> Result<WriteReport, TranslationError>
    where
        O: ObjectStore + ?Sized,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let (language, index) =
            self.prepare(objects, context, paths, language, PrefetchPolicy::Strict)?;
        let staged = stage_translations(objects, &index, &language)?;
        Ok(write_translations(&self.store, &index, &language, &staged)?)
    }

    /// Returns the stored translations for `context` and `paths` without
    /// applying them.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] as for [`Self::apply`].
    pub fn translations<O, I, T>(
        &self,
        objects: &mut O,
        context: &Context,
        paths: I,
        language: Option<&str>,
    ) -> Result<Vec<TranslationRecord>, TranslationError>
    where
        O: ObjectStore + ?Sized,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let (language, index) =
            self.prepare(objects, context, paths, language, self.config.read_prefetch)?;
        Ok(fetch_translations(&self.store, &index, &language)?)
    }

    /// Opens a session over `context` and `paths`; the walk is strict.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] when validation or the walk fails.
    pub fn session<O, I, T>(
        &self,
        objects: &mut O,
        context: &Context,
        paths: I,
        language: Option<&str>,
    ) -> Result<TranslationSession<'_, S>, TranslationError>
    where
        O: ObjectStore + ?Sized,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let (language, index) =
            self.prepare(objects, context, paths, language, PrefetchPolicy::Strict)?;
        Ok(TranslationSession::new(&self.store, language, index))
    }

    /// Resolves the language, compiles the paths, and builds the index.
    fn prepare<O, I, T>(
        &self,
        objects: &mut O,
        context: &Context,
        paths: I,
        language: Option<&str>,
        policy: PrefetchPolicy,
    ) -> Result<(LanguageTag, InstanceIndex), TranslationError>
    where
        O: ObjectStore + ?Sized,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let language = self.languages.resolve(language)?;
        let hierarchy = RelationHierarchy::from_paths_with_limits(paths, self.config.limits)?;
        debug!(
            language = %language,
            relations = hierarchy.len(),
            depth = hierarchy.depth(),
            strict = policy == PrefetchPolicy::Strict,
            "preparing translation"
        );
        let index = build_index(objects, context, &hierarchy, policy)?;
        Ok((language, index))
    }
}
