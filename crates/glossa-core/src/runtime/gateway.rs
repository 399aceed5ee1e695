// crates/glossa-core/src/runtime/gateway.rs
// ============================================================================
// Module: Glossa Translation Store Gateway
// Description: Single bulk lookup of translation records for an instance index.
// Purpose: Keep store round-trips constant in graph depth and breadth.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! One call issues at most one [`TranslationStore::query`]: a disjunctive
//! filter over every (type, identity) pair in the index. An empty index
//! issues none.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;

use crate::core::index::InstanceIndex;
use crate::core::language::LanguageTag;
use crate::core::record::TranslationRecord;
use crate::interfaces::StoreError;
use crate::interfaces::TranslationStore;

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Fetches every stored record for the indexed entities in `language`.
///
/// # Errors
///
/// Returns [`StoreError`] from the store unchanged.
pub fn fetch_translations<S>(
    store: &S,
    index: &InstanceIndex,
    language: &LanguageTag,
) -> Result<Vec<TranslationRecord>, StoreError>
where
    S: TranslationStore + ?Sized,
{
    if index.is_empty() {
        return Ok(Vec::new());
    }
    let filter = index.filter(language.clone());
    let records = store.query(&filter)?;
    debug!(
        language = %language,
        pairs = filter.pair_count(),
        records = records.len(),
        "fetched translations"
    );
    Ok(records)
}
