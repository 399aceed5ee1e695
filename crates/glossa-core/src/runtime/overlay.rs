// crates/glossa-core/src/runtime/overlay.rs
// ============================================================================
// Module: Glossa Overlay
// Description: Applies records onto live entities and replaces stored records.
// Purpose: Implement the read-path overlay and the transactional write path.
// Dependencies: crate::{core, interfaces, runtime}, tracing
// ============================================================================

//! ## Overview
//! Read path: [`apply_translations`] routes each record to its owner through
//! the instance index and overwrites the named field. Fields without a
//! record keep their base value.
//!
//! Write path: [`stage_translations`] reads every non-empty translatable
//! field off the indexed entities, and [`write_translations`] swaps the
//! stored records for exactly that staged set inside one atomic unit.
//!
//! ## Invariants
//! - After a successful write, the stored records for the indexed entities
//!   in the language equal the staged set; other records are untouched.
//! - An empty index never reaches the store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::debug;
use tracing::info;

use crate::core::index::InstanceIndex;
use crate::core::language::LanguageTag;
use crate::core::record::TranslationRecord;
use crate::interfaces::ObjectStore;
use crate::interfaces::StoreError;
use crate::interfaces::TranslationStore;
use crate::runtime::error::TranslationError;

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Outcome of [`apply_translations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayReport {
    /// Records written onto an entity field.
    pub applied: usize,
    /// Records without an indexed owner, translatable field, or text.
    pub skipped: usize,
}

/// Outcome of [`write_translations`] and [`discard_translations`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Records removed from the store.
    pub deleted: usize,
    /// Records inserted into the store.
    pub inserted: usize,
}

// ============================================================================
// SECTION: Read Path
// ============================================================================

/// Overlays `records` onto the entities in `index`.
///
/// # Errors
///
/// Returns [`TranslationError::ObjectStore`] when an indexed handle is dead.
pub fn apply_translations<O>(
    objects: &mut O,
    index: &InstanceIndex,
    records: &[TranslationRecord],
) -> Result<OverlayReport, TranslationError>
where
    O: ObjectStore + ?Sized,
{
    let mut report = OverlayReport::default();
    for record in records {
        let owner = index.get(&record.entity_type, &record.entity_id);
        let Some(handle) = owner.filter(|_| !record.text.is_empty()) else {
            report.skipped += 1;
            continue;
        };
        if objects.entity_mut(handle)?.set_field_text(&record.field, record.text.clone()) {
            report.applied += 1;
        } else {
            report.skipped += 1;
        }
    }
    debug!(applied = report.applied, skipped = report.skipped, "applied translations");
    Ok(report)
}

// ============================================================================
// SECTION: Write Path
// ============================================================================

/// Extracts records for every non-empty translatable field in `index`.
///
/// # Errors
///
/// Returns [`TranslationError::ObjectStore`] when an indexed handle is dead.
pub fn stage_translations<O>(
    objects: &O,
    index: &InstanceIndex,
    language: &LanguageTag,
) -> Result<Vec<TranslationRecord>, TranslationError>
where
    O: ObjectStore + ?Sized,
{
    let mut staged = Vec::new();
    for (owner, handle) in index.iter() {
        let entity = objects.entity(handle)?;
        for field in entity.translatable_fields() {
            match entity.field_text(field) {
                Some(text) if !text.is_empty() => {
                    staged.push(TranslationRecord::new(&owner, field, language.clone(), text));
                }
                _ => {}
            }
        }
    }
    Ok(staged)
}

/// Replaces the stored records of the indexed entities in `language` with
/// `staged`, atomically.
///
/// # Errors
///
/// Returns [`StoreError`] unchanged; the store rolls the unit back.
pub fn write_translations<S>(
    store: &S,
    index: &InstanceIndex,
    language: &LanguageTag,
    staged: &[TranslationRecord],
) -> Result<WriteReport, StoreError>
where
    S: TranslationStore + ?Sized,
{
    if index.is_empty() {
        return Ok(WriteReport::default());
    }
    let filter = index.filter(language.clone());
    let mut report = WriteReport::default();
    store.atomically(&mut |writer| {
        let existing = writer.query(&filter)?;
        report.deleted = writer.bulk_delete(&existing)?;
        report.inserted = writer.bulk_insert(staged)?;
        Ok(())
    })?;
    info!(
        language = %language,
        entities = index.len(),
        deleted = report.deleted,
        inserted = report.inserted,
        "replaced translations"
    );
    Ok(report)
}

/// Deletes every stored record of the indexed entities in `language`.
///
/// # Errors
///
/// Returns [`StoreError`] unchanged; the store rolls the unit back.
pub fn discard_translations<S>(
    store: &S,
    index: &InstanceIndex,
    language: &LanguageTag,
) -> Result<WriteReport, StoreError>
where
    S: TranslationStore + ?Sized,
{
    if index.is_empty() {
        return Ok(WriteReport::default());
    }
    let filter = index.filter(language.clone());
    let mut report = WriteReport::default();
    store.atomically(&mut |writer| {
        let existing = writer.query(&filter)?;
        report.deleted = writer.bulk_delete(&existing)?;
        Ok(())
    })?;
    info!(
        language = %language,
        entities = index.len(),
        deleted = report.deleted,
        "discarded translations"
    );
    Ok(report)
}
