// crates/glossa-core/src/runtime/walker.rs
// ============================================================================
// Module: Glossa Entity Graph Walker
// Description: Hierarchy-driven traversal of live entity graphs.
// Purpose: Build the instance index that every overlay and write goes through.
// Dependencies: crate::{core, interfaces, runtime}, tracing
// ============================================================================

//! ## Overview
//! [`build_index`] walks a [`Context`] along a [`RelationHierarchy`]. Roots
//! are included; every other entity is included iff its hierarchy node is.
//! Traversal continues below non-included nodes, and relations absent from
//! the hierarchy are never followed, so cyclic graphs terminate.
//!
//! ## Invariants
//! - Included entities of non-translatable types abort the walk.
//! - Unknown relations abort the walk whether or not they hold values.
//! - Under [`PrefetchPolicy::Strict`], an unloaded to-many relation aborts
//!   the walk before it is resolved.
//! - Errors discard the partial index.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::entity::RelationKind;
use crate::core::hierarchy::RelationHierarchy;
use crate::core::hierarchy::join_path;
use crate::core::identifiers::EntityHandle;
use crate::core::identifiers::EntityRef;
use crate::core::identifiers::EntityType;
use crate::core::index::InstanceIndex;
use crate::interfaces::ObjectStore;
use crate::runtime::error::TranslationError;

// ============================================================================
// SECTION: Context
// ============================================================================

/// Root of a translation call: one entity or a homogeneous collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Single entity.
    Single(EntityHandle),
    /// Collection of entities of one type; may be empty.
    Collection(Vec<EntityHandle>),
}

/// Shape of a validated [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Context is a single entity.
    Single,
    /// Context is a collection.
    Collection,
}

/// Result of [`Context::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    /// Context shape.
    pub kind: ContextKind,
    /// Entity type of the roots; `None` for an empty collection.
    pub entity_type: Option<EntityType>,
}

impl Context {
    /// Returns the root handles.
    #[must_use]
    pub fn handles(&self) -> &[EntityHandle] {
        match self {
            Self::Single(handle) => std::slice::from_ref(handle),
            Self::Collection(handles) => handles,
        }
    }

    /// Returns true for an empty collection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles().is_empty()
    }

    /// Validates the context against `objects` and reports its shape.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::InvalidContext`] for heterogeneous
    /// collections and [`TranslationError::ObjectStore`] for dead handles.
    pub fn validate<O>(&self, objects: &O) -> Result<ContextInfo, TranslationError>
    where
        O: ObjectStore + ?Sized,
    {
        match self {
            Self::Single(handle) => Ok(ContextInfo {
                kind: ContextKind::Single,
                entity_type: Some(objects.entity(*handle)?.entity_type()),
            }),
            Self::Collection(handles) => {
                let mut entity_type: Option<EntityType> = None;
                for handle in handles {
                    let current = objects.entity(*handle)?.entity_type();
                    match &entity_type {
                        None => entity_type = Some(current),
                        Some(expected) if *expected != current => {
                            return Err(TranslationError::InvalidContext {
                                reason: format!("collection mixes `{expected}` and `{current}`"),
                            });
                        }
                        Some(_) => {}
                    }
                }
                Ok(ContextInfo {
                    kind: ContextKind::Collection,
                    entity_type,
                })
            }
        }
    }
}

impl From<EntityHandle> for Context {
    fn from(handle: EntityHandle) -> Self {
        Self::Single(handle)
    }
}

impl From<Vec<EntityHandle>> for Context {
    fn from(handles: Vec<EntityHandle>) -> Self {
        Self::Collection(handles)
    }
}

// ============================================================================
// SECTION: Prefetch Policy
// ============================================================================

/// How to-many relations that are not loaded yet are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefetchPolicy {
    /// Load them on demand.
    #[default]
    Lazy,
    /// Reject them; callers must prefetch before the walk.
    Strict,
}

// ============================================================================
// SECTION: Walker
// ============================================================================

/// Walks `context` along `hierarchy` and indexes every included entity.
///
/// # Errors
///
/// Returns [`TranslationError`] when the context is invalid, an included
/// type is not translatable, a relation is unknown or (under
/// [`PrefetchPolicy::Strict`]) not prefetched, or the object store fails.
pub fn build_index<O>(
    objects: &mut O,
    context: &Context,
    hierarchy: &RelationHierarchy,
    policy: PrefetchPolicy,
) -> Result<InstanceIndex, TranslationError>
where
    O: ObjectStore + ?Sized,
{
    let info = context.validate(objects)?;
    let Some(root_type) = info.entity_type else {
        debug!("empty translation context; nothing to index");
        return Ok(InstanceIndex::new());
    };
    let mut walker = GraphWalker {
        objects,
        policy,
        index: InstanceIndex::new(),
        visited: BTreeSet::new(),
    };
    for handle in context.handles() {
        walker.visit(*handle, hierarchy, true, "")?;
    }
    let index = walker.index;
    debug!(
        root_type = %root_type,
        roots = context.handles().len(),
        entities = index.len(),
        types = index.type_count(),
        "built instance index"
    );
    Ok(index)
}

/// Traversal state for one [`build_index`] call.
struct GraphWalker<'a, O: ?Sized> {
    /// Object store being walked.
    objects: &'a mut O,
    /// Treatment of unloaded to-many relations.
    policy: PrefetchPolicy,
    /// Index under construction.
    index: InstanceIndex,
    /// Entities already visited at a given relation path.
    visited: BTreeSet<(EntityRef, String)>,
}

impl<O: ObjectStore + ?Sized> GraphWalker<'_, O> {
    /// Visits one entity reached at `path` and descends into `relations`.
    fn visit(
        &mut self,
        handle: EntityHandle,
        relations: &RelationHierarchy,
        included: bool,
        path: &str,
    ) -> Result<(), TranslationError> {
        let (entity, translatable, children) = {
            let entity = self.objects.entity(handle)?;
            let children: Vec<_> = relations
                .iter()
                .map(|(name, node)| (name, node, entity.relation(name)))
                .collect();
            (entity.entity_ref(), entity.is_translatable(), children)
        };
        if !self.visited.insert((entity.clone(), path.to_string())) {
            return Ok(());
        }
        if included {
            if !translatable {
                return Err(TranslationError::NotTranslatable {
                    entity_type: entity.entity_type,
                    path: path.to_string(),
                });
            }
            self.index.insert(entity.clone(), handle);
        }
        for (name, node, spec) in children {
            let Some(spec) = spec else {
                return Err(TranslationError::UnknownRelation {
                    entity_type: entity.entity_type,
                    relation: name.to_string(),
                    path: path.to_string(),
                });
            };
            if spec.kind == RelationKind::ToMany
                && self.policy == PrefetchPolicy::Strict
                && !self.objects.is_prefetched(handle, name)?
            {
                return Err(TranslationError::UnprefetchedRelation {
                    entity,
                    relation: name.to_string(),
                    path: path.to_string(),
                });
            }
            let child_path = join_path(path, name);
            for child in self.objects.related(handle, name)?.into_handles() {
                self.visit(child, node.children(), node.included(), &child_path)?;
            }
        }
        Ok(())
    }
}
