// crates/glossa-core/src/runtime/graph.rs
// ============================================================================
// Module: Glossa In-Memory Entity Graph
// Description: Identity-mapped object store with lazy and prefetched relations.
// Purpose: Reference ObjectStore for tests and for hosts without an ORM.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`EntityGraph`] separates persisted rows from live instances. Rows are
//! written by [`EntityGraph::insert`] and [`EntityGraph::save`]; relation
//! links are declared with [`EntityGraph::link`]. Loading a row
//! materializes a live instance in an arena slot, and the identity map
//! guarantees one live slot per (type, identity), so entities reachable
//! along several relation paths alias the same instance.
//!
//! Relations are cached per owner once resolved. [`EntityGraph::prefetch`]
//! resolves them ahead of time; [`ObjectStore::related`] resolves them on
//! demand and counts the lazy load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use crate::core::entity::Entity;
use crate::core::entity::Model;
use crate::core::entity::RelationKind;
use crate::core::hierarchy::PATH_SEPARATOR;
use crate::core::identifiers::EntityHandle;
use crate::core::identifiers::EntityRef;
use crate::core::identifiers::EntityType;
use crate::interfaces::ObjectStore;
use crate::interfaces::ObjectStoreError;
use crate::interfaces::Related;

// ============================================================================
// SECTION: Entity Graph
// ============================================================================

/// In-memory object store.
///
/// # Invariants
/// - At most one live slot exists per (type, identity).
/// - Slots are never freed; handles stay valid for the graph's lifetime.
/// - Link targets always name an inserted row.
#[derive(Default)]
pub struct EntityGraph {
    /// Persisted rows.
    rows: BTreeMap<EntityRef, Box<dyn Entity>>,
    /// Persisted relation links keyed by (owner, relation).
    links: BTreeMap<(EntityRef, String), Vec<EntityRef>>,
    /// Live instances.
    slots: Vec<Box<dyn Entity>>,
    /// Identity map from entity to live slot.
    identity: BTreeMap<EntityRef, EntityHandle>,
    /// Resolved relations keyed by (owner, relation).
    loaded: BTreeMap<(EntityHandle, String), Related>,
    /// Relations resolved on demand.
    lazy_loads: usize,
}

impl fmt::Debug for EntityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityGraph")
            .field("rows", &self.rows.len())
            .field("links", &self.links.len())
            .field("live", &self.slots.len())
            .field("loaded_relations", &self.loaded.len())
            .field("lazy_loads", &self.lazy_loads)
            .finish()
    }
}

impl EntityGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists `entity` as a row, replacing any row with the same identity.
    pub fn insert<T: Model>(&mut self, entity: T) -> EntityRef {
        let entity_ref = entity.entity_ref();
        self.rows.insert(entity_ref.clone(), Box::new(entity));
        entity_ref
    }

    /// Persists a link from `owner` to `target` through `relation`.
    ///
    /// To-one relations keep only the latest target.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when either row is missing, the relation
    /// is unknown, or `target` has the wrong type.
    pub fn link(
        &mut self,
        owner: &EntityRef,
        relation: &str,
        target: &EntityRef,
    ) -> Result<(), ObjectStoreError> {
        let row = self.rows.get(owner).ok_or_else(|| missing_row(owner))?;
        let spec = row.relation(relation).ok_or_else(|| ObjectStoreError::UnknownRelation {
            entity_type: owner.entity_type.clone(),
            relation: relation.to_string(),
        })?;
        if !self.rows.contains_key(target) {
            return Err(missing_row(target));
        }
        if target.entity_type.as_str() != spec.target {
            return Err(ObjectStoreError::TypeMismatch {
                entity: target.clone(),
                expected: spec.target.to_string(),
            });
        }
        let targets = self.links.entry((owner.clone(), relation.to_string())).or_default();
        match spec.kind {
            RelationKind::ToOne => {
                targets.clear();
                targets.push(target.clone());
            }
            RelationKind::ToMany => {
                if !targets.contains(target) {
                    targets.push(target.clone());
                }
            }
        }
        Ok(())
    }

    /// Returns the live handle of `entity` when it is loaded.
    #[must_use]
    pub fn handle(&self, entity: &EntityRef) -> Option<EntityHandle> {
        self.identity.get(entity).copied()
    }

    /// Borrows a live entity as its concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] for dead handles or a type mismatch.
    pub fn get<T: Model>(&self, handle: EntityHandle) -> Result<&T, ObjectStoreError> {
        let entity = self.slot(handle)?;
        entity.as_any().downcast_ref::<T>().ok_or_else(|| type_mismatch::<T>(entity))
    }

    /// Mutably borrows a live entity as its concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] for dead handles or a type mismatch.
    pub fn get_mut<T: Model>(&mut self, handle: EntityHandle) -> Result<&mut T, ObjectStoreError> {
        let entity = self
            .slots
            .get_mut(handle.slot())
            .ok_or(ObjectStoreError::MissingHandle {
                handle,
            })?;
        let entity_ref = entity.entity_ref();
        entity.as_any_mut().downcast_mut::<T>().ok_or_else(|| ObjectStoreError::TypeMismatch {
            entity: entity_ref,
            expected: T::ENTITY_TYPE.to_string(),
        })
    }

    /// Returns the persisted row of `entity` as its concrete type.
    #[must_use]
    pub fn stored<T: Model>(&self, entity: &EntityRef) -> Option<&T> {
        self.rows.get(entity).and_then(|row| row.as_any().downcast_ref::<T>())
    }

    /// Writes the live instance behind `handle` back to its row.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::MissingHandle`] for dead handles.
    pub fn save(&mut self, handle: EntityHandle) -> Result<(), ObjectStoreError> {
        let (entity_ref, row) = {
            let entity = self.slot(handle)?;
            (entity.entity_ref(), entity.clone_entity())
        };
        self.rows.insert(entity_ref, row);
        Ok(())
    }

    /// Resolves and caches `relation` of `owner` without counting a lazy load.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when the relation cannot be resolved.
    pub fn prefetch(
        &mut self,
        owner: EntityHandle,
        relation: &str,
    ) -> Result<Related, ObjectStoreError> {
        let key = (owner, relation.to_string());
        if let Some(related) = self.loaded.get(&key) {
            return Ok(related.clone());
        }
        let related = self.resolve(owner, relation)?;
        self.loaded.insert(key, related.clone());
        Ok(related)
    }

    /// Prefetches every relation along a dotted `path`, starting at `roots`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError`] when a relation cannot be resolved.
    pub fn prefetch_path(
        &mut self,
        roots: &[EntityHandle],
        path: &str,
    ) -> Result<(), ObjectStoreError> {
        let mut level = roots.to_vec();
        for relation in path.split(PATH_SEPARATOR) {
            let mut next = Vec::new();
            for owner in level {
                next.extend(self.prefetch(owner, relation)?.into_handles());
            }
            level = next;
        }
        Ok(())
    }

    /// Returns the number of relations resolved on demand.
    #[must_use]
    pub const fn lazy_loads(&self) -> usize {
        self.lazy_loads
    }

    /// Returns the number of live instances.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.len()
    }

    /// Borrows a live slot.
    fn slot(&self, handle: EntityHandle) -> Result<&dyn Entity, ObjectStoreError> {
        match self.slots.get(handle.slot()) {
            Some(entity) => Ok(entity.as_ref()),
            None => Err(ObjectStoreError::MissingHandle {
                handle,
            }),
        }
    }

    /// Materializes `entity` into a live slot unless it is live already.
    fn materialize(&mut self, entity: &EntityRef) -> Option<EntityHandle> {
        if let Some(handle) = self.identity.get(entity) {
            return Some(*handle);
        }
        let instance = self.rows.get(entity)?.clone_entity();
        let handle = EntityHandle::new(self.slots.len());
        self.slots.push(instance);
        self.identity.insert(entity.clone(), handle);
        Some(handle)
    }

    /// Resolves `relation` of `owner` from the persisted links.
    fn resolve(
        &mut self,
        owner: EntityHandle,
        relation: &str,
    ) -> Result<Related, ObjectStoreError> {
        let (owner_ref, spec) = {
            let entity = self.slot(owner)?;
            let spec = entity.relation(relation).ok_or_else(|| {
                ObjectStoreError::UnknownRelation {
                    entity_type: entity.entity_type(),
                    relation: relation.to_string(),
                }
            })?;
            (entity.entity_ref(), spec)
        };
        let targets =
            self.links.get(&(owner_ref, relation.to_string())).cloned().unwrap_or_default();
        let mut handles = Vec::with_capacity(targets.len());
        for target in &targets {
            handles.push(self.materialize(target).ok_or_else(|| missing_row(target))?);
        }
        Ok(match spec.kind {
            RelationKind::ToOne => Related::One(handles.first().copied()),
            RelationKind::ToMany => Related::Many(handles),
        })
    }
}

impl ObjectStore for EntityGraph {
    fn entity(&self, handle: EntityHandle) -> Result<&dyn Entity, ObjectStoreError> {
        self.slot(handle)
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut dyn Entity, ObjectStoreError> {
        match self.slots.get_mut(handle.slot()) {
            Some(entity) => Ok(entity.as_mut()),
            None => Err(ObjectStoreError::MissingHandle {
                handle,
            }),
        }
    }

    fn load(&mut self, entity: &EntityRef) -> Result<Option<EntityHandle>, ObjectStoreError> {
        Ok(self.materialize(entity))
    }

    fn load_by_filter(
        &mut self,
        entity_type: &EntityType,
        filter: &dyn Fn(&dyn Entity) -> bool,
    ) -> Result<Vec<EntityHandle>, ObjectStoreError> {
        let matches: Vec<EntityRef> = self
            .rows
            .iter()
            .filter(|(entity, row)| entity.entity_type == *entity_type && filter(row.as_ref()))
            .map(|(entity, _)| entity.clone())
            .collect();
        let mut handles = Vec::with_capacity(matches.len());
        for entity in &matches {
            handles.push(self.materialize(entity).ok_or_else(|| missing_row(entity))?);
        }
        Ok(handles)
    }

    fn related(
        &mut self,
        owner: EntityHandle,
        relation: &str,
    ) -> Result<Related, ObjectStoreError> {
        let key = (owner, relation.to_string());
        if let Some(related) = self.loaded.get(&key) {
            return Ok(related.clone());
        }
        let related = self.resolve(owner, relation)?;
        self.lazy_loads += 1;
        self.loaded.insert(key, related.clone());
        Ok(related)
    }

    fn is_prefetched(&self, owner: EntityHandle, relation: &str) -> Result<bool, ObjectStoreError> {
        let entity = self.slot(owner)?;
        if entity.relation(relation).is_none() {
            return Err(ObjectStoreError::UnknownRelation {
                entity_type: entity.entity_type(),
                relation: relation.to_string(),
            });
        }
        Ok(self.loaded.contains_key(&(owner, relation.to_string())))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Error for a reference without a persisted row.
fn missing_row(entity: &EntityRef) -> ObjectStoreError {
    ObjectStoreError::Store(format!("no stored row for {entity}"))
}

/// Error for a live entity that is not a `T`.
fn type_mismatch<T: Model>(entity: &dyn Entity) -> ObjectStoreError {
    ObjectStoreError::TypeMismatch {
        entity: entity.entity_ref(),
        expected: T::ENTITY_TYPE.to_string(),
    }
}
