// crates/glossa-core/src/core/entity.rs
// ============================================================================
// Module: Glossa Entity Capability
// Description: Static translatable-field and relation declarations per entity type.
// Purpose: Give the walker and overlay paths typed access without reflection.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! Host applications describe each entity type once by implementing
//! [`Model`]: its type identifier, its relations, and (for translatable
//! types) a fixed table of [`TranslatableField`] accessors, each a field
//! name plus a getter and a setter. The blanket [`Entity`] implementation
//! erases the concrete type so heterogeneous graphs can be walked through
//! `dyn Entity`.
//!
//! ## Invariants
//! - Field and relation tables are `'static`; they never change at runtime.
//! - A type without a field table is not translatable and may only be
//!   traversed, never included.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;

use crate::core::identifiers::EntityId;
use crate::core::identifiers::EntityRef;
use crate::core::identifiers::EntityType;

// ============================================================================
// SECTION: Field Accessors
// ============================================================================

/// Named accessor pair for one translatable text field of `T`.
///
/// # Invariants
/// - `get` and `set` address the same field.
pub struct TranslatableField<T> {
    /// Field name as stored in translation records.
    name: &'static str,
    /// Reads the current field value.
    get: fn(&T) -> &str,
    /// Overwrites the field value.
    set: fn(&mut T, String),
}

impl<T> TranslatableField<T> {
    /// Declares a translatable field.
    #[must_use]
    pub const fn new(name: &'static str, get: fn(&T) -> &str, set: fn(&mut T, String)) -> Self {
        Self {
            name,
            get,
            set,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the field from `entity`.
    pub fn read<'a>(&self, entity: &'a T) -> &'a str {
        (self.get)(entity)
    }

    /// Writes `text` into the field of `entity`.
    pub fn write(&self, entity: &mut T, text: String) {
        (self.set)(entity, text);
    }
}

impl<T> Clone for TranslatableField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TranslatableField<T> {}

impl<T> fmt::Debug for TranslatableField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatableField").field("name", &self.name).finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Relations
// ============================================================================

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// At most one related entity (foreign key, one-to-one).
    ToOne,
    /// Any number of related entities (reverse foreign key, many-to-many).
    ToMany,
}

/// Static declaration of a named relation.
///
/// # Invariants
/// - `target` is the entity type identifier of the related entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationSpec {
    /// Relation name used in relation paths.
    pub name: &'static str,
    /// Relation cardinality.
    pub kind: RelationKind,
    /// Entity type identifier of the related side.
    pub target: &'static str,
}

impl RelationSpec {
    /// Declares a to-one relation.
    #[must_use]
    pub const fn to_one(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            kind: RelationKind::ToOne,
            target,
        }
    }

    /// Declares a to-many relation.
    #[must_use]
    pub const fn to_many(name: &'static str, target: &'static str) -> Self {
        Self {
            name,
            kind: RelationKind::ToMany,
            target,
        }
    }
}

// ============================================================================
// SECTION: Model
// ============================================================================

/// Typed declaration implemented once per host entity type.
pub trait Model: Clone + 'static {
    /// Entity type identifier, unique across the application.
    const ENTITY_TYPE: &'static str;
    /// Relations the type exposes to relation paths.
    const RELATIONS: &'static [RelationSpec] = &[];
    /// Translatable fields; `None` marks the type as not translatable.
    const TRANSLATABLE_FIELDS: Option<&'static [TranslatableField<Self>]> = None;

    /// Returns the identity of this instance.
    fn id(&self) -> EntityId;
}

// ============================================================================
// SECTION: Entity
// ============================================================================

/// Type-erased view of a [`Model`] used by the walker and overlay paths.
pub trait Entity: Any {
    /// Returns the entity type identifier.
    fn entity_type(&self) -> EntityType;

    /// Returns the entity identity.
    fn entity_id(&self) -> EntityId;

    /// Returns the entity reference (type plus identity).
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.entity_type(), self.entity_id())
    }

    /// Returns true when the type declares translatable fields.
    fn is_translatable(&self) -> bool;

    /// Returns the declared translatable field names (empty when none).
    fn translatable_fields(&self) -> Vec<&'static str>;

    /// Reads a translatable field; `None` when the field is not translatable.
    fn field_text(&self, field: &str) -> Option<&str>;

    /// Writes a translatable field; returns false when it is not translatable.
    fn set_field_text(&mut self, field: &str, text: String) -> bool;

    /// Looks up a declared relation by name.
    fn relation(&self, name: &str) -> Option<RelationSpec>;

    /// Clones the entity behind a fresh box.
    fn clone_entity(&self) -> Box<dyn Entity>;

    /// Upcasts to [`Any`] for typed access.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to mutable [`Any`] for typed access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Model> Entity for T {
    fn entity_type(&self) -> EntityType {
        EntityType::new(T::ENTITY_TYPE)
    }

    fn entity_id(&self) -> EntityId {
        self.id()
    }

    fn is_translatable(&self) -> bool {
        T::TRANSLATABLE_FIELDS.is_some()
    }

    fn translatable_fields(&self) -> Vec<&'static str> {
        T::TRANSLATABLE_FIELDS
            .map(|fields| fields.iter().map(TranslatableField::name).collect())
            .unwrap_or_default()
    }

    fn field_text(&self, field: &str) -> Option<&str> {
        find_field::<T>(field).map(|accessor| accessor.read(self))
    }

    fn set_field_text(&mut self, field: &str, text: String) -> bool {
        match find_field::<T>(field) {
            Some(accessor) => {
                accessor.write(self, text);
                true
            }
            None => false,
        }
    }

    fn relation(&self, name: &str) -> Option<RelationSpec> {
        T::RELATIONS.iter().find(|relation| relation.name == name).copied()
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Finds the accessor for `field` in the field table of `T`.
fn find_field<T: Model>(field: &str) -> Option<&'static TranslatableField<T>> {
    T::TRANSLATABLE_FIELDS?.iter().find(|accessor| accessor.name() == field)
}
