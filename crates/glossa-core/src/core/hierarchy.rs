// crates/glossa-core/src/core/hierarchy.rs
// ============================================================================
// Module: Glossa Relation Hierarchy
// Description: Compiles dotted relation paths into a traversal tree.
// Purpose: Tell the graph walker which relations to follow and which to translate.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A relation path such as `countries.cities` asks for the `cities` of every
//! country of the root to be translated, and for `countries` to be traversed
//! on the way. [`RelationHierarchy::from_paths`] merges any number of paths
//! into one tree whose nodes record whether their entities are *included*
//! (translated) or merely traversed.
//!
//! ## Invariants
//! - A node is included iff at least one path terminates at it.
//! - Paths sharing a prefix share the prefix nodes.
//! - The result does not depend on path order.
//! - Malformed paths are rejected before the tree is modified.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator between relation names in a relation path.
pub const PATH_SEPARATOR: &str = ".";
/// Default maximum number of relation paths accepted per call.
pub const DEFAULT_MAX_RELATION_PATHS: usize = 64;
/// Default maximum number of segments in a single relation path.
pub const DEFAULT_MAX_RELATION_DEPTH: usize = 8;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Relation path parsing errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// Path contains an empty segment (including an empty path).
    #[error("`{path}` is not a valid relation path")]
    InvalidPath {
        /// Offending relation path.
        path: String,
    },
    /// Path exceeds the configured depth limit.
    #[error("relation path `{path}` exceeds depth limit ({depth} > {max_depth})")]
    TooDeep {
        /// Offending relation path.
        path: String,
        /// Segment count of the path.
        depth: usize,
        /// Configured limit.
        max_depth: usize,
    },
    /// Too many paths were supplied.
    #[error("too many relation paths ({count} > {max_paths})")]
    TooManyPaths {
        /// Number of supplied paths.
        count: usize,
        /// Configured limit.
        max_paths: usize,
    },
}

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Bounds applied while compiling relation paths.
///
/// # Invariants
/// - Both limits are inclusive upper bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyLimits {
    /// Maximum number of paths per hierarchy.
    pub max_paths: usize,
    /// Maximum number of segments per path.
    pub max_depth: usize,
}

impl Default for HierarchyLimits {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_RELATION_PATHS,
            max_depth: DEFAULT_MAX_RELATION_DEPTH,
        }
    }
}

// ============================================================================
// SECTION: Hierarchy Tree
// ============================================================================

/// Traversal tree keyed by relation name.
///
/// # Invariants
/// - Relation names are non-empty and contain no [`PATH_SEPARATOR`].
/// - Children iterate in name order, so walks are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationHierarchy {
    /// Child relations of this level.
    relations: BTreeMap<String, HierarchyNode>,
}

/// One relation in a [`RelationHierarchy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Whether entities reached through this relation are translated.
    included: bool,
    /// Relations to follow from the entities reached here.
    children: RelationHierarchy,
}

impl HierarchyNode {
    /// Returns true when entities at this node are translated.
    #[must_use]
    pub const fn included(&self) -> bool {
        self.included
    }

    /// Returns the nested relations of this node.
    #[must_use]
    pub const fn children(&self) -> &RelationHierarchy {
        &self.children
    }
}

impl RelationHierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles relation paths with the default limits.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError`] when a path is malformed or a limit is hit.
    pub fn from_paths<I, T>(paths: I) -> Result<Self, HierarchyError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self::from_paths_with_limits(paths, HierarchyLimits::default())
    }

    /// Compiles relation paths under explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError`] when a path is malformed or a limit is hit.
    pub fn from_paths_with_limits<I, T>(
        paths: I,
        limits: HierarchyLimits,
    ) -> Result<Self, HierarchyError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut hierarchy = Self::new();
        let mut count = 0_usize;
        for path in paths {
            count += 1;
            if count > limits.max_paths {
                return Err(HierarchyError::TooManyPaths {
                    count,
                    max_paths: limits.max_paths,
                });
            }
            hierarchy.add_path_with_limit(path.as_ref(), limits.max_depth)?;
        }
        Ok(hierarchy)
    }

    /// Adds one relation path, marking its last segment as included.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::InvalidPath`] when the path has an empty segment.
    pub fn add_path(&mut self, path: &str) -> Result<(), HierarchyError> {
        self.add_path_with_limit(path, usize::MAX)
    }

    /// Adds one relation path after validating it against `max_depth`.
    fn add_path_with_limit(&mut self, path: &str, max_depth: usize) -> Result<(), HierarchyError> {
        let segments = parse_path(path)?;
        if segments.len() > max_depth {
            return Err(HierarchyError::TooDeep {
                path: path.to_string(),
                depth: segments.len(),
                max_depth,
            });
        }
        let mut level = self;
        let mut node = None;
        for segment in segments {
            let entry = level.relations.entry(segment.to_string()).or_default();
            level = &mut entry.children;
            node = Some(&mut entry.included);
        }
        if let Some(included) = node {
            *included = true;
        }
        Ok(())
    }

    /// Returns true when no relations are requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Returns the number of relations at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Returns the node for `relation` at this level.
    #[must_use]
    pub fn get(&self, relation: &str) -> Option<&HierarchyNode> {
        self.relations.get(relation)
    }

    /// Iterates relations at this level in name order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.relations.iter(),
        }
    }

    /// Returns the depth of the deepest path (zero when empty).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relations.values().map(|node| 1 + node.children.depth()).max().unwrap_or(0)
    }

    /// Returns every included path in canonical (sorted, dotted) form.
    #[must_use]
    pub fn included_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths
    }

    /// Appends included paths below `prefix` to `paths`.
    fn collect_paths(&self, prefix: &str, paths: &mut Vec<String>) {
        for (name, node) in &self.relations {
            let path = join_path(prefix, name);
            if node.included {
                paths.push(path.clone());
            }
            node.children.collect_paths(&path, paths);
        }
    }
}

impl<'a> IntoIterator for &'a RelationHierarchy {
    type IntoIter = Iter<'a>;
    type Item = (&'a str, &'a HierarchyNode);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over one level of a [`RelationHierarchy`].
pub struct Iter<'a> {
    /// Underlying map iterator.
    inner: btree_map::Iter<'a, String, HierarchyNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, node)| (name.as_str(), node))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Splits a relation path into validated segments.
fn parse_path(path: &str) -> Result<Vec<&str>, HierarchyError> {
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(HierarchyError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// Joins a relation name onto a dotted prefix.
#[must_use]
pub fn join_path(prefix: &str, relation: &str) -> String {
    if prefix.is_empty() {
        relation.to_string()
    } else {
        format!("{prefix}{PATH_SEPARATOR}{relation}")
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
