// crates/glossa-core/tests/hierarchy.rs
// =============================================================================
// Module: Relation Hierarchy Tests
// Description: Path compilation, included flags, limits, and order independence.
// Purpose: Ensure relation paths compile into deterministic traversal trees.
// =============================================================================

//! ## Overview
//! Relation hierarchy tests for glossa-core.

#![allow(
    clippy::unwrap_used,
    clippy::cast_possible_truncation,
    reason = "Property tests unwrap generated inputs that are valid by construction."
)]

use glossa_core::HierarchyError;
use glossa_core::HierarchyLimits;
use glossa_core::RelationHierarchy;
use proptest::prelude::*;

type TestResult = Result<(), String>;

fn included(hierarchy: &RelationHierarchy, path: &[&str]) -> Option<bool> {
    let (last, prefix) = path.split_last()?;
    let mut level = hierarchy;
    for segment in prefix {
        level = level.get(segment)?.children();
    }
    level.get(last).map(glossa_core::HierarchyNode::included)
}

#[test]
fn single_path_marks_only_last_segment() -> TestResult {
    let hierarchy = RelationHierarchy::from_paths(["a.b.c"]).map_err(|err| err.to_string())?;
    assert_eq!(included(&hierarchy, &["a"]), Some(false));
    assert_eq!(included(&hierarchy, &["a", "b"]), Some(false));
    assert_eq!(included(&hierarchy, &["a", "b", "c"]), Some(true));
    assert_eq!(hierarchy.depth(), 3);
    Ok(())
}

#[test]
fn shared_prefixes_merge() -> TestResult {
    let hierarchy = RelationHierarchy::from_paths(["countries.cities", "countries.capital"])
        .map_err(|err| err.to_string())?;
    assert_eq!(hierarchy.len(), 1);
    let countries = hierarchy.get("countries").ok_or("missing countries")?;
    assert!(!countries.included());
    assert_eq!(countries.children().len(), 2);
    assert_eq!(
        hierarchy.included_paths(),
        vec!["countries.capital".to_string(), "countries.cities".to_string()]
    );
    Ok(())
}

#[test]
fn explicit_prefix_request_is_included() -> TestResult {
    let hierarchy = RelationHierarchy::from_paths(["countries.cities", "countries"])
        .map_err(|err| err.to_string())?;
    assert_eq!(included(&hierarchy, &["countries"]), Some(true));
    assert_eq!(included(&hierarchy, &["countries", "cities"]), Some(true));
    Ok(())
}

#[test]
fn zero_paths_yield_empty_tree() -> TestResult {
    let hierarchy =
        RelationHierarchy::from_paths(Vec::<String>::new()).map_err(|err| err.to_string())?;
    assert!(hierarchy.is_empty());
    assert_eq!(hierarchy.depth(), 0);
    Ok(())
}

#[test]
fn empty_segment_is_rejected() {
    let result = RelationHierarchy::from_paths(["countries", "countries..cities"]);
    assert_eq!(
        result,
        Err(HierarchyError::InvalidPath {
            path: "countries..cities".to_string()
        })
    );
}

#[test]
fn limits_bound_depth_and_count() {
    let limits = HierarchyLimits {
        max_paths: 2,
        max_depth: 2,
    };
    assert_eq!(
        RelationHierarchy::from_paths_with_limits(["a.b.c"], limits),
        Err(HierarchyError::TooDeep {
            path: "a.b.c".to_string(),
            depth: 3,
            max_depth: 2,
        })
    );
    assert_eq!(
        RelationHierarchy::from_paths_with_limits(["a", "b", "c"], limits),
        Err(HierarchyError::TooManyPaths {
            count: 3,
            max_paths: 2,
        })
    );
    assert!(RelationHierarchy::from_paths_with_limits(["a.b", "c"], limits).is_ok());
}

fn relation_path() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 1 .. 4)
        .prop_map(|segments| segments.join("."))
}

proptest! {
    #[test]
    fn hierarchy_is_independent_of_path_order(
        paths in prop::collection::vec(relation_path(), 0 .. 8).prop_shuffle(),
        seed in any::<u64>(),
    ) {
        let forward = RelationHierarchy::from_paths(&paths).unwrap();
        let mut reordered = paths.clone();
        let len = reordered.len();
        if len > 1 {
            let split = usize::try_from(seed % (len as u64)).unwrap();
            reordered.rotate_left(split);
        }
        reordered.reverse();
        let backward = RelationHierarchy::from_paths(&reordered).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn every_requested_path_is_included(
        paths in prop::collection::vec(relation_path(), 1 .. 8),
    ) {
        let hierarchy = RelationHierarchy::from_paths(&paths).unwrap();
        let included = hierarchy.included_paths();
        for path in &paths {
            prop_assert!(included.contains(path));
        }
        for path in &included {
            prop_assert!(paths.contains(path));
        }
    }
}
