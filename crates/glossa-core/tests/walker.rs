// crates/glossa-core/tests/walker.rs
// =============================================================================
// Module: Entity Graph Walker Tests
// Description: Instance index construction over the places fixture graph.
// Purpose: Ensure walks index each included entity once and fail closed.
// =============================================================================

//! ## Overview
//! Entity graph walker tests for glossa-core.

use glossa_core::Context;
use glossa_core::ContextKind;
use glossa_core::Entity;
use glossa_core::EntityId;
use glossa_core::EntityRef;
use glossa_core::EntityType;
use glossa_core::InstanceIndex;
use glossa_core::ObjectStore;
use glossa_core::PrefetchPolicy;
use glossa_core::RelationHierarchy;
use glossa_core::TranslationError;
use glossa_core::runtime::build_index;

mod common;

use common::CITY;
use common::CONTINENT;
use common::COUNTRY;
use common::Country;
use common::Places;
use common::TIMEZONE;

type TestResult = Result<(), String>;

fn walk(
    places: &mut Places,
    context: &Context,
    paths: &[&str],
    policy: PrefetchPolicy,
) -> Result<InstanceIndex, TranslationError> {
    let hierarchy = RelationHierarchy::from_paths(paths)?;
    build_index(&mut places.graph, context, &hierarchy, policy)
}

fn ids(index: &InstanceIndex, entity_type: &str) -> Vec<String> {
    let mut ids: Vec<String> =
        index.ids(&EntityType::new(entity_type)).into_iter().map(EntityId::to_string).collect();
    ids.sort_by_key(|id| id.parse::<u64>().unwrap_or(u64::MAX));
    ids
}

#[test]
fn root_and_requested_children_are_indexed() -> TestResult {
    let mut places = common::places()?;
    let europe = places.load(&places.europe.clone())?;
    let index = walk(&mut places, &Context::Single(europe), &["countries"], PrefetchPolicy::Lazy)
        .map_err(|err| err.to_string())?;
    assert_eq!(index.type_count(), 2);
    assert_eq!(ids(&index, CONTINENT), vec!["1"]);
    assert_eq!(ids(&index, COUNTRY), vec!["9", "10"]);
    assert_eq!(index.lookup(&places.europe), Some(europe));
    Ok(())
}

#[test]
fn entity_reached_along_two_paths_is_indexed_once() -> TestResult {
    let mut places = common::places()?;
    let europe = places.load(&places.europe.clone())?;
    let index = walk(
        &mut places,
        &Context::Single(europe),
        &["countries.cities", "countries.capital"],
        PrefetchPolicy::Lazy,
    )
    .map_err(|err| err.to_string())?;
    assert_eq!(ids(&index, CITY), vec!["100", "101", "102"]);
    assert_eq!(ids(&index, COUNTRY), Vec::<String>::new());
    assert_eq!(index.len(), 4);
    let berlin = places.graph.handle(&places.berlin).ok_or("berlin not live")?;
    assert_eq!(index.lookup(&places.berlin), Some(berlin));
    Ok(())
}

#[test]
fn indexing_is_idempotent_across_repeated_walks() -> TestResult {
    let mut places = common::places()?;
    let europe = places.load(&places.europe.clone())?;
    let paths = ["countries", "countries.cities", "countries.capital"];
    let first = walk(&mut places, &Context::Single(europe), &paths, PrefetchPolicy::Lazy)
        .map_err(|err| err.to_string())?;
    let second = walk(&mut places, &Context::Single(europe), &paths, PrefetchPolicy::Lazy)
        .map_err(|err| err.to_string())?;
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
    Ok(())
}

#[test]
fn including_non_translatable_type_fails() -> TestResult {
    let mut places = common::places()?;
    let germany = places.load(&places.germany.clone())?;
    let result = walk(&mut places, &Context::Single(germany), &["timezones"], PrefetchPolicy::Lazy);
    assert_eq!(
        result,
        Err(TranslationError::NotTranslatable {
            entity_type: EntityType::new(TIMEZONE),
            path: "timezones".to_string(),
        })
    );
    Ok(())
}

#[test]
fn traversing_through_non_translatable_type_is_allowed() -> TestResult {
    let mut places = common::places()?;
    let germany = places.load(&places.germany.clone())?;
    let index = walk(
        &mut places,
        &Context::Single(germany),
        &["timezones.countries"],
        PrefetchPolicy::Lazy,
    )
    .map_err(|err| err.to_string())?;
    assert_eq!(ids(&index, COUNTRY), vec!["9", "10"]);
    assert!(!index.contains(&places.cet));
    Ok(())
}

#[test]
fn unknown_relation_fails_regardless_of_value() -> TestResult {
    let mut places = common::places()?;
    let vienna = places.load(&places.vienna.clone())?;
    let result = walk(&mut places, &Context::Single(vienna), &["mayor"], PrefetchPolicy::Lazy);
    assert_eq!(
        result,
        Err(TranslationError::UnknownRelation {
            entity_type: EntityType::new(CITY),
            relation: "mayor".to_string(),
            path: String::new(),
        })
    );

    let europe = places.load(&places.europe.clone())?;
    let result =
        walk(&mut places, &Context::Single(europe), &["countries.rivers"], PrefetchPolicy::Lazy);
    assert_eq!(
        result,
        Err(TranslationError::UnknownRelation {
            entity_type: EntityType::new(COUNTRY),
            relation: "rivers".to_string(),
            path: "countries".to_string(),
        })
    );
    Ok(())
}

#[test]
fn strict_policy_rejects_unprefetched_to_many() -> TestResult {
    let mut places = common::places()?;
    let europe = places.load(&places.europe.clone())?;
    let result =
        walk(&mut places, &Context::Single(europe), &["countries"], PrefetchPolicy::Strict);
    assert_eq!(
        result,
        Err(TranslationError::UnprefetchedRelation {
            entity: places.europe.clone(),
            relation: "countries".to_string(),
            path: String::new(),
        })
    );
    assert_eq!(places.graph.lazy_loads(), 0);

    places.prefetch(europe, "countries")?;
    let result = walk(
        &mut places,
        &Context::Single(europe),
        &["countries.cities"],
        PrefetchPolicy::Strict,
    );
    assert_eq!(
        result,
        Err(TranslationError::UnprefetchedRelation {
            entity: places.germany.clone(),
            relation: "cities".to_string(),
            path: "countries".to_string(),
        })
    );

    places.prefetch(europe, "countries.cities")?;
    let index = walk(
        &mut places,
        &Context::Single(europe),
        &["countries.cities"],
        PrefetchPolicy::Strict,
    )
    .map_err(|err| err.to_string())?;
    assert_eq!(index.len(), 4);
    assert_eq!(places.graph.lazy_loads(), 0);
    Ok(())
}

#[test]
fn strict_policy_resolves_to_one_relations() -> TestResult {
    let mut places = common::places()?;
    let germany = places.load(&places.germany.clone())?;
    let index = walk(
        &mut places,
        &Context::Single(germany),
        &["capital", "continent"],
        PrefetchPolicy::Strict,
    )
    .map_err(|err| err.to_string())?;
    assert!(index.contains(&places.berlin));
    assert!(index.contains(&places.europe));
    Ok(())
}

#[test]
fn lazy_policy_loads_each_relation_once() -> TestResult {
    let mut places = common::places()?;
    let europe = places.load(&places.europe.clone())?;
    walk(&mut places, &Context::Single(europe), &["countries.cities"], PrefetchPolicy::Lazy)
        .map_err(|err| err.to_string())?;
    assert_eq!(places.graph.lazy_loads(), 3);
    walk(&mut places, &Context::Single(europe), &["countries.cities"], PrefetchPolicy::Lazy)
        .map_err(|err| err.to_string())?;
    assert_eq!(places.graph.lazy_loads(), 3);
    let germany = places.graph.handle(&places.germany).ok_or("germany not live")?;
    let prefetched = places.graph.is_prefetched(germany, "cities").map_err(|err| err.to_string())?;
    assert!(prefetched);
    Ok(())
}

#[test]
fn cyclic_paths_terminate() -> TestResult {
    let mut places = common::places()?;
    let europe = places.load(&places.europe.clone())?;
    let index = walk(
        &mut places,
        &Context::Single(europe),
        &["countries.continent.countries.continent"],
        PrefetchPolicy::Lazy,
    )
    .map_err(|err| err.to_string())?;
    assert_eq!(ids(&index, CONTINENT), vec!["1"]);
    assert_eq!(ids(&index, COUNTRY), Vec::<String>::new());
    Ok(())
}

#[test]
fn empty_collection_yields_empty_index() -> TestResult {
    let mut places = common::places()?;
    let context = Context::Collection(Vec::new());
    let info = context.validate(&places.graph).map_err(|err| err.to_string())?;
    assert_eq!(info.kind, ContextKind::Collection);
    assert_eq!(info.entity_type, None);
    let index = walk(&mut places, &context, &["countries"], PrefetchPolicy::Strict)
        .map_err(|err| err.to_string())?;
    assert!(index.is_empty());
    Ok(())
}

#[test]
fn heterogeneous_collection_is_rejected_before_walking() -> TestResult {
    let mut places = common::places()?;
    let germany = places.load(&places.germany.clone())?;
    let berlin = places.load(&places.berlin.clone())?;
    let result = walk(
        &mut places,
        &Context::Collection(vec![germany, berlin]),
        &["cities"],
        PrefetchPolicy::Lazy,
    );
    assert!(matches!(result, Err(TranslationError::InvalidContext { .. })));
    assert_eq!(places.graph.lazy_loads(), 0);
    Ok(())
}

#[test]
fn collection_roots_are_indexed_once() -> TestResult {
    let mut places = common::places()?;
    let germany = places.load(&places.germany.clone())?;
    let austria = places.load(&places.austria.clone())?;
    let context = Context::Collection(vec![germany, austria, germany]);
    let info = context.validate(&places.graph).map_err(|err| err.to_string())?;
    assert_eq!(info.entity_type, Some(EntityType::new(COUNTRY)));
    let index = walk(&mut places, &context, &["capital"], PrefetchPolicy::Lazy)
        .map_err(|err| err.to_string())?;
    assert_eq!(ids(&index, COUNTRY), vec!["9", "10"]);
    assert_eq!(ids(&index, CITY), vec!["100", "102"]);
    Ok(())
}

#[test]
fn identity_map_aliases_instances() -> TestResult {
    let mut places = common::places()?;
    let first = places.load(&places.berlin.clone())?;
    let second = places.load(&EntityRef::new(CITY, 100_u64))?;
    assert_eq!(first, second);
    let germany = places.load(&places.germany.clone())?;
    let capital = places.graph.related(germany, "capital").map_err(|err| err.to_string())?;
    assert_eq!(capital.into_handles(), vec![first]);
    Ok(())
}

#[test]
fn aliased_entity_occupies_one_live_slot() -> TestResult {
    let mut places = common::places()?;
    let europe = places.load(&places.europe.clone())?;
    walk(&mut places, &Context::Single(europe), &["countries.cities"], PrefetchPolicy::Lazy)
        .map_err(|err| err.to_string())?;
    let live = places.graph.live_count();
    assert_eq!(live, 6);
    walk(
        &mut places,
        &Context::Single(europe),
        &["countries.cities", "countries.capital"],
        PrefetchPolicy::Lazy,
    )
    .map_err(|err| err.to_string())?;
    assert_eq!(places.graph.live_count(), live);
    Ok(())
}

#[test]
fn load_by_filter_returns_identity_mapped_handles() -> TestResult {
    let mut places = common::places()?;
    let vienna = places.load(&places.vienna.clone())?;
    let starts_with_v =
        |entity: &dyn Entity| entity.field_text("name").is_some_and(|name| name.starts_with('V'));
    let matches = places
        .graph
        .load_by_filter(&EntityType::new(CITY), &starts_with_v)
        .map_err(|err| err.to_string())?;
    assert_eq!(matches, vec![vienna]);

    let cities = places
        .graph
        .load_by_filter(&EntityType::new(CITY), &|_: &dyn Entity| true)
        .map_err(|err| err.to_string())?;
    assert_eq!(cities.len(), 3);
    assert!(cities.contains(&vienna));
    for handle in cities {
        let entity = places.graph.entity(handle).map_err(|err| err.to_string())?;
        assert_eq!(entity.entity_type(), EntityType::new(CITY));
    }
    assert_eq!(places.graph.live_count(), 3);
    Ok(())
}

#[test]
fn save_persists_live_edits() -> TestResult {
    let mut places = common::places()?;
    let austria = places.load(&places.austria.clone())?;
    places.graph.get_mut::<Country>(austria).map_err(|err| err.to_string())?.name =
        "Österreich".to_string();
    let stored_name = |places: &Places| {
        places.graph.stored::<Country>(&places.austria).map(|country| country.name.clone())
    };
    assert_eq!(stored_name(&places).as_deref(), Some("Austria"));

    places.graph.save(austria).map_err(|err| err.to_string())?;
    assert_eq!(stored_name(&places).as_deref(), Some("Österreich"));
    assert_eq!(places.load(&places.austria.clone())?, austria);
    Ok(())
}
