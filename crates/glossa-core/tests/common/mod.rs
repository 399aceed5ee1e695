// crates/glossa-core/tests/common/mod.rs
// =============================================================================
// Module: Glossa Core Test Helpers
// Description: Places fixture graph, language registry, and store helpers.
// Purpose: Reduce duplication across glossa-core integration tests.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use glossa_core::EntityGraph;
use glossa_core::EntityHandle;
use glossa_core::EntityId;
use glossa_core::EntityRef;
use glossa_core::InMemoryTranslationStore;
use glossa_core::LanguageRegistry;
use glossa_core::LanguageTag;
use glossa_core::Model;
use glossa_core::ObjectStore;
use glossa_core::RelationSpec;
use glossa_core::StoreError;
use glossa_core::TranslatableField;
use glossa_core::TranslationRecord;
use glossa_core::TranslationStore;
use glossa_core::Translator;
use glossa_core::TranslatorConfig;

// =============================================================================
// Models
// =============================================================================

pub const CONTINENT: &str = "places.continent";
pub const COUNTRY: &str = "places.country";
pub const CITY: &str = "places.city";
pub const TIMEZONE: &str = "places.timezone";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continent {
    pub id: u64,
    pub name: String,
    pub denonym: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub denonym: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: u64,
    pub name: String,
    pub denonym: String,
}

/// Not translatable: declares no field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timezone {
    pub id: u64,
    pub name: String,
}

fn continent_name(continent: &Continent) -> &str {
    &continent.name
}

fn set_continent_name(continent: &mut Continent, text: String) {
    continent.name = text;
}

fn continent_denonym(continent: &Continent) -> &str {
    &continent.denonym
}

fn set_continent_denonym(continent: &mut Continent, text: String) {
    continent.denonym = text;
}

fn country_name(country: &Country) -> &str {
    &country.name
}

fn set_country_name(country: &mut Country, text: String) {
    country.name = text;
}

fn country_denonym(country: &Country) -> &str {
    &country.denonym
}

fn set_country_denonym(country: &mut Country, text: String) {
    country.denonym = text;
}

fn city_name(city: &City) -> &str {
    &city.name
}

fn set_city_name(city: &mut City, text: String) {
    city.name = text;
}

fn city_denonym(city: &City) -> &str {
    &city.denonym
}

fn set_city_denonym(city: &mut City, text: String) {
    city.denonym = text;
}

const CONTINENT_FIELDS: &[TranslatableField<Continent>] = &[
    TranslatableField::new("name", continent_name, set_continent_name),
    TranslatableField::new("denonym", continent_denonym, set_continent_denonym),
];

const COUNTRY_FIELDS: &[TranslatableField<Country>] = &[
    TranslatableField::new("name", country_name, set_country_name),
    TranslatableField::new("denonym", country_denonym, set_country_denonym),
];

const CITY_FIELDS: &[TranslatableField<City>] = &[
    TranslatableField::new("name", city_name, set_city_name),
    TranslatableField::new("denonym", city_denonym, set_city_denonym),
];

impl Model for Continent {
    const ENTITY_TYPE: &'static str = CONTINENT;
    const RELATIONS: &'static [RelationSpec] = &[RelationSpec::to_many("countries", COUNTRY)];
    const TRANSLATABLE_FIELDS: Option<&'static [TranslatableField<Self>]> = Some(CONTINENT_FIELDS);

    fn id(&self) -> EntityId {
        EntityId::from(self.id)
    }
}

impl Model for Country {
    const ENTITY_TYPE: &'static str = COUNTRY;
    const RELATIONS: &'static [RelationSpec] = &[
        RelationSpec::to_one("continent", CONTINENT),
        RelationSpec::to_one("capital", CITY),
        RelationSpec::to_many("cities", CITY),
        RelationSpec::to_many("timezones", TIMEZONE),
    ];
    const TRANSLATABLE_FIELDS: Option<&'static [TranslatableField<Self>]> = Some(COUNTRY_FIELDS);

    fn id(&self) -> EntityId {
        EntityId::from(self.id)
    }
}

impl Model for City {
    const ENTITY_TYPE: &'static str = CITY;
    const RELATIONS: &'static [RelationSpec] = &[RelationSpec::to_one("country", COUNTRY)];
    const TRANSLATABLE_FIELDS: Option<&'static [TranslatableField<Self>]> = Some(CITY_FIELDS);

    fn id(&self) -> EntityId {
        EntityId::from(self.id)
    }
}

impl Model for Timezone {
    const ENTITY_TYPE: &'static str = TIMEZONE;
    const RELATIONS: &'static [RelationSpec] = &[RelationSpec::to_many("countries", COUNTRY)];

    fn id(&self) -> EntityId {
        EntityId::from(self.id)
    }
}

// =============================================================================
// Fixture Graph
// =============================================================================

/// Europe(1) with Germany(9) and Austria(10), their cities, and one timezone.
pub struct Places {
    pub graph: EntityGraph,
    pub europe: EntityRef,
    pub germany: EntityRef,
    pub austria: EntityRef,
    pub berlin: EntityRef,
    pub munich: EntityRef,
    pub vienna: EntityRef,
    pub cet: EntityRef,
}

pub fn continent(id: u64, name: &str, denonym: &str) -> Continent {
    Continent {
        id,
        name: name.to_string(),
        denonym: denonym.to_string(),
    }
}

pub fn country(id: u64, code: &str, name: &str, denonym: &str) -> Country {
    Country {
        id,
        code: code.to_string(),
        name: name.to_string(),
        denonym: denonym.to_string(),
    }
}

pub fn city(id: u64, name: &str, denonym: &str) -> City {
    City {
        id,
        name: name.to_string(),
        denonym: denonym.to_string(),
    }
}

/// Builds the places fixture graph with rows and links but no live entities.
pub fn places() -> Result<Places, String> {
    let mut graph = EntityGraph::new();
    let europe = graph.insert(continent(1, "Europe", "European"));
    let germany = graph.insert(country(9, "DE", "Germany", "German"));
    let austria = graph.insert(country(10, "AT", "Austria", "Austrian"));
    let berlin = graph.insert(city(100, "Berlin", "Berliner"));
    let munich = graph.insert(city(101, "Munich", "Munich resident"));
    let vienna = graph.insert(city(102, "Vienna", "Viennese"));
    let cet = graph.insert(Timezone {
        id: 500,
        name: "CET".to_string(),
    });
    let links = [
        (&europe, "countries", &germany),
        (&europe, "countries", &austria),
        (&germany, "continent", &europe),
        (&austria, "continent", &europe),
        (&germany, "capital", &berlin),
        (&austria, "capital", &vienna),
        (&germany, "cities", &berlin),
        (&germany, "cities", &munich),
        (&austria, "cities", &vienna),
        (&germany, "timezones", &cet),
        (&austria, "timezones", &cet),
        (&berlin, "country", &germany),
        (&munich, "country", &germany),
        (&vienna, "country", &austria),
        (&cet, "countries", &germany),
        (&cet, "countries", &austria),
    ];
    for (owner, relation, target) in links {
        graph.link(owner, relation, target).map_err(|err| err.to_string())?;
    }
    Ok(Places {
        graph,
        europe,
        germany,
        austria,
        berlin,
        munich,
        vienna,
        cet,
    })
}

impl Places {
    /// Loads `entity` into a live slot.
    pub fn load(&mut self, entity: &EntityRef) -> Result<EntityHandle, String> {
        self.graph
            .load(entity)
            .map_err(|err| err.to_string())?
            .ok_or_else(|| format!("{entity} not stored"))
    }

    /// Prefetches `path` below `root`.
    pub fn prefetch(&mut self, root: EntityHandle, path: &str) -> Result<(), String> {
        self.graph.prefetch_path(&[root], path).map_err(|err| err.to_string())
    }

    /// Returns the current live name of a country.
    pub fn country_name(&self, handle: EntityHandle) -> Result<String, String> {
        self.graph
            .get::<Country>(handle)
            .map(|country| country.name.clone())
            .map_err(|err| err.to_string())
    }

    /// Returns the current live name of a city.
    pub fn city_name(&self, handle: EntityHandle) -> Result<String, String> {
        self.graph.get::<City>(handle).map(|city| city.name.clone()).map_err(|err| err.to_string())
    }
}

// =============================================================================
// Languages and Stores
// =============================================================================

/// Registry with `en`, `en-GB` and `de`; default `en`.
pub fn registry() -> LanguageRegistry {
    LanguageRegistry::from_tags(["en", "en-GB", "de"], "en")
        .unwrap_or_else(|err| unreachable!("fixture registry is valid: {err}"))
}

pub fn tag(value: &str) -> LanguageTag {
    LanguageTag::parse(value).unwrap_or_else(|err| unreachable!("fixture tag is valid: {err}"))
}

pub fn translator() -> Translator<InMemoryTranslationStore> {
    Translator::new(InMemoryTranslationStore::new(), registry(), TranslatorConfig::default())
}

pub fn record(owner: &EntityRef, field: &str, language: &str, text: &str) -> TranslationRecord {
    TranslationRecord::new(owner, field, tag(language), text)
}

/// Inserts `records` in one atomic unit.
pub fn seed<S: TranslationStore + ?Sized>(
    store: &S,
    records: &[TranslationRecord],
) -> Result<(), StoreError> {
    store.atomically(&mut |writer| writer.bulk_insert(records).map(|_| ()))
}
