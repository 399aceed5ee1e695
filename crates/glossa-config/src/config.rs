// crates/glossa-config/src/config.rs
// ============================================================================
// Module: Glossa Configuration
// Description: Configuration loading and validation for Glossa.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: glossa-core, glossa-store-sqlite, serde, toml, tracing
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a config that loads is
//! guaranteed to build a language registry, translator settings, and a
//! translation store without further validation errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use glossa_core::HierarchyLimits;
use glossa_core::InMemoryTranslationStore;
use glossa_core::LanguageRegistry;
use glossa_core::PrefetchPolicy;
use glossa_core::StoreError;
use glossa_core::StoreStats;
use glossa_core::TranslationFilter;
use glossa_core::TranslationRecord;
use glossa_core::TranslationStore;
use glossa_core::TranslationWriter;
use glossa_core::TranslatorConfig;
use glossa_store_sqlite::SqliteStoreConfig;
use glossa_store_sqlite::SqliteStoreMode;
use glossa_store_sqlite::SqliteSyncMode;
use glossa_store_sqlite::SqliteTranslationStore;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "glossa.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "GLOSSA_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for `translator.max_relation_paths`.
pub(crate) const MAX_RELATION_PATHS_LIMIT: usize = 1024;
/// Upper bound for `translator.max_relation_depth`.
pub(crate) const MAX_RELATION_DEPTH_LIMIT: usize = 64;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Glossa configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlossaConfig {
    /// Supported languages and the default language.
    pub languages: LanguagesConfig,
    /// Translator behavior.
    #[serde(default)]
    pub translator: TranslatorSection,
    /// Translation store backend.
    #[serde(default)]
    pub translation_store: TranslationStoreConfig,
}

impl GlossaConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path is `path` when given, else the `GLOSSA_CONFIG` environment
    /// variable, else `glossa.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml(content)?;
        debug!(
            path = %resolved.display(),
            languages = config.languages.supported.len(),
            "glossa config loaded"
        );
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.languages.validate()?;
        self.translator.validate()?;
        self.translation_store.validate()?;
        Ok(())
    }

    /// Builds the language registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the language section is invalid.
    pub fn language_registry(&self) -> Result<LanguageRegistry, ConfigError> {
        self.languages.registry()
    }

    /// Returns the translator settings.
    #[must_use]
    pub const fn translator_config(&self) -> TranslatorConfig {
        self.translator.translator_config()
    }

    /// Builds the configured translation store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the store cannot be opened.
    pub fn build_translation_store(&self) -> Result<ConfiguredTranslationStore, ConfigError> {
        self.translation_store.build()
    }
}

/// Language registry configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguagesConfig {
    /// Supported language tags in preference order.
    pub supported: Vec<String>,
    /// Default language; must resolve through the supported set.
    pub default: String,
}

impl LanguagesConfig {
    /// Validates the language section.
    fn validate(&self) -> Result<(), ConfigError> {
        self.registry().map(|_| ())
    }

    /// Builds the registry described by this section.
    fn registry(&self) -> Result<LanguageRegistry, ConfigError> {
        LanguageRegistry::from_tags(&self.supported, &self.default)
            .map_err(|err| ConfigError::Invalid(format!("languages: {err}")))
    }
}

/// Translator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslatorSection {
    /// Rejects unloaded to-many relations on the read path too.
    #[serde(default)]
    pub strict_read_prefetch: bool,
    /// Maximum relation paths accepted per call.
    #[serde(default = "default_max_relation_paths")]
    pub max_relation_paths: usize,
    /// Maximum segments per relation path.
    #[serde(default = "default_max_relation_depth")]
    pub max_relation_depth: usize,
}

impl Default for TranslatorSection {
    fn default() -> Self {
        Self {
            strict_read_prefetch: false,
            max_relation_paths: default_max_relation_paths(),
            max_relation_depth: default_max_relation_depth(),
        }
    }
}

impl TranslatorSection {
    /// Validates translator limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_relation_paths == 0 || self.max_relation_paths > MAX_RELATION_PATHS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "translator.max_relation_paths must be between 1 and {MAX_RELATION_PATHS_LIMIT}"
            )));
        }
        if self.max_relation_depth == 0 || self.max_relation_depth > MAX_RELATION_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "translator.max_relation_depth must be between 1 and {MAX_RELATION_DEPTH_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Maps the section onto runtime settings.
    const fn translator_config(&self) -> TranslatorConfig {
        let read_prefetch =
            if self.strict_read_prefetch { PrefetchPolicy::Strict } else { PrefetchPolicy::Lazy };
        TranslatorConfig {
            read_prefetch,
            limits: HierarchyLimits {
                max_paths: self.max_relation_paths,
                max_depth: self.max_relation_depth,
            },
        }
    }
}

/// Translation store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationStoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: TranslationStoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for TranslationStoreConfig {
    fn default() -> Self {
        Self {
            store_type: TranslationStoreType::default(),
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl TranslationStoreConfig {
    /// Validates translation store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            TranslationStoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory translation_store must not set path".to_string(),
                    ));
                }
                Ok(())
            }
            TranslationStoreType::Sqlite => {
                let path = self.sqlite_path()?;
                validate_store_path(path)?;
                if self.busy_timeout_ms == 0 {
                    return Err(ConfigError::Invalid(
                        "translation_store busy_timeout_ms must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns the configured `SQLite` path.
    fn sqlite_path(&self) -> Result<&Path, ConfigError> {
        self.path.as_deref().ok_or_else(|| {
            ConfigError::Invalid("sqlite translation_store requires path".to_string())
        })
    }

    /// Opens the configured backend.
    fn build(&self) -> Result<ConfiguredTranslationStore, ConfigError> {
        match self.store_type {
            TranslationStoreType::Memory => {
                Ok(ConfiguredTranslationStore::Memory(InMemoryTranslationStore::new()))
            }
            TranslationStoreType::Sqlite => {
                let config = SqliteStoreConfig {
                    path: self.sqlite_path()?.to_path_buf(),
                    busy_timeout_ms: self.busy_timeout_ms,
                    journal_mode: self.journal_mode,
                    sync_mode: self.sync_mode,
                };
                let store = SqliteTranslationStore::new(config)
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(ConfiguredTranslationStore::Sqlite(store))
            }
        }
    }
}

/// Translation store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStoreType {
    /// Use the in-memory store.
    #[default]
    Memory,
    /// Use the `SQLite`-backed durable store.
    Sqlite,
}

// ============================================================================
// SECTION: Configured Store
// ============================================================================

/// Translation store selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredTranslationStore {
    /// In-memory store.
    Memory(InMemoryTranslationStore),
    /// `SQLite` store.
    Sqlite(SqliteTranslationStore),
}

impl ConfiguredTranslationStore {
    /// Returns the backend type.
    #[must_use]
    pub const fn store_type(&self) -> TranslationStoreType {
        match self {
            Self::Memory(_) => TranslationStoreType::Memory,
            Self::Sqlite(_) => TranslationStoreType::Sqlite,
        }
    }

    /// Returns the round-trip counters of the backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend state is unavailable.
    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        match self {
            Self::Memory(store) => store.stats(),
            Self::Sqlite(store) => store.stats().map_err(StoreError::from),
        }
    }
}

impl TranslationStore for ConfiguredTranslationStore {
    fn query(&self, filter: &TranslationFilter) -> Result<Vec<TranslationRecord>, StoreError> {
        match self {
            Self::Memory(store) => store.query(filter),
            Self::Sqlite(store) => store.query(filter),
        }
    }

    fn atomically(
        &self,
        work: &mut dyn FnMut(&mut dyn TranslationWriter) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.atomically(work),
            Self::Sqlite(store) => store.atomically(work),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration or opening the store.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    check_path_limits(path, "config path")
}

/// Validates the `SQLite` store path against length limits.
fn validate_store_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("translation_store path must be non-empty".to_string()));
    }
    check_path_limits(path, "translation_store path")
}

/// Applies total and per-component length limits to `path`.
fn check_path_limits(path: &Path, label: &str) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{label} exceeds max length")));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{label} component too long")));
        }
    }
    Ok(())
}

/// Default relation-path count limit.
pub(crate) const fn default_max_relation_paths() -> usize {
    glossa_core::DEFAULT_MAX_RELATION_PATHS
}

/// Default relation-path depth limit.
pub(crate) const fn default_max_relation_depth() -> usize {
    glossa_core::DEFAULT_MAX_RELATION_DEPTH
}

/// Default `SQLite` busy timeout.
pub(crate) const fn default_store_busy_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Tests
// ============================================================================
