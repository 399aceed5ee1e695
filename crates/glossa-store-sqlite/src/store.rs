// crates/glossa-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Translation Store
// Description: Durable TranslationStore backed by SQLite.
// Purpose: Persist translation records with transactional bulk replacement.
// Dependencies: glossa-core, rusqlite, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module implements a durable [`TranslationStore`] using `SQLite`.
//! A lookup binds every (type, identity) pair of a filter as one JSON array
//! and joins it through `json_each`, so each lookup is one statement no
//! matter how many entities it covers. Atomic units map onto `SQLite`
//! transactions and roll back on any error. Rows are validated on read and
//! the store fails closed on malformed data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use glossa_core::EntityId;
use glossa_core::EntityType;
use glossa_core::LanguageTag;
use glossa_core::StoreError;
use glossa_core::StoreStats;
use glossa_core::TranslationFilter;
use glossa_core::TranslationRecord;
use glossa_core::TranslationStore;
use glossa_core::TranslationWriter;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum translated text size accepted by the store.
pub const MAX_TEXT_BYTES: usize = 1024 * 1024;

/// Bulk lookup joining the bound `[[type, id], ...]` array.
const SELECT_BY_FILTER: &str = "SELECT t.entity_type, t.entity_id, t.field, t.language, t.text \
                                FROM translations t JOIN json_each(?2) AS target \
                                ON t.entity_type = json_extract(target.value, '$[0]') \
                                AND t.entity_id = json_extract(target.value, '$[1]') \
                                WHERE t.language = ?1 \
                                ORDER BY t.entity_type, t.entity_id, t.field";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` translation store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default settings.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Insert collides with an existing record key.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Translated text exceeded the size limit.
    #[error("sqlite store text too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual text size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "translation text exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Connection plus counters behind the store mutex.
struct SqliteState {
    /// Open `SQLite` connection.
    connection: Connection,
    /// Round-trip counters.
    stats: StoreStats,
}

/// `SQLite`-backed translation store with WAL support.
#[derive(Clone)]
pub struct SqliteTranslationStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared connection and counters guarded by a mutex.
    state: Arc<Mutex<SqliteState>>,
}

impl std::fmt::Debug for SqliteTranslationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteTranslationStore").field("path", &self.config.path).finish()
    }
}

impl SqliteTranslationStore {
    /// Opens an `SQLite`-backed translation store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            state: Arc::new(Mutex::new(SqliteState {
                connection,
                stats: StoreStats::default(),
            })),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Returns the round-trip counters.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Db`] when the store mutex is poisoned.
    pub fn stats(&self) -> Result<StoreStats, SqliteStoreError> {
        Ok(self.lock()?.stats)
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the count cannot be read.
    pub fn record_count(&self) -> Result<u64, SqliteStoreError> {
        let guard = self.lock()?;
        let count: i64 = guard
            .connection
            .query_row("SELECT COUNT(*) FROM translations", params![], |row| row.get(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        u64::try_from(count)
            .map_err(|_| SqliteStoreError::Invalid("negative record count".to_string()))
    }

    /// Locks the connection state.
    fn lock(&self) -> Result<MutexGuard<'_, SqliteState>, SqliteStoreError> {
        self.state.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Runs `work` inside one transaction.
    fn run_atomically(
        &self,
        work: &mut dyn FnMut(&mut dyn TranslationWriter) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let tx = state
            .connection
            .transaction()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut writer = SqliteWriter {
            connection: &tx,
            queries: 0,
        };
        let outcome = work(&mut writer);
        state.stats.queries += writer.queries;
        let outcome = match outcome {
            Ok(()) => tx
                .commit()
                .map_err(|err| StoreError::from(SqliteStoreError::Db(err.to_string()))),
            Err(err) => rolled_back(err, tx.rollback()),
        };
        match &outcome {
            Ok(()) => {
                state.stats.commits += 1;
                debug!(
                    path = %self.config.path.display(),
                    "sqlite translation transaction committed"
                );
            }
            Err(err) => {
                state.stats.rollbacks += 1;
                debug!(
                    path = %self.config.path.display(),
                    error = %err,
                    "sqlite translation transaction rolled back"
                );
            }
        }
        drop(guard);
        outcome
    }
}

impl TranslationStore for SqliteTranslationStore {
    fn query(&self, filter: &TranslationFilter) -> Result<Vec<TranslationRecord>, StoreError> {
        let mut guard = self.lock()?;
        guard.stats.queries += 1;
        let records = select_records(&guard.connection, filter)?;
        drop(guard);
        Ok(records)
    }

    fn atomically(
        &self,
        work: &mut dyn FnMut(&mut dyn TranslationWriter) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        self.run_atomically(work)
    }
}

/// Writer bound to one open transaction.
struct SqliteWriter<'tx> {
    /// Transaction connection.
    connection: &'tx Connection,
    /// Lookups issued by the unit.
    queries: u64,
}

impl TranslationWriter for SqliteWriter<'_> {
    fn query(&mut self, filter: &TranslationFilter) -> Result<Vec<TranslationRecord>, StoreError> {
        self.queries += 1;
        Ok(select_records(self.connection, filter)?)
    }

    fn bulk_delete(&mut self, records: &[TranslationRecord]) -> Result<usize, StoreError> {
        Ok(delete_records(self.connection, records)?)
    }

    fn bulk_insert(&mut self, records: &[TranslationRecord]) -> Result<usize, StoreError> {
        Ok(insert_records(self.connection, records)?)
    }
}

// ============================================================================
// SECTION: Statements
// ============================================================================

/// Runs the bulk lookup for `filter`.
fn select_records(
    connection: &Connection,
    filter: &TranslationFilter,
) -> Result<Vec<TranslationRecord>, SqliteStoreError> {
    if filter.is_empty() {
        return Ok(Vec::new());
    }
    let targets: Vec<[&str; 2]> = filter
        .targets()
        .flat_map(|(entity_type, ids)| ids.iter().map(|id| [entity_type.as_str(), id.as_str()]))
        .collect();
    let targets =
        serde_json::to_string(&targets).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
    let mut statement = connection
        .prepare_cached(SELECT_BY_FILTER)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let rows = statement
        .query_map(params![filter.language().as_str(), targets], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let mut records = Vec::new();
    for row in rows {
        let (entity_type, entity_id, field, language, text) =
            row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let language = LanguageTag::parse(&language)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        records.push(TranslationRecord {
            entity_type: EntityType::new(entity_type),
            entity_id: EntityId::new(entity_id),
            field,
            language,
            text,
        });
    }
    Ok(records)
}

/// Deletes `records` by natural key; returns the number of removed rows.
fn delete_records(
    connection: &Connection,
    records: &[TranslationRecord],
) -> Result<usize, SqliteStoreError> {
    let mut statement = connection
        .prepare_cached(
            "DELETE FROM translations WHERE entity_type = ?1 AND entity_id = ?2 AND field = ?3 \
             AND language = ?4",
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let mut deleted = 0;
    for record in records {
        deleted += statement
            .execute(params![
                record.entity_type.as_str(),
                record.entity_id.as_str(),
                record.field,
                record.language.as_str()
            ])
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    }
    Ok(deleted)
}

/// Inserts `records`; a duplicate natural key is a conflict.
fn insert_records(
    connection: &Connection,
    records: &[TranslationRecord],
) -> Result<usize, SqliteStoreError> {
    let mut statement = connection
        .prepare_cached(
            "INSERT INTO translations (entity_type, entity_id, field, language, text) VALUES \
             (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    for record in records {
        if record.text.len() > MAX_TEXT_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_TEXT_BYTES,
                actual_bytes: record.text.len(),
            });
        }
        statement
            .execute(params![
                record.entity_type.as_str(),
                record.entity_id.as_str(),
                record.field,
                record.language.as_str(),
                record.text
            ])
            .map_err(|err| match err.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => SqliteStoreError::Conflict(format!(
                    "record for {} field `{}` in `{}` already exists",
                    record.owner(),
                    record.field,
                    record.language
                )),
                _ => SqliteStoreError::Db(err.to_string()),
            })?;
    }
    Ok(records.len())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Settles an aborted unit; the aborting error wins over a failed `ROLLBACK`.
fn rolled_back(err: StoreError, rollback: rusqlite::Result<()>) -> Result<(), StoreError> {
    if let Err(rollback_err) = rollback {
        warn!(
            error = %err,
            rollback_error = %rollback_err,
            "sqlite translation rollback failed"
        );
    }
    Err(err)
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with durable defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS translations (
                    entity_type TEXT NOT NULL,
                    entity_id TEXT NOT NULL,
                    field TEXT NOT NULL,
                    language TEXT NOT NULL,
                    text TEXT NOT NULL,
                    PRIMARY KEY (entity_type, entity_id, field, language)
                );
                CREATE INDEX IF NOT EXISTS idx_translations_language
                    ON translations (language, entity_type, entity_id);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            debug!(version = SCHEMA_VERSION, "initialized sqlite translation schema");
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
