use crate::config::PoolSettings;
use crate::row::UrlRow;
use async_trait::async_trait;
use shortlink_core::{
    Alias, Backend, Operation, RecordId, Result, Storage, StorageError, Target, UrlEntry,
    UrlRecord,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const BACKEND: Backend = Backend::Sqlite;

/// Descriptor that opens a private in-memory database instead of a file.
pub const IN_MEMORY: &str = ":memory:";

/// Extended result codes SQLite reports when a unique or primary key
/// constraint rejects a row (`SQLITE_CONSTRAINT_UNIQUE`,
/// `SQLITE_CONSTRAINT_PRIMARYKEY`).
const UNIQUE_VIOLATION_CODES: [&str; 2] = ["2067", "1555"];

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = include_str!("../ddl/sqlite/url.sql");

/// SQLite implementation of the storage contract.
///
/// The database lives in a single local file opened in WAL mode. Ids come
/// from an `AUTOINCREMENT` key so they are never handed out twice, even
/// after the newest record is deleted.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Wraps an existing pool. The schema is assumed to exist; call
    /// [`SqliteStorage::init_schema`] otherwise.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `path` and ensures the
    /// schema exists. Missing parent directories are created.
    ///
    /// `":memory:"` opens an in-memory database bound to one connection that
    /// is kept for the lifetime of the pool.
    pub async fn open(path: impl AsRef<Path>, settings: &PoolSettings) -> Result<Self> {
        let path = path.as_ref();
        settings
            .validate()
            .map_err(|err| StorageError::internal(BACKEND, Operation::Connect, err))?;

        let pool = if path == Path::new(IN_MEMORY) {
            let options =
                SqliteConnectOptions::from_str("sqlite::memory:").map_err(connect_error)?;

            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .acquire_timeout(settings.acquire_timeout())
                .connect_with(options)
                .await
                .map_err(connect_error)?
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|err| StorageError::internal(BACKEND, Operation::Connect, err))?;
            }

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(BUSY_TIMEOUT);

            SqlitePoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.acquire_timeout())
                .connect_with(options)
                .await
                .map_err(connect_error)?
        };

        let storage = Self::new(pool);
        storage.init_schema().await?;

        info!(backend = %BACKEND, path = %path.display(), "storage ready");
        Ok(storage)
    }

    /// Creates the `url` table and its alias index if they are absent.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(connect_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn connect_error(err: sqlx::Error) -> StorageError {
    StorageError::internal(BACKEND, Operation::Connect, err)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    let Some(db) = err.as_database_error() else {
        return false;
    };

    db.code()
        .is_some_and(|code| UNIQUE_VIOLATION_CODES.iter().any(|known| *known == code))
        || db.is_unique_violation()
}

fn internal(operation: Operation, alias: &Alias, err: sqlx::Error) -> StorageError {
    StorageError::internal(BACKEND, operation, err).with_alias(alias.as_str())
}

#[async_trait]
impl Storage for SqliteStorage {
    fn backend(&self) -> Backend {
        BACKEND
    }

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "sqlite", alias = %alias))]
    async fn save(&self, target: &Target, alias: &Alias) -> Result<RecordId> {
        let result = sqlx::query("INSERT INTO url (alias, target) VALUES (?, ?)")
            .bind(alias.as_str())
            .bind(target.as_str())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(RecordId::new(done.last_insert_rowid())),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::already_exists(BACKEND, alias.as_str()))
            }
            Err(err) => Err(internal(Operation::Save, alias, err)),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "sqlite", alias = %alias))]
    async fn get(&self, alias: &Alias) -> Result<Target> {
        let target = sqlx::query_scalar::<_, String>("SELECT target FROM url WHERE alias = ?")
            .bind(alias.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| internal(Operation::Get, alias, err))?;

        target
            .map(Target::new_unchecked)
            .ok_or_else(|| StorageError::not_found(BACKEND, Operation::Get, alias.as_str()))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "sqlite", alias = %alias))]
    async fn delete(&self, alias: &Alias) -> Result<()> {
        let result = sqlx::query("DELETE FROM url WHERE alias = ?")
            .bind(alias.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| internal(Operation::Delete, alias, err))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(
                BACKEND,
                Operation::Delete,
                alias.as_str(),
            ));
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "sqlite", alias = %alias))]
    async fn update(&self, alias: &Alias, target: &Target) -> Result<()> {
        let result = sqlx::query("UPDATE url SET target = ? WHERE alias = ?")
            .bind(target.as_str())
            .bind(alias.as_str())
            .execute(&self.pool)
            .await
            .map_err(|err| internal(Operation::Update, alias, err))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found(
                BACKEND,
                Operation::Update,
                alias.as_str(),
            ));
        }
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "sqlite"))]
    async fn list(&self) -> Result<Vec<UrlEntry>> {
        let rows = sqlx::query_as::<_, UrlRow>("SELECT id, alias, target FROM url ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| StorageError::internal(BACKEND, Operation::List, err))?;

        Ok(rows
            .into_iter()
            .map(|row| UrlRecord::from(row).into_entry())
            .collect())
    }
}
