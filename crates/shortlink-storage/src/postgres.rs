use crate::config::PoolSettings;
use crate::row::UrlRow;
use async_trait::async_trait;
use shortlink_core::{
    Alias, Backend, Operation, RecordId, Result, Storage, StorageError, Target, UrlEntry,
    UrlRecord,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const BACKEND: Backend = Backend::Postgres;

/// SQLSTATE raised by PostgreSQL when a unique constraint rejects a row.
const UNIQUE_VIOLATION: &str = "23505";

const SCHEMA: &str = include_str!("../ddl/postgres/url.sql");

/// PostgreSQL implementation of the storage contract.
///
/// Every statement is parameterized. Duplicate aliases are rejected by the
/// `UNIQUE` constraint on `url.alias`; update and delete decide not-found
/// from the affected-row count of their single statement.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Wraps an existing pool. The schema is assumed to exist; call
    /// [`PostgresStorage::init_schema`] otherwise.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url` and ensures the schema exists.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self> {
        settings
            .validate()
            .map_err(|err| StorageError::internal(BACKEND, Operation::Connect, err))?;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout())
            .connect(database_url)
            .await
            .map_err(|err| StorageError::internal(BACKEND, Operation::Connect, err))?;

        let storage = Self::new(pool);
        storage.init_schema().await?;

        info!(
            backend = %BACKEND,
            max_connections = settings.max_connections,
            "storage ready"
        );
        Ok(storage)
    }

    /// Creates the `url` table and its alias index if they are absent.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::internal(BACKEND, Operation::Connect, err))?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

fn internal(operation: Operation, alias: &Alias, err: sqlx::Error) -> StorageError {
    StorageError::internal(BACKEND, operation, err).with_alias(alias.as_str())
}

#[async_trait]
impl Storage for PostgresStorage {
    fn backend(&self) -> Backend {
        BACKEND
    }

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "postgres", alias = %alias))]
    async fn save(&self, target: &Target, alias: &Alias) -> Result<RecordId> {
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO url (alias, target)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(alias.as_str())
        .bind(target.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(RecordId::new(id)),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::already_exists(BACKEND, alias.as_str()))
            }
            Err(err) => Err(internal(Operation::Save, alias, err)),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "postgres", alias = %alias))]
    async fn get(&self, alias: &Alias) -> Result<Target> {
        let target = sqlx::query_scalar::<_, String>(
            r#"
            SELECT target
            FROM url
            WHERE alias = $1
            "#,
        )
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| internal(Operation::Get, alias, err))?;

        target
            .map(Target::new_unchecked)
            .ok_or_else(|| StorageError::not_found(BACKEND, Operation::Get, alias.as_str()))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "postgres", alias = %alias))]
    async fn delete(&self, alias: &Alias) -> Result<()> {
        let result = sqlx::query("DELETE FROM url WHERE alias = $1")
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

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "postgres", alias = %alias))]
    async fn update(&self, alias: &Alias, target: &Target) -> Result<()> {
        let result = sqlx::query("UPDATE url SET target = $1 WHERE alias = $2")
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

    #[tracing::instrument(level = "debug", skip_all, fields(backend = "postgres"))]
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
