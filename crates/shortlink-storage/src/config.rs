use crate::postgres::PostgresStorage;
use crate::sqlite::SqliteStorage;
use serde::{Deserialize, Serialize};
use shortlink_core::{Backend, Result, Storage};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Connection pool settings shared by both backends.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    #[builder(default = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
    /// How long an operation waits for a free connection before failing.
    #[builder(default = DEFAULT_ACQUIRE_TIMEOUT_SECS)]
    pub acquire_timeout_secs: u64,
}

/// Pool settings a backend refuses to open with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolSettingsError {
    #[error("max_connections must be at least 1")]
    ZeroMaxConnections,
}

impl PoolSettings {
    /// Checks the settings before they reach the pool, which cannot be
    /// built without at least one connection slot.
    pub fn validate(&self) -> std::result::Result<(), PoolSettingsError> {
        if self.max_connections == 0 {
            return Err(PoolSettingsError::ZeroMaxConnections);
        }
        Ok(())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Selects and describes the backend to open at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// A PostgreSQL server reached through a connection string.
    Postgres {
        url: String,
        #[serde(default)]
        pool: PoolSettings,
    },
    /// A local SQLite database file, or `:memory:`.
    Sqlite {
        path: PathBuf,
        #[serde(default)]
        pool: PoolSettings,
    },
}

impl StorageConfig {
    pub fn backend(&self) -> Backend {
        match self {
            StorageConfig::Postgres { .. } => Backend::Postgres,
            StorageConfig::Sqlite { .. } => Backend::Sqlite,
        }
    }
}

/// Opens the configured backend and ensures its schema exists.
///
/// Fails with an internal error if the connection cannot be established or
/// the schema cannot be created; no handle is returned in that case.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn Storage>> {
    match config {
        StorageConfig::Postgres { url, pool } => {
            let storage = PostgresStorage::connect(url, pool).await?;
            Ok(Arc::new(storage))
        }
        StorageConfig::Sqlite { path, pool } => {
            let storage = SqliteStorage::open(path, pool).await?;
            Ok(Arc::new(storage))
        }
    }
}
