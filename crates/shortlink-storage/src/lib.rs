//! PostgreSQL and SQLite implementations of [`Storage`].
//!
//! Pick a backend at startup with [`connect`] and hold the returned
//! `Arc<dyn Storage>`; the concrete types are exported for callers that
//! need to wrap an existing pool.

pub mod config;
pub mod postgres;
mod row;
pub mod sqlite;

pub use config::{connect, PoolSettings, PoolSettingsError, StorageConfig};
pub use postgres::PostgresStorage;
pub use shortlink_core::{
    Alias, Backend, ErrorKind, Operation, RecordId, Result, Storage, StorageError, Target,
    UrlEntry, UrlRecord,
};
pub use sqlite::SqliteStorage;
