//! Core types and traits for the shortlink storage layer.
//!
//! This crate defines the record model, the backend-agnostic error taxonomy
//! and the [`Storage`] capability every backend implements. Concrete engines
//! live in `shortlink_storage`.

pub mod error;
pub mod model;
pub mod storage;

pub use error::{Backend, ErrorKind, ModelError, Operation, Result, StorageError};
pub use model::{Alias, RecordId, Target, UrlEntry, UrlRecord};
pub use storage::Storage;
