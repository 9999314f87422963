use std::fmt::{Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Shared, type-erased cause of an [`ErrorKind::Internal`] failure.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The closed set of outcomes a caller may branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The alias has no live record.
    NotFound,
    /// A live record already uses the alias.
    AlreadyExists,
    /// Any other backend failure. The cause is kept for diagnostics only.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::Internal => "internal",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The storage operation an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Backend construction: connecting and initializing the schema.
    Connect,
    Save,
    Get,
    Delete,
    Update,
    List,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Connect => "connect",
            Operation::Save => "save",
            Operation::Get => "get",
            Operation::Delete => "delete",
            Operation::Update => "update",
            Operation::List => "list",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The concrete engine behind a [`Storage`](crate::Storage) handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every [`Storage`](crate::Storage) operation.
///
/// Decision logic should only look at [`StorageError::kind`]. The operation,
/// backend and alias are structured context for logging, and the native cause
/// of an internal failure is reachable only through
/// [`std::error::Error::source`].
#[derive(Debug, Clone, Error)]
#[error("{operation} on {backend} failed: {kind}")]
pub struct StorageError {
    kind: ErrorKind,
    operation: Operation,
    backend: Backend,
    alias: Option<String>,
    #[source]
    cause: Option<Cause>,
}

impl StorageError {
    /// The alias has no live record.
    pub fn not_found(backend: Backend, operation: Operation, alias: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            operation,
            backend,
            alias: Some(alias.into()),
            cause: None,
        }
    }

    /// A save collided with an existing live record.
    pub fn already_exists(backend: Backend, alias: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::AlreadyExists,
            operation: Operation::Save,
            backend,
            alias: Some(alias.into()),
            cause: None,
        }
    }

    /// Wraps a native backend failure.
    pub fn internal<E>(backend: Backend, operation: Operation, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind: ErrorKind::Internal,
            operation,
            backend,
            alias: None,
            cause: Some(Arc::new(cause)),
        }
    }

    /// Attaches the alias the failing operation was working on.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_already_exists(&self) -> bool {
        self.kind == ErrorKind::AlreadyExists
    }

    pub fn is_internal(&self) -> bool {
        self.kind == ErrorKind::Internal
    }
}

/// Validation failures when building model values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("alias must not be empty")]
    EmptyAlias,
    #[error("target must not be empty")]
    EmptyTarget,
}
