use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Surrogate key assigned by a backend when a record is saved.
///
/// Ids are positive, increase monotonically per backend and are never reused.
/// They are never used to look records up; [`Alias`] is the only external key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The short, human-facing key a record is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alias(String);

impl Alias {
    /// Creates an alias, rejecting empty or whitespace-only input.
    pub fn new(alias: impl Into<String>) -> Result<Self, ModelError> {
        let alias = alias.into();
        if alias.trim().is_empty() {
            return Err(ModelError::EmptyAlias);
        }
        Ok(Self(alias))
    }

    /// Creates an alias without validation.
    ///
    /// Use this only for values read back from a backend, which enforces the
    /// `NOT NULL` constraint itself.
    pub fn new_unchecked(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Alias {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alias> for String {
    fn from(value: Alias) -> Self {
        value.0
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The destination address an alias resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target(String);

impl Target {
    /// Creates a target, rejecting empty or whitespace-only input.
    pub fn new(target: impl Into<String>) -> Result<Self, ModelError> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(ModelError::EmptyTarget);
        }
        Ok(Self(target))
    }

    /// Creates a target without validation, for values read back from a backend.
    pub fn new_unchecked(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Target {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Target> for String {
    fn from(value: Target) -> Self {
        value.0
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored record, as persisted by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: RecordId,
    pub alias: Alias,
    pub target: Target,
}

impl UrlRecord {
    /// Drops the surrogate key, keeping only the externally visible pair.
    pub fn into_entry(self) -> UrlEntry {
        UrlEntry {
            alias: self.alias,
            target: self.target,
        }
    }
}

/// An `{alias, target}` pair as returned by [`Storage::list`](crate::Storage::list).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UrlEntry {
    pub alias: Alias,
    pub target: Target,
}

impl UrlEntry {
    pub fn new(alias: Alias, target: Target) -> Self {
        Self { alias, target }
    }
}
