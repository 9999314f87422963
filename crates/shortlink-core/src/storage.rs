use crate::error::{Backend, Result};
use crate::model::{Alias, RecordId, Target, UrlEntry};
use async_trait::async_trait;
use std::sync::Arc;

/// The capability every storage backend provides.
///
/// Implementations translate each call into native queries and map every
/// native failure into a [`StorageError`](crate::StorageError) before
/// returning, so callers never observe backend-specific error types.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Which engine serves this handle.
    fn backend(&self) -> Backend;

    /// Inserts a new record and returns its assigned id.
    ///
    /// Returns `AlreadyExists` if a live record uses `alias`. The conflict is
    /// detected by the engine's unique constraint, never by a prior lookup.
    async fn save(&self, target: &Target, alias: &Alias) -> Result<RecordId>;

    /// Returns the target stored under `alias`, or `NotFound`.
    async fn get(&self, alias: &Alias) -> Result<Target>;

    /// Removes the record stored under `alias`.
    /// Returns `NotFound` if no row was affected.
    async fn delete(&self, alias: &Alias) -> Result<()>;

    /// Replaces the target of the record stored under `alias`.
    /// Returns `NotFound` if no row was affected.
    async fn update(&self, alias: &Alias, target: &Target) -> Result<()>;

    /// Returns a snapshot of every live record, ordered by creation.
    async fn list(&self) -> Result<Vec<UrlEntry>>;
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn backend(&self) -> Backend {
        (**self).backend()
    }

    async fn save(&self, target: &Target, alias: &Alias) -> Result<RecordId> {
        (**self).save(target, alias).await
    }

    async fn get(&self, alias: &Alias) -> Result<Target> {
        (**self).get(alias).await
    }

    async fn delete(&self, alias: &Alias) -> Result<()> {
        (**self).delete(alias).await
    }

    async fn update(&self, alias: &Alias, target: &Target) -> Result<()> {
        (**self).update(alias, target).await
    }

    async fn list(&self) -> Result<Vec<UrlEntry>> {
        (**self).list().await
    }
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Box<S> {
    fn backend(&self) -> Backend {
        (**self).backend()
    }

    async fn save(&self, target: &Target, alias: &Alias) -> Result<RecordId> {
        (**self).save(target, alias).await
    }

    async fn get(&self, alias: &Alias) -> Result<Target> {
        (**self).get(alias).await
    }

    async fn delete(&self, alias: &Alias) -> Result<()> {
        (**self).delete(alias).await
    }

    async fn update(&self, alias: &Alias, target: &Target) -> Result<()> {
        (**self).update(alias, target).await
    }

    async fn list(&self) -> Result<Vec<UrlEntry>> {
        (**self).list().await
    }
}
