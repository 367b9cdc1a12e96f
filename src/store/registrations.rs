//! Backend-agnostic `RegistrationStore` trait.

use async_trait::async_trait;

use crate::error::{ExportError, StorageError};
use crate::store::model::RegistrationEntry;

/// Durable store of finalized registrations.
///
/// The record list is the source of truth; the tabular export is a derived
/// projection regenerated wholesale. The two are not written atomically
/// together — callers decide how to react when the export fails after a
/// successful append.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Append a finalized registration and persist the full record list.
    async fn append(&self, entry: RegistrationEntry) -> Result<(), StorageError>;

    /// Regenerate the flat tabular export (one row per child).
    async fn export_table(&self) -> Result<(), ExportError>;

    /// Snapshot of all persisted entries, in insertion order.
    async fn entries(&self) -> Vec<RegistrationEntry>;

    /// Number of persisted entries.
    async fn len(&self) -> usize {
        self.entries().await.len()
    }
}
