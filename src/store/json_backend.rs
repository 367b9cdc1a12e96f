//! JSON-file backend — whole-list persistence plus a derived CSV export.
//!
//! The record list is loaded wholesale at startup and rewritten wholesale on
//! every append; there is no incremental persistence. The CSV projection is
//! regenerated from scratch alongside it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{ExportError, StorageError};
use crate::store::model::RegistrationEntry;
use crate::store::registrations::RegistrationStore;

const REGISTER_JSON: &str = "registrations.json";
const REGISTER_CSV: &str = "registrations.csv";

/// File-backed registration store.
///
/// Entries are mirrored in memory behind a single mutex; the lock enforces
/// the single-writer discipline for the two output files.
pub struct JsonFileStore {
    json_path: PathBuf,
    csv_path: PathBuf,
    entries: Mutex<Vec<RegistrationEntry>>,
}

impl JsonFileStore {
    /// Open (or create) the store under `data_dir`.
    pub async fn open(data_dir: &Path) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(data_dir).await?;

        let json_path = data_dir.join(REGISTER_JSON);
        let entries: Vec<RegistrationEntry> = match tokio::fs::read(&json_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %json_path.display(),
            count = entries.len(),
            "Registration store opened"
        );

        Ok(Self {
            json_path,
            csv_path: data_dir.join(REGISTER_CSV),
            entries: Mutex::new(entries),
        })
    }

    /// Path of the derived CSV export.
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

#[async_trait]
impl RegistrationStore for JsonFileStore {
    async fn append(&self, entry: RegistrationEntry) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;

        // Write a candidate list first; memory is updated only after the
        // file write succeeds, so a failed append leaves no trace.
        let mut next = entries.clone();
        next.push(entry);
        let json = serde_json::to_string_pretty(&next)?;
        tokio::fs::write(&self.json_path, json).await?;

        *entries = next;
        Ok(())
    }

    async fn export_table(&self) -> Result<(), ExportError> {
        let entries = self.entries.lock().await;

        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in entries.iter() {
            for row in entry.table_rows() {
                writer.serialize(row)?;
            }
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))?;

        tokio::fs::write(&self.csv_path, bytes).await?;
        Ok(())
    }

    async fn entries(&self) -> Vec<RegistrationEntry> {
        self.entries.lock().await.clone()
    }
}
