// Storage abstraction layer - file-backed JSON by default, in-memory for tests
use crate::assets::AssetStore;
use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod json_file;
pub mod memory;

// Re-exports
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// A single persisted payment confirmation.
///
/// Field names are the wire format: they appear verbatim in API responses
/// and in the persisted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub nama: String,
    pub telepon: String,
    pub alamat: String,
    pub metode: String,
    /// Stored verbatim, number or string; no arithmetic is ever done on it.
    pub total: JsonValue,
    /// Reference to the proof asset, e.g. `/uploads/1700000000000.png`.
    pub bukti: String,
    pub tanggal: String,
}

/// Caller-supplied fields for a new record.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub nama: String,
    pub telepon: String,
    pub alamat: String,
    pub metode: String,
    pub total: JsonValue,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// No collection document has ever been written.
    #[error("no persisted collection")]
    NoDocument,

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage io error")]
    Io(#[from] std::io::Error),

    #[error("stored document is not valid JSON")]
    Corrupt(#[from] serde_json::Error),
}

/// Record store contract - implemented by the JSON-file and in-memory backends.
///
/// Records are immutable once created; the only mutations are `create` and
/// `delete_by_id`. Deleting a record also deletes its proof asset (asset
/// removal is best-effort, record removal is guaranteed once the id matched).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a new record. `bukti` must be a non-empty asset reference.
    async fn create(
        &self,
        fields: NewTransaction,
        bukti: &str,
    ) -> Result<TransactionRecord, StoreError>;

    /// All records in insertion order; empty when no document exists yet.
    async fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Remove the record and its proof asset.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

/// Build a record with a fresh id and localized timestamp.
/// Runs before any I/O so a failed validation never touches the document.
pub(crate) fn build_record(
    fields: NewTransaction,
    bukti: &str,
) -> Result<TransactionRecord, StoreError> {
    if bukti.trim().is_empty() {
        return Err(StoreError::Validation("missing proof asset".into()));
    }
    Ok(TransactionRecord {
        id: Uuid::new_v4().to_string(),
        nama: fields.nama,
        telepon: fields.telepon,
        alamat: fields.alamat,
        metode: fields.metode,
        total: fields.total,
        bukti: bukti.to_string(),
        tanggal: Local::now().format("%-d/%-m/%Y, %H.%M.%S").to_string(),
    })
}

/// Store mode enum
#[derive(Debug, Clone)]
pub enum StoreMode {
    JsonFile,
    Memory,
}

impl StoreMode {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => StoreMode::Memory,
            _ => StoreMode::JsonFile,
        }
    }
}

/// Create a store backend based on mode.
pub fn create_store(
    mode: StoreMode,
    data_path: PathBuf,
    assets: AssetStore,
) -> Arc<dyn RecordStore> {
    match mode {
        StoreMode::JsonFile => Arc::new(JsonFileStore::new(data_path, assets)),
        StoreMode::Memory => Arc::new(MemoryStore::new(assets)),
    }
}
