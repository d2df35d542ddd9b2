// JSON-file storage backend: the whole collection lives in one
// pretty-printed array document and every mutation is a full
// load-modify-store cycle behind a single-writer lock.
use super::{build_record, NewTransaction, RecordStore, StoreError, TransactionRecord};
use crate::assets::AssetStore;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// File-backed record store.
pub struct JsonFileStore {
    path: PathBuf,
    assets: AssetStore,
    // Held across every load-modify-store cycle. Two concurrent mutations
    // would otherwise race on the document and the last writer would
    // silently drop the other's write.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, assets: AssetStore) -> Self {
        Self {
            path: path.into(),
            assets,
            lock: Mutex::new(()),
        }
    }

    /// Path of the collection document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when no document has been written yet; an empty file reads
    /// as an empty collection.
    fn load(&self) -> Result<Option<Vec<TransactionRecord>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Rewrite the whole document. Goes through a sibling temp file and a
    /// rename so a crash mid-write never leaves a truncated document.
    fn persist(&self, records: &[TransactionRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn create(
        &self,
        fields: NewTransaction,
        bukti: &str,
    ) -> Result<TransactionRecord, StoreError> {
        let record = build_record(fields, bukti)?;

        let _guard = self.lock.lock().await;
        let mut records = self.load()?.unwrap_or_default();
        records.push(record.clone());
        self.persist(&records)?;

        info!("stored transaksi {} ({})", record.id, record.bukti);
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load()?.unwrap_or_default())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load()?.ok_or(StoreError::NoDocument)?;
        let idx = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = records.remove(idx);

        // Proof asset removal is best-effort; the record itself always goes.
        if let Err(e) = self.assets.delete(&removed.bukti) {
            warn!("could not remove proof asset {}: {}", removed.bukti, e);
        }

        self.persist(&records)?;
        info!("removed transaksi {}", removed.id);
        Ok(())
    }
}
