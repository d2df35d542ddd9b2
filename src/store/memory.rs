// In-memory storage backend for tests and ephemeral runs.
use super::{build_record, NewTransaction, RecordStore, StoreError, TransactionRecord};
use crate::assets::AssetStore;
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::warn;

/// In-memory record store. Mirrors the file backend's semantics, including
/// the "no document yet" state before the first create.
pub struct MemoryStore {
    assets: AssetStore,
    // None until the first create, matching a file store with no document.
    inner: Mutex<Option<Vec<TransactionRecord>>>,
}

impl MemoryStore {
    pub fn new(assets: AssetStore) -> Self {
        Self {
            assets,
            inner: Mutex::new(None),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<TransactionRecord>>> {
        // Recover the data even if a previous holder panicked.
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("memory store mutex poisoned - recovering data");
            poisoned.into_inner()
        })
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(
        &self,
        fields: NewTransaction,
        bukti: &str,
    ) -> Result<TransactionRecord, StoreError> {
        let record = build_record(fields, bukti)?;
        let mut guard = self.lock();
        guard.get_or_insert_with(Vec::new).push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let guard = self.lock();
        Ok(guard.clone().unwrap_or_default())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut guard = self.lock();
        let records = guard.as_mut().ok_or(StoreError::NoDocument)?;
        let idx = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = records.remove(idx);

        if let Err(e) = self.assets.delete(&removed.bukti) {
            warn!("could not remove proof asset {}: {}", removed.bukti, e);
        }
        Ok(())
    }
}
