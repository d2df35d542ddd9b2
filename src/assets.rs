// src/assets.rs
// Directory-backed store for uploaded proof-of-payment images.

use crate::store::StoreError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// URL prefix under which stored assets are served by the static layer.
pub const UPLOAD_PREFIX: &str = "/uploads";

static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp, bumped past the previous value so two uploads
/// landing in the same millisecond still get distinct file names.
fn next_stamp() -> u64 {
    let now = chrono::Utc::now().timestamp_millis() as u64;
    match LAST_STAMP.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now.max(last + 1))
    }) {
        Ok(prev) | Err(prev) => now.max(prev + 1),
    }
}

/// Stores uploaded binaries under a fixed directory and hands out
/// `/uploads/<name>` references for them. No content validation and no
/// size limits here; upstream layers impose those.
#[derive(Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    /// Open (and create if missing) the upload directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory the assets live in, for the static-serving layer.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` to a fresh file named `<stamp><ext>` and return its
    /// public reference path.
    pub fn put(&self, bytes: &[u8], original_name: &str) -> Result<String, StoreError> {
        let ext = Path::new(original_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let file_name = format!("{}{}", next_stamp(), ext);
        fs::write(self.dir.join(&file_name), bytes)?;
        info!("stored asset {}/{}", UPLOAD_PREFIX, file_name);
        Ok(format!("{}/{}", UPLOAD_PREFIX, file_name))
    }

    /// Whether the referenced file is present on disk.
    pub fn exists(&self, reference: &str) -> bool {
        self.resolve(reference).map(|p| p.exists()).unwrap_or(false)
    }

    /// Remove the referenced file. Absence is not an error.
    pub fn delete(&self, reference: &str) -> Result<(), StoreError> {
        if let Some(path) = self.resolve(reference) {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    // Only the final path component is honoured, so a reference can never
    // escape the upload directory.
    fn resolve(&self, reference: &str) -> Option<PathBuf> {
        Path::new(reference)
            .file_name()
            .map(|name| self.dir.join(name))
    }
}
