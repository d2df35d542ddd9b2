// src/config.rs
// Environment-driven configuration with startup validation

use crate::store::StoreMode;
use anyhow::Context;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_addr: SocketAddr,
    /// Path of the JSON document holding the whole collection.
    pub data_path: PathBuf,
    /// Directory the uploaded proof images live in.
    pub upload_dir: PathBuf,
    /// Directory served statically at the root.
    pub public_dir: PathBuf,
    pub store_mode: StoreMode,
}

impl Config {
    /// Read configuration from the environment. `API_ADDR` wins over `PORT`;
    /// everything has a default so a bare `start` works out of the box.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT").unwrap_or_else(|_| "3000".into());
        let api_addr = env::var("API_ADDR").unwrap_or_else(|_| format!("0.0.0.0:{}", port));
        let api_addr: SocketAddr = api_addr
            .parse()
            .with_context(|| format!("API_ADDR has invalid format: '{}'", api_addr))?;

        let data_path = env::var("DATA_PATH").unwrap_or_else(|_| "public/transaksi.json".into());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
        let public_dir = env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".into());
        let store_mode = StoreMode::from_str(&env::var("STORE_MODE").unwrap_or_default());

        Ok(Self {
            api_addr,
            data_path: data_path.into(),
            upload_dir: upload_dir.into(),
            public_dir: public_dir.into(),
            store_mode,
        })
    }

    /// Validate the configuration before the server starts.
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::new();

        info!("validating configuration...");

        if let StoreMode::Memory = self.store_mode {
            validation.add_warning(
                "STORE_MODE=memory - records are lost when the process exits".into(),
            );
        }

        if let Some(parent) = self.data_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                validation.add_warning(format!(
                    "data directory {} does not exist yet - it will be created on first write",
                    parent.display()
                ));
            }
        }

        if self.data_path.exists() && self.data_path.is_dir() {
            validation.add_error(format!(
                "DATA_PATH {} is a directory, expected a file",
                self.data_path.display()
            ));
        }

        if self.upload_dir.exists() && !self.upload_dir.is_dir() {
            validation.add_error(format!(
                "UPLOAD_DIR {} exists but is not a directory",
                self.upload_dir.display()
            ));
        }

        if !self.public_dir.exists() {
            validation.add_warning(format!(
                "PUBLIC_DIR {} does not exist - static frontend will 404",
                self.public_dir.display()
            ));
        }

        validation
    }
}

/// Validation result for configuration checks
pub struct ConfigValidation {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    fn new() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn add_warning(&mut self, msg: String) {
        self.warnings.push(msg);
    }

    fn add_error(&mut self, msg: String) {
        self.errors.push(msg);
        self.valid = false;
    }

    pub fn print_summary(&self) {
        if !self.warnings.is_empty() {
            warn!("configuration warnings:");
            for w in &self.warnings {
                warn!("   - {}", w);
            }
        }

        if !self.errors.is_empty() {
            error!("configuration errors:");
            for e in &self.errors {
                error!("   - {}", e);
            }
        }

        if self.valid && self.warnings.is_empty() {
            info!("configuration validation passed");
        }
    }
}
