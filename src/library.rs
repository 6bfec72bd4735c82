//! Scratch list of uploaded documents.
//!
//! Records live in `library.json` under the configured cache directory. A
//! missing or unreadable file is treated as an empty list so a broken scratch
//! file never blocks an upload.

use crate::config::AppConfig;
use crate::upload::{RecordStatus, UploadRecord};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LIBRARY_FILE: &str = "library.json";

#[derive(Debug, Clone)]
pub struct UploadStore {
    path: PathBuf,
}

impl UploadStore {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(LIBRARY_FILE),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.cache_dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Vec<UploadRecord> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(err) => {
                warn!(path = %self.path.display(), "Ignoring unreadable upload list: {err}");
                Vec::new()
            }
        }
    }

    pub fn append(&self, record: UploadRecord) -> Result<()> {
        let mut records = self.load();
        debug!(id = record.id, title = %record.title, "Appending upload record");
        records.push(record);
        self.save(&records)
    }

    /// Update status and progress of one record. Returns false if `id` is unknown.
    pub fn update(&self, id: u64, status: RecordStatus, progress: u8) -> Result<bool> {
        let mut records = self.load();
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return Ok(false);
        };
        record.status = status;
        record.progress = progress.min(100);
        self.save(&records)?;
        Ok(true)
    }

    fn save(&self, records: &[UploadRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create_dir_all {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(records)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("rename into {}", self.path.display()))?;
        Ok(())
    }
}
