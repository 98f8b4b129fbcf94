use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{error, info, warn};
use serde_json::Value;
use tokio::fs;

use super::store::RecordStore;
use crate::errors::Result;
use crate::models::qr_record::QrRecord;

/// Stores the collection as a pretty-printed JSON array in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store, creating the data directory and an empty file if needed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        store.ensure_file().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_file(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && fs::metadata(dir).await.is_err() {
                fs::create_dir_all(dir).await?;
                info!("Created data directory {}", dir.display());
            }
        }
        if fs::metadata(&self.path).await.is_err() {
            fs::write(&self.path, "[]").await?;
            info!("Initialized {} with an empty collection", self.path.display());
        }
        Ok(())
    }

    async fn write_atomic(&self, body: &str) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Decode one stored entry; `null` members fall back to their defaults.
fn decode_record(mut entry: Value) -> serde_json::Result<QrRecord> {
    if let Value::Object(fields) = &mut entry {
        fields.retain(|_, value| !value.is_null());
    }
    serde_json::from_value(entry)
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<QrRecord>> {
        self.ensure_file().await?;

        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            error!("Read of {} failed: {}", self.path.display(), e);
            e
        })?;

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        // Only a syntax error or a non-array document counts as corruption
        let entries = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Failed to parse {}, resetting to an empty collection: {}",
                    self.path.display(),
                    e
                );
                self.write_atomic("[]").await?;
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let records: Vec<QrRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| match decode_record(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping unreadable QR record #{}: {}", idx, e);
                    None
                }
            })
            .collect();

        info!("Loaded {} of {} QR records", records.len(), total);
        Ok(records)
    }

    async fn save_all(&self, records: &[QrRecord]) -> Result<()> {
        self.ensure_file().await?;
        let json = serde_json::to_string_pretty(records)?;
        if let Err(e) = self.write_atomic(&json).await {
            error!(
                "Write of {} records to {} failed: {}",
                records.len(),
                self.path.display(),
                e
            );
            return Err(e);
        }
        info!("Saved {} QR records", records.len());
        Ok(())
    }
}
