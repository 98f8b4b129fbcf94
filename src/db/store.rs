use async_trait::async_trait;

use crate::errors::Result;
use crate::models::qr_record::QrRecord;

/// Whole-collection persistence for QR records.
///
/// Records are kept in insertion order with the newest first. Callers load the
/// full collection, mutate it in memory and save it back; implementations do not
/// coordinate concurrent writers.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every stored record. A missing or unreadable collection is empty.
    async fn load_all(&self) -> Result<Vec<QrRecord>>;

    /// Replaces the stored collection with `records`.
    async fn save_all(&self, records: &[QrRecord]) -> Result<()>;
}
