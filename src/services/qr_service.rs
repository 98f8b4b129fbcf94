use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;
use validator::Validate;

use crate::db::store::RecordStore;
use crate::errors::{QrError, Result};
use crate::models::qr_record::{DEFAULT_NAME, QrKind, QrRecord, QrStyle, SIZE_PRESETS};
use crate::structs::qr_request::{CreateQrRequest, UpdateQrRequest};
use crate::utils::color::{parse_color, to_hex};
use crate::utils::render::decode_data_url;

/// Create, update, delete and list dynamic QR records.
///
/// Every operation loads the whole collection and writes it back. Mutations made
/// through the same service are serialized; writers in other processes are not.
#[derive(Clone)]
pub struct QrService {
    store: Arc<dyn RecordStore>,
    write_lock: Arc<Mutex<()>>,
}

impl QrService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub async fn create(&self, req: CreateQrRequest) -> Result<QrRecord> {
        if req.kind != Some(QrKind::Dynamic) {
            return Err(QrError::NotPersistable);
        }
        require_content(&req.content)?;
        req.validate()?;

        let defaults = QrStyle::default();
        let style = normalize_style(QrStyle {
            color_dark: non_empty(req.color_dark).unwrap_or(defaults.color_dark),
            color_light: non_empty(req.color_light).unwrap_or(defaults.color_light),
            size: req.size.filter(|s| *s > 0).unwrap_or(defaults.size),
            logo_data_url: req.logo_data_url.unwrap_or_default(),
            logo_size_percent: req.logo_size_percent.unwrap_or(defaults.logo_size_percent),
            logo_radius: req.logo_radius.unwrap_or(defaults.logo_radius),
        })?;

        let name = req
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let record = QrRecord::new_dynamic(name, req.content, req.expires_at, style);

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load_all().await?;
        records.insert(0, record.clone());
        self.store.save_all(&records).await?;

        info!("Created dynamic QR code {} ({})", record.id, record.name);
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Result<QrRecord> {
        self.store
            .load_all()
            .await?
            .into_iter()
            .find(|r| r.id == id && r.is_dynamic())
            .ok_or_else(|| QrError::NotFound(id.to_string()))
    }

    /// Any record with this id, regardless of kind.
    pub async fn find(&self, id: &str) -> Result<Option<QrRecord>> {
        Ok(self
            .store
            .load_all()
            .await?
            .into_iter()
            .find(|r| r.id == id))
    }

    pub async fn list(&self) -> Result<Vec<QrRecord>> {
        let records = self.store.load_all().await?;
        Ok(records.into_iter().filter(QrRecord::is_dynamic).collect())
    }

    pub async fn update(&self, id: &str, req: UpdateQrRequest) -> Result<QrRecord> {
        req.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load_all().await?;
        let current = records
            .iter_mut()
            .find(|r| r.id == id && r.is_dynamic())
            .ok_or_else(|| QrError::NotFound(id.to_string()))?;

        let mut updated = current.clone();
        if let Some(name) = req.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(QrError::ValidationFailed("Name cannot be empty".to_string()));
            }
            updated.name = name.to_string();
        }
        if let Some(content) = req.content {
            updated.content = content;
        }
        if let Some(expires_at) = req.expires_at {
            updated.expires_at = expires_at;
        }
        if let Some(color) = non_empty(req.color_dark) {
            updated.style.color_dark = color;
        }
        if let Some(color) = non_empty(req.color_light) {
            updated.style.color_light = color;
        }
        if let Some(size) = req.size.filter(|s| *s > 0) {
            updated.style.size = size;
        }
        if let Some(logo) = req.logo_data_url {
            updated.style.logo_data_url = logo;
        }
        if let Some(percent) = req.logo_size_percent {
            updated.style.logo_size_percent = percent;
        }
        if let Some(radius) = req.logo_radius {
            updated.style.logo_radius = radius;
        }

        require_content(&updated.content)?;
        updated.style = normalize_style(updated.style)?;
        updated.touch();

        *current = updated.clone();
        self.store.save_all(&records).await?;

        info!("Updated dynamic QR code {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.load_all().await?;
        let idx = records
            .iter()
            .position(|r| r.id == id && r.is_dynamic())
            .ok_or_else(|| QrError::NotFound(id.to_string()))?;

        records.remove(idx);
        self.store.save_all(&records).await?;

        info!("Deleted dynamic QR code {}", id);
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(QrError::ValidationFailed("Content is required".to_string()));
    }
    Ok(())
}

/// Check the cosmetic fields and store colors in `#rrggbb` form.
pub fn normalize_style(mut style: QrStyle) -> Result<QrStyle> {
    if !SIZE_PRESETS.contains(&style.size) {
        return Err(QrError::ValidationFailed(format!(
            "Size must be one of {:?}",
            SIZE_PRESETS
        )));
    }
    if !(5..=50).contains(&style.logo_size_percent) {
        return Err(QrError::ValidationFailed(
            "Logo size must be between 5% and 50%".to_string(),
        ));
    }
    if style.logo_radius > 50 {
        return Err(QrError::ValidationFailed(
            "Logo radius must be between 0 and 50".to_string(),
        ));
    }

    style.color_dark = parse_color(&style.color_dark)
        .map(to_hex)
        .ok_or_else(|| QrError::ValidationFailed(format!("Invalid color: {}", style.color_dark)))?;
    style.color_light = parse_color(&style.color_light)
        .map(to_hex)
        .ok_or_else(|| QrError::ValidationFailed(format!("Invalid color: {}", style.color_light)))?;

    if !style.logo_data_url.is_empty() {
        decode_data_url(&style.logo_data_url)?;
    }
    Ok(style)
}
