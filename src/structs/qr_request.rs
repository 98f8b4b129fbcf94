use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::qr_record::{QrKind, QrRecord};

/// Draft submitted by the generator page
#[derive(Deserialize, Validate, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateQrRequest {
    #[serde(rename = "type")]
    pub kind: Option<QrKind>,
    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    pub content: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub color_dark: Option<String>,
    pub color_light: Option<String>,
    pub size: Option<u32>,
    pub logo_data_url: Option<String>,
    #[validate(range(min = 5, max = 50, message = "Logo size must be between 5% and 50%"))]
    pub logo_size_percent: Option<u32>,
    #[validate(range(max = 50, message = "Logo radius must be between 0 and 50"))]
    pub logo_radius: Option<u32>,
}

/// Partial update; absent fields keep their stored value
#[derive(Deserialize, Validate, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQrRequest {
    #[validate(length(max = 200, message = "Name must be at most 200 characters"))]
    pub name: Option<String>,
    pub content: Option<String>,
    // `null` clears the expiry, a missing field leaves it alone
    #[serde(default, deserialize_with = "present")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub color_dark: Option<String>,
    pub color_light: Option<String>,
    pub size: Option<u32>,
    pub logo_data_url: Option<String>,
    #[validate(range(min = 5, max = 50, message = "Logo size must be between 5% and 50%"))]
    pub logo_size_percent: Option<u32>,
    #[validate(range(max = 50, message = "Logo radius must be between 0 and 50"))]
    pub logo_radius: Option<u32>,
}

/// Static code rendered on the fly and never stored
#[derive(Deserialize, Validate, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RenderQrRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub color_dark: Option<String>,
    pub color_light: Option<String>,
    pub size: Option<u32>,
    pub logo_data_url: Option<String>,
    #[validate(range(min = 5, max = 50, message = "Logo size must be between 5% and 50%"))]
    pub logo_size_percent: Option<u32>,
    #[validate(range(max = 50, message = "Logo radius must be between 0 and 50"))]
    pub logo_radius: Option<u32>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRecordResponse {
    #[serde(flatten)]
    pub record: QrRecord,
    pub resolve_url: String,
}

#[derive(Deserialize)]
pub struct ImageParams {
    pub download: Option<bool>,
}
