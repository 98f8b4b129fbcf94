use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Untitled";
pub const DEFAULT_COLOR_DARK: &str = "#0f172a";
pub const DEFAULT_COLOR_LIGHT: &str = "#ffffff";
pub const DEFAULT_SIZE: u32 = 320;
pub const DEFAULT_LOGO_SIZE_PERCENT: u32 = 20;
pub const DEFAULT_LOGO_RADIUS: u32 = 12;

/// Pixel sizes offered by the generator page.
pub const SIZE_PRESETS: [u32; 4] = [240, 320, 420, 560];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QrKind {
    Static,  // Payload is the final content, generated client-side only
    Dynamic, // Payload is the resolver URL, destination stored here
}

/// Cosmetic rendering options shared by stored records and ad-hoc renders.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QrStyle {
    #[serde(default = "default_color_dark")]
    pub color_dark: String,
    #[serde(default = "default_color_light")]
    pub color_light: String,
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default)]
    pub logo_data_url: String,
    #[serde(default = "default_logo_size_percent")]
    pub logo_size_percent: u32,
    #[serde(default = "default_logo_radius")]
    pub logo_radius: u32,
}

fn default_color_dark() -> String {
    DEFAULT_COLOR_DARK.to_string()
}

fn default_color_light() -> String {
    DEFAULT_COLOR_LIGHT.to_string()
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

fn default_logo_size_percent() -> u32 {
    DEFAULT_LOGO_SIZE_PERCENT
}

fn default_logo_radius() -> u32 {
    DEFAULT_LOGO_RADIUS
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            color_dark: DEFAULT_COLOR_DARK.to_string(),
            color_light: DEFAULT_COLOR_LIGHT.to_string(),
            size: DEFAULT_SIZE,
            logo_data_url: String::new(),
            logo_size_percent: DEFAULT_LOGO_SIZE_PERCENT,
            logo_radius: DEFAULT_LOGO_RADIUS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QrRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: QrKind,
    pub content: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub style: QrStyle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QrRecord {
    pub fn new_dynamic(
        name: String,
        content: String,
        expires_at: Option<DateTime<Utc>>,
        style: QrStyle,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            kind: QrKind::Dynamic,
            content,
            expires_at,
            style,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == QrKind::Dynamic
    }

    /// Expired only once the deadline is strictly in the past.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expiry) => expiry < now,
            None => false, // No expiration date means it never expires
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Refresh `updated_at`, keeping it strictly increasing even if the clock has not moved.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + chrono::Duration::milliseconds(1)
        };
    }
}
