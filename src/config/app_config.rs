use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_JSON_LIMIT: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub data_file: PathBuf,
    /// Path prefix every route is mounted under, e.g. `/qr-tool`
    pub base_path: String,
    /// Origin used when building resolve URLs that end up inside QR images
    pub public_base_url: String,
    pub cors_origins: Vec<String>,
    pub json_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => 8080,
        };

        let json_limit = match lookup("JSON_LIMIT_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("JSON_LIMIT_BYTES must be a byte count, got {:?}", raw))?,
            None => DEFAULT_JSON_LIMIT,
        };

        let base_path = normalize_base_path(&lookup("BASE_PATH").unwrap_or_default());

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            data_file: lookup("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/qr-codes.json")),
            base_path,
            public_base_url,
            cors_origins,
            json_limit,
        })
    }

    /// Public prefix for links handed out to clients (origin plus base path).
    pub fn public_prefix(&self) -> String {
        format!("{}{}", self.public_base_url, self.base_path)
    }
}

/// `"qr-tool/"` becomes `"/qr-tool"`; `"/"` and `""` become `""`.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
