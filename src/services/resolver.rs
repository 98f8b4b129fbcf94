use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::models::qr_record::QrRecord;
use crate::services::qr_service::QrService;

/// Outcome of dereferencing a dynamic code's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NotFound,
    Expired,
    EmptyContent,
    Redirect(String),
    Text(String),
}

/// True when `value` starts with an `http://` or `https://` scheme, ignoring case.
pub fn looks_like_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"].iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Trim the URL and drop embedded tabs and line breaks, as browsers do when parsing one.
pub fn redirect_target(content: &str) -> String {
    content
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '\t' | '\n' | '\r'))
        .collect()
}

/// Decide what a record resolves to at `now`.
pub fn classify(record: Option<&QrRecord>, now: DateTime<Utc>) -> Resolution {
    let Some(record) = record else {
        return Resolution::NotFound;
    };
    if record.is_expired_at(now) {
        return Resolution::Expired;
    }
    if record.content.trim().is_empty() {
        return Resolution::EmptyContent;
    }
    if looks_like_url(&record.content) {
        Resolution::Redirect(redirect_target(&record.content))
    } else {
        Resolution::Text(record.content.clone())
    }
}

pub async fn resolve(service: &QrService, id: &str) -> Result<Resolution> {
    let record = service.find(id).await?;
    Ok(classify(record.as_ref(), Utc::now()))
}
