use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("{0}")]
    ValidationFailed(String),

    #[error("Static QR codes are not stored, download the image directly")]
    NotPersistable,

    #[error("QR code not found: {0}")]
    NotFound(String),

    #[error("QR code has expired: {0}")]
    Expired(String),

    #[error("Failed to render QR code: {0}")]
    RenderFailed(String),

    #[error("Storage error: {0}")]
    StorageFailure(String),
}

pub type Result<T> = std::result::Result<T, QrError>;

impl From<std::io::Error> for QrError {
    fn from(err: std::io::Error) -> Self {
        QrError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for QrError {
    fn from(err: serde_json::Error) -> Self {
        QrError::StorageFailure(err.to_string())
    }
}

impl From<validator::ValidationErrors> for QrError {
    fn from(errors: validator::ValidationErrors) -> Self {
        QrError::ValidationFailed(errors.to_string())
    }
}

impl From<image::ImageError> for QrError {
    fn from(err: image::ImageError) -> Self {
        QrError::RenderFailed(err.to_string())
    }
}

impl From<qrcode::types::QrError> for QrError {
    fn from(err: qrcode::types::QrError) -> Self {
        QrError::RenderFailed(err.to_string())
    }
}

impl ResponseError for QrError {
    fn status_code(&self) -> StatusCode {
        match self {
            QrError::ValidationFailed(_) | QrError::NotPersistable => StatusCode::BAD_REQUEST,
            QrError::NotFound(_) => StatusCode::NOT_FOUND,
            QrError::Expired(_) => StatusCode::GONE,
            QrError::RenderFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QrError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let QrError::StorageFailure(msg) = self {
            log::error!("Storage failure: {}", msg);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
