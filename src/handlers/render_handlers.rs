use actix_web::{HttpResponse, web};
use validator::Validate;

use crate::errors::{QrError, Result};
use crate::models::qr_record::QrStyle;
use crate::services::qr_service::normalize_style;
use crate::structs::qr_request::RenderQrRequest;
use crate::utils::render::render_png;

/// Render a static QR code. Nothing is stored; the payload is the content itself.
pub async fn render_static_qr(web::Json(req): web::Json<RenderQrRequest>) -> Result<HttpResponse> {
    req.validate()?;

    let defaults = QrStyle::default();
    let style = normalize_style(QrStyle {
        color_dark: req.color_dark.unwrap_or(defaults.color_dark),
        color_light: req.color_light.unwrap_or(defaults.color_light),
        size: req.size.unwrap_or(defaults.size),
        logo_data_url: req.logo_data_url.unwrap_or_default(),
        logo_size_percent: req.logo_size_percent.unwrap_or(defaults.logo_size_percent),
        logo_radius: req.logo_radius.unwrap_or(defaults.logo_radius),
    })?;

    let content = req.content;
    let png = web::block(move || render_png(&content, &style))
        .await
        .map_err(|e| QrError::RenderFailed(e.to_string()))??;

    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}
