use actix_web::{HttpResponse, http::header, web};
use log::warn;

use crate::errors::{QrError, Result};
use crate::models::qr_record::QrRecord;
use crate::state::app_state::AppState;
use crate::structs::qr_request::{
    CreateQrRequest, ImageParams, QrRecordResponse, UpdateQrRequest,
};
use crate::utils::render::{render_png, render_svg};

fn to_response(state: &AppState, record: QrRecord) -> QrRecordResponse {
    QrRecordResponse {
        resolve_url: state.resolve_url(&record.id),
        record,
    }
}

/// List saved dynamic QR codes, newest first
pub async fn list_qrs(app_state: web::Data<AppState>) -> Result<HttpResponse> {
    let records = app_state.qrs.list().await?;
    let body: Vec<QrRecordResponse> = records
        .into_iter()
        .map(|r| to_response(&app_state, r))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Save a new dynamic QR code
pub async fn create_qr(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<CreateQrRequest>,
) -> Result<HttpResponse> {
    let record = app_state.qrs.create(req).await?;
    Ok(HttpResponse::Created().json(to_response(&app_state, record)))
}

pub async fn get_qr(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let record = app_state.qrs.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(&app_state, record)))
}

pub async fn update_qr(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    web::Json(req): web::Json<UpdateQrRequest>,
) -> Result<HttpResponse> {
    let record = app_state.qrs.update(&path.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(to_response(&app_state, record)))
}

pub async fn delete_qr(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    app_state.qrs.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "ok": true })))
}

/// Look up a record for image rendering; expired codes are gone
async fn renderable(app_state: &AppState, id: &str) -> Result<QrRecord> {
    let record = app_state.qrs.get(id).await?;
    if record.is_expired() {
        warn!("Refusing to render expired QR code {}", id);
        return Err(QrError::Expired(id.to_string()));
    }
    Ok(record)
}

fn attachment(filename: String) -> (header::HeaderName, String) {
    (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", filename),
    )
}

/// SVG image encoding the resolve URL of a dynamic code
pub async fn qr_svg(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ImageParams>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let record = renderable(&app_state, &id).await?;
    let svg = render_svg(&app_state.resolve_url(&id), &record.style)?;

    let mut res = HttpResponse::Ok();
    res.content_type("image/svg+xml");
    if query.download.unwrap_or(false) {
        res.insert_header(attachment(format!("qr-{}.svg", id)));
    }
    Ok(res.body(svg))
}

/// PNG image encoding the resolve URL, with the record's logo composited
pub async fn qr_png(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ImageParams>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let record = renderable(&app_state, &id).await?;
    let data = app_state.resolve_url(&id);
    let style = record.style;
    let png = web::block(move || render_png(&data, &style))
        .await
        .map_err(|e| QrError::RenderFailed(e.to_string()))??;

    let mut res = HttpResponse::Ok();
    res.content_type("image/png");
    if query.download.unwrap_or(false) {
        res.insert_header(attachment(format!("qr-{}.png", id)));
    }
    Ok(res.body(png))
}
