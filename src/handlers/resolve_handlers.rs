use actix_web::http::{StatusCode, header, header::HeaderValue};
use actix_web::{HttpResponse, web};
use log::info;

use crate::errors::Result;
use crate::services::resolver::{Resolution, resolve};
use crate::state::app_state::AppState;
use crate::utils::html::message_page;

fn html(status: StatusCode, title: &str, body: &str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(message_page(title, body))
}

/// Dereference a dynamic code: redirect to a URL or show its text
pub async fn resolve_qr(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();

    let response = match resolve(&app_state.qrs, &id).await? {
        Resolution::NotFound => html(StatusCode::NOT_FOUND, "Not found", "QR code not found"),
        Resolution::Expired => html(StatusCode::GONE, "Expired", "This QR code has expired"),
        Resolution::EmptyContent => html(
            StatusCode::BAD_REQUEST,
            "Empty",
            "This QR code has no content",
        ),
        Resolution::Redirect(target) => match HeaderValue::from_str(&target) {
            Ok(location) => {
                info!("Resolved {} to redirect {}", id, target);
                HttpResponse::TemporaryRedirect()
                    .append_header((header::LOCATION, location))
                    .finish()
            }
            // Not usable as a Location header, show it as text instead
            Err(_) => html(StatusCode::OK, "QR content", &target),
        },
        Resolution::Text(content) => html(StatusCode::OK, "QR content", &content),
    };

    Ok(response)
}
