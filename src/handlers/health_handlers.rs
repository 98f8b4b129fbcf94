use actix_web::{HttpResponse, web};

use crate::state::app_state::AppState;

pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    // Loading the collection proves the data file is readable
    match state.qrs.store().load_all().await {
        Ok(records) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "records": records.len()
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e.to_string()
        })),
    }
}
