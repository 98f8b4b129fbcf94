use actix_web::web;

use crate::handlers::health_handlers::health_check;
use crate::handlers::qr_handlers::{
    create_qr, delete_qr, get_qr, list_qrs, qr_png, qr_svg, update_qr,
};
use crate::handlers::render_handlers::render_static_qr;
use crate::handlers::resolve_handlers::resolve_qr;
use crate::middlewares::no_store::NoStore;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .wrap(NoStore)
            .route("/health", web::get().to(health_check))
            .route("/render", web::post().to(render_static_qr))
            .service(
                web::scope("/qrs")
                    .route("", web::get().to(list_qrs))
                    .route("", web::post().to(create_qr))
                    .route("/{id}", web::get().to(get_qr))
                    .route("/{id}", web::put().to(update_qr))
                    .route("/{id}", web::delete().to(delete_qr))
                    // Resolver URL is what dynamic QR images encode
                    .route("/{id}/resolve", web::get().to(resolve_qr))
                    .route("/{id}/qr.svg", web::get().to(qr_svg))
                    .route("/{id}/qr.png", web::get().to(qr_png)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use crate::db::json_store::JsonFileStore;
    use crate::services::qr_service::QrService;
    use crate::state::app_state::AppState;

    async fn app_state(dir: &TempDir) -> web::Data<AppState> {
        let store = JsonFileStore::open(dir.path().join("qr-codes.json"))
            .await
            .unwrap();
        web::Data::new(AppState {
            qrs: QrService::new(Arc::new(store)),
            public_prefix: "http://qr.test/qr-tool".to_string(),
        })
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .service(web::scope("/qr-tool").configure(init_routes)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn create_then_resolve_redirects() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/qr-tool/api/qrs")
            .set_json(json!({"type": "dynamic", "name": "x", "content": "https://example.com"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");

        let body: Value = test::read_body_json(resp).await;
        let id = body["id"].as_str().unwrap().to_string();
        assert_eq!(body["type"], "dynamic");
        assert_eq!(
            body["resolveUrl"],
            format!("http://qr.test/qr-tool/api/qrs/{}/resolve", id)
        );

        let req = test::TestRequest::get()
            .uri(&format!("/qr-tool/api/qrs/{}/resolve", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://example.com"
        );
        assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
    }

    #[actix_web::test]
    async fn static_codes_are_rejected() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/qr-tool/api/qrs")
            .set_json(json!({"type": "static", "content": "hello"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("Static"));
        assert!(state.qrs.list().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn text_content_renders_escaped_page() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/qr-tool/api/qrs")
            .set_json(json!({"type": "dynamic", "name": "x", "content": "https://example.com"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/qr-tool/api/qrs/{}", id))
            .set_json(json!({"content": "hello <world>"}))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["content"], "hello <world>");
        assert_eq!(updated["createdAt"], created["createdAt"]);

        let req = test::TestRequest::get()
            .uri(&format!("/qr-tool/api/qrs/{}/resolve", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(
            resp.headers()
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let body = test::read_body(resp).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("hello &lt;world&gt;"));
    }

    #[actix_web::test]
    async fn expired_and_deleted_codes() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let past = (Utc::now() - Duration::hours(1)).to_rfc3339();
        let req = test::TestRequest::post()
            .uri("/qr-tool/api/qrs")
            .set_json(json!({
                "type": "dynamic",
                "name": "old",
                "content": "https://example.com",
                "expiresAt": past
            }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/qr-tool/api/qrs/{}/resolve", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::GONE);
        assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");

        let req = test::TestRequest::get()
            .uri(&format!("/qr-tool/api/qrs/{}/qr.svg", id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::GONE);

        // The record itself is still listed
        let req = test::TestRequest::get().uri("/qr-tool/api/qrs").to_request();
        let list: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/qr-tool/api/qrs/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        for uri in [
            format!("/qr-tool/api/qrs/{}/resolve", id),
            format!("/qr-tool/api/qrs/{}", id),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
        }

        let req = test::TestRequest::delete()
            .uri(&format!("/qr-tool/api/qrs/{}", id))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn url_with_line_breaks_still_redirects() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/qr-tool/api/qrs")
            .set_json(json!({"type": "dynamic", "name": "x", "content": "https://example.com\nscan me"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/qr-tool/api/qrs/{}/resolve", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://example.comscan me"
        );
    }

    #[actix_web::test]
    async fn url_with_control_bytes_falls_back_to_text() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/qr-tool/api/qrs")
            .set_json(json!({"type": "dynamic", "name": "x", "content": "https://example.com/\u{1}"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/qr-tool/api/qrs/{}/resolve", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("https://example.com/"));
    }

    #[actix_web::test]
    async fn images_encode_the_resolve_url() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/qr-tool/api/qrs")
            .set_json(json!({"type": "dynamic", "name": "x", "content": "hi", "size": 240}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/qr-tool/api/qrs/{}/qr.png?download=true", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert!(resp.headers().contains_key(header::CONTENT_DISPOSITION));

        let png = test::read_body(resp).await;
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), 240);

        let req = test::TestRequest::get()
            .uri(&format!("/qr-tool/api/qrs/{}/qr.svg", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
    }

    #[actix_web::test]
    async fn static_render_is_not_stored() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/qr-tool/api/render")
            .set_json(json!({"content": "WIFI:S:home;T:WPA;P:secret;;", "size": 420}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let png = test::read_body(resp).await;
        assert_eq!(image::load_from_memory(&png).unwrap().width(), 420);

        let req = test::TestRequest::post()
            .uri("/qr-tool/api/render")
            .set_json(json!({"content": "", "size": 420}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        assert!(state.qrs.store().load_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn health_reports_store_status() {
        let dir = TempDir::new().unwrap();
        let state = app_state(&dir).await;
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/qr-tool/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["records"], 0);
    }
}
