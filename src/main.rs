mod config;
mod db;
mod errors;
mod handlers;
mod middlewares;
mod models;
mod routes;
mod services;
mod state;
mod structs;
mod utils;

use std::sync::Arc;

use crate::config::app_config::AppConfig;
use crate::db::json_store::JsonFileStore;
use crate::services::qr_service::QrService;
use crate::state::app_state::AppState;
use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error, http, middleware::Logger, web};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;
use routes::init_routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().context("Invalid configuration")?;

    // Open the record store, creating the data file on first run
    let store = JsonFileStore::open(&config.data_file)
        .await
        .with_context(|| format!("Cannot open data file {}", config.data_file.display()))?;
    log::info!("Storing QR codes in {}", store.path().display());

    let app_state = web::Data::new(AppState {
        qrs: QrService::new(Arc::new(store)),
        public_prefix: config.public_prefix(),
    });

    let json_limit = config.json_limit;
    let base_path = config.base_path.clone();
    let cors_origins = config.cors_origins.clone();

    log::info!(
        "Listening on {}:{} (base path {:?})",
        config.bind_addr,
        config.port,
        config.base_path
    );

    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![http::header::ACCEPT, http::header::CONTENT_TYPE])
            .max_age(3600);
        // Logo data URLs push request bodies well past the default limit
        let json_config = web::JsonConfig::default()
            .limit(json_limit)
            .error_handler(|err, _req| {
                let message = err.to_string();
                error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
                )
                .into()
            });

        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .app_data(json_config)
            .service(web::scope(&base_path).configure(init_routes))
    })
    .bind((config.bind_addr.as_str(), config.port))
    .with_context(|| format!("Cannot bind {}:{}", config.bind_addr, config.port))?
    .run()
    .await
    .context("Server error")?;

    Ok(())
}
