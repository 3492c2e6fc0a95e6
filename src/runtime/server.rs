//! Server mode
//!
//! Builds the actix-web application and runs it until the server stops or
//! a shutdown signal arrives.

use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, Condition},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::configure_api;
use crate::api::middleware::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::config::{CorsConfig, get_config};
use crate::runtime::startup;
use crate::system::signal::{listen_for_shutdown, spawn_content_reload_listener};

const MAX_WORKERS: usize = 32;

/// Warn about CORS settings that cannot work (runs once, not per worker)
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.enabled && cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware for the browser widgets
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_header(actix_web::http::header::CONTENT_TYPE)
        .allowed_header(actix_web::http::header::ACCEPT)
        .allowed_header(REQUEST_ID_HEADER)
        .expose_headers(vec![REQUEST_ID_HEADER])
        .max_age(cors_config.max_age as usize)
}

/// Run the HTTP server
///
/// **Note**: logging must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();

    let startup = startup::prepare_server_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    spawn_content_reload_listener(startup.content.clone());

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, MAX_WORKERS);
    warn!("Using {} CPU cores for the server", cpu_count);

    let click_tracking = web::Data::from(startup.click_tracking.clone());
    let search = web::Data::from(startup.search.clone());
    let export = web::Data::from(startup.export.clone());
    let bootstrap = web::Data::from(startup.bootstrap.clone());

    // db 在 HttpServer 闭包外保留一份，关闭时释放连接池
    let db_for_shutdown = startup.db.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Condition::new(
                cors_config.enabled,
                build_cors_middleware(&cors_config),
            ))
            .wrap(Compress::default())
            .app_data(click_tracking.clone())
            .app_data(search.clone())
            .app_data(export.clone())
            .app_data(bootstrap.clone())
            .configure(configure_api)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res.context("HTTP server terminated with an error")?;
        }
        _ = listen_for_shutdown(db_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
