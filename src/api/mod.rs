//! HTTP surface
//!
//! All endpoints live under `/api`. Handlers only extract request data,
//! call a service and map the result; error → status mapping happens in
//! [`helpers`].

pub mod helpers;
pub mod middleware;
pub mod services;

use actix_web::middleware::DefaultHeaders;
use actix_web::web;

use services::{click_tracking_routes, export_routes, search_routes, status_routes};

pub const API_PREFIX: &str = "/api";

/// Register the `/api` scope
///
/// Services (`ClickTrackingService`, `SearchService`, `ExportService`,
/// `SchemaBootstrap`) must already be registered as app data.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .app_data(web::QueryConfig::default().error_handler(helpers::query_error_handler))
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .service(click_tracking_routes())
            .service(search_routes())
            .service(export_routes())
            .service(status_routes()),
    );
}
