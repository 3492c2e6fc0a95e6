use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;
use ts_rs::TS;

use crate::services::TS_EXPORT_PATH;
use crate::storage::{SchemaBootstrap, SchemaState};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct StatusResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// schema bootstrap 状态，如 `Ready` / `DegradedNoTracking`
    pub schema: String,
}

/// AdminSetup 接口（存活检查）
pub struct StatusHandlers;

impl StatusHandlers {
    /// GET /api/AdminSetup/Status
    pub async fn status(bootstrap: web::Data<SchemaBootstrap>) -> impl Responder {
        trace!("Received status request");
        let state: SchemaState = bootstrap.state();
        HttpResponse::Ok().json(StatusResponse {
            message: "Handbook service is running".to_string(),
            timestamp: Utc::now(),
            schema: state.to_string(),
        })
    }
}

pub fn status_routes() -> actix_web::Scope {
    web::scope("/AdminSetup").route("/Status", web::get().to(StatusHandlers::status))
}
