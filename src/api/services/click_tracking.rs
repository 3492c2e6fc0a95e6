use actix_web::http::header::USER_AGENT;
use actix_web::{HttpRequest, Responder, web};
use tracing::trace;

use crate::api::helpers::{api_result, error_from_handbook, success_message};
use crate::services::{ClickContext, ClickTrackingService};
use crate::utils::extract_client_ip;

/// PolicyClickTracking 接口
pub struct ClickTrackingHandlers;

impl ClickTrackingHandlers {
    /// POST /api/PolicyClickTracking/RecordClick
    ///
    /// 请求体按原始字节读取，缺失、无法解析和非法 id 都由服务层区分。
    pub async fn record_click(
        req: HttpRequest,
        body: web::Bytes,
        service: web::Data<ClickTrackingService>,
    ) -> impl Responder {
        trace!("Received RecordClick request ({} bytes)", body.len());

        let context = ClickContext {
            ip_address: extract_client_ip(&req),
            user_agent: req
                .headers()
                .get(USER_AGENT)
                .map(|h| String::from_utf8_lossy(h.as_bytes()).into_owned()),
        };

        match service.record_click(&body, context).await {
            Ok(_) => success_message("Click recorded successfully"),
            Err(e) => error_from_handbook(&e),
        }
    }

    /// GET /api/PolicyClickTracking/GetClickCounts
    pub async fn get_click_counts(service: web::Data<ClickTrackingService>) -> impl Responder {
        api_result(service.click_counts().await)
    }
}

pub fn click_tracking_routes() -> actix_web::Scope {
    web::scope("/PolicyClickTracking")
        .route("/RecordClick", web::post().to(ClickTrackingHandlers::record_click))
        .route(
            "/GetClickCounts",
            web::get().to(ClickTrackingHandlers::get_click_counts),
        )
}
