use actix_web::http::StatusCode;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, web};

use crate::services::{EXPORT_CONTENT_TYPE, EXPORT_FILE_NAME, ExportService};

/// 导出失败时的纯文本响应
pub const EXPORT_ERROR_MESSAGE: &str = "Error exporting policies";

/// PolicyExportController 接口
pub struct ExportHandlers;

impl ExportHandlers {
    /// GET /api/PolicyExportController/ExportCsv
    pub async fn export_csv(service: web::Data<ExportService>) -> impl Responder {
        match service.export_csv().await {
            Ok(bytes) => HttpResponse::Ok()
                .content_type(EXPORT_CONTENT_TYPE)
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(EXPORT_FILE_NAME.to_string())],
                })
                .body(bytes),
            Err(_) => HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
                .content_type("text/plain; charset=utf-8")
                .body(EXPORT_ERROR_MESSAGE),
        }
    }
}

pub fn export_routes() -> actix_web::Scope {
    web::scope("/PolicyExportController")
        .route("/ExportCsv", web::get().to(ExportHandlers::export_csv))
}
