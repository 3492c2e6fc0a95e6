use actix_web::{Responder, web};
use serde::Deserialize;

use crate::api::helpers::api_result;
use crate::services::{DEFAULT_TAKE, SearchService};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub take: Option<i64>,
}

/// HandbookSearch 接口
pub struct SearchHandlers;

impl SearchHandlers {
    /// GET /api/HandbookSearch/Search?q=&take=
    pub async fn search(
        query: web::Query<SearchQuery>,
        service: web::Data<SearchService>,
    ) -> impl Responder {
        let take = query.take.unwrap_or(DEFAULT_TAKE);
        api_result(service.search(query.q.as_deref(), take).await)
    }
}

pub fn search_routes() -> actix_web::Scope {
    web::scope("/HandbookSearch").route("/Search", web::get().to(SearchHandlers::search))
}
