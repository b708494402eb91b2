use crate::routing::QueryParams;
use actix_web::HttpResponse;

/// Missing keys render as empty strings.
pub fn echo_query(query: &QueryParams) -> HttpResponse {
    HttpResponse::Ok().body(format!(
        "aa: {} bb: {}",
        query.get("aa").unwrap_or_default(),
        query.get("bb").unwrap_or_default()
    ))
}
