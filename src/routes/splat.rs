use crate::routing::Params;
use actix_web::HttpResponse;

pub fn echo_splat(params: &Params) -> HttpResponse {
    HttpResponse::Ok().body(format!("splat {}", params.get("splat").unwrap_or_default()))
}
