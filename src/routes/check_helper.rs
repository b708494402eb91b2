use crate::routing::Params;
use actix_web::HttpResponse;

const MAX_PARAM_LENGTH: usize = 2;

/// Shared by `/check-helper-1/:param` and `/check-helper-2/:param`.
///
/// `Err` carries a finished response, sent as is.
pub fn check_helper(param: &str) -> Result<String, HttpResponse> {
    if param.chars().count() > MAX_PARAM_LENGTH {
        Err(HttpResponse::NotFound().body("ko"))
    } else {
        Ok(format!("{}ok", param))
    }
}

pub fn check(params: &Params) -> HttpResponse {
    match check_helper(params.get("param").unwrap_or_default()) {
        Ok(body) => HttpResponse::Ok().body(body),
        Err(response) => response,
    }
}
