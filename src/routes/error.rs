use crate::error::{AppError, ErrorChain, Flow};
use crate::routing::Params;
use actix_web::HttpResponse;

/// Unconditional synthetic failure.
pub fn always_fail() -> Result<HttpResponse, AppError> {
    Err(anyhow::anyhow!("asdfqwer is not defined")
        .context("Synthetic failure")
        .into())
}

/// Fails with the status named in the path, read like JavaScript's
/// `parseInt(code, 10)`.
pub fn fail_with_code(params: &Params) -> Result<HttpResponse, AppError> {
    let code = params.get("code").unwrap_or_default();
    Err(AppError::with_status(
        parse_int(code),
        format!("fake stack {}", code),
    ))
}

/// Leading whitespace, an optional sign, then as many digits as there are.
fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse::<i64>().ok().map(|value| sign * value)
}

fn custom_handler(_: &AppError, messages: &mut Vec<String>) -> Flow {
    messages.push("Custom handler".to_string());
    Flow::Next
}

fn custom_handler_2(_: &AppError, messages: &mut Vec<String>) -> Flow {
    messages.push("Custom handler 2".to_string());
    Flow::Respond(HttpResponse::InternalServerError().body(messages.join("\n")))
}

pub fn custom_error_chain() -> ErrorChain {
    ErrorChain::new()
        .then(custom_handler)
        .then(custom_handler_2)
}
