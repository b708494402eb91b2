use actix_web::HttpResponse;

const REDACTED: &str = "[REDACTED]";

fn is_secret(key: &str) -> bool {
    key == "SECRET_PASSWORD" || key.ends_with("_API_KEY") || key.ends_with("_PASSWORD")
}

/// Writes the process environment, sorted by name, to the log.
pub fn print_env() -> HttpResponse {
    let mut vars: Vec<(String, String)> = std::env::vars_os()
        .map(|(key, value)| {
            (
                key.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect();
    vars.sort();

    let env = vars
        .iter()
        .map(|(key, value)| {
            let value = if is_secret(key) { REDACTED } else { value.as_str() };
            format!("{}: {}", key, value)
        })
        .collect::<Vec<_>>()
        .join("\n");
    tracing::info!(%env, "Environment variables");

    HttpResponse::Ok().body("env vars printed to console")
}
