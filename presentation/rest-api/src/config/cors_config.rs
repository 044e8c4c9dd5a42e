use poem::middleware::Cors;
use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:8080";

/// Initialize CORS middleware for the browser front-end
///
/// Environment variables:
/// - CORS_ALLOWED_ORIGINS: Comma-separated list of allowed origins
///   (default: "http://localhost:3000,http://localhost:8080")
///
/// Only the verbs the exposed routes answer to are allowed, and the
/// `authorization` header is needed for the admin bearer token.
pub fn init_cors() -> Cors {
    let raw = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());

    Cors::new()
        .allow_origins(parse_origins(&raw))
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type", "authorization"])
        .allow_credentials(true)
}

/// Splits the origin list, dropping blanks and stray quotes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(firebase::config::normalize_value)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
