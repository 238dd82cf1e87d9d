//! CORS configuration for the checkout frontend.

use actix_cors::Cors;

/// Build the CORS middleware from allowed origins.
///
/// `*` admits any origin. Credentials are allowed so the checkout frontend can
/// call the API with cookies attached.
pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let allowed = allowed_origins.to_vec();
    Cors::default()
        .allowed_origin_fn(move |origin, _req_head| {
            let origin_str = origin.to_str().unwrap_or("");
            allowed.iter().any(|a| a == "*" || a == origin_str)
        })
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::ACCEPT,
            actix_web::http::header::CONTENT_TYPE,
        ])
        .expose_headers(vec![actix_web::http::header::CONTENT_DISPOSITION])
        .supports_credentials()
        .max_age(3600)
}
