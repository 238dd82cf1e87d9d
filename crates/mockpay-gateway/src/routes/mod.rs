pub mod admin;
pub mod health;
pub mod payments;
pub mod receipts;
pub mod sessions;
pub mod webhooks;

use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    web, HttpRequest,
};

use crate::error::GatewayError;

/// Maximum accepted JSON body size.
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

/// JSON extractor config: malformed or mistyped bodies become 422 validation
/// errors with the usual `{error, message}` shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            GatewayError::Validation(err.to_string()).into()
        })
}

/// Query extractor config: unparseable query strings get the same 422 body.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        GatewayError::Validation(err.to_string()).into()
    })
}

/// Mount every gateway route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(sessions::configure)
        .configure(payments::configure)
        .configure(admin::configure)
        .configure(receipts::configure)
        .configure(webhooks::configure);
}
