use actix_web::{web, HttpRequest, HttpResponse};

use crate::metrics::REGISTRY;
use crate::state::AppState;

/// GET /health - Liveness plus a store round-trip
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let mut response = serde_json::json!({
        "status": "ok",
        "service": "mockpay-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "currency": state.config.currency,
        "forceParamAllowed": state.config.allow_force_param,
    });

    let db_ok = state
        .db
        .with_transaction(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .is_ok();

    if db_ok {
        response["database"] = serde_json::json!("ok");
        HttpResponse::Ok().json(response)
    } else {
        response["status"] = serde_json::json!("degraded");
        response["database"] = serde_json::json!("unreachable");
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// GET /metrics - Prometheus metrics endpoint (optionally auth-gated)
pub async fn metrics(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(ref expected_token) = state.config.metrics_token {
        let header = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok());

        if !mockpay::security::bearer_matches(header, expected_token) {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "unauthorized",
                "message": "Valid Bearer token required for /metrics"
            }));
        }
    }

    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().body("Failed to encode metrics");
    }

    let output = String::from_utf8(buffer).unwrap_or_default();
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(output)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/metrics", web::get().to(metrics));
}
