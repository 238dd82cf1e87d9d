use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::error::GatewayError;
use crate::gateway::SubmitPaymentRequest;
use crate::state::AppState;

/// Best-effort originating address: first `X-Forwarded-For` hop, else the peer.
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match forwarded {
        Some(ip) => Some(ip.to_string()),
        None => req.peer_addr().map(|addr| addr.ip().to_string()),
    }
}

/// POST /api/mock-pay - Simulate a card payment for a session
///
/// Both outcomes answer 200; the body's `status` tells them apart.
pub async fn submit_payment(
    req: HttpRequest,
    body: web::Json<SubmitPaymentRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    body.validate()?;

    let result = state.gateway.submit_payment(body, client_ip(&req)).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/mock-pay", web::post().to(submit_payment));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .peer_addr("127.0.0.1:5000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let req = TestRequest::default()
            .peer_addr("127.0.0.1:5000".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("127.0.0.1"));

        let req = TestRequest::default().to_http_request();
        assert_eq!(client_ip(&req), None);
    }
}
