use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::GatewayError;
use crate::gateway::CreateSessionRequest;
use crate::state::AppState;

/// POST /api/create-mock-payment-session - Snapshot a cart into a checkout session
pub async fn create_session(
    body: web::Json<CreateSessionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    body.validate()?;

    let created = state.gateway.create_session(body)?;
    Ok(HttpResponse::Ok().json(created))
}

/// GET /api/mock-payment-session/{session_id} - Session details for the checkout page
pub async fn get_session(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let session_id = path.into_inner();
    let session = state.gateway.get_session(&session_id)?;
    Ok(HttpResponse::Ok().json(session))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/api/create-mock-payment-session",
        web::post().to(create_session),
    )
    .route(
        "/api/mock-payment-session/{session_id}",
        web::get().to(get_session),
    )
    // Path the checkout page fetches.
    .route("/api/payment-session/{session_id}", web::get().to(get_session));
}
