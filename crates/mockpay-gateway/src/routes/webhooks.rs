use actix_web::{web, HttpResponse};

use crate::gateway::IncomingWebhook;
use crate::state::AppState;

/// POST /api/mock-webhook - Acknowledge a webhook without side effects
pub async fn receive_webhook(
    body: web::Json<IncomingWebhook>,
    state: web::Data<AppState>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.gateway.receive_webhook(body.into_inner()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/mock-webhook", web::post().to(receive_webhook));
}
