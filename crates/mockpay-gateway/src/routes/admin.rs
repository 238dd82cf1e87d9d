use actix_web::{web, HttpResponse};

use mockpay::DEFAULT_TRANSACTION_LIMIT;

use crate::error::GatewayError;
use crate::gateway::FireWebhookRequest;
use crate::state::AppState;

/// Query parameters for the transaction listing
#[derive(Debug, serde::Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_TRANSACTION_LIMIT
}

/// GET /admin/mock-transactions - Newest transactions first, card data scrubbed
pub async fn list_transactions(
    query: web::Query<ListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let transactions = state.gateway.list_recent_transactions(query.limit)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "transactions": transactions,
    })))
}

/// POST /admin/fire-webhook - Pretend to deliver a webhook for a transaction
pub async fn fire_webhook(
    body: web::Json<FireWebhookRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    HttpResponse::Ok().json(state.gateway.fire_webhook(body.into_inner()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/mock-transactions", web::get().to(list_transactions))
        .route("/admin/fire-webhook", web::post().to(fire_webhook));
}
