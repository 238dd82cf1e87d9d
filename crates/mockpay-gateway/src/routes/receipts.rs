use actix_web::{http::header, web, HttpResponse};

use crate::error::GatewayError;
use crate::state::AppState;

/// GET /receipts/{transaction_id}.pdf - Inline PDF receipt for a successful payment
pub async fn get_receipt(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, GatewayError> {
    let file = path.into_inner();
    let transaction_id = file
        .strip_suffix(".pdf")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GatewayError::TransactionNotFound(file.clone()))?;

    let receipt = state.gateway.get_receipt(transaction_id)?;

    Ok(HttpResponse::Ok()
        .content_type(receipt.content_type())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename={}", receipt.filename()),
        ))
        .body(receipt.bytes))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/receipts/{file}", web::get().to(get_receipt));
}
