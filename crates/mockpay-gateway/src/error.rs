use actix_web::{HttpResponse, ResponseError};
use std::fmt;

#[derive(Debug)]
pub enum GatewayError {
    /// Database error
    Database(rusqlite::Error),
    /// Unknown checkout session id
    SessionNotFound(String),
    /// Unknown transaction id
    TransactionNotFound(String),
    /// Receipt requested for a transaction that did not succeed
    ReceiptUnavailable(String),
    /// Malformed or rule-violating request
    Validation(String),
    /// Internal error
    Internal(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Database(e) => write!(f, "database error: {}", e),
            GatewayError::SessionNotFound(id) => write!(f, "session not found: {}", id),
            GatewayError::TransactionNotFound(id) => write!(f, "transaction not found: {}", id),
            GatewayError::ReceiptUnavailable(id) => {
                write!(f, "receipt unavailable for transaction: {}", id)
            }
            GatewayError::Validation(msg) => write!(f, "validation error: {}", msg),
            GatewayError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<rusqlite::Error> for GatewayError {
    fn from(e: rusqlite::Error) -> Self {
        GatewayError::Database(e)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Internal(format!("stored JSON column is malformed: {}", e))
    }
}

impl From<validator::ValidationErrors> for GatewayError {
    fn from(e: validator::ValidationErrors) -> Self {
        GatewayError::Validation(e.to_string())
    }
}

impl From<mockpay::MockPayError> for GatewayError {
    fn from(e: mockpay::MockPayError) -> Self {
        GatewayError::Internal(e.to_string())
    }
}

impl ResponseError for GatewayError {
    fn error_response(&self) -> HttpResponse {
        match self {
            GatewayError::SessionNotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": "session_not_found",
                "message": "Session not found"
            })),
            GatewayError::TransactionNotFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "transaction_not_found",
                    "message": "Transaction not found"
                }))
            }
            GatewayError::ReceiptUnavailable(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "receipt_unavailable",
                    "message": "Receipt available only for successful payments"
                }))
            }
            GatewayError::Validation(msg) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": "validation_error",
                    "message": msg
                }))
            }
            GatewayError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
            GatewayError::Database(e) => {
                tracing::error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}
