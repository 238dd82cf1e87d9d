use thiserror::Error;

/// Errors returned by mockpay core operations.
#[derive(Debug, Error)]
pub enum MockPayError {
    #[error("unknown failure code: {0}")]
    UnknownFailureCode(String),

    #[error("unknown payment status: {0}")]
    UnknownStatus(String),

    #[error("receipt unavailable: {0}")]
    ReceiptUnavailable(String),
}
