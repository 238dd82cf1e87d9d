use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::card::validate_expiry;
use crate::constants::GENERIC_FAILURE_MESSAGE;
use crate::error::MockPayError;

/// A single cart line, captured verbatim when a session is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub qty: i64,
    pub price: f64,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.qty as f64 * self.price
    }
}

/// Sum of `qty * price` over the cart.
pub fn cart_total(cart: &[CartItem]) -> f64 {
    cart.iter().map(CartItem::line_total).sum()
}

/// Optional customer details attached to a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
}

/// Raw card details as submitted by the checkout page. Never persisted as-is.
///
/// Validation is shape only: a number with non-digits still reaches the
/// decision engine.
#[derive(Clone, Deserialize, Validate)]
pub struct CardData {
    #[validate(length(min = 8, max = 19, message = "must be 8-19 characters"))]
    pub number: String,
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub name: String,
    /// `MM/YY`
    #[validate(custom(function = "validate_expiry", message = "must be MM/YY"))]
    pub expiry: String,
    #[validate(length(min = 3, max = 4, message = "must be 3-4 characters"))]
    pub cvv: String,
}

impl fmt::Debug for CardData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardData")
            .field("number", &"[REDACTED]")
            .field("name", &self.name)
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// Test-only override of the decision rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceOutcome {
    Success,
    Failure,
}

/// Persisted outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = MockPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(PaymentStatus::Success),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(MockPayError::UnknownStatus(other.to_string())),
        }
    }
}

/// Reason attached to a failed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    Declined,
    InsufficientFunds,
    NetworkError,
}

impl FailureCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCode::Declined => "DECLINED",
            FailureCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            FailureCode::NetworkError => "NETWORK_ERROR",
        }
    }

    /// Customer-facing explanation shown on the failure page.
    pub fn message(&self) -> &'static str {
        match self {
            FailureCode::Declined => "Card declined by issuing bank (mock).",
            FailureCode::InsufficientFunds => "Insufficient funds (mock).",
            FailureCode::NetworkError => "Network error, please retry (mock).",
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailureCode {
    type Err = MockPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DECLINED" => Ok(FailureCode::Declined),
            "INSUFFICIENT_FUNDS" => Ok(FailureCode::InsufficientFunds),
            "NETWORK_ERROR" => Ok(FailureCode::NetworkError),
            other => Err(MockPayError::UnknownFailureCode(other.to_string())),
        }
    }
}

/// Message for a raw code string, falling back to a generic text.
pub fn failure_message(code: &str) -> &'static str {
    code.parse::<FailureCode>()
        .map(|c| c.message())
        .unwrap_or(GENERIC_FAILURE_MESSAGE)
}

/// Redacted card metadata stored alongside a transaction. The CVV has no field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    pub card_last4: String,
    pub card_masked: String,
    pub name: String,
    pub expiry: String,
    #[serde(rename = "billingEmail", default)]
    pub billing_email: Option<String>,
    pub luhn: bool,
}

impl RequestData {
    /// Redact submitted card details for storage.
    pub fn redact(card: &CardData, billing_email: Option<&str>) -> Self {
        let (card_masked, card_last4) = crate::card::mask_card_number(&card.number);
        Self {
            card_last4,
            card_masked,
            name: card.name.clone(),
            expiry: card.expiry.clone(),
            billing_email: billing_email.map(String::from),
            luhn: crate::card::luhn_check(&card.number),
        }
    }
}

/// A checkout session: immutable cart and amount snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub session_id: String,
    #[serde(rename = "cart")]
    pub cart_snapshot: Vec<CartItem>,
    pub customer: Option<Customer>,
    pub amount: f64,
    pub currency: String,
    /// Unix seconds
    pub created_at: i64,
}

/// Immutable record of one payment attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub session_id: String,
    pub cart_snapshot: Vec<CartItem>,
    pub request_data: RequestData,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub code: Option<FailureCode>,
    pub transaction_id: Option<String>,
    pub timestamp: String,
    pub client_ip: Option<String>,
}

impl Transaction {
    /// Successful attempt: carries a transaction id and no failure code.
    pub fn approved(
        session: &PaymentSession,
        request_data: RequestData,
        transaction_id: String,
        timestamp: String,
        client_ip: Option<String>,
    ) -> Self {
        Self {
            session_id: session.session_id.clone(),
            cart_snapshot: session.cart_snapshot.clone(),
            request_data,
            amount: session.amount,
            currency: session.currency.clone(),
            status: PaymentStatus::Success,
            code: None,
            transaction_id: Some(transaction_id),
            timestamp,
            client_ip,
        }
    }

    /// Failed attempt: carries a failure code and no transaction id.
    pub fn declined(
        session: &PaymentSession,
        request_data: RequestData,
        code: FailureCode,
        timestamp: String,
        client_ip: Option<String>,
    ) -> Self {
        Self {
            session_id: session.session_id.clone(),
            cart_snapshot: session.cart_snapshot.clone(),
            request_data,
            amount: session.amount,
            currency: session.currency.clone(),
            status: PaymentStatus::Failed,
            code: Some(code),
            transaction_id: None,
            timestamp,
            client_ip,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PaymentStatus::Success
    }
}

/// Non-sensitive projection used by the admin listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub session_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub code: Option<FailureCode>,
    pub transaction_id: Option<String>,
    pub timestamp: String,
    pub billing_email: Option<String>,
    #[serde(rename = "card_last4")]
    pub card_last4: Option<String>,
}

impl From<&Transaction> for TransactionSummary {
    fn from(txn: &Transaction) -> Self {
        Self {
            session_id: txn.session_id.clone(),
            amount: txn.amount,
            currency: txn.currency.clone(),
            status: txn.status,
            code: txn.code,
            transaction_id: txn.transaction_id.clone(),
            timestamp: txn.timestamp.clone(),
            billing_email: txn.request_data.billing_email.clone(),
            card_last4: Some(txn.request_data.card_last4.clone()),
        }
    }
}

/// Response of a session creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: String,
    pub amount: f64,
    pub currency: String,
    pub checkout_url: String,
}

/// Outcome of a payment submission, tagged by `status` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum PaymentResult {
    #[serde(rename = "success", rename_all = "camelCase")]
    Success {
        transaction_id: String,
        amount: f64,
        currency: String,
        timestamp: String,
        receipt_url: String,
    },
    #[serde(rename = "failed")]
    Failed {
        code: FailureCode,
        message: String,
        timestamp: String,
    },
}

impl PaymentResult {
    pub fn status(&self) -> PaymentStatus {
        match self {
            PaymentResult::Success { .. } => PaymentStatus::Success,
            PaymentResult::Failed { .. } => PaymentStatus::Failed,
        }
    }
}

/// Webhook event names understood by the echo endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "payment.succeeded")]
    PaymentSucceeded,
    #[serde(rename = "payment.failed")]
    PaymentFailed,
}
