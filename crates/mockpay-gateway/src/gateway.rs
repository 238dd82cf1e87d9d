//! Gateway operations: the orchestration between the HTTP routes, the
//! decision engine and the store.
//!
//! Every store access goes through [`Database::with_transaction`], so each
//! operation runs as its own scoped unit of work. The simulated processing
//! delay in [`MockGateway::submit_payment`] happens between two such scopes
//! and never holds the connection.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::SecondsFormat;
use mockpay::receipt::{self, RECEIPT_CONTENT_TYPE};
use mockpay::{
    cart_total, failure_message, generate_session_id, generate_transaction_id, CardData,
    CartItem, Customer, Decision, DecisionEngine, ForceOutcome, PaymentResult, PaymentSession,
    RequestData, SessionCreated, Transaction, TransactionSummary, WebhookEvent,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::GatewayConfig;
use crate::db::Database;
use crate::error::GatewayError;
use crate::metrics::{
    PAYMENTS_FAILED, PAYMENTS_SUCCEEDED, PAYMENT_LATENCY, RECEIPTS_RENDERED, SESSIONS_CREATED,
    WEBHOOKS_ECHOED,
};

/// Body of `POST /api/create-mock-payment-session`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionRequest {
    pub cart: Vec<CartItem>,
    #[serde(default)]
    #[validate(nested)]
    pub customer: Option<Customer>,
}

/// Body of `POST /api/mock-pay`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentRequest {
    pub session_id: String,
    #[validate(nested)]
    pub card: CardData,
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub billing_email: Option<String>,
    #[serde(default)]
    pub force: Option<ForceOutcome>,
}

/// Body of `POST /admin/fire-webhook`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireWebhookRequest {
    pub transaction_id: String,
    pub event: WebhookEvent,
}

/// Acknowledgment of a (simulated) outbound webhook.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookQueued {
    pub status: &'static str,
    pub sent: bool,
    pub transaction_id: String,
    pub event: WebhookEvent,
    pub timestamp: String,
}

/// Body of `POST /api/mock-webhook`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingWebhook {
    pub transaction_id: String,
    pub event: WebhookEvent,
    #[serde(default)]
    pub sent_at: Option<String>,
}

/// Acknowledgment returned to a webhook sender.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAck {
    pub received: bool,
    pub transaction_id: String,
    pub event: WebhookEvent,
    pub processed_at: String,
}

/// A rendered receipt ready to be served inline.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub transaction_id: String,
    pub bytes: Vec<u8>,
}

impl Receipt {
    pub fn content_type(&self) -> &'static str {
        RECEIPT_CONTENT_TYPE
    }

    pub fn filename(&self) -> String {
        format!("{}.pdf", self.transaction_id)
    }
}

/// Public path of the receipt for a transaction.
pub fn receipt_url(transaction_id: &str) -> String {
    format!("/receipts/{}.pdf", transaction_id)
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// The mock gateway. Configuration is fixed at construction.
#[derive(Clone)]
pub struct MockGateway {
    config: Arc<GatewayConfig>,
    db: Arc<Database>,
    engine: DecisionEngine,
}

impl MockGateway {
    pub fn new(config: Arc<GatewayConfig>, db: Arc<Database>) -> Self {
        let engine = DecisionEngine::new(config.allow_force_param);
        Self { config, db, engine }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Snapshot the cart and open a checkout session.
    pub fn create_session(
        &self,
        req: CreateSessionRequest,
    ) -> Result<SessionCreated, GatewayError> {
        let session = PaymentSession {
            session_id: generate_session_id(),
            amount: cart_total(&req.cart),
            cart_snapshot: req.cart,
            customer: req.customer,
            currency: self.config.currency.clone(),
            created_at: chrono::Utc::now().timestamp(),
        };
        self.db.create_session(&session)?;
        SESSIONS_CREATED.inc();

        tracing::info!(
            session_id = %session.session_id,
            amount = session.amount,
            items = session.cart_snapshot.len(),
            "checkout session created"
        );

        Ok(SessionCreated {
            checkout_url: self.config.checkout_url(&session.session_id),
            session_id: session.session_id,
            amount: session.amount,
            currency: session.currency,
        })
    }

    pub fn get_session(&self, session_id: &str) -> Result<PaymentSession, GatewayError> {
        self.db
            .get_session(session_id)?
            .ok_or_else(|| GatewayError::SessionNotFound(session_id.to_string()))
    }

    /// Simulate a card payment against an existing session and record the
    /// attempt. Exactly one transaction row is written per call that gets
    /// past the session lookup.
    pub async fn submit_payment(
        &self,
        req: SubmitPaymentRequest,
        client_ip: Option<String>,
    ) -> Result<PaymentResult, GatewayError> {
        let started = Instant::now();
        let session = self.get_session(&req.session_id)?;

        if self.config.simulate_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.simulate_delay_ms)).await;
        }

        let decision = self.engine.evaluate(&req.card.number, req.force);
        let request_data = RequestData::redact(&req.card, req.billing_email.as_deref());
        let timestamp = now_iso();

        let (txn, result) = match decision {
            Decision::Approved => {
                let transaction_id = generate_transaction_id();
                let result = PaymentResult::Success {
                    transaction_id: transaction_id.clone(),
                    amount: session.amount,
                    currency: session.currency.clone(),
                    timestamp: timestamp.clone(),
                    receipt_url: receipt_url(&transaction_id),
                };
                let txn = Transaction::approved(
                    &session,
                    request_data,
                    transaction_id,
                    timestamp,
                    client_ip,
                );
                (txn, result)
            }
            Decision::Declined(code) => {
                let result = PaymentResult::Failed {
                    code,
                    message: failure_message(code.as_str()).to_string(),
                    timestamp: timestamp.clone(),
                };
                let txn = Transaction::declined(&session, request_data, code, timestamp, client_ip);
                (txn, result)
            }
        };

        self.db.record_transaction(&txn)?;

        match txn.code {
            None => PAYMENTS_SUCCEEDED.inc(),
            Some(code) => PAYMENTS_FAILED.with_label_values(&[code.as_str()]).inc(),
        }
        PAYMENT_LATENCY.observe(started.elapsed().as_secs_f64());

        tracing::info!(
            session_id = %txn.session_id,
            status = %txn.status,
            code = ?txn.code,
            transaction_id = ?txn.transaction_id,
            luhn = txn.request_data.luhn,
            forced = self.engine.force_allowed() && req.force.is_some(),
            "mock payment processed"
        );

        Ok(result)
    }

    /// Newest transactions first, projected to non-sensitive fields.
    pub fn list_recent_transactions(
        &self,
        limit: u32,
    ) -> Result<Vec<TransactionSummary>, GatewayError> {
        let txns = self.db.list_recent_transactions(limit)?;
        Ok(txns.iter().map(TransactionSummary::from).collect())
    }

    pub fn get_receipt(&self, transaction_id: &str) -> Result<Receipt, GatewayError> {
        let txn = self
            .db
            .get_transaction(transaction_id)?
            .ok_or_else(|| GatewayError::TransactionNotFound(transaction_id.to_string()))?;

        if !txn.is_success() {
            return Err(GatewayError::ReceiptUnavailable(transaction_id.to_string()));
        }

        let bytes = receipt::render(&txn)?;
        RECEIPTS_RENDERED.inc();

        Ok(Receipt {
            transaction_id: transaction_id.to_string(),
            bytes,
        })
    }

    /// Stub: nothing is sent, the request is echoed as queued.
    pub fn fire_webhook(&self, req: FireWebhookRequest) -> WebhookQueued {
        WEBHOOKS_ECHOED
            .with_label_values(&["outbound", event_label(req.event)])
            .inc();
        tracing::info!(
            transaction_id = %req.transaction_id,
            event = event_label(req.event),
            "webhook queued (mock, not delivered)"
        );
        WebhookQueued {
            status: "queued",
            sent: true,
            transaction_id: req.transaction_id,
            event: req.event,
            timestamp: now_iso(),
        }
    }

    /// Stub receiver: acknowledges without persisting anything.
    pub fn receive_webhook(&self, event: IncomingWebhook) -> WebhookAck {
        WEBHOOKS_ECHOED
            .with_label_values(&["inbound", event_label(event.event)])
            .inc();
        tracing::info!(
            transaction_id = %event.transaction_id,
            event = event_label(event.event),
            sent_at = ?event.sent_at,
            "webhook received"
        );
        WebhookAck {
            received: true,
            transaction_id: event.transaction_id,
            event: event.event,
            processed_at: now_iso(),
        }
    }
}

fn event_label(event: WebhookEvent) -> &'static str {
    match event {
        WebhookEvent::PaymentSucceeded => "payment.succeeded",
        WebhookEvent::PaymentFailed => "payment.failed",
    }
}
