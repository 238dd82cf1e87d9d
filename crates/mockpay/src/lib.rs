//! Deterministic mock payment engine.
//!
//! Simulates a card payment gateway without contacting any financial network.
//! Outcomes depend only on the submitted card number (and an optional,
//! configuration-gated force override), so tests and demos can reproduce
//! any result on demand.
//!
//! # Decision rule
//!
//! - last digit even → **success**
//! - last digit odd → **failure**, code `FAILURE_CODES[d % 3]`
//! - last character not a digit → treated as `0`
//!
//! # Quick example
//!
//! ```
//! use mockpay::{Decision, DecisionEngine, FailureCode};
//!
//! let engine = DecisionEngine::new(false);
//! assert_eq!(engine.evaluate("4242424242424242", None), Decision::Approved);
//! assert_eq!(
//!     engine.evaluate("4000000000000001", None),
//!     Decision::Declined(FailureCode::InsufficientFunds)
//! );
//! ```

pub mod card;
pub mod constants;
pub mod decision;
pub mod error;
pub mod ids;
pub mod receipt;
pub mod security;
pub mod types;

pub use card::{luhn_check, mask_card_number};
pub use constants::*;
pub use decision::{Decision, DecisionEngine, Outcome};
pub use error::MockPayError;
pub use ids::{generate_session_id, generate_transaction_id};
pub use types::*;
