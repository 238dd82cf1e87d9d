//! HTTP service for the mock payment gateway.
//!
//! Wires the [`mockpay`] core (decision rule, card helpers, receipts) to a
//! SQLite store and an actix-web route table. See [`routes::configure`] for
//! the endpoints and [`gateway::MockGateway`] for the operations behind them.

pub mod config;
pub mod cors;
pub mod db;
pub mod error;
pub mod gateway;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use db::Database;
pub use error::GatewayError;
pub use gateway::MockGateway;
pub use state::AppState;
