use crate::types::FailureCode;

/// Prefix for generated checkout session identifiers.
pub const SESSION_ID_PREFIX: &str = "MOCK_S_";

/// Number of random decimal digits after [`SESSION_ID_PREFIX`].
pub const SESSION_ID_DIGITS: usize = 9;

/// Prefix for generated transaction identifiers.
pub const TRANSACTION_ID_PREFIX: &str = "MOCK_TXN_";

/// Number of random decimal digits after [`TRANSACTION_ID_PREFIX`].
pub const TRANSACTION_ID_DIGITS: usize = 10;

/// Failure codes indexed by `last_digit % 3`. The order is part of the
/// observable contract: card numbers map to codes through it.
pub const FAILURE_CODES: [FailureCode; 3] = [
    FailureCode::Declined,
    FailureCode::InsufficientFunds,
    FailureCode::NetworkError,
];

/// Fallback message for failure codes without a dedicated entry.
pub const GENERIC_FAILURE_MESSAGE: &str = "Payment failed (mock).";

/// Fixed display prefix of a masked card number.
pub const MASKED_CARD_PREFIX: &str = "**** **** **** ";

/// Default page size of the admin transaction listing.
pub const DEFAULT_TRANSACTION_LIMIT: u32 = 50;
