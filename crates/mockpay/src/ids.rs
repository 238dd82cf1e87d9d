use rand::Rng;

use crate::constants::{
    SESSION_ID_DIGITS, SESSION_ID_PREFIX, TRANSACTION_ID_DIGITS, TRANSACTION_ID_PREFIX,
};

/// `MOCK_S_` followed by 9 random decimal digits.
pub fn generate_session_id() -> String {
    prefixed_digits(SESSION_ID_PREFIX, SESSION_ID_DIGITS)
}

/// `MOCK_TXN_` followed by 10 random decimal digits.
pub fn generate_transaction_id() -> String {
    prefixed_digits(TRANSACTION_ID_PREFIX, TRANSACTION_ID_DIGITS)
}

// Display identifiers, not secrets. No collision check is made.
fn prefixed_digits(prefix: &str, len: usize) -> String {
    let mut rng = rand::rng();
    let mut id = String::with_capacity(prefix.len() + len);
    id.push_str(prefix);
    for _ in 0..len {
        id.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        let digits = id.strip_prefix("MOCK_S_").unwrap();
        assert_eq!(digits.len(), 9);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_transaction_id_format() {
        let id = generate_transaction_id();
        let digits = id.strip_prefix("MOCK_TXN_").unwrap();
        assert_eq!(digits.len(), 10);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_ids_vary() {
        let ids: std::collections::HashSet<String> =
            (0..32).map(|_| generate_transaction_id()).collect();
        assert!(ids.len() > 1);
    }
}
