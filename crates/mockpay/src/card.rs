//! Card display helpers.
//!
//! Masking keeps the raw trailing characters and the Luhn result is
//! informational only: it is stored with the transaction but never gates a
//! payment decision. [`validate_expiry`] backs the `CardData` shape rules.

use validator::ValidationError;

use crate::constants::MASKED_CARD_PREFIX;

/// `MM/YY` with month 01-12. The date is not compared against today.
pub fn validate_expiry(expiry: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("expiry_format");

    let (month, year) = expiry.split_once('/').ok_or_else(invalid)?;
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return Err(invalid());
    }
    match month.parse::<u8>() {
        Ok(1..=12) => Ok(()),
        _ => Err(invalid()),
    }
}

/// Mask a card number for storage and display.
///
/// Returns `(masked, last4)`, where `last4` is the final four characters of
/// the raw input (not digit-filtered) and `masked` is the fixed prefix followed
/// by `last4`. Inputs shorter than four characters yield a shorter `last4`.
pub fn mask_card_number(number: &str) -> (String, String) {
    let start = number
        .char_indices()
        .rev()
        .nth(3)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let last4 = number[start..].to_string();
    (format!("{MASKED_CARD_PREFIX}{last4}"), last4)
}

/// Standard Luhn checksum over the digit characters of `number`.
///
/// Non-digits are skipped. An input with no digits sums to zero and is
/// therefore reported as valid.
pub fn luhn_check(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
    let parity = digits.len() % 2;

    let checksum: u32 = digits
        .iter()
        .enumerate()
        .map(|(idx, &d)| {
            if idx % 2 == parity {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    checksum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_expiry() {
        assert!(validate_expiry("01/25").is_ok());
        assert!(validate_expiry("12/99").is_ok());
        assert!(validate_expiry("00/25").is_err());
        assert!(validate_expiry("13/25").is_err());
        assert!(validate_expiry("1/25").is_err());
        assert!(validate_expiry("12/2027").is_err());
        assert!(validate_expiry("1225").is_err());
        assert!(validate_expiry("ab/cd").is_err());
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(
            mask_card_number("4242424242424242"),
            ("**** **** **** 4242".to_string(), "4242".to_string())
        );
        assert_eq!(
            mask_card_number("4242 4242 4242 4242"),
            ("**** **** **** 4242".to_string(), "4242".to_string())
        );
    }

    #[test]
    fn test_mask_keeps_raw_trailing_chars() {
        let (masked, last4) = mask_card_number("4000-0000-0000-00x1");
        assert_eq!(last4, "00x1");
        assert_eq!(masked, "**** **** **** 00x1");
    }

    #[test]
    fn test_mask_short_input() {
        assert_eq!(
            mask_card_number("42"),
            ("**** **** **** 42".to_string(), "42".to_string())
        );
        assert_eq!(
            mask_card_number(""),
            ("**** **** **** ".to_string(), String::new())
        );
    }

    #[test]
    fn test_luhn_check() {
        assert!(luhn_check("4242424242424242"));
        assert!(!luhn_check("4242424242424241"));
        assert!(luhn_check("4000 0000 0000 0002"));
        assert!(luhn_check("79927398713"));
        assert!(!luhn_check("79927398710"));
    }

    #[test]
    fn test_luhn_empty_digits_is_valid() {
        assert!(luhn_check(""));
        assert!(luhn_check("abcd"));
    }
}
