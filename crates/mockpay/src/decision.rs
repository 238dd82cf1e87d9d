//! Deterministic pay decision.
//!
//! A payment succeeds when the card number's last character is an even digit
//! and fails otherwise; a non-digit last character counts as `0`. Failures pick
//! a code from [`FAILURE_CODES`] using the same digit, so a given card number
//! always produces the same outcome. When the engine is built with
//! `force_allowed`, a caller-supplied [`ForceOutcome`] bypasses the rule.

use crate::constants::FAILURE_CODES;
use crate::types::{FailureCode, ForceOutcome};

/// Raw success/failure verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<ForceOutcome> for Outcome {
    fn from(force: ForceOutcome) -> Self {
        match force {
            ForceOutcome::Success => Outcome::Success,
            ForceOutcome::Failure => Outcome::Failure,
        }
    }
}

/// Verdict with the failure code resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Declined(FailureCode),
}

/// Pure decision engine. `force_allowed` is fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct DecisionEngine {
    force_allowed: bool,
}

impl DecisionEngine {
    pub fn new(force_allowed: bool) -> Self {
        Self { force_allowed }
    }

    pub fn force_allowed(&self) -> bool {
        self.force_allowed
    }

    /// Success or failure for `card_number`, honoring `force` only when allowed.
    pub fn decide(&self, card_number: &str, force: Option<ForceOutcome>) -> Outcome {
        self.decide_with_digit(last_digit(card_number), force)
    }

    /// Full decision: outcome plus failure code when declined.
    pub fn evaluate(&self, card_number: &str, force: Option<ForceOutcome>) -> Decision {
        let digit = last_digit(card_number);
        let decision = match self.decide_with_digit(digit, force) {
            Outcome::Success => Decision::Approved,
            Outcome::Failure => Decision::Declined(failure_code_for_digit(digit)),
        };
        tracing::debug!(
            digit,
            forced = self.force_allowed && force.is_some(),
            ?decision,
            "payment decision"
        );
        decision
    }

    fn decide_with_digit(&self, digit: u32, force: Option<ForceOutcome>) -> Outcome {
        if self.force_allowed {
            if let Some(force) = force {
                return force.into();
            }
        }
        if digit % 2 == 0 {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

/// Value of the last character when it is a decimal digit, else `0`.
pub fn last_digit(card_number: &str) -> u32 {
    card_number
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0)
}

/// `FAILURE_CODES[d % 3]` for the card's last digit.
pub fn failure_code(card_number: &str) -> FailureCode {
    failure_code_for_digit(last_digit(card_number))
}

fn failure_code_for_digit(digit: u32) -> FailureCode {
    FAILURE_CODES[(digit % FAILURE_CODES.len() as u32) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_last_digit_succeeds() {
        let engine = DecisionEngine::new(false);
        for d in ["0", "2", "4", "6", "8"] {
            let number = format!("400000000000000{d}");
            assert_eq!(engine.decide(&number, None), Outcome::Success, "{number}");
            assert_eq!(engine.evaluate(&number, None), Decision::Approved);
        }
    }

    #[test]
    fn test_odd_last_digit_fails_with_deterministic_code() {
        let engine = DecisionEngine::new(false);
        let cases = [
            ("4000000000000001", FailureCode::InsufficientFunds),
            ("4000000000000003", FailureCode::Declined),
            ("4000000000000005", FailureCode::NetworkError),
            ("4000000000000007", FailureCode::InsufficientFunds),
            ("4000000000000009", FailureCode::Declined),
        ];
        for (number, code) in cases {
            assert_eq!(engine.decide(number, None), Outcome::Failure);
            assert_eq!(engine.evaluate(number, None), Decision::Declined(code));
            // Same input, same answer.
            assert_eq!(engine.evaluate(number, None), Decision::Declined(code));
        }
    }

    #[test]
    fn test_non_digit_last_char_counts_as_zero() {
        let engine = DecisionEngine::new(false);
        assert_eq!(last_digit("4242-x"), 0);
        assert_eq!(last_digit(""), 0);
        assert_eq!(engine.decide("424242424242424X", None), Outcome::Success);
        assert_eq!(engine.decide("", None), Outcome::Success);
    }

    #[test]
    fn test_force_wins_when_allowed() {
        let engine = DecisionEngine::new(true);
        assert_eq!(
            engine.decide("4000000000000001", Some(ForceOutcome::Success)),
            Outcome::Success
        );
        assert_eq!(
            engine.decide("4242424242424242", Some(ForceOutcome::Failure)),
            Outcome::Failure
        );
        assert_eq!(
            engine.evaluate("4000000000000001", Some(ForceOutcome::Success)),
            Decision::Approved
        );
    }

    #[test]
    fn test_forced_failure_code_uses_last_digit() {
        let engine = DecisionEngine::new(true);
        // Even digit 2 -> index 2
        assert_eq!(
            engine.evaluate("4242424242424242", Some(ForceOutcome::Failure)),
            Decision::Declined(FailureCode::NetworkError)
        );
        // Non-digit -> 0 -> DECLINED
        assert_eq!(
            engine.evaluate("42424242424242ab", Some(ForceOutcome::Failure)),
            Decision::Declined(FailureCode::Declined)
        );
    }

    #[test]
    fn test_force_ignored_when_not_allowed() {
        let engine = DecisionEngine::new(false);
        assert!(!engine.force_allowed());
        assert_eq!(
            engine.decide("4000000000000001", Some(ForceOutcome::Success)),
            Outcome::Failure
        );
        assert_eq!(
            engine.decide("4242424242424242", Some(ForceOutcome::Failure)),
            Outcome::Success
        );
    }

    #[test]
    fn test_failure_code_helper() {
        assert_eq!(failure_code("4111111111111111"), FailureCode::InsufficientFunds);
        assert_eq!(failure_code("4111111111111116"), FailureCode::Declined);
        assert_eq!(failure_code("4111111111111118"), FailureCode::NetworkError);
    }

    #[test]
    fn test_luhn_does_not_influence_decision() {
        let engine = DecisionEngine::new(false);
        // Fails Luhn but ends in an even digit.
        assert!(!crate::card::luhn_check("4242424242424244"));
        assert_eq!(engine.decide("4242424242424244", None), Outcome::Success);
    }
}
