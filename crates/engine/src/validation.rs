//! Request validation.
//!
//! Every request declares its rules by implementing [`Validate`]. Rules are
//! pure predicates over the request's fields; each broken rule appends one
//! human-readable violation. The dispatcher runs them before any handler and
//! turns a non-empty list into a single `<Operation>.Validation` failure.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Rule set of a request type.
pub trait Validate {
    fn validate(&self, rules: &mut Rules);
}

/// Lower bound every calendar date must be strictly after.
pub fn min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Collects the violations found while checking a request.
#[derive(Debug, Default)]
pub struct Rules {
    violations: Vec<String>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank (empty or whitespace-only) strings are rejected.
    pub fn not_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.violations
                .push(format!("'{field}' must not be empty."));
        }
        self
    }

    /// Length is counted in characters, not bytes.
    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len > max {
            self.violations.push(format!(
                "The length of '{field}' must be {max} characters or fewer. You entered {len} characters."
            ));
        }
        self
    }

    /// Shorthand for [`not_empty`](Self::not_empty) plus [`max_len`](Self::max_len).
    pub fn required_text(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        self.not_empty(field, value).max_len(field, value, max)
    }

    pub fn positive_amount(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value <= Decimal::ZERO {
            self.violations
                .push(format!("'{field}' must be greater than '0'."));
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: i64) -> &mut Self {
        if value <= 0 {
            self.violations
                .push(format!("'{field}' must be greater than '0'."));
        }
        self
    }

    pub fn after_min_date(&mut self, field: &str, value: NaiveDate) -> &mut Self {
        let min = min_date();
        if value <= min {
            self.violations
                .push(format!("'{field}' must be greater than '{min}'."));
        }
        self
    }

    pub fn into_violations(self) -> Vec<String> {
        self.violations
    }
}

/// Run the rule set of `request` and return every violation, in rule order.
pub fn check<R: Validate + ?Sized>(request: &R) -> Vec<String> {
    let mut rules = Rules::new();
    request.validate(&mut rules);
    rules.into_violations()
}
