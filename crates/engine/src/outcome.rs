//! Uniform result of every operation.
//!
//! An [`Outcome`] is either a `Success` carrying the operation's payload or a
//! `Failure` carrying exactly one [`Failure`] descriptor. Validation problems,
//! missing records and unusable labels all end up here; they never travel as
//! [`EngineError`](crate::EngineError).

use std::fmt;

/// Machine-readable `code` plus human-readable `message`.
///
/// Codes have the shape `<Operation>.<Reason>`, e.g.
/// `CreateExpenditure.Validation` or `UpdateIncome.IncomeNotFound`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    code: String,
    message: String,
}

impl Failure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// All rule violations of `operation`, joined into a single failure.
    pub fn validation(operation: &str, violations: &[String]) -> Self {
        Self::new(format!("{operation}.Validation"), violations.join("\n"))
    }

    /// `entity` with identifier `id` does not exist (or cannot be used) for
    /// `operation`.
    pub fn not_found(operation: &str, entity: &str, id: &str) -> Self {
        Self::new(
            format!("{operation}.{entity}NotFound"),
            format!("{entity} with ID '{id}' was not found."),
        )
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Result of an operation: `Success(T)` or `Failure(Failure)`.
///
/// Void operations use `Outcome<()>`. There is no `Default`: an outcome is
/// always built from a value or from a failure.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(Failure),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    pub fn failure(error: Failure) -> Self {
        Self::Failure(error)
    }

    /// Consume the outcome, handling both branches.
    pub fn resolve<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(Failure) -> R,
    ) -> R {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(error) => on_failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_runs_success_branch() {
        let outcome = Outcome::success(21);
        let value = outcome.resolve(|v| v * 2, |_| 0);
        assert_eq!(value, 42);
    }

    #[test]
    fn resolve_runs_failure_branch() {
        let outcome: Outcome<i32> = Outcome::failure(Failure::new("Op.Reason", "nope"));
        let code = outcome.resolve(|_| String::new(), |err| err.code().to_string());
        assert_eq!(code, "Op.Reason");
    }

    #[test]
    fn validation_joins_every_violation() {
        let failure = Failure::validation(
            "CreateLabel",
            &["first".to_string(), "second".to_string()],
        );
        assert_eq!(failure.code(), "CreateLabel.Validation");
        assert_eq!(failure.message(), "first\nsecond");
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let failure = Failure::not_found("UpdateIncome", "Income", "i_123");
        assert_eq!(failure.code(), "UpdateIncome.IncomeNotFound");
        assert_eq!(failure.message(), "Income with ID 'i_123' was not found.");
    }
}
