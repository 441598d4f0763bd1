//! Test-oriented outcome assertions.

use core::fmt;

use crate::outcome::Outcome;

/// Asserts that `outcome` is a success and returns a reference to its value.
///
/// # Panics
///
/// Panics if the outcome is a `Failure`, including the failure in the
/// message.
pub fn assert_success<T, E>(outcome: &Outcome<T, E>) -> &T
where
    E: fmt::Debug,
{
    match outcome {
        Outcome::Success(value) => value,
        Outcome::Failure(error) => panic!("expected a success, got a failure: {error:?}"),
    }
}

/// Asserts that `outcome` is a failure and returns a reference to its error.
///
/// # Panics
///
/// Panics if the outcome is a `Success`, including the value in the message.
pub fn assert_failure<T, E>(outcome: &Outcome<T, E>) -> &E
where
    T: fmt::Debug,
{
    match outcome {
        Outcome::Success(value) => panic!("expected a failure, got a success: {value:?}"),
        Outcome::Failure(error) => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertions_return_the_matching_payload() {
        let success: Outcome<i32, String> = Outcome::success(1);
        assert_eq!(*assert_success(&success), 1);
        let failure: Outcome<i32, String> = Outcome::failure("e".to_string());
        assert_eq!(assert_failure(&failure), "e");
    }

    #[test]
    #[should_panic(expected = "expected a success, got a failure")]
    fn assert_success_panics_on_failure() {
        let failure: Outcome<i32, String> = Outcome::failure("e".to_string());
        let _ = assert_success(&failure);
    }

    #[test]
    #[should_panic(expected = "expected a failure, got a success")]
    fn assert_failure_panics_on_success() {
        let success: Outcome<i32, String> = Outcome::success(1);
        let _ = assert_failure(&success);
    }
}
