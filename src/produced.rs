//! Runtime-tagged producer values.
//!
//! Flattening combinators and the sequencing interpreter accept callbacks
//! that may hand back one of several shapes: a bare value, a ready
//! [`Outcome`], or a deferred [`AsyncOutcome`]. Rather than duplicating each
//! combinator per shape, every shape converts into a single tagged
//! [`Produced`] value and the combinator dispatches on the tag in one
//! implementation path.

use crate::async_outcome::AsyncOutcome;
use crate::eventual::Eventual;
use crate::outcome::Outcome;

/// A value handed back by a combinator callback or a sequencing step,
/// tagged with its execution shape.
#[derive(Debug)]
pub enum Produced<T, E> {
    /// A bare success value, not yet wrapped.
    Value(T),
    /// An already-computed outcome.
    Ready(Outcome<T, E>),
    /// A deferred outcome.
    Pending(AsyncOutcome<T, E>),
}

impl<T, E> Produced<T, E> {
    /// Wraps a bare value; flattening treats it as an immediate success.
    pub const fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// Returns `true` for the bare-value tag.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns `true` for the ready-outcome tag.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns `true` for the deferred tag.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Collapses the tag into the sync-or-async union: a bare value becomes
    /// a ready success, the other tags pass through.
    pub fn into_eventual(self) -> Eventual<T, E> {
        match self {
            Self::Value(value) => Eventual::Ready(Outcome::Success(value)),
            Self::Ready(outcome) => Eventual::Ready(outcome),
            Self::Pending(deferred) => Eventual::Pending(deferred),
        }
    }

    /// Resolves the tag to a concrete outcome, awaiting the deferred shape.
    pub(crate) async fn resolve(self) -> Outcome<T, E> {
        match self {
            Self::Value(value) => Outcome::Success(value),
            Self::Ready(outcome) => outcome,
            Self::Pending(deferred) => deferred.await,
        }
    }
}

/// Conversion into a [`Produced`] value.
///
/// Implemented for ready outcomes, deferred outcomes, the sync-or-async
/// union, standard [`Result`]s, and `Produced` itself. Bare values are
/// wrapped explicitly with [`Produced::value`], which keeps the conversion
/// unambiguous when the value type is itself an outcome.
pub trait IntoProduced<T, E> {
    /// Performs the conversion.
    fn into_produced(self) -> Produced<T, E>;
}

impl<T, E> IntoProduced<T, E> for Produced<T, E> {
    fn into_produced(self) -> Produced<T, E> {
        self
    }
}

impl<T, E> IntoProduced<T, E> for Outcome<T, E> {
    fn into_produced(self) -> Produced<T, E> {
        Produced::Ready(self)
    }
}

impl<T, E> IntoProduced<T, E> for AsyncOutcome<T, E> {
    fn into_produced(self) -> Produced<T, E> {
        Produced::Pending(self)
    }
}

impl<T, E> IntoProduced<T, E> for Eventual<T, E> {
    fn into_produced(self) -> Produced<T, E> {
        match self {
            Eventual::Ready(outcome) => Produced::Ready(outcome),
            Eventual::Pending(deferred) => Produced::Pending(deferred),
        }
    }
}

impl<T, E> IntoProduced<T, E> for Result<T, E> {
    fn into_produced(self) -> Produced<T, E> {
        Produced::Ready(self.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future;

    #[test]
    fn tags_discriminate() {
        let produced: Produced<i32, String> = Produced::value(1);
        assert!(produced.is_value());
        let produced: Produced<i32, String> = Outcome::success(1).into_produced();
        assert!(produced.is_ready());
        let produced: Produced<i32, String> =
            AsyncOutcome::ready(Outcome::success(1)).into_produced();
        assert!(produced.is_pending());
    }

    #[test]
    fn bare_value_flattens_to_success() {
        let eventual: Eventual<i32, String> = Produced::value(3).into_eventual();
        assert_eq!(eventual.expect_ready(), Outcome::success(3));
    }

    #[test]
    fn result_converts_through_outcome() {
        let produced: Produced<i32, String> = Err("e".to_string()).into_produced();
        assert_eq!(
            produced.into_eventual().expect_ready(),
            Outcome::failure("e".to_string())
        );
    }

    #[test]
    fn resolve_awaits_pending() {
        let produced: Produced<i32, String> =
            AsyncOutcome::ready(Outcome::success(4)).into_produced();
        assert_eq!(future::block_on(produced.resolve()), Outcome::success(4));
    }
}
