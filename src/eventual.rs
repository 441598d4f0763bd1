//! The sync-or-async outcome union.
//!
//! Operations whose result shape depends on runtime data — aggregation, the
//! sequencing interpreter, flattening combinators, the panic adapter —
//! return an [`Eventual`]: either a ready [`Outcome`] or a pending
//! [`AsyncOutcome`]. The union preserves synchronous results as synchronous
//! (a caller that stayed sync never pays for an executor) while still
//! letting a chain continue uniformly: `Eventual` forwards the combinator
//! surface to whichever shape it holds, and converts to the deferred shape
//! on demand.

use core::convert::Infallible;
use std::future::IntoFuture;

use crate::async_outcome::AsyncOutcome;
use crate::outcome::Outcome;
use crate::produced::IntoProduced;

/// An outcome that is either available now or still pending.
///
/// The discriminants [`is_ready`](Eventual::is_ready) and
/// [`is_pending`](Eventual::is_pending) are the runtime type discrimination
/// for values of unknown provenance; `into_async` is the uniform promotion
/// to the deferred shape.
#[must_use = "this `Eventual` may hold a `Failure`, which should be handled"]
#[derive(Debug)]
pub enum Eventual<T, E> {
    /// The outcome is already known.
    Ready(Outcome<T, E>),
    /// The outcome is still being computed.
    Pending(AsyncOutcome<T, E>),
}

impl<T, E> Eventual<T, E> {
    /// Returns `true` if the outcome is already known.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns `true` if the outcome is still pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Converts into the ready outcome, discarding a pending one.
    #[must_use]
    pub fn into_ready(self) -> Option<Outcome<T, E>> {
        match self {
            Self::Ready(outcome) => Some(outcome),
            Self::Pending(_) => None,
        }
    }

    /// Returns the ready outcome, panicking if the result is pending.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is still pending.
    pub fn expect_ready(self) -> Outcome<T, E> {
        match self {
            Self::Ready(outcome) => outcome,
            Self::Pending(_) => panic!("called `Eventual::expect_ready()` on a pending outcome"),
        }
    }
}

impl<T, E> Eventual<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Promotes to the deferred shape; a ready outcome resolves on the
    /// first poll.
    pub fn into_async(self) -> AsyncOutcome<T, E> {
        match self {
            Self::Ready(outcome) => AsyncOutcome::ready(outcome),
            Self::Pending(deferred) => deferred,
        }
    }

    /// Transforms the success value, preserving the current shape.
    pub fn map<U, F>(self, transform: F) -> Eventual<U, E>
    where
        F: FnOnce(T) -> U + Send + 'static,
        U: Send + 'static,
    {
        match self {
            Self::Ready(outcome) => Eventual::Ready(outcome.map(transform)),
            Self::Pending(deferred) => Eventual::Pending(deferred.map(transform)),
        }
    }

    /// Replaces the failure value, preserving the current shape.
    pub fn map_error<F2, F>(self, transform: F) -> Eventual<T, F2>
    where
        F: FnOnce(E) -> F2 + Send + 'static,
        F2: Send + 'static,
    {
        match self {
            Self::Ready(outcome) => Eventual::Ready(outcome.map_error(transform)),
            Self::Pending(deferred) => Eventual::Pending(deferred.map_error(transform)),
        }
    }

    /// The flattening transform; a ready receiver stays ready unless the
    /// callback itself produces a deferred outcome.
    pub fn and_then<U, F2, P, F>(self, transform: F) -> Eventual<U, F2>
    where
        P: IntoProduced<U, F2>,
        F2: From<E> + Send + 'static,
        F: FnOnce(T) -> P + Send + 'static,
        U: Send + 'static,
    {
        match self {
            Self::Ready(outcome) => outcome.and_then(transform),
            Self::Pending(deferred) => Eventual::Pending(deferred.and_then(transform)),
        }
    }

    /// Recovers a failure with `transform`; the result can no longer fail.
    pub fn recover<F>(self, transform: F) -> Eventual<T, Infallible>
    where
        F: FnOnce(E) -> T + Send + 'static,
    {
        match self {
            Self::Ready(outcome) => Eventual::Ready(outcome.recover(transform)),
            Self::Pending(deferred) => Eventual::Pending(deferred.recover(transform)),
        }
    }

    /// Flattening recovery; only failures the callback can produce remain.
    pub fn recover_with<F2, P, F>(self, transform: F) -> Eventual<T, F2>
    where
        P: IntoProduced<T, F2>,
        F: FnOnce(E) -> P + Send + 'static,
        F2: Send + 'static,
    {
        match self {
            Self::Ready(outcome) => outcome.recover_with(transform),
            Self::Pending(deferred) => Eventual::Pending(deferred.recover_with(transform)),
        }
    }

    /// Runs `action` for its side effect on the success branch, preserving
    /// the current shape.
    pub fn on_success<F>(self, action: F) -> Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        match self {
            Self::Ready(outcome) => Self::Ready(outcome.on_success(action)),
            Self::Pending(deferred) => Self::Pending(deferred.on_success(action)),
        }
    }

    /// Runs `action` for its side effect on the failure branch, preserving
    /// the current shape.
    pub fn on_failure<F>(self, action: F) -> Self
    where
        F: FnOnce(&E) + Send + 'static,
    {
        match self {
            Self::Ready(outcome) => Self::Ready(outcome.on_failure(action)),
            Self::Pending(deferred) => Self::Pending(deferred.on_failure(action)),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Eventual<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        Self::Ready(outcome)
    }
}

impl<T, E> From<AsyncOutcome<T, E>> for Eventual<T, E> {
    fn from(deferred: AsyncOutcome<T, E>) -> Self {
        Self::Pending(deferred)
    }
}

impl<T, E> IntoFuture for Eventual<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = Outcome<T, E>;
    type IntoFuture = AsyncOutcome<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        self.into_async()
    }
}
