//! The synchronous outcome container.
//!
//! [`Outcome`] is an immutable tagged container holding either a success
//! value or a failure value, never both. It is the synchronous half of the
//! algebra; [`AsyncOutcome`](crate::AsyncOutcome) is the deferred half and
//! mirrors every operation defined here.
//!
//! # Semantics
//!
//! - Failure short-circuits: transforms on the success side are skipped on a
//!   `Failure` and the failure propagates unchanged.
//! - Async promotion is uniform: the `*_async` form of an operation returns
//!   an [`AsyncOutcome`](crate::AsyncOutcome) even when the receiver is a
//!   `Failure` (the callback is still skipped; the failure resolves
//!   immediately once polled). This keeps the result shape independent of
//!   the runtime state of the receiver.
//! - Flattening operations ([`and_then`](Outcome::and_then),
//!   [`recover_with`](Outcome::recover_with)) accept anything that converts
//!   into a [`Produced`] and dispatch on its tag in a single implementation
//!   path, so a callback may hand back a bare value, a ready outcome, or a
//!   deferred one.
//! - Host-level faults (panics) escape unless the operation is a
//!   `*_catching` variant; see [`fault`](crate::fault).

use core::convert::Infallible;
use std::future::Future;

use crate::async_outcome::AsyncOutcome;
use crate::eventual::Eventual;
use crate::fault::{CatchPanic, CaughtPanic, catch};
use crate::produced::{IntoProduced, Produced};

/// Immutable container holding exactly a success value or a failure value.
///
/// Every combinator consumes the receiver and returns a fresh `Outcome`
/// (values are moved, never mutated in place).
///
/// # Examples
///
/// ```
/// use outcome::Outcome;
///
/// let doubled: Outcome<i32, String> = Outcome::success(21).map(|n| n * 2);
/// assert_eq!(doubled, Outcome::success(42));
/// ```
#[must_use = "this `Outcome` may be a `Failure`, which should be handled"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// The operation produced a value.
    Success(T),
    /// The operation failed with a domain error.
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    /// Creates an outcome in the success state.
    pub const fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// Creates an outcome in the failure state.
    pub const fn failure(error: E) -> Self {
        Self::Failure(error)
    }

    /// Returns `true` if the outcome is a `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` if the outcome is a `Failure`.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Converts into the success value, discarding a failure.
    #[must_use]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Converts into the failure value, discarding a success.
    #[must_use]
    pub fn error(self) -> Option<E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Converts from `&Outcome<T, E>` to `Outcome<&T, &E>`.
    pub const fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Returns the success value or the given default.
    #[must_use]
    pub fn value_or(self, default: T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default,
        }
    }

    /// Returns the success value or computes one from the failure.
    #[must_use]
    pub fn value_or_else<F>(self, recover: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => recover(error),
        }
    }

    /// Asynchronous form of [`value_or_else`](Self::value_or_else); the whole
    /// call becomes pending when the recovery is asynchronous.
    pub async fn value_or_else_async<Fut, F>(self, recover: F) -> T
    where
        F: FnOnce(E) -> Fut,
        Fut: Future<Output = T>,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => recover(error).await,
        }
    }

    /// Returns the success value, panicking on a failure.
    ///
    /// This is the one operation that deliberately breaks out of the outcome
    /// algebra, converting a domain failure back into a host-level fault. It
    /// exists for interop at boundaries that have not adopted outcomes and is
    /// discouraged for internal control flow.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is a `Failure`.
    #[must_use]
    pub fn value_or_panic(self) -> T
    where
        E: core::fmt::Debug,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => {
                panic!("called `Outcome::value_or_panic()` on a failure: {error:?}")
            }
        }
    }

    /// Decomposes into a `(value, error)` pair with exactly one side
    /// populated. Reconstructing from whichever element is `Some`
    /// reproduces the original outcome.
    #[must_use]
    pub fn into_pair(self) -> (Option<T>, Option<E>) {
        match self {
            Self::Success(value) => (Some(value), None),
            Self::Failure(error) => (None, Some(error)),
        }
    }

    /// Converts into a standard [`Result`].
    pub fn into_result(self) -> Result<T, E> {
        self.into()
    }

    /// Reduces the outcome to a single value; exactly one callback runs.
    pub fn fold<R, FS, FF>(self, on_success: FS, on_failure: FF) -> R
    where
        FS: FnOnce(T) -> R,
        FF: FnOnce(E) -> R,
    {
        match self {
            Self::Success(value) => on_success(value),
            Self::Failure(error) => on_failure(error),
        }
    }

    /// Asynchronous [`fold`](Self::fold): either branch may suspend, the
    /// untaken branch still never runs.
    pub async fn fold_async<R, FutS, FutF, FS, FF>(self, on_success: FS, on_failure: FF) -> R
    where
        FS: FnOnce(T) -> FutS,
        FF: FnOnce(E) -> FutF,
        FutS: Future<Output = R>,
        FutF: Future<Output = R>,
    {
        match self {
            Self::Success(value) => on_success(value).await,
            Self::Failure(error) => on_failure(error).await,
        }
    }

    /// Transforms the success value; a failure propagates unchanged without
    /// invoking `transform`.
    pub fn map<U, F>(self, transform: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => Outcome::Success(transform(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// [`map`](Self::map) with an asynchronous transform.
    ///
    /// A `Failure` receiver is still promoted to an
    /// [`AsyncOutcome`](crate::AsyncOutcome) (resolving immediately, callback
    /// skipped) so the result shape does not depend on the receiver's state.
    pub fn map_async<U, Fut, F>(self, transform: F) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
        U: Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self {
                Self::Success(value) => Outcome::Success(transform(value).await),
                Self::Failure(error) => Outcome::Failure(error),
            }
        })
    }

    /// [`map`](Self::map) that converts a panic inside `transform` into a
    /// `Failure` via `E: From<CaughtPanic>`.
    pub fn map_catching<U, F>(self, transform: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
        E: From<CaughtPanic>,
    {
        self.map_catching_with(transform, E::from)
    }

    /// [`map_catching`](Self::map_catching) with an explicit panic
    /// transform.
    pub fn map_catching_with<U, F, X>(self, transform: F, on_panic: X) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
        X: FnOnce(CaughtPanic) -> E,
    {
        match self {
            Self::Success(value) => match catch(move || transform(value)) {
                Ok(mapped) => Outcome::Success(mapped),
                Err(caught) => Outcome::Failure(on_panic(caught)),
            },
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// [`map_async`](Self::map_async) that also catches panics raised while
    /// the transform's future is polled.
    pub fn map_async_catching<U, Fut, F>(self, transform: F) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
        U: Send + 'static,
        T: Send + 'static,
        E: From<CaughtPanic> + Send + 'static,
    {
        let inner = async move {
            match self {
                Self::Success(value) => Outcome::Success(transform(value).await),
                Self::Failure(error) => Outcome::Failure(error),
            }
        };
        AsyncOutcome::new(CatchPanic::new(inner, E::from))
    }

    /// Replaces the failure value; a success propagates unchanged.
    ///
    /// This discards the previous failure type in favor of `F2` — callers
    /// that need to preserve a subset of prior failures must branch inside
    /// `transform`.
    pub fn map_error<F2, F>(self, transform: F) -> Outcome<T, F2>
    where
        F: FnOnce(E) -> F2,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(transform(error)),
        }
    }

    /// [`map_error`](Self::map_error) with an asynchronous transform; a
    /// `Success` receiver is promoted without invoking the callback.
    pub fn map_error_async<F2, Fut, F>(self, transform: F) -> AsyncOutcome<T, F2>
    where
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = F2> + Send + 'static,
        F2: Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self {
                Self::Success(value) => Outcome::Success(value),
                Self::Failure(error) => Outcome::Failure(transform(error).await),
            }
        })
    }

    /// The flattening transform: `transform` may hand back a bare value, a
    /// ready outcome, or a deferred outcome, and the result collapses to a
    /// single [`Eventual`].
    ///
    /// The failure side of the result must absorb both the receiver's
    /// failure type and whatever the produced outcome can fail with, hence
    /// `F2: From<E>`. A `Failure` receiver skips `transform` entirely.
    pub fn and_then<U, F2, P, F>(self, transform: F) -> Eventual<U, F2>
    where
        P: IntoProduced<U, F2>,
        F2: From<E>,
        F: FnOnce(T) -> P,
    {
        match self {
            Self::Success(value) => transform(value).into_produced().into_eventual(),
            Self::Failure(error) => Eventual::Ready(Outcome::Failure(F2::from(error))),
        }
    }

    /// [`and_then`](Self::and_then) that converts panics — both synchronous
    /// ones and panics raised while a produced deferred outcome is polled —
    /// into a `Failure`.
    pub fn and_then_catching<U, F2, P, F>(self, transform: F) -> Eventual<U, F2>
    where
        P: IntoProduced<U, F2>,
        F2: From<E> + From<CaughtPanic> + Send + 'static,
        F: FnOnce(T) -> P,
        U: Send + 'static,
    {
        match self {
            Self::Success(value) => match catch(move || transform(value).into_produced()) {
                Ok(Produced::Pending(deferred)) => Eventual::Pending(AsyncOutcome::new(
                    CatchPanic::new(deferred, <F2 as From<CaughtPanic>>::from),
                )),
                Ok(produced) => produced.into_eventual(),
                Err(caught) => {
                    Eventual::Ready(Outcome::Failure(<F2 as From<CaughtPanic>>::from(caught)))
                }
            },
            Self::Failure(error) => Eventual::Ready(Outcome::Failure(<F2 as From<E>>::from(error))),
        }
    }

    /// The dual of [`map`](Self::map) for the failure side: a failure is
    /// replaced by `transform(error)` and the result can no longer fail,
    /// which the `Infallible` failure type records at compile time.
    pub fn recover<F>(self, transform: F) -> Outcome<T, Infallible>
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Success(transform(error)),
        }
    }

    /// [`recover`](Self::recover) with an asynchronous transform; a
    /// `Success` receiver is promoted without invoking the callback.
    pub fn recover_async<Fut, F>(self, transform: F) -> AsyncOutcome<T, Infallible>
    where
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self {
                Self::Success(value) => Outcome::Success(value),
                Self::Failure(error) => Outcome::Success(transform(error).await),
            }
        })
    }

    /// Flattening recovery: the callback may itself produce an outcome (of
    /// either shape). After a successful recovery the original failure is
    /// resolved for good; only failures the callback can produce remain.
    pub fn recover_with<F2, P, F>(self, transform: F) -> Eventual<T, F2>
    where
        P: IntoProduced<T, F2>,
        F: FnOnce(E) -> P,
    {
        match self {
            Self::Success(value) => Eventual::Ready(Outcome::Success(value)),
            Self::Failure(error) => transform(error).into_produced().into_eventual(),
        }
    }

    /// [`recover`](Self::recover) that converts a panic inside `transform`
    /// into a `Failure` instead of letting it escape.
    pub fn recover_catching<F>(self, transform: F) -> Outcome<T, E>
    where
        F: FnOnce(E) -> T,
        E: From<CaughtPanic>,
    {
        self.recover_catching_with(transform, E::from)
    }

    /// [`recover_catching`](Self::recover_catching) with an explicit panic
    /// transform (and therefore a caller-chosen failure type).
    pub fn recover_catching_with<F2, F, X>(self, transform: F, on_panic: X) -> Outcome<T, F2>
    where
        F: FnOnce(E) -> T,
        X: FnOnce(CaughtPanic) -> F2,
    {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => match catch(move || transform(error)) {
                Ok(value) => Outcome::Success(value),
                Err(caught) => Outcome::Failure(on_panic(caught)),
            },
        }
    }

    /// Runs `action` for its side effect when the outcome is a success and
    /// returns the receiver unchanged.
    ///
    /// Panics inside `action` are deliberately not caught: side effects are
    /// not transformations, and a fault in one is a programming error.
    pub fn on_success<F>(self, action: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Self::Success(value) = &self {
            action(value);
        }
        self
    }

    /// Runs `action` for its side effect when the outcome is a failure and
    /// returns the receiver unchanged.
    pub fn on_failure<F>(self, action: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Self::Failure(error) = &self {
            action(error);
        }
        self
    }

    /// [`on_success`](Self::on_success) with an asynchronous action; the
    /// receiver is promoted and handed back once the action completes.
    pub fn on_success_async<Fut, F>(self, action: F) -> AsyncOutcome<T, E>
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let task = match &self {
            Self::Success(value) => Some(action(value)),
            Self::Failure(_) => None,
        };
        AsyncOutcome::new(async move {
            if let Some(task) = task {
                task.await;
            }
            self
        })
    }

    /// [`on_failure`](Self::on_failure) with an asynchronous action.
    pub fn on_failure_async<Fut, F>(self, action: F) -> AsyncOutcome<T, E>
    where
        F: FnOnce(&E) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let task = match &self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(action(error)),
        };
        AsyncOutcome::new(async move {
            if let Some(task) = task {
                task.await;
            }
            self
        })
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}
