//! The deferred outcome container.
//!
//! [`AsyncOutcome`] is "an [`Outcome`] not yet available": a boxed future
//! that resolves to exactly one `Outcome<T, E>`. It exposes the same
//! operation names as the synchronous container so callers need not
//! distinguish sync from async chains.
//!
//! Each operation awaits the underlying outcome once, applies the
//! corresponding [`Outcome`] operation, and re-wraps the result — no
//! suspension points are introduced beyond the one needed to obtain the
//! outcome and, for asynchronous callbacks, the one needed to obtain the
//! callback's result. An `AsyncOutcome` resolves exactly once; it is not
//! `Clone` and cannot be made to represent two different outcomes.

use core::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::eventual::Eventual;
use crate::fault::{CatchPanic, CaughtPanic};
use crate::outcome::Outcome;
use crate::produced::IntoProduced;

/// A deferred [`Outcome`]: resolves to exactly one success or failure.
///
/// Implements [`Future`], so a chain can be terminated with `.await` at any
/// point; until then, the combinators below keep the chain in the algebra.
#[must_use = "futures do nothing unless polled"]
pub struct AsyncOutcome<T, E> {
    inner: Pin<Box<dyn Future<Output = Outcome<T, E>> + Send>>,
}

impl<T, E> fmt::Debug for AsyncOutcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncOutcome").finish_non_exhaustive()
    }
}

impl<T, E> Future for AsyncOutcome<T, E> {
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

impl<T, E> AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wraps a pending computation that resolves to an [`Outcome`].
    pub fn new<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Outcome<T, E>> + Send + 'static,
    {
        Self {
            inner: Box::pin(future),
        }
    }

    /// Wraps an already-resolved outcome; polling completes immediately.
    ///
    /// This is how a `Failure` is promoted to the deferred shape when an
    /// asynchronous callback forces the whole chain to become pending.
    pub fn ready(outcome: Outcome<T, E>) -> Self {
        Self::new(std::future::ready(outcome))
    }

    /// Normalizes a future whose output may be a bare value, a ready
    /// outcome, or another deferred outcome into a single `AsyncOutcome`.
    pub fn flatten_future<Fut, P>(future: Fut) -> Self
    where
        Fut: Future<Output = P> + Send + 'static,
        P: IntoProduced<T, E>,
    {
        Self::new(async move {
            let produced = future.await.into_produced();
            produced.resolve().await
        })
    }

    /// Transforms the success value once resolved; a failure propagates
    /// unchanged without invoking `transform`.
    pub fn map<U, F>(self, transform: F) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> U + Send + 'static,
        U: Send + 'static,
    {
        AsyncOutcome::new(async move { self.await.map(transform) })
    }

    /// [`map`](Self::map) with an asynchronous transform.
    pub fn map_async<U, Fut, F>(self, transform: F) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
        U: Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self.await {
                Outcome::Success(value) => Outcome::Success(transform(value).await),
                Outcome::Failure(error) => Outcome::Failure(error),
            }
        })
    }

    /// [`map`](Self::map) that converts a panic inside `transform` into a
    /// `Failure`.
    pub fn map_catching<U, F>(self, transform: F) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> U + Send + 'static,
        U: Send + 'static,
        E: From<CaughtPanic>,
    {
        AsyncOutcome::new(async move { self.await.map_catching(transform) })
    }

    /// [`map_catching`](Self::map_catching) with an explicit panic
    /// transform.
    pub fn map_catching_with<U, F, X>(self, transform: F, on_panic: X) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> U + Send + 'static,
        X: FnOnce(CaughtPanic) -> E + Send + 'static,
        U: Send + 'static,
    {
        AsyncOutcome::new(async move { self.await.map_catching_with(transform, on_panic) })
    }

    /// [`map_async`](Self::map_async) that also catches panics raised while
    /// the transform's future is polled.
    pub fn map_async_catching<U, Fut, F>(self, transform: F) -> AsyncOutcome<U, E>
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
        U: Send + 'static,
        E: From<CaughtPanic>,
    {
        let inner = async move {
            match self.await {
                Outcome::Success(value) => Outcome::Success(transform(value).await),
                Outcome::Failure(error) => Outcome::Failure(error),
            }
        };
        AsyncOutcome::new(CatchPanic::new(inner, E::from))
    }

    /// Replaces the failure value once resolved; a success propagates
    /// unchanged.
    pub fn map_error<F2, F>(self, transform: F) -> AsyncOutcome<T, F2>
    where
        F: FnOnce(E) -> F2 + Send + 'static,
        F2: Send + 'static,
    {
        AsyncOutcome::new(async move { self.await.map_error(transform) })
    }

    /// [`map_error`](Self::map_error) with an asynchronous transform.
    pub fn map_error_async<F2, Fut, F>(self, transform: F) -> AsyncOutcome<T, F2>
    where
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = F2> + Send + 'static,
        F2: Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self.await {
                Outcome::Success(value) => Outcome::Success(value),
                Outcome::Failure(error) => Outcome::Failure(transform(error).await),
            }
        })
    }

    /// The flattening transform, deferred: resolves the receiver, applies
    /// [`Outcome::and_then`], and flattens a produced deferred outcome with
    /// one further await.
    pub fn and_then<U, F2, P, F>(self, transform: F) -> AsyncOutcome<U, F2>
    where
        P: IntoProduced<U, F2>,
        F2: From<E> + Send + 'static,
        F: FnOnce(T) -> P + Send + 'static,
        U: Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self.await.and_then(transform) {
                Eventual::Ready(outcome) => outcome,
                Eventual::Pending(deferred) => deferred.await,
            }
        })
    }

    /// [`and_then`](Self::and_then) that converts panics (synchronous or at
    /// poll time) into a `Failure`.
    pub fn and_then_catching<U, F2, P, F>(self, transform: F) -> AsyncOutcome<U, F2>
    where
        P: IntoProduced<U, F2>,
        F2: From<E> + From<CaughtPanic> + Send + 'static,
        F: FnOnce(T) -> P + Send + 'static,
        U: Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self.await.and_then_catching(transform) {
                Eventual::Ready(outcome) => outcome,
                Eventual::Pending(deferred) => deferred.await,
            }
        })
    }

    /// Recovers a failure with `transform`; the result can no longer fail.
    pub fn recover<F>(self, transform: F) -> AsyncOutcome<T, Infallible>
    where
        F: FnOnce(E) -> T + Send + 'static,
    {
        AsyncOutcome::new(async move { self.await.recover(transform) })
    }

    /// [`recover`](Self::recover) with an asynchronous transform.
    pub fn recover_async<Fut, F>(self, transform: F) -> AsyncOutcome<T, Infallible>
    where
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self.await {
                Outcome::Success(value) => Outcome::Success(value),
                Outcome::Failure(error) => Outcome::Success(transform(error).await),
            }
        })
    }

    /// Flattening recovery; only failures the callback can produce remain.
    pub fn recover_with<F2, P, F>(self, transform: F) -> AsyncOutcome<T, F2>
    where
        P: IntoProduced<T, F2>,
        F: FnOnce(E) -> P + Send + 'static,
        F2: Send + 'static,
    {
        AsyncOutcome::new(async move {
            match self.await.recover_with(transform) {
                Eventual::Ready(outcome) => outcome,
                Eventual::Pending(deferred) => deferred.await,
            }
        })
    }

    /// [`recover`](Self::recover) that converts a panic inside `transform`
    /// into a `Failure`.
    pub fn recover_catching<F>(self, transform: F) -> AsyncOutcome<T, E>
    where
        F: FnOnce(E) -> T + Send + 'static,
        E: From<CaughtPanic>,
    {
        AsyncOutcome::new(async move { self.await.recover_catching(transform) })
    }

    /// [`recover_catching`](Self::recover_catching) with an explicit panic
    /// transform.
    pub fn recover_catching_with<F2, F, X>(self, transform: F, on_panic: X) -> AsyncOutcome<T, F2>
    where
        F: FnOnce(E) -> T + Send + 'static,
        X: FnOnce(CaughtPanic) -> F2 + Send + 'static,
        F2: Send + 'static,
    {
        AsyncOutcome::new(async move { self.await.recover_catching_with(transform, on_panic) })
    }

    /// Runs `action` for its side effect when the resolved outcome is a
    /// success; hands the outcome through unchanged. Panics in `action` are
    /// not caught.
    pub fn on_success<F>(self, action: F) -> Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        Self::new(async move { self.await.on_success(action) })
    }

    /// Runs `action` for its side effect when the resolved outcome is a
    /// failure; hands the outcome through unchanged.
    pub fn on_failure<F>(self, action: F) -> Self
    where
        F: FnOnce(&E) + Send + 'static,
    {
        Self::new(async move { self.await.on_failure(action) })
    }

    /// [`on_success`](Self::on_success) with an asynchronous action.
    pub fn on_success_async<Fut, F>(self, action: F) -> Self
    where
        F: FnOnce(&T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new(async move { self.await.on_success_async(action).await })
    }

    /// [`on_failure`](Self::on_failure) with an asynchronous action.
    pub fn on_failure_async<Fut, F>(self, action: F) -> Self
    where
        F: FnOnce(&E) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new(async move { self.await.on_failure_async(action).await })
    }

    /// Resolves and reduces to a single value; exactly one callback runs.
    pub async fn fold<R, FS, FF>(self, on_success: FS, on_failure: FF) -> R
    where
        FS: FnOnce(T) -> R,
        FF: FnOnce(E) -> R,
    {
        self.await.fold(on_success, on_failure)
    }

    /// Asynchronous [`fold`](Self::fold).
    pub async fn fold_async<R, FutS, FutF, FS, FF>(self, on_success: FS, on_failure: FF) -> R
    where
        FS: FnOnce(T) -> FutS,
        FF: FnOnce(E) -> FutF,
        FutS: Future<Output = R>,
        FutF: Future<Output = R>,
    {
        self.await.fold_async(on_success, on_failure).await
    }

    /// Resolves into the success value, discarding a failure.
    pub async fn value(self) -> Option<T> {
        self.await.value()
    }

    /// Resolves into the failure value, discarding a success.
    pub async fn error(self) -> Option<E> {
        self.await.error()
    }

    /// Resolves to the success value or the given default.
    pub async fn value_or(self, default: T) -> T {
        self.await.value_or(default)
    }

    /// Resolves to the success value or computes one from the failure.
    pub async fn value_or_else<F>(self, recover: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        self.await.value_or_else(recover)
    }

    /// Asynchronous [`value_or_else`](Self::value_or_else).
    pub async fn value_or_else_async<Fut, F>(self, recover: F) -> T
    where
        F: FnOnce(E) -> Fut,
        Fut: Future<Output = T>,
    {
        self.await.value_or_else_async(recover).await
    }

    /// Resolves to the success value, panicking on a failure. The deferred
    /// form of the escape hatch; see [`Outcome::value_or_panic`].
    ///
    /// # Panics
    ///
    /// Panics if the resolved outcome is a `Failure`.
    pub async fn value_or_panic(self) -> T
    where
        E: fmt::Debug,
    {
        self.await.value_or_panic()
    }

    /// Resolves into a `(value, error)` pair with exactly one side
    /// populated.
    pub async fn into_pair(self) -> (Option<T>, Option<E>) {
        self.await.into_pair()
    }

    /// Resolves into a standard [`Result`].
    pub async fn into_result(self) -> Result<T, E> {
        self.await.into_result()
    }
}
