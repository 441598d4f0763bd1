//! Bridges from panicking code and bare futures into the outcome algebra.
//!
//! Code that has not adopted outcomes signals failure by panicking or by
//! returning a bare future. The adapters here normalize both into the
//! algebra:
//!
//! - [`attempt`] / [`attempt_with`]: run a closure, converting a panic —
//!   raised synchronously or while a produced deferred outcome is polled —
//!   into a `Failure`.
//! - [`wrap`] / [`wrap_with`]: the deferred form of `attempt`; nothing runs
//!   until the wrapped function is called.
//! - [`from_future`] / [`from_future_catching`]: normalize a future that
//!   resolves to any producible shape into a single [`AsyncOutcome`].

use std::future::Future;

use crate::async_outcome::AsyncOutcome;
use crate::eventual::Eventual;
use crate::fault::{CatchPanic, CaughtPanic, catch};
use crate::outcome::Outcome;
use crate::produced::{IntoProduced, Produced};

/// Runs `f`, converting a panic into a `Failure` via `E: From<CaughtPanic>`.
///
/// The closure may hand back a bare outcome, a deferred outcome, the
/// sync-or-async union, or a `Result`; the produced shape is preserved
/// (a deferred product keeps the whole call pending, and panics raised
/// while it is polled are caught through the same conversion).
pub fn attempt<T, E, P, F>(f: F) -> Eventual<T, E>
where
    F: FnOnce() -> P,
    P: IntoProduced<T, E>,
    T: Send + 'static,
    E: From<CaughtPanic> + Send + 'static,
{
    attempt_with(f, E::from)
}

/// [`attempt`] with an explicit panic transform.
pub fn attempt_with<T, E, P, F, X>(f: F, on_panic: X) -> Eventual<T, E>
where
    F: FnOnce() -> P,
    P: IntoProduced<T, E>,
    X: FnOnce(CaughtPanic) -> E + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    match catch(move || f().into_produced()) {
        Ok(Produced::Pending(deferred)) => {
            Eventual::Pending(AsyncOutcome::new(CatchPanic::new(deferred, on_panic)))
        }
        Ok(produced) => produced.into_eventual(),
        Err(caught) => {
            #[cfg(feature = "tracing-integration")]
            tracing::debug!(panic_message = caught.message(), "attempt caught a panic");
            Eventual::Ready(Outcome::Failure(on_panic(caught)))
        }
    }
}

/// Wraps `f` into a function with the same parameter that runs under
/// [`attempt`] when called. No invocation happens here.
///
/// Rust cannot abstract over arity, so the wrapped function takes exactly
/// one argument; callers with more bundle them into a tuple.
pub fn wrap<A, T, E, P, F>(f: F) -> impl Fn(A) -> Eventual<T, E>
where
    F: Fn(A) -> P,
    P: IntoProduced<T, E>,
    T: Send + 'static,
    E: From<CaughtPanic> + Send + 'static,
{
    move |arg: A| attempt(|| f(arg))
}

/// [`wrap`] with an explicit panic transform.
pub fn wrap_with<A, T, E, P, F, X>(f: F, on_panic: X) -> impl Fn(A) -> Eventual<T, E>
where
    F: Fn(A) -> P,
    P: IntoProduced<T, E>,
    X: Fn(CaughtPanic) -> E + Clone + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    move |arg: A| attempt_with(|| f(arg), on_panic.clone())
}

/// Normalizes a future that resolves to a bare value, an outcome, or a
/// deferred outcome into a single [`AsyncOutcome`]. Panics are not caught.
pub fn from_future<T, E, P, Fut>(future: Fut) -> AsyncOutcome<T, E>
where
    Fut: Future<Output = P> + Send + 'static,
    P: IntoProduced<T, E>,
    T: Send + 'static,
    E: Send + 'static,
{
    AsyncOutcome::flatten_future(future)
}

/// [`from_future`] with host-fault capture: a panic raised while polling
/// becomes a `Failure` via `E: From<CaughtPanic>`.
pub fn from_future_catching<T, E, P, Fut>(future: Fut) -> AsyncOutcome<T, E>
where
    Fut: Future<Output = P> + Send + 'static,
    P: IntoProduced<T, E>,
    T: Send + 'static,
    E: From<CaughtPanic> + Send + 'static,
{
    AsyncOutcome::new(CatchPanic::new(
        AsyncOutcome::flatten_future(future),
        E::from,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future;

    #[test]
    fn attempt_passes_through_success() {
        let eventual: Eventual<i32, CaughtPanic> =
            attempt(|| Outcome::<i32, CaughtPanic>::success(5));
        assert_eq!(eventual.expect_ready(), Outcome::success(5));
    }

    #[test]
    fn attempt_converts_sync_panic() {
        let eventual: Eventual<i32, CaughtPanic> =
            attempt(|| -> Outcome<i32, CaughtPanic> { panic!("sync boom") });
        let error = eventual.expect_ready().error().unwrap();
        assert_eq!(error.message(), "sync boom");
    }

    #[test]
    fn attempt_with_custom_transform() {
        let eventual: Eventual<i32, String> = attempt_with(
            || -> Outcome<i32, String> { panic!("custom boom") },
            |caught| caught.message().to_string(),
        );
        assert_eq!(
            eventual.expect_ready(),
            Outcome::failure("custom boom".to_string())
        );
    }

    #[test]
    fn attempt_keeps_deferred_shape_and_catches_late_panic() {
        let eventual: Eventual<i32, CaughtPanic> = attempt(|| {
            AsyncOutcome::<i32, CaughtPanic>::new(async { panic!("late boom") })
        });
        assert!(eventual.is_pending());
        let outcome = future::block_on(eventual.into_async());
        assert_eq!(outcome.error().unwrap().message(), "late boom");
    }

    #[test]
    fn wrap_defers_invocation() {
        let wrapped = wrap(|n: i32| Outcome::<i32, CaughtPanic>::success(n * 2));
        // Nothing has run yet; calling evaluates.
        assert_eq!(wrapped(4).expect_ready(), Outcome::success(8));
        assert_eq!(wrapped(5).expect_ready(), Outcome::success(10));
    }

    #[test]
    fn wrap_catches_per_call() {
        let wrapped = wrap(|n: i32| -> Outcome<i32, CaughtPanic> {
            assert!(n >= 0, "negative input");
            Outcome::success(n)
        });
        assert_eq!(wrapped(1).expect_ready(), Outcome::success(1));
        let error = wrapped(-1).expect_ready().error().unwrap();
        assert!(error.message().contains("negative input"));
    }

    #[test]
    fn from_future_normalizes_bare_outcome() {
        let deferred: AsyncOutcome<i32, String> =
            from_future(async { Outcome::<i32, String>::success(3) });
        assert_eq!(future::block_on(deferred), Outcome::success(3));
    }

    #[test]
    fn from_future_normalizes_nested_deferred() {
        let deferred: AsyncOutcome<i32, String> = from_future(async {
            AsyncOutcome::<i32, String>::ready(Outcome::success(4))
        });
        assert_eq!(future::block_on(deferred), Outcome::success(4));
    }

    #[test]
    fn from_future_catching_converts_poll_panic() {
        let deferred: AsyncOutcome<i32, CaughtPanic> =
            from_future_catching(async { Outcome::<i32, CaughtPanic>::success(panic!("rejected")) });
        let outcome = future::block_on(deferred);
        assert_eq!(outcome.error().unwrap().message(), "rejected");
    }
}
