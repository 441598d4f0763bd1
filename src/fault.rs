//! Host-level fault capture.
//!
//! The outcome algebra distinguishes *domain failures* (values carried in the
//! `Failure` branch) from *host-level faults* (panics). Combinators without
//! `catching` in their name let panics escape; the `*_catching` variants
//! intercept them and convert the payload into a domain failure via
//! [`CaughtPanic`].
//!
//! This module owns the two pieces of that bridge:
//!
//! - [`CaughtPanic`]: the captured payload of a panic, extracted from the
//!   `&str`/`String` message where one exists.
//! - [`CatchPanic`]: a future adapter that converts a panic raised while
//!   polling into a `Failure`, so rejection of a deferred outcome is caught
//!   at the same boundary as a synchronous panic.

use std::any::Any;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::task::{Context, Poll};

use pin_project::pin_project;
use thiserror::Error;

use crate::outcome::Outcome;

/// The captured payload of a panic, converted into an error value.
///
/// Panic payloads are `Box<dyn Any>`; the message is recovered when the
/// payload is a `&str` or `String` (the shape produced by `panic!` with a
/// message), otherwise a fixed placeholder is used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("caught panic: {message}")]
pub struct CaughtPanic {
    message: String,
}

impl CaughtPanic {
    /// Extracts a `CaughtPanic` from a raw panic payload.
    #[must_use]
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&'static str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "opaque panic payload".to_string());
        Self { message }
    }

    /// The panic message, if one could be recovered.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Runs `f`, converting a panic into a [`CaughtPanic`].
pub(crate) fn catch<R>(f: impl FnOnce() -> R) -> Result<R, CaughtPanic> {
    catch_unwind(AssertUnwindSafe(f)).map_err(CaughtPanic::from_payload)
}

/// Future adapter that converts a panic raised during `poll` into a
/// `Failure` via the supplied transform.
///
/// Used by every `*_catching` operation that has to observe a deferred
/// outcome: the synchronous half of the operation catches with
/// [`catch`], the asynchronous half wraps the remaining future in this
/// adapter so both halves report through the same transform.
#[pin_project]
#[must_use = "futures do nothing unless polled"]
pub(crate) struct CatchPanic<F, X> {
    #[pin]
    inner: F,
    transform: Option<X>,
}

impl<F, X> CatchPanic<F, X> {
    pub(crate) fn new(inner: F, transform: X) -> Self {
        Self {
            inner,
            transform: Some(transform),
        }
    }
}

impl<T, E, F, X> Future for CatchPanic<F, X>
where
    F: Future<Output = Outcome<T, E>>,
    X: FnOnce(CaughtPanic) -> E,
{
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match catch_unwind(AssertUnwindSafe(|| this.inner.poll(cx))) {
            Ok(poll) => poll,
            Err(payload) => {
                let caught = CaughtPanic::from_payload(payload);
                #[cfg(feature = "tracing-integration")]
                tracing::debug!(panic_message = caught.message(), "panic caught at poll time");
                let transform = this
                    .transform
                    .take()
                    .expect("CatchPanic polled after completion");
                Poll::Ready(Outcome::Failure(transform(caught)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_payload_keeps_message() {
        let caught = catch(|| -> u32 { panic!("boom") }).unwrap_err();
        assert_eq!(caught.message(), "boom");
    }

    #[test]
    fn string_payload_keeps_message() {
        let caught = catch(|| -> u32 { panic!("{}", String::from("formatted boom")) }).unwrap_err();
        assert_eq!(caught.message(), "formatted boom");
    }

    #[test]
    fn opaque_payload_gets_placeholder() {
        let caught = catch(|| -> u32 { std::panic::panic_any(42_u8) }).unwrap_err();
        assert_eq!(caught.message(), "opaque panic payload");
    }

    #[test]
    fn non_panicking_closure_passes_through() {
        assert_eq!(catch(|| 7), Ok(7));
    }

    #[test]
    fn display_includes_message() {
        let caught = catch(|| -> u32 { panic!("boom") }).unwrap_err();
        assert_eq!(caught.to_string(), "caught panic: boom");
    }
}
