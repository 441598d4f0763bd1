//! Unit-test helpers.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::async_outcome::AsyncOutcome;
use crate::outcome::Outcome;

/// A deferred outcome that stays pending for `polls` wakeups before
/// resolving; simulates completion-order skew without a timer.
pub(crate) fn staggered<T, E>(polls: u32, outcome: Outcome<T, E>) -> AsyncOutcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    AsyncOutcome::new(Staggered {
        remaining: polls,
        outcome: Some(outcome),
    })
}

struct Staggered<T, E> {
    remaining: u32,
    outcome: Option<Outcome<T, E>>,
}

// Only moved, never pin-projected, so `Staggered` is `Unpin` for any `T`/`E`;
// this keeps `poll`'s `get_mut` valid without `Unpin` bounds on the helper.
impl<T, E> Unpin for Staggered<T, E> {}

impl<T, E> Future for Staggered<T, E>
where
    T: Send,
    E: Send,
{
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.remaining == 0 {
            Poll::Ready(
                this.outcome
                    .take()
                    .expect("Staggered polled after completion"),
            )
        } else {
            this.remaining -= 1;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
