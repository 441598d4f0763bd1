//! Aggregation combinators: run multiple outcome sources, keep all values.
//!
//! [`all`] combines an ordered sequence of [`Source`]s into one outcome.
//!
//! # Semantics
//!
//! `all([s0, s1, ..., sn])`:
//! 1. Evaluate sources left to right; a producer runs only when evaluation
//!    reaches it.
//! 2. A synchronous `Failure` with no pending source before it ends the
//!    aggregation immediately — later sources are never evaluated.
//! 3. Once a pending source has been seen, a later synchronous `Failure`
//!    still stops evaluation of the remaining tail, but sources already in
//!    flight are awaited to completion (never abandoned); their values are
//!    discarded if the aggregate fails.
//! 4. Pending sources are awaited concurrently. The reported failure, if
//!    any, is the lowest-index failure among all evaluated sources — input
//!    order, not completion order.
//! 5. If nothing fails, the result is a `Success` holding every value in
//!    input order. An empty input yields an immediate empty `Success`.
//!
//! [`all_catching`] additionally converts producer panics and poll-time
//! panics into failures; [`all`] lets them escape as host-level faults.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::async_outcome::AsyncOutcome;
use crate::eventual::Eventual;
use crate::fault::{CatchPanic, CaughtPanic, catch};
use crate::outcome::Outcome;
use crate::produced::{IntoProduced, Produced};

/// One item of an aggregation: a literal value, a ready outcome, a deferred
/// outcome, or a producer invoked only when evaluation reaches it.
pub enum Source<T, E> {
    /// A literal success value.
    Value(T),
    /// An already-computed outcome.
    Ready(Outcome<T, E>),
    /// A deferred outcome.
    Pending(AsyncOutcome<T, E>),
    /// A zero-argument producer, run lazily in input order.
    Producer(Box<dyn FnOnce() -> Produced<T, E> + Send>),
}

impl<T, E> Source<T, E> {
    /// A literal success value.
    pub const fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// An already-computed outcome.
    pub const fn outcome(outcome: Outcome<T, E>) -> Self {
        Self::Ready(outcome)
    }

    /// A deferred outcome.
    pub const fn future(deferred: AsyncOutcome<T, E>) -> Self {
        Self::Pending(deferred)
    }

    /// A lazy producer; whatever it hands back is flattened by tag.
    pub fn producer<P, F>(produce: F) -> Self
    where
        F: FnOnce() -> P + Send + 'static,
        P: IntoProduced<T, E>,
    {
        Self::Producer(Box::new(move || produce().into_produced()))
    }

    /// Evaluates this source into a tagged value, invoking a producer.
    fn produce(self) -> Produced<T, E> {
        match self {
            Self::Value(value) => Produced::Value(value),
            Self::Ready(outcome) => Produced::Ready(outcome),
            Self::Pending(deferred) => Produced::Pending(deferred),
            Self::Producer(produce) => produce(),
        }
    }
}

impl<T, E> std::fmt::Debug for Source<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::Value(_) => "Value",
            Self::Ready(_) => "Ready",
            Self::Pending(_) => "Pending",
            Self::Producer(_) => "Producer",
        };
        f.debug_tuple("Source").field(&tag).finish()
    }
}

impl<T, E> From<Outcome<T, E>> for Source<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        Self::Ready(outcome)
    }
}

impl<T, E> From<AsyncOutcome<T, E>> for Source<T, E> {
    fn from(deferred: AsyncOutcome<T, E>) -> Self {
        Self::Pending(deferred)
    }
}

impl<T, E> From<Eventual<T, E>> for Source<T, E> {
    fn from(eventual: Eventual<T, E>) -> Self {
        match eventual {
            Eventual::Ready(outcome) => Self::Ready(outcome),
            Eventual::Pending(deferred) => Self::Pending(deferred),
        }
    }
}

impl<T, E> From<Produced<T, E>> for Source<T, E> {
    fn from(produced: Produced<T, E>) -> Self {
        match produced {
            Produced::Value(value) => Self::Value(value),
            Produced::Ready(outcome) => Self::Ready(outcome),
            Produced::Pending(deferred) => Self::Pending(deferred),
        }
    }
}

/// One evaluated aggregation slot: resolved, or still in flight.
enum Slot<T, E> {
    Resolved(Option<Outcome<T, E>>),
    InFlight(AsyncOutcome<T, E>),
}

/// Awaits every in-flight slot, then reports the lowest-index failure or
/// the ordered collection of success values.
#[must_use = "futures do nothing unless polled"]
struct AllFuture<T, E> {
    slots: Vec<Slot<T, E>>,
}

// The slots are only ever moved, never pin-projected, and the in-flight
// `AsyncOutcome` is itself `Unpin`, so `AllFuture` can be treated as `Unpin`
// regardless of `T`/`E`. This keeps `poll`'s `get_mut` valid without forcing
// `Unpin` bounds onto the public aggregation API.
impl<T, E> Unpin for AllFuture<T, E> {}

impl<T, E> Future for AllFuture<T, E> {
    type Output = Outcome<Vec<T>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut all_resolved = true;
        for slot in &mut this.slots {
            if let Slot::InFlight(deferred) = slot {
                match Pin::new(deferred).poll(cx) {
                    Poll::Ready(outcome) => *slot = Slot::Resolved(Some(outcome)),
                    Poll::Pending => all_resolved = false,
                }
            }
        }
        if !all_resolved {
            return Poll::Pending;
        }
        let mut values = Vec::with_capacity(this.slots.len());
        for slot in &mut this.slots {
            match slot {
                Slot::Resolved(outcome) => {
                    match outcome.take().expect("AllFuture polled after completion") {
                        Outcome::Success(value) => values.push(value),
                        Outcome::Failure(error) => return Poll::Ready(Outcome::Failure(error)),
                    }
                }
                Slot::InFlight(_) => return Poll::Pending,
            }
        }
        Poll::Ready(Outcome::Success(values))
    }
}

/// Combines an ordered sequence of sources into one outcome, eager-failing.
///
/// See the [module documentation](self) for the full evaluation contract.
/// Panics from producers or polled futures are not caught — use
/// [`all_catching`] for that.
pub fn all<T, E, I>(items: I) -> Eventual<Vec<T>, E>
where
    I: IntoIterator<Item = Source<T, E>>,
    T: Send + 'static,
    E: Send + 'static,
{
    let mut slots: Vec<Slot<T, E>> = Vec::new();
    let mut saw_pending = false;
    for source in items {
        match source.produce() {
            Produced::Value(value) => {
                slots.push(Slot::Resolved(Some(Outcome::Success(value))));
            }
            Produced::Ready(Outcome::Success(value)) => {
                slots.push(Slot::Resolved(Some(Outcome::Success(value))));
            }
            Produced::Ready(Outcome::Failure(error)) if !saw_pending => {
                #[cfg(feature = "tracing-integration")]
                tracing::trace!(index = slots.len(), "aggregation failed eagerly");
                return Eventual::Ready(Outcome::Failure(error));
            }
            Produced::Ready(Outcome::Failure(error)) => {
                // A known failure caps the aggregation: the tail is never
                // evaluated, but earlier in-flight sources are still awaited
                // and may fail at a lower index.
                slots.push(Slot::Resolved(Some(Outcome::Failure(error))));
                break;
            }
            Produced::Pending(deferred) => {
                saw_pending = true;
                slots.push(Slot::InFlight(deferred));
            }
        }
    }
    finish(slots, saw_pending)
}

/// [`all`] with host-fault capture: a panic from a producer or from polling
/// an in-flight source becomes a `Failure` via `E: From<CaughtPanic>`.
pub fn all_catching<T, E, I>(items: I) -> Eventual<Vec<T>, E>
where
    I: IntoIterator<Item = Source<T, E>>,
    T: Send + 'static,
    E: From<CaughtPanic> + Send + 'static,
{
    let mut slots: Vec<Slot<T, E>> = Vec::new();
    let mut saw_pending = false;
    for source in items {
        let produced = match catch(move || source.produce()) {
            Ok(produced) => produced,
            Err(caught) => Produced::Ready(Outcome::Failure(E::from(caught))),
        };
        match produced {
            Produced::Value(value) => {
                slots.push(Slot::Resolved(Some(Outcome::Success(value))));
            }
            Produced::Ready(Outcome::Success(value)) => {
                slots.push(Slot::Resolved(Some(Outcome::Success(value))));
            }
            Produced::Ready(Outcome::Failure(error)) if !saw_pending => {
                return Eventual::Ready(Outcome::Failure(error));
            }
            Produced::Ready(Outcome::Failure(error)) => {
                slots.push(Slot::Resolved(Some(Outcome::Failure(error))));
                break;
            }
            Produced::Pending(deferred) => {
                saw_pending = true;
                slots.push(Slot::InFlight(AsyncOutcome::new(CatchPanic::new(
                    deferred,
                    E::from,
                ))));
            }
        }
    }
    finish(slots, saw_pending)
}

fn finish<T, E>(slots: Vec<Slot<T, E>>, saw_pending: bool) -> Eventual<Vec<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    if saw_pending {
        return Eventual::Pending(AsyncOutcome::new(AllFuture { slots }));
    }
    // Everything resolved synchronously and nothing failed (a failure would
    // have returned above), so this is a plain ordered collection.
    let mut values = Vec::with_capacity(slots.len());
    for slot in slots {
        if let Slot::Resolved(Some(Outcome::Success(value))) = slot {
            values.push(value);
        }
    }
    Eventual::Ready(Outcome::Success(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::staggered;
    use futures_lite::future;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn empty_input_is_immediate_empty_success() {
        let aggregate: Eventual<Vec<i32>, String> = all(Vec::new());
        assert_eq!(aggregate.expect_ready(), Outcome::success(vec![]));
    }

    #[test]
    fn sync_sources_stay_sync() {
        let aggregate: Eventual<Vec<i32>, String> = all(vec![
            Source::value(1),
            Source::outcome(Outcome::success(2)),
            Source::producer(|| Outcome::<i32, String>::success(3)),
        ]);
        assert_eq!(aggregate.expect_ready(), Outcome::success(vec![1, 2, 3]));
    }

    #[test]
    fn eager_fail_suppresses_later_producers() {
        let invoked = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&invoked);
        let aggregate: Eventual<Vec<i32>, String> = all(vec![
            Source::outcome(Outcome::failure("first".to_string())),
            Source::producer(move || {
                flag.store(true, Ordering::SeqCst);
                Outcome::<i32, String>::success(2)
            }),
        ]);
        assert_eq!(
            aggregate.expect_ready(),
            Outcome::failure("first".to_string())
        );
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn pending_sources_are_awaited_concurrently_in_order() {
        crate::test_logging::init_test_logging();
        // The first source fails but resolves slowly; the second succeeds
        // immediately. Input order, not completion order, decides.
        let aggregate: Eventual<Vec<i32>, String> = all(vec![
            Source::future(staggered(5, Outcome::failure("slow loser".to_string()))),
            Source::future(staggered(0, Outcome::success(2))),
        ]);
        assert!(aggregate.is_pending());
        assert_eq!(
            future::block_on(aggregate.into_async()),
            Outcome::failure("slow loser".to_string())
        );
    }

    #[test]
    fn pending_successes_collect_in_input_order() {
        let aggregate: Eventual<Vec<i32>, String> = all(vec![
            Source::future(staggered(4, Outcome::success(1))),
            Source::value(2),
            Source::future(staggered(1, Outcome::success(3))),
        ]);
        assert_eq!(
            future::block_on(aggregate.into_async()),
            Outcome::success(vec![1, 2, 3])
        );
    }

    #[test]
    fn sync_failure_after_pending_caps_the_tail() {
        let invoked = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&invoked);
        let aggregate: Eventual<Vec<i32>, String> = all(vec![
            Source::future(staggered(2, Outcome::success(1))),
            Source::outcome(Outcome::failure("cap".to_string())),
            Source::producer(move || {
                flag.store(true, Ordering::SeqCst);
                Outcome::<i32, String>::success(3)
            }),
        ]);
        assert!(aggregate.is_pending());
        assert_eq!(
            future::block_on(aggregate.into_async()),
            Outcome::failure("cap".to_string())
        );
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn earlier_inflight_failure_outranks_later_sync_failure() {
        let aggregate: Eventual<Vec<i32>, String> = all(vec![
            Source::future(staggered(3, Outcome::failure("index zero".to_string()))),
            Source::outcome(Outcome::failure("index one".to_string())),
        ]);
        assert_eq!(
            future::block_on(aggregate.into_async()),
            Outcome::failure("index zero".to_string())
        );
    }

    #[test]
    fn all_catching_converts_producer_panic() {
        let aggregate: Eventual<Vec<i32>, CaughtPanic> = all_catching(vec![
            Source::producer(|| -> Outcome<i32, CaughtPanic> { panic!("producer blew up") }),
            Source::value(2),
        ]);
        let error = aggregate.expect_ready().error().unwrap();
        assert_eq!(error.message(), "producer blew up");
    }

    #[test]
    #[should_panic(expected = "producer blew up")]
    fn plain_all_lets_producer_panic_escape() {
        let _: Eventual<Vec<i32>, String> = all(vec![Source::producer(
            || -> Outcome<i32, String> { panic!("producer blew up") },
        )]);
    }

    #[test]
    fn all_catching_converts_poll_time_panic() {
        let exploding = AsyncOutcome::<i32, CaughtPanic>::new(async { panic!("poll blew up") });
        let aggregate: Eventual<Vec<i32>, CaughtPanic> =
            all_catching(vec![Source::future(exploding), Source::value(2)]);
        let outcome = future::block_on(aggregate.into_async());
        assert_eq!(outcome.error().unwrap().message(), "poll blew up");
    }
}
