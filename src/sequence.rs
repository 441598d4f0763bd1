//! The sequencing interpreter: straight-line code over yielded outcomes.
//!
//! A [`Routine`] is a suspendable, re-enterable computation. At each
//! suspension point it yields one nested outcome and expects to be resumed
//! with the unwrapped success value — or to be torn down immediately if the
//! yielded outcome was a failure. The interpreter ([`run`]) drives that
//! protocol to completion, producing a single sync-or-async outcome.
//!
//! # Protocol
//!
//! The driver and the routine exchange three messages:
//!
//! | Message | Direction | Meaning |
//! |---------|-----------|---------|
//! | [`Step::Yielded`] | routine → driver | "here is a nested outcome; suspend me" |
//! | [`Resume`] | driver → routine | "your last yield succeeded; continue with this value" |
//! | [`Routine::abort`] | driver → routine | "your last yield failed; clean up, you will not be resumed" |
//!
//! # Semantics
//!
//! - A yielded `Success` resumes the routine with the unwrapped value; a
//!   yielded `Failure` is terminal for the whole run — no further steps are
//!   requested, and the routine is notified through `abort` first.
//! - A yielded deferred outcome moves the rest of the drive into an
//!   [`AsyncOutcome`]; subsequent steps (sync or async) are driven
//!   uniformly. Steps are strictly sequential: step N+1 never begins before
//!   step N's outcome is known.
//! - If every step was synchronous the terminal result is a ready
//!   [`Outcome`]; one asynchronous step anywhere makes it pending.
//! - Nothing is retried. Panics escape [`run`]; [`run_catching`] converts a
//!   panic from any step into a `Failure` without changing the
//!   short-circuit behavior.
//!
//! A routine may yield another interpreter run's result: a nested run has
//! already been reduced to an outcome, so no special casing is needed.

use crate::async_outcome::AsyncOutcome;
use crate::eventual::Eventual;
use crate::fault::{CatchPanic, CaughtPanic, catch};
use crate::outcome::Outcome;
use crate::produced::{IntoProduced, Produced};

/// The driver-to-routine message: why the routine is being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume<V> {
    /// First entry; no outcome has been yielded yet.
    Start,
    /// The previously yielded outcome succeeded with this value.
    Value(V),
}

impl<V> Resume<V> {
    /// Converts into the carried value, if any.
    #[must_use]
    pub fn value(self) -> Option<V> {
        match self {
            Self::Start => None,
            Self::Value(value) => Some(value),
        }
    }

    /// Returns the carried value, panicking on [`Resume::Start`].
    ///
    /// Routines use this past their first step, where the protocol
    /// guarantees a value is present.
    ///
    /// # Panics
    ///
    /// Panics if the message is `Start`.
    #[must_use]
    pub fn expect_value(self) -> V {
        match self {
            Self::Start => panic!("called `Resume::expect_value()` on `Start`"),
            Self::Value(value) => value,
        }
    }
}

/// The routine-to-driver message: one step's result.
#[derive(Debug)]
pub enum Step<V, E, R> {
    /// The routine yielded a nested outcome and suspends until driven.
    Yielded(Produced<V, E>),
    /// The routine finished; the payload is tagged so a routine may finish
    /// with a bare value, a ready outcome, or a deferred one.
    Done(Produced<R, E>),
}

impl<V, E, R> Step<V, E, R> {
    /// Yields a nested outcome (any producible shape).
    pub fn yielded<P>(produced: P) -> Self
    where
        P: IntoProduced<V, E>,
    {
        Self::Yielded(produced.into_produced())
    }

    /// Finishes with a bare value, wrapped as a terminal success.
    pub const fn done(value: R) -> Self {
        Self::Done(Produced::Value(value))
    }

    /// Finishes with an outcome of any producible shape, passed through
    /// unchanged.
    pub fn done_with<P>(produced: P) -> Self
    where
        P: IntoProduced<R, E>,
    {
        Self::Done(produced.into_produced())
    }
}

/// A suspendable computation driven by the interpreter.
///
/// Implemented directly for state-machine types, or via the blanket impl
/// for `FnMut(Resume<V>) -> Step<V, E, R>` closures.
pub trait Routine<V, E> {
    /// The routine's final value on the success path.
    type Output;

    /// Advances the routine by one step.
    ///
    /// The first call receives [`Resume::Start`]; every later call receives
    /// the unwrapped success value of the outcome yielded by the previous
    /// step.
    fn resume(&mut self, input: Resume<V>) -> Step<V, E, Self::Output>;

    /// Notification that a yielded outcome failed and the routine will not
    /// be resumed; cleanup logic goes here. The default does nothing.
    fn abort(&mut self, failure: &E) {
        let _ = failure;
    }
}

impl<V, E, R, F> Routine<V, E> for F
where
    F: FnMut(Resume<V>) -> Step<V, E, R>,
{
    type Output = R;

    fn resume(&mut self, input: Resume<V>) -> Step<V, E, R> {
        self(input)
    }
}

/// What the driver does after interpreting one step.
enum Advance<V, E, R> {
    /// Feed this value back into the routine.
    Feed(V),
    /// The run is over.
    Finished(Eventual<R, E>),
    /// A deferred yield: the rest of the drive becomes asynchronous.
    Suspended(AsyncOutcome<V, E>),
}

/// Interprets one step; shared by the sync and async drivers so the
/// protocol has a single implementation path.
fn interpret<V, E, Q>(routine: &mut Q, step: Step<V, E, Q::Output>) -> Advance<V, E, Q::Output>
where
    Q: Routine<V, E>,
{
    match step {
        Step::Done(produced) => Advance::Finished(produced.into_eventual()),
        Step::Yielded(Produced::Value(value)) | Step::Yielded(Produced::Ready(Outcome::Success(value))) => {
            Advance::Feed(value)
        }
        Step::Yielded(Produced::Ready(Outcome::Failure(error))) => {
            #[cfg(feature = "tracing-integration")]
            tracing::trace!("routine aborted on a failed yield");
            routine.abort(&error);
            Advance::Finished(Eventual::Ready(Outcome::Failure(error)))
        }
        Step::Yielded(Produced::Pending(deferred)) => {
            #[cfg(feature = "tracing-integration")]
            tracing::trace!("routine suspended on a deferred yield");
            Advance::Suspended(deferred)
        }
    }
}

/// Drives `routine` to completion.
///
/// Returns a ready outcome when every step was synchronous; the first
/// deferred yield makes the remainder — and the terminal result — pending.
/// Panics raised while producing a step are not caught.
pub fn run<V, E, Q>(mut routine: Q) -> Eventual<Q::Output, E>
where
    Q: Routine<V, E> + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
    Q::Output: Send + 'static,
{
    let mut input = Resume::Start;
    loop {
        let step = routine.resume(input);
        match interpret(&mut routine, step) {
            Advance::Feed(value) => input = Resume::Value(value),
            Advance::Finished(eventual) => return eventual,
            Advance::Suspended(deferred) => {
                return Eventual::Pending(AsyncOutcome::new(drive(routine, deferred)));
            }
        }
    }
}

/// [`run`] with host-fault capture: a panic from any step becomes a
/// `Failure` via `E: From<CaughtPanic>`.
pub fn run_catching<V, E, Q>(routine: Q) -> Eventual<Q::Output, E>
where
    Q: Routine<V, E> + Send + 'static,
    V: Send + 'static,
    E: From<CaughtPanic> + Send + 'static,
    Q::Output: Send + 'static,
{
    run_catching_with(routine, E::from)
}

/// [`run_catching`] with an explicit panic transform.
pub fn run_catching_with<V, E, Q, X>(mut routine: Q, on_panic: X) -> Eventual<Q::Output, E>
where
    Q: Routine<V, E> + Send + 'static,
    X: FnOnce(CaughtPanic) -> E + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
    Q::Output: Send + 'static,
{
    let mut input = Resume::Start;
    loop {
        let step = match catch(|| routine.resume(input)) {
            Ok(step) => step,
            Err(caught) => return Eventual::Ready(Outcome::Failure(on_panic(caught))),
        };
        match interpret(&mut routine, step) {
            Advance::Feed(value) => input = Resume::Value(value),
            Advance::Finished(eventual) => return eventual,
            Advance::Suspended(deferred) => {
                // The async remainder runs entirely inside one future's
                // poll, so a single CatchPanic boundary covers later steps
                // and awaited yields alike.
                return Eventual::Pending(AsyncOutcome::new(CatchPanic::new(
                    drive(routine, deferred),
                    on_panic,
                )));
            }
        }
    }
}

/// The asynchronous driver: picks up after the first deferred yield and
/// continues the same step protocol until completion.
async fn drive<V, E, Q>(mut routine: Q, first: AsyncOutcome<V, E>) -> Outcome<Q::Output, E>
where
    Q: Routine<V, E>,
{
    let mut pending = first;
    loop {
        match pending.await {
            Outcome::Failure(error) => {
                routine.abort(&error);
                return Outcome::Failure(error);
            }
            Outcome::Success(value) => {
                let mut input = Resume::Value(value);
                loop {
                    let step = routine.resume(input);
                    match interpret(&mut routine, step) {
                        Advance::Feed(next) => input = Resume::Value(next),
                        Advance::Finished(eventual) => {
                            return match eventual {
                                Eventual::Ready(outcome) => outcome,
                                Eventual::Pending(deferred) => deferred.await,
                            };
                        }
                        Advance::Suspended(deferred) => {
                            pending = deferred;
                            break;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::staggered;
    use futures_lite::future;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI32, Ordering};

    /// A routine that yields each scripted outcome in order, recording how
    /// far it got, then finishes with the last resumed value.
    struct Scripted {
        yields: Vec<Outcome<i32, String>>,
        cursor: usize,
        resumed_with: Vec<i32>,
        aborted_with: Option<String>,
    }

    impl Scripted {
        fn new(yields: Vec<Outcome<i32, String>>) -> Self {
            Self {
                yields,
                cursor: 0,
                resumed_with: Vec::new(),
                aborted_with: None,
            }
        }
    }

    impl Routine<i32, String> for Scripted {
        type Output = i32;

        fn resume(&mut self, input: Resume<i32>) -> Step<i32, String, i32> {
            if let Resume::Value(value) = input {
                self.resumed_with.push(value);
            }
            if self.cursor < self.yields.len() {
                let outcome = self.yields[self.cursor].clone();
                self.cursor += 1;
                Step::yielded(outcome)
            } else {
                Step::done(self.resumed_with.iter().sum())
            }
        }

        fn abort(&mut self, failure: &String) {
            self.aborted_with = Some(failure.clone());
        }
    }

    fn init_test() {
        crate::test_logging::init_test_logging();
    }

    #[test]
    fn all_sync_yields_produce_a_ready_outcome() {
        init_test();
        let routine = Scripted::new(vec![Outcome::success(1), Outcome::success(2)]);
        let eventual = run(routine);
        assert!(eventual.is_ready());
        assert_eq!(eventual.expect_ready(), Outcome::success(3));
    }

    #[test]
    fn first_failure_is_terminal_and_aborts() {
        let recorded = Arc::new(AtomicI32::new(0));
        let resumes = Arc::clone(&recorded);
        let mut state = 0;
        let routine = move |input: Resume<i32>| -> Step<i32, String, i32> {
            if let Resume::Value(value) = input {
                resumes.fetch_add(value, Ordering::SeqCst);
            }
            state += 1;
            match state {
                1 => Step::yielded(Outcome::<i32, String>::success(1)),
                2 => Step::yielded(Outcome::<i32, String>::failure("boom".to_string())),
                _ => Step::yielded(Outcome::<i32, String>::success(2)),
            }
        };
        let eventual = run(routine);
        assert_eq!(
            eventual.expect_ready(),
            Outcome::failure("boom".to_string())
        );
        // Resumed exactly once (with the first yield's value), never past
        // the failing step.
        assert_eq!(recorded.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn abort_notification_carries_the_failure() {
        let routine = Scripted::new(vec![
            Outcome::success(1),
            Outcome::failure("torn down".to_string()),
        ]);
        // Drive through a manual run to inspect the routine afterwards.
        let mut routine = routine;
        let mut input = Resume::Start;
        let terminal = loop {
            let step = routine.resume(input);
            match interpret(&mut routine, step) {
                Advance::Feed(value) => input = Resume::Value(value),
                Advance::Finished(eventual) => break eventual.expect_ready(),
                Advance::Suspended(_) => unreachable!("script is synchronous"),
            }
        };
        assert_eq!(terminal, Outcome::failure("torn down".to_string()));
        assert_eq!(routine.aborted_with, Some("torn down".to_string()));
        assert_eq!(routine.resumed_with, vec![1]);
    }

    #[test]
    fn one_async_yield_makes_the_run_pending() {
        init_test();
        let mut state = 0;
        let routine = move |input: Resume<i32>| -> Step<i32, String, i32> {
            state += 1;
            match state {
                1 => Step::yielded(Outcome::<i32, String>::success(10)),
                2 => Step::yielded(staggered(2, Outcome::<i32, String>::success(20))),
                _ => Step::done(input.expect_value() + 1),
            }
        };
        let eventual = run(routine);
        assert!(eventual.is_pending());
        assert_eq!(
            future::block_on(eventual.into_async()),
            Outcome::success(21)
        );
    }

    #[test]
    fn async_failure_short_circuits_the_async_driver() {
        let mut state = 0;
        let routine = move |_input: Resume<i32>| -> Step<i32, String, i32> {
            state += 1;
            match state {
                1 => Step::yielded(staggered(1, Outcome::<i32, String>::failure("late".to_string()))),
                _ => Step::done(0),
            }
        };
        let outcome = future::block_on(run(routine).into_async());
        assert_eq!(outcome, Outcome::failure("late".to_string()));
    }

    #[test]
    fn done_with_passes_an_outcome_through() {
        let routine = |_input: Resume<i32>| -> Step<i32, String, i32> {
            Step::done_with(Outcome::failure("final say".to_string()))
        };
        assert_eq!(
            run(routine).expect_ready(),
            Outcome::failure("final say".to_string())
        );
    }

    #[test]
    fn done_with_deferred_keeps_the_result_pending() {
        let routine = |_input: Resume<i32>| -> Step<i32, String, i32> {
            Step::done_with(staggered(1, Outcome::success(7)))
        };
        let eventual = run(routine);
        assert!(eventual.is_pending());
        assert_eq!(
            future::block_on(eventual.into_async()),
            Outcome::success(7)
        );
    }

    #[test]
    fn nested_runs_compose_as_plain_yields() {
        let inner = |_input: Resume<i32>| -> Step<i32, String, i32> { Step::done(40) };
        let inner_result = run(inner);

        let mut state = 0;
        let mut handed = Some(inner_result);
        let routine = move |input: Resume<i32>| -> Step<i32, String, i32> {
            state += 1;
            if state == 1 {
                Step::yielded(handed.take().expect("single entry"))
            } else {
                Step::done(input.expect_value() + 2)
            }
        };
        assert_eq!(run(routine).expect_ready(), Outcome::success(42));
    }

    #[test]
    fn run_catching_converts_step_panic() {
        let routine = |_input: Resume<i32>| -> Step<i32, CaughtPanic, i32> {
            panic!("step exploded")
        };
        let eventual = run_catching(routine);
        let error = eventual.expect_ready().error().unwrap();
        assert_eq!(error.message(), "step exploded");
    }

    #[test]
    fn run_catching_converts_async_step_panic() {
        let mut state = 0;
        let routine = move |_input: Resume<i32>| -> Step<i32, CaughtPanic, i32> {
            state += 1;
            match state {
                1 => Step::yielded(staggered(1, Outcome::<i32, CaughtPanic>::success(1))),
                _ => panic!("late step exploded"),
            }
        };
        let eventual = run_catching(routine);
        assert!(eventual.is_pending());
        let outcome = future::block_on(eventual.into_async());
        assert_eq!(outcome.error().unwrap().message(), "late step exploded");
    }

    #[test]
    #[should_panic(expected = "step exploded")]
    fn plain_run_lets_step_panic_escape() {
        let routine = |_input: Resume<i32>| -> Step<i32, String, i32> {
            panic!("step exploded")
        };
        let _ = run(routine);
    }
}
