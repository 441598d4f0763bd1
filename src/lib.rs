//! Outcome: a sync/async outcome algebra for Rust.
//!
//! # Overview
//!
//! This crate represents the result of an operation that may succeed or fail
//! as a value, unifies synchronous and asynchronous computation under one
//! combinator surface, and provides a sequencing interpreter that lets
//! callers write straight-line code while failures propagate automatically.
//!
//! # Core Guarantees
//!
//! - **Failure short-circuits**: success-side transforms never run on a
//!   failure; the failure propagates unchanged
//! - **Uniform promotion**: an asynchronous callback anywhere makes the
//!   result deferred, even on the failure branch, so result shapes are
//!   predictable from the code alone
//! - **Sync results stay sync**: aggregation and sequencing return a ready
//!   outcome whenever every contributing step was synchronous
//! - **Faults stay loud**: panics escape the algebra unless a `*_catching`
//!   operation explicitly converts them into domain failures
//! - **No shared state**: outcomes are immutable values, produced and
//!   consumed per chain; nothing here locks or races
//!
//! # Module Structure
//!
//! - [`outcome`](mod@outcome): the synchronous container and its combinators
//! - [`async_outcome`]: the deferred container, mirroring the same surface
//! - [`eventual`]: the sync-or-async union returned by shape-dependent
//!   operations
//! - [`produced`]: runtime-tagged callback products and their conversions
//! - [`aggregate`]: `all`/`all_catching` eager-fail aggregation
//! - [`adapter`]: bridges from panicking code and bare futures
//! - [`sequence`]: the step/resume/abort interpreter protocol
//! - [`fault`](mod@fault): panic payload capture
//! - [`assert`](mod@assert): test-oriented assertions
//!
//! # Example
//!
//! ```
//! use outcome::{Outcome, Resume, Step, run};
//!
//! fn parse(input: &str) -> Outcome<i32, String> {
//!     input
//!         .parse::<i32>()
//!         .map_err(|e| e.to_string())
//!         .into()
//! }
//!
//! let mut state = 0;
//! let routine = move |input: Resume<i32>| -> Step<i32, String, i32> {
//!     state += 1;
//!     match state {
//!         1 => Step::yielded(parse("20")),
//!         2 => Step::yielded(parse("22")),
//!         _ => Step::done(input.expect_value() + 20),
//!     }
//! };
//! assert_eq!(run(routine).expect_ready(), Outcome::success(42));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod adapter;
pub mod aggregate;
pub mod assert;
pub mod async_outcome;
pub mod eventual;
pub mod fault;
pub mod outcome;
pub mod produced;
pub mod sequence;

// ── Test-only modules ───────────────────────────────────────────────────
#[cfg(any(test, feature = "test-internals"))]
pub mod test_logging;
#[cfg(test)]
pub(crate) mod test_util;

// Re-exports for convenient access to the core surface
pub use adapter::{attempt, attempt_with, from_future, from_future_catching, wrap, wrap_with};
pub use aggregate::{Source, all, all_catching};
pub use assert::{assert_failure, assert_success};
pub use async_outcome::AsyncOutcome;
pub use eventual::Eventual;
pub use fault::CaughtPanic;
pub use outcome::Outcome;
pub use produced::{IntoProduced, Produced};
pub use sequence::{Resume, Routine, Step, run, run_catching, run_catching_with};
