//! Nullable infrastructure for deterministic testing.
//!
//! The pool reads time only through timestamps handed to it, so the single
//! external dependency to neutralize is the clock. `NullClock` returns
//! scripted values and never touches the system clock — swap it in wherever
//! a test or demo would otherwise call `Timestamp::now()`.

pub mod clock;

pub use clock::NullClock;
