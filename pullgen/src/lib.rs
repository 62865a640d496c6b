//! Resumable, pull-driven generators.
//!
//! A producer is an `async` body that hands values out one at a time
//! through a [`Yielder`], suspending after each one. The consumer pulls
//! values on demand; every pull runs exactly one production step.
//!
//! Two handles share that protocol:
//!
//! - [`LazyGenerator`] runs nothing until it is first pulled, for unbounded
//!   sequences.
//! - [`BoundedGenerator`] runs up to its first value as soon as it is built,
//!   and can be iterated, for sequences that end.
//!
//! A producer body can consume another generator with
//! [`Yielder::chain`], which is how the [`adapters`] are written. Returning
//! `Err(_)` from a body fails the generator; the failure is raised by the
//! consumer's next pull, once, and travels outwards through chained
//! generators that propagate it with `?`.
//!
//! # Example
//!
//! ```rust
//! use pullgen::{adapters, generator};
//!
//! #[generator(lazy)]
//! fn fibonacci() -> u64 {
//!     let (mut a, mut b) = (0, 1);
//!     loop {
//!         yield_!(a);
//!         (a, b) = (b, a + b);
//!     }
//! }
//!
//! let first: Vec<u64> = adapters::take_n(fibonacci(), 8).values().collect();
//! assert_eq!(first, [0, 1, 1, 2, 3, 5, 8, 13]);
//! ```
//!
//! # Failures
//!
//! ```rust
//! use pullgen::{LazyGenerator, Yielder};
//!
//! let mut gen = LazyGenerator::new(|co: Yielder<u32, String>| async move {
//!     co.produce(1).await;
//!     Err("out of input".to_string())
//! });
//!
//! assert_eq!(gen.pull(), Ok(true));
//! assert_eq!(*gen.value(), 1);
//! assert_eq!(gen.pull(), Err("out of input".to_string()));
//! ```

pub mod adapters;
mod bounded;
mod chain;
mod error;
mod frame;
mod lazy;
mod park;
mod slot;
mod yielder;

pub use bounded::{BoundedGenerator, Cursor, IntoIter, Iter};
pub use chain::{ChainAwaiter, Resumable};
pub use error::UsageError;
pub use lazy::LazyGenerator;
pub use yielder::{Produce, Yielder};

/// Turns a function into a generator constructor.
///
/// `#[generator(lazy)]` builds a [`LazyGenerator`], `#[generator(bounded)]`
/// a [`BoundedGenerator`]. The declared return type is the type of the
/// values produced, and `#[fails(E)]` names the failure type.
///
/// Inside the body, `yield_!(value)` produces a value. `await_!(gen)`
/// resumes another generator for one step and evaluates to its
/// `Result<Option<_>, _>`; `?` propagates the inner failure.
///
/// ```rust
/// use pullgen::generator;
///
/// #[derive(Debug, PartialEq)]
/// struct Negative(i64);
///
/// #[generator(bounded)]
/// #[fails(Negative)]
/// fn checked(input: Vec<i64>) -> u64 {
///     for n in input {
///         if n < 0 {
///             return Err(Negative(n));
///         }
///         yield_!(n as u64);
///     }
/// }
///
/// let out: Vec<_> = checked(vec![3, 1, -4, 1]).into_iter().collect();
/// assert_eq!(out, [Ok(3), Ok(1), Err(Negative(-4))]);
/// ```
#[cfg(feature = "macros")]
pub use pullgen_macro::generator;

/// Where a producer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Nothing of the producer has run yet.
    NotStarted,
    /// Paused after producing a value.
    Suspended,
    /// Completed or failed. Terminal.
    Terminated,
    /// The handle no longer owns a producer.
    Disengaged,
}

/// Produces a value from inside a `#[generator]` function.
#[macro_export]
macro_rules! yield_ {
    ($($tt:tt)*) => {
        compile_error!("`yield_!` can only be used inside a `#[generator]` function")
    };
}

/// Awaits the next value of another generator from inside a `#[generator]`
/// function.
#[macro_export]
macro_rules! await_ {
    ($($tt:tt)*) => {
        compile_error!("`await_!` can only be used inside a `#[generator]` function")
    };
}
