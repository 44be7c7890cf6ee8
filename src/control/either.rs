//! Either type - the step tag of stack-safe loops.
//!
//! `Either<L, R>` is a value that is either `Left(L)` or `Right(R)`. Inside
//! this crate it is the result of one step of a tail-recursive loop
//! ([`IO::tail_rec_m`](crate::effect::IO::tail_rec_m) and its asynchronous
//! counterpart):
//!
//! - `Left(next)`: continue the loop with a new input
//! - `Right(done)`: stop and return the final value
//!
//! # Examples
//!
//! ```rust
//! use lamina::control::Either;
//!
//! fn countdown_step(n: u32) -> Either<u32, &'static str> {
//!     if n == 0 { Either::Right("liftoff") } else { Either::Left(n - 1) }
//! }
//!
//! let mut current = 3;
//! let finished = loop {
//!     match countdown_step(current) {
//!         Either::Left(next) => current = next,
//!         Either::Right(done) => break done,
//!     }
//! };
//! assert_eq!(finished, "liftoff");
//! ```

use std::fmt;

/// A value that can be one of two types.
///
/// By convention `Left` means "not finished yet" when used as a loop step,
/// and `Right` carries the final value.
///
/// # Examples
///
/// ```rust
/// use lamina::control::Either;
///
/// let step: Either<u32, String> = Either::Left(41);
/// assert_eq!(step.map_left(|n| n + 1), Either::Left(42));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Either<L, R> {
    /// Continue with a new input.
    Left(L),
    /// Finished with a final value.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` if this is a `Left` value.
    #[inline]
    pub const fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` if this is a `Right` value.
    #[inline]
    pub const fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    /// Converts into the left value, discarding a right one.
    #[inline]
    pub fn left(self) -> Option<L> {
        match self {
            Self::Left(value) => Some(value),
            Self::Right(_) => None,
        }
    }

    /// Converts into the right value, discarding a left one.
    #[inline]
    pub fn right(self) -> Option<R> {
        match self {
            Self::Left(_) => None,
            Self::Right(value) => Some(value),
        }
    }

    /// Applies a function to the left value.
    #[inline]
    pub fn map_left<T, F>(self, function: F) -> Either<T, R>
    where
        F: FnOnce(L) -> T,
    {
        match self {
            Self::Left(value) => Either::Left(function(value)),
            Self::Right(value) => Either::Right(value),
        }
    }

    /// Applies a function to the right value.
    #[inline]
    pub fn map_right<T, F>(self, function: F) -> Either<L, T>
    where
        F: FnOnce(R) -> T,
    {
        match self {
            Self::Left(value) => Either::Left(value),
            Self::Right(value) => Either::Right(function(value)),
        }
    }

    /// Collapses both branches into one value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::control::Either;
    ///
    /// let step: Either<u32, &str> = Either::Right("done");
    /// assert_eq!(step.fold(|n| n.to_string(), |s| s.to_string()), "done");
    /// ```
    #[inline]
    pub fn fold<T, F, G>(self, left_function: F, right_function: G) -> T
    where
        F: FnOnce(L) -> T,
        G: FnOnce(R) -> T,
    {
        match self {
            Self::Left(value) => left_function(value),
            Self::Right(value) => right_function(value),
        }
    }
}

impl<L: fmt::Debug, R: fmt::Debug> fmt::Debug for Either<L, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left(value) => formatter.debug_tuple("Left").field(value).finish(),
            Self::Right(value) => formatter.debug_tuple("Right").field(value).finish(),
        }
    }
}

impl<L, R> From<Result<R, L>> for Either<L, R> {
    #[inline]
    fn from(result: Result<R, L>) -> Self {
        match result {
            Ok(value) => Self::Right(value),
            Err(error) => Self::Left(error),
        }
    }
}
