//! These - a three-branch outcome that accumulates errors.
//!
//! `These<E, A>` is either a `Failure(E)`, a `Success(A)`, or `Both(E, A)`:
//! a result that completed but carries accumulated warnings or errors.
//! Unlike `Result`, which can hold only one branch, `These` keeps going
//! after a non-fatal problem and remembers it.
//!
//! # Accumulation Order
//!
//! Chaining a `Both` with another failing step merges the two errors with
//! [`Semigroup::combine`], passing the **newer** error as the receiver and
//! the older one as the argument. For non-commutative semigroups such as
//! `String` the newest entry comes first:
//!
//! ```rust
//! use lamina::control::These;
//!
//! let checked: These<String, i32> = These::both("a".to_string(), 1);
//! let result = checked.flat_map(|_| These::<String, i32>::failure("b".to_string()));
//! assert_eq!(result, These::failure("ba".to_string()));
//! ```
//!
//! # Monad Laws
//!
//! For any semigroup `E`:
//!
//! - Left Identity: `These::success(a).flat_map(f) == f(a)`
//! - Right Identity: `m.flat_map(These::success) == m`
//! - Associativity: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::typeclass::Semigroup;

/// A failure, a success, or a success with accumulated errors.
///
/// # Type Parameters
///
/// - `E`: The error (or warning) type
/// - `A`: The success type
///
/// # Examples
///
/// ```rust
/// use lamina::control::These;
///
/// fn parse_port(raw: &str) -> These<Vec<String>, u16> {
///     match raw.parse::<u16>() {
///         Ok(port) if port < 1024 => These::both(vec![format!("{port} is privileged")], port),
///         Ok(port) => These::success(port),
///         Err(_) => These::failure(vec![format!("{raw} is not a port")]),
///     }
/// }
///
/// assert_eq!(parse_port("8080"), These::success(8080));
/// assert!(parse_port("80").is_both());
/// assert!(parse_port("http").is_failure());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum These<E, A> {
    /// Failed without a result.
    Failure(E),
    /// Succeeded cleanly.
    Success(A),
    /// Succeeded with accumulated errors.
    Both(E, A),
}

impl<E, A> These<E, A> {
    /// Creates a `Failure`.
    pub const fn failure(error: E) -> Self {
        Self::Failure(error)
    }

    /// Creates a `Success`.
    pub const fn success(value: A) -> Self {
        Self::Success(value)
    }

    /// Creates a `Both`.
    pub const fn both(error: E, value: A) -> Self {
        Self::Both(error, value)
    }

    /// Returns `true` if this is a `Failure`.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns `true` if this is a `Success`.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` if this is a `Both`.
    pub const fn is_both(&self) -> bool {
        matches!(self, Self::Both(_, _))
    }

    /// Returns the error of a `Failure` or `Both`.
    pub const fn failure_ref(&self) -> Option<&E> {
        match self {
            Self::Failure(error) | Self::Both(error, _) => Some(error),
            Self::Success(_) => None,
        }
    }

    /// Returns the value of a `Success` or `Both`.
    pub const fn success_ref(&self) -> Option<&A> {
        match self {
            Self::Success(value) | Self::Both(_, value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Maps the success value, keeping any accumulated error.
    pub fn fmap<B, F>(self, function: F) -> These<E, B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Self::Failure(error) => These::Failure(error),
            Self::Success(value) => These::Success(function(value)),
            Self::Both(error, value) => These::Both(error, function(value)),
        }
    }

    /// Maps the error, wherever it appears.
    pub fn map_failure<E2, F>(self, function: F) -> These<E2, A>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::Failure(error) => These::Failure(function(error)),
            Self::Success(value) => These::Success(value),
            Self::Both(error, value) => These::Both(function(error), value),
        }
    }

    /// Maps both sides independently.
    pub fn bimap<E2, B, F, G>(self, error_function: F, value_function: G) -> These<E2, B>
    where
        F: FnOnce(E) -> E2,
        G: FnOnce(A) -> B,
    {
        match self {
            Self::Failure(error) => These::Failure(error_function(error)),
            Self::Success(value) => These::Success(value_function(value)),
            Self::Both(error, value) => These::Both(error_function(error), value_function(value)),
        }
    }

    /// Collapses the three branches into a single value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::control::These;
    ///
    /// let outcome: These<&str, i32> = These::both("slow", 3);
    /// let summary = outcome.fold(
    ///     |error| format!("failed: {error}"),
    ///     |value| format!("ok: {value}"),
    ///     |error, value| format!("ok: {value} ({error})"),
    /// );
    /// assert_eq!(summary, "ok: 3 (slow)");
    /// ```
    pub fn fold<T, F, G, H>(self, on_failure: F, on_success: G, on_both: H) -> T
    where
        F: FnOnce(E) -> T,
        G: FnOnce(A) -> T,
        H: FnOnce(E, A) -> T,
    {
        match self {
            Self::Failure(error) => on_failure(error),
            Self::Success(value) => on_success(value),
            Self::Both(error, value) => on_both(error, value),
        }
    }

    /// Exchanges the error and success sides.
    pub fn swap(self) -> These<A, E> {
        match self {
            Self::Failure(error) => These::Success(error),
            Self::Success(value) => These::Failure(value),
            Self::Both(error, value) => These::Both(value, error),
        }
    }

    /// Converts into a `Result`, dropping the warnings of a `Both`.
    pub fn into_result(self) -> Result<A, E> {
        match self {
            Self::Failure(error) => Err(error),
            Self::Success(value) | Self::Both(_, value) => Ok(value),
        }
    }

    /// Chains a computation, merging errors with an explicit combine function.
    ///
    /// The combine function receives `(newer, older)`:
    ///
    /// - `Failure(e1)`: `function` is not invoked
    /// - `Success(a)`: the result of `function(a)` unchanged
    /// - `Both(e1, a)` with `function(a)`:
    ///   - `Failure(e2)` gives `Failure(combine(e2, e1))`
    ///   - `Success(b)` gives `Both(e1, b)`
    ///   - `Both(e2, b)` gives `Both(combine(e2, e1), b)`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::control::These;
    ///
    /// let counted: These<u32, &str> = These::both(1, "a");
    /// let result = counted.flat_map_with(|newer, older| newer + older, |_| These::both(2, "b"));
    /// assert_eq!(result, These::both(3, "b"));
    /// ```
    pub fn flat_map_with<B, C, F>(self, combine: C, function: F) -> These<E, B>
    where
        C: FnOnce(E, E) -> E,
        F: FnOnce(A) -> These<E, B>,
    {
        match self {
            Self::Failure(error) => These::Failure(error),
            Self::Success(value) => function(value),
            Self::Both(older, value) => match function(value) {
                These::Failure(newer) => These::Failure(combine(newer, older)),
                These::Success(next) => These::Both(older, next),
                These::Both(newer, next) => These::Both(combine(newer, older), next),
            },
        }
    }
}

impl<E: Semigroup, A> These<E, A> {
    /// Chains a computation, merging errors with the [`Semigroup`] of `E`.
    ///
    /// Equivalent to `flat_map_with(Semigroup::combine, function)`.
    pub fn flat_map<B, F>(self, function: F) -> These<E, B>
    where
        F: FnOnce(A) -> These<E, B>,
    {
        self.flat_map_with(Semigroup::combine, function)
    }

    /// Alias for `flat_map`.
    pub fn and_then<B, F>(self, function: F) -> These<E, B>
    where
        F: FnOnce(A) -> These<E, B>,
    {
        self.flat_map(function)
    }

    /// Combines two independent outcomes, accumulating errors from both.
    ///
    /// Unlike `flat_map`, both sides are already evaluated, so a `Failure`
    /// on the left does not hide the errors on the right. `self`'s error
    /// is the receiver of `combine`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::control::These;
    ///
    /// let name: These<Vec<&str>, &str> = These::failure(vec!["name missing"]);
    /// let age: These<Vec<&str>, u8> = These::failure(vec!["age negative"]);
    /// let person = name.zip_with(age, |name, age| (name, age));
    /// assert_eq!(person, These::failure(vec!["name missing", "age negative"]));
    /// ```
    pub fn zip_with<B, C, F>(self, other: These<E, B>, function: F) -> These<E, C>
    where
        F: FnOnce(A, B) -> C,
    {
        match (self, other) {
            (Self::Failure(left), These::Failure(right) | These::Both(right, _))
            | (Self::Both(left, _), These::Failure(right)) => These::Failure(left.combine(right)),
            (Self::Failure(left), These::Success(_)) => These::Failure(left),
            (Self::Success(_), These::Failure(right)) => These::Failure(right),
            (Self::Success(a), These::Success(b)) => These::Success(function(a, b)),
            (Self::Success(a), These::Both(right, b)) => These::Both(right, function(a, b)),
            (Self::Both(left, a), These::Success(b)) => These::Both(left, function(a, b)),
            (Self::Both(left, a), These::Both(right, b)) => {
                These::Both(left.combine(right), function(a, b))
            }
        }
    }

    /// Applies `function` to every input and accumulates the outcomes.
    ///
    /// Every input is visited, in index order. Errors are combined in index
    /// order; successes are collected only if no input produced a `Failure`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::control::These;
    ///
    /// let result = These::traverse_with_index(vec![3, -1, 5, -2], |index, n: i32| {
    ///     if n < 0 {
    ///         These::failure(vec![index])
    ///     } else {
    ///         These::success(n * 10)
    ///     }
    /// });
    /// assert_eq!(result, These::failure(vec![1, 3]));
    /// ```
    pub fn traverse_with_index<T, I, F>(inputs: I, mut function: F) -> These<E, Vec<A>>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(usize, T) -> Self,
    {
        inputs.into_iter().enumerate().fold(
            These::Success(Vec::new()),
            |accumulator, (index, input)| {
                accumulator.zip_with(function(index, input), |mut values, value| {
                    values.push(value);
                    values
                })
            },
        )
    }
}

impl<E, A> From<Result<A, E>> for These<E, A> {
    fn from(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fail(message: &str) -> These<String, i32> {
        These::failure(message.to_string())
    }

    #[rstest]
    fn both_then_failure_combines_newer_first() {
        let start: These<String, i32> = These::both("a".to_string(), 1);
        assert_eq!(start.flat_map(|_| fail("b")), fail("ba"));
    }

    #[rstest]
    fn both_then_both_combines_newer_first() {
        let start: These<String, i32> = These::both("a".to_string(), 1);
        let result = start.flat_map(|n| These::both("b".to_string(), n + 1));
        assert_eq!(result, These::both("ba".to_string(), 2));
    }

    #[rstest]
    fn both_then_success_keeps_older_error() {
        let start: These<String, i32> = These::both("a".to_string(), 1);
        let result = start.flat_map(|n| These::success(n + 1));
        assert_eq!(result, These::both("a".to_string(), 2));
    }

    #[rstest]
    fn success_propagates_continuation_unchanged() {
        let start: These<String, i32> = These::success(1);
        let result = start.flat_map(|n| These::both("w".to_string(), n));
        assert_eq!(result, These::both("w".to_string(), 1));
    }

    #[rstest]
    fn failure_short_circuits_without_invoking_continuation() {
        let mut invoked = false;
        let result = fail("x").flat_map(|n| {
            invoked = true;
            These::success(n)
        });
        assert!(!invoked);
        assert_eq!(result, fail("x"));
    }

    #[rstest]
    fn flat_map_with_uses_supplied_strategy() {
        let start: These<String, i32> = These::both("old".to_string(), 1);
        let result = start.flat_map_with(
            |newer, older| format!("{older}|{newer}"),
            |_| These::<String, i32>::failure("new".to_string()),
        );
        assert_eq!(result, fail("old|new"));
    }

    #[rstest]
    #[case(These::success(1), These::success(2), These::success(3))]
    #[case(These::both("a".to_string(), 1), These::success(2), These::both("a".to_string(), 3))]
    #[case(These::success(1), These::both("b".to_string(), 2), These::both("b".to_string(), 3))]
    #[case(These::both("a".to_string(), 1), These::both("b".to_string(), 2), These::both("ab".to_string(), 3))]
    #[case(fail("a"), These::both("b".to_string(), 2), fail("ab"))]
    #[case(These::both("a".to_string(), 1), fail("b"), fail("ab"))]
    #[case(fail("a"), These::success(2), fail("a"))]
    #[case(These::success(1), fail("b"), fail("b"))]
    fn zip_with_accumulates_left_error_first(
        #[case] left: These<String, i32>,
        #[case] right: These<String, i32>,
        #[case] expected: These<String, i32>,
    ) {
        assert_eq!(left.zip_with(right, |a, b| a + b), expected);
    }

    #[rstest]
    fn traverse_collects_values_and_warnings() {
        let result = These::traverse_with_index(vec![1, 2, 3], |index, n: i32| {
            if index == 1 {
                These::both(vec!["slow"], n)
            } else {
                These::success(n)
            }
        });
        assert_eq!(result, These::both(vec!["slow"], vec![1, 2, 3]));
    }

    #[rstest]
    fn traverse_of_empty_input_is_success() {
        let result: These<Vec<&str>, Vec<i32>> =
            These::traverse_with_index(Vec::<i32>::new(), |_, n| These::success(n));
        assert_eq!(result, These::success(Vec::new()));
    }

    #[rstest]
    fn into_result_drops_warnings() {
        assert_eq!(These::<&str, i32>::both("w", 1).into_result(), Ok(1));
        assert_eq!(These::<&str, i32>::failure("e").into_result(), Err("e"));
    }

    #[rstest]
    fn swap_and_accessors() {
        let value: These<&str, i32> = These::both("w", 1);
        assert_eq!(value.failure_ref(), Some(&"w"));
        assert_eq!(value.success_ref(), Some(&1));
        assert_eq!(value.swap(), These::both(1, "w"));
    }
}
