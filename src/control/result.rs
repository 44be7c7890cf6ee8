//! Helpers for the two-branch `Result`.
//!
//! The standard `Result<A, E>` is the base error channel of every stack in
//! this crate. Most combinators already exist on it:
//!
//! | operation | std |
//! |---|---|
//! | succeed / fail | `Ok(a)` / `Err(e)` |
//! | map | [`Result::map`] |
//! | flat map (short-circuits on `Err`) | [`Result::and_then`] |
//! | or else (take `that` on failure) | [`Result::or`] |
//!
//! This module adds the rest: [`ResultExt::map_both`], [`ResultExt::fold`],
//! [`ResultExt::or_else_with`],
//! [`from_predicate`], and the panic boundary [`try_catch`] /
//! [`lift_throwable`], which turn a panicking computation into a typed
//! failure through a caller-supplied projection.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::effect::PanicError;

/// Extra combinators for `Result`.
///
/// # Examples
///
/// ```rust
/// use lamina::control::ResultExt;
///
/// let parsed: Result<u16, String> = "8080".parse::<u16>().map_err(|e| e.to_string());
/// let described = parsed.fold(|error| format!("invalid: {error}"), |port| format!("port {port}"));
/// assert_eq!(described, "port 8080");
/// ```
pub trait ResultExt<A, E>: Sized {
    /// Maps the error and the success value with two functions.
    fn map_both<E2, B, F, G>(self, error_function: F, value_function: G) -> Result<B, E2>
    where
        F: FnOnce(E) -> E2,
        G: FnOnce(A) -> B;

    /// Collapses both branches into one value (pattern match as a function).
    fn fold<T, F, G>(self, on_failure: F, on_success: G) -> T
    where
        F: FnOnce(E) -> T,
        G: FnOnce(A) -> T;

    /// Returns `self` on success, otherwise the result produced by `alternative`.
    ///
    /// Unlike [`Result::or_else`], the alternative does not see the error.
    fn or_else_with<F>(self, alternative: F) -> Self
    where
        F: FnOnce() -> Self;
}

impl<A, E> ResultExt<A, E> for Result<A, E> {
    fn map_both<E2, B, F, G>(self, error_function: F, value_function: G) -> Result<B, E2>
    where
        F: FnOnce(E) -> E2,
        G: FnOnce(A) -> B,
    {
        match self {
            Ok(value) => Ok(value_function(value)),
            Err(error) => Err(error_function(error)),
        }
    }

    fn fold<T, F, G>(self, on_failure: F, on_success: G) -> T
    where
        F: FnOnce(E) -> T,
        G: FnOnce(A) -> T,
    {
        match self {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }

    fn or_else_with<F>(self, alternative: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        match self {
            Ok(value) => Ok(value),
            Err(_) => alternative(),
        }
    }
}

/// Succeeds with `value` if `predicate` holds, otherwise fails with `on_false(value)`.
///
/// # Examples
///
/// ```rust
/// use lamina::control::from_predicate;
///
/// let even = |n: &i32| n % 2 == 0;
/// assert_eq!(from_predicate(4, even, |n| format!("{n} is odd")), Ok(4));
/// assert_eq!(from_predicate(3, even, |n| format!("{n} is odd")), Err("3 is odd".to_string()));
/// ```
pub fn from_predicate<A, E, P, F>(value: A, predicate: P, on_false: F) -> Result<A, E>
where
    P: FnOnce(&A) -> bool,
    F: FnOnce(A) -> E,
{
    if predicate(&value) {
        Ok(value)
    } else {
        Err(on_false(value))
    }
}

/// Runs `thunk`, turning a panic into a typed failure.
///
/// The panic payload is captured as a [`PanicError`] and passed through
/// `on_panic`. A normal return becomes `Ok`.
///
/// # Examples
///
/// ```rust
/// use lamina::control::try_catch;
///
/// let ok: Result<i32, String> = try_catch(|| 40 + 2, |error| error.to_string());
/// assert_eq!(ok, Ok(42));
///
/// let failed: Result<i32, String> = try_catch(|| panic!("disk full"), |error| error.message().to_string());
/// assert_eq!(failed, Err("disk full".to_string()));
/// ```
pub fn try_catch<A, E, F, H>(thunk: F, on_panic: H) -> Result<A, E>
where
    F: FnOnce() -> A,
    H: FnOnce(PanicError) -> E,
{
    match catch_unwind(AssertUnwindSafe(thunk)) {
        Ok(value) => Ok(value),
        Err(payload) => {
            let error = PanicError::from_payload(payload.as_ref());
            tracing::debug!(panic_message = error.message(), "converted panic into failure");
            Err(on_panic(error))
        }
    }
}

/// Lifts a possibly panicking function into one that returns `Result`.
///
/// Every call of the returned function is guarded by [`try_catch`].
///
/// # Examples
///
/// ```rust
/// use lamina::control::lift_throwable;
///
/// let divide = lift_throwable(|(a, b): (i32, i32)| a / b, |error| error.to_string());
/// assert_eq!(divide((10, 2)), Ok(5));
/// assert!(divide((1, 0)).is_err());
/// ```
pub fn lift_throwable<T, A, E, F, H>(function: F, on_panic: H) -> impl Fn(T) -> Result<A, E>
where
    F: Fn(T) -> A,
    H: Fn(PanicError) -> E,
{
    move |input| try_catch(|| function(input), &on_panic)
}
