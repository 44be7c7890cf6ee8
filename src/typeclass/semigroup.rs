//! Semigroup - types with an associative binary operation.
//!
//! A type `T` is a semigroup if there exists a function
//! `combine: (T, T) -> T` that is associative.
//!
//! # Laws
//!
//! For all `a`, `b`, `c` of type `T`:
//!
//! ```text
//! (a.combine(b)).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! Commutativity is NOT required. Several operations in this crate pass the
//! newer value as the receiver and the older one as the argument, so for
//! `String` the newest log line ends up first.
//!
//! # Examples
//!
//! ```rust
//! use lamina::typeclass::Semigroup;
//!
//! let errors = vec!["missing name"].combine(vec!["bad email"]);
//! assert_eq!(errors, vec!["missing name", "bad email"]);
//! ```

use std::ops::Add;

use super::wrappers::{First, Last, Sum};

/// A type class for types with an associative binary operation.
///
/// # Examples
///
/// ```rust
/// use lamina::typeclass::Semigroup;
///
/// let a = String::from("foo");
/// let b = String::from("bar");
/// assert_eq!(a.combine(b), "foobar");
/// ```
pub trait Semigroup {
    /// Combines two values into one.
    ///
    /// This operation must be associative.
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Reduces all elements in an iterator using the semigroup operation.
    ///
    /// Returns `None` if the iterator is empty. For a version that returns
    /// the identity for empty input, see
    /// [`Monoid::combine_all`](super::Monoid::combine_all).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lamina::typeclass::Semigroup;
    ///
    /// let lines = vec![String::from("a"), String::from("b")];
    /// assert_eq!(String::reduce_all(lines), Some(String::from("ab")));
    ///
    /// let empty: Vec<String> = vec![];
    /// assert_eq!(String::reduce_all(empty), None);
    /// ```
    fn reduce_all<I>(iterator: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .reduce(|accumulator, element| accumulator.combine(element))
    }
}

// =============================================================================
// Standard Library Implementations
// =============================================================================

impl Semigroup for String {
    fn combine(mut self, other: Self) -> Self {
        self.push_str(&other);
        self
    }
}

impl<T> Semigroup for Vec<T> {
    fn combine(mut self, mut other: Self) -> Self {
        self.append(&mut other);
        self
    }
}

/// `Some` values are combined, `None` is skipped.
impl<T: Semigroup> Semigroup for Option<T> {
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(left), Some(right)) => Some(left.combine(right)),
            (Some(value), None) | (None, Some(value)) => Some(value),
            (None, None) => None,
        }
    }
}

impl Semigroup for () {
    fn combine(self, _other: Self) -> Self {}
}

impl<A: Semigroup, B: Semigroup> Semigroup for (A, B) {
    fn combine(self, other: Self) -> Self {
        (self.0.combine(other.0), self.1.combine(other.1))
    }
}

// =============================================================================
// Wrapper Implementations
// =============================================================================

impl<A: Add<Output = A>> Semigroup for Sum<A> {
    fn combine(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl<A> Semigroup for First<A> {
    fn combine(self, _other: Self) -> Self {
        self
    }
}

impl<A> Semigroup for Last<A> {
    fn combine(self, other: Self) -> Self {
        other
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_string_associativity(
            first in "\\PC*",
            second in "\\PC*",
            third in "\\PC*"
        ) {
            let left = first.clone().combine(second.clone()).combine(third.clone());
            let right = first.combine(second.combine(third));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn prop_vec_i32_associativity(
            first in prop::collection::vec(any::<i32>(), 0..10),
            second in prop::collection::vec(any::<i32>(), 0..10),
            third in prop::collection::vec(any::<i32>(), 0..10)
        ) {
            let left = first.clone().combine(second.clone()).combine(third.clone());
            let right = first.combine(second.combine(third));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn prop_sum_i32_associativity(
            first in -10000i32..10000i32,
            second in -10000i32..10000i32,
            third in -10000i32..10000i32
        ) {
            let left = Sum::new(first).combine(Sum::new(second)).combine(Sum::new(third));
            let right = Sum::new(first).combine(Sum::new(second).combine(Sum::new(third)));
            prop_assert_eq!(left, right);
        }
    }
}
