//! Newtype wrappers selecting a combination strategy.
//!
//! - [`Sum`]: combine by addition
//! - [`First`]: keep the older value, discard the newer one
//! - [`Last`]: keep the newer value, discard the older one
//!
//! `First` is handy as the error type of an accumulating traversal when only
//! the first failure (in input order) should be reported.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A newtype wrapper that represents the additive semigroup/monoid.
///
/// # Examples
///
/// ```rust
/// use lamina::typeclass::{Semigroup, Sum};
///
/// assert_eq!(Sum::new(3).combine(Sum::new(5)), Sum::new(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sum<A>(pub A);

impl<A> Sum<A> {
    /// Creates a new `Sum` wrapping the given value.
    pub const fn new(value: A) -> Self {
        Self(value)
    }

    /// Extracts the inner value.
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A> From<A> for Sum<A> {
    fn from(value: A) -> Self {
        Self(value)
    }
}

/// A semigroup that keeps the first (receiver) value.
///
/// # Examples
///
/// ```rust
/// use lamina::typeclass::{First, Semigroup};
///
/// let kept = First::new("connection refused").combine(First::new("timeout"));
/// assert_eq!(kept.into_inner(), "connection refused");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct First<A>(pub A);

impl<A> First<A> {
    /// Creates a new `First` wrapping the given value.
    pub const fn new(value: A) -> Self {
        Self(value)
    }

    /// Extracts the inner value.
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A> From<A> for First<A> {
    fn from(value: A) -> Self {
        Self(value)
    }
}

/// A semigroup that keeps the last (argument) value.
///
/// # Examples
///
/// ```rust
/// use lamina::typeclass::{Last, Semigroup};
///
/// let kept = Last::new(1).combine(Last::new(2));
/// assert_eq!(kept.into_inner(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Last<A>(pub A);

impl<A> Last<A> {
    /// Creates a new `Last` wrapping the given value.
    pub const fn new(value: A) -> Self {
        Self(value)
    }

    /// Extracts the inner value.
    pub fn into_inner(self) -> A {
        self.0
    }
}

impl<A> From<A> for Last<A> {
    fn from(value: A) -> Self {
        Self(value)
    }
}
