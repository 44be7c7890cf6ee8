//! Algebraic capabilities consumed by the effect core.
//!
//! The effect types in this crate never hard-code how two errors are merged.
//! Whenever an operation has to accumulate failures (for example
//! [`These::flat_map`](crate::control::These::flat_map) or an accumulating
//! parallel traversal), the caller supplies the strategy through one of
//! these traits:
//!
//! - [`Semigroup`]: Types with an associative binary operation (`combine`)
//! - [`Monoid`]: Semigroups with an identity element (`empty`)
//!
//! ## Wrappers
//!
//! The same underlying type can be combined in more than one way. The
//! newtypes below pick a strategy explicitly:
//!
//! - [`Sum`]: combine by addition (identity: `Default`)
//! - [`First`]: keep the older value
//! - [`Last`]: keep the newer value
//!
//! # Examples
//!
//! ```rust
//! use lamina::typeclass::{First, Monoid, Semigroup, Sum};
//!
//! // Log lines concatenate
//! let log = String::from("parsed; ").combine(String::from("validated; "));
//! assert_eq!(log, "parsed; validated; ");
//!
//! // Counting failures
//! let failures = Sum::combine_all(vec![Sum::new(1), Sum::new(1), Sum::new(1)]);
//! assert_eq!(failures, Sum::new(3));
//!
//! // Keeping only the first failure
//! let first = First::new("timeout").combine(First::new("refused"));
//! assert_eq!(first.into_inner(), "timeout");
//! ```

mod monoid;
mod semigroup;
mod wrappers;

pub use monoid::Monoid;
pub use semigroup::Semigroup;
pub use wrappers::{First, Last, Sum};
