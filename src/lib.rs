//! # lamina
//!
//! Layered effect composition for Rust.
//!
//! ## Overview
//!
//! lamina supplies the runtime core of a layered effect system:
//!
//! - **Outcomes**: helpers for `Result`/`Option`, and [`These`](control::These),
//!   a three-branch outcome that accumulates errors instead of short-circuiting
//! - **Deferred computations**: [`IO`](effect::IO) (synchronous) and
//!   [`AsyncIO`](effect::AsyncIO) (asynchronous), never memoized
//! - **Environment and state**: [`Reader`](effect::Reader) and [`State`](effect::State)
//! - **Composed stacks**: `AsyncResult`, `ReaderAsync`, `ReaderAsyncResult`
//!   and `StateReaderAsyncResult`
//! - **Traversal**: sequential and order-preserving parallel traversal of
//!   effects, and `bracket` for acquire/use/release
//!
//! ## Feature Flags
//!
//! - `async` (default): `AsyncIO` and every asynchronous stack
//! - `serde`: `Serialize`/`Deserialize` for plain data types
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use lamina::prelude::*;
//!
//! let both: These<String, i32> = These::both("checked ".to_string(), 1);
//! let result = both.flat_map(|_| These::<String, i32>::failure("rejected ".to_string()));
//! assert_eq!(result, These::failure("rejected checked ".to_string()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use lamina::prelude::*;
/// ```
pub mod prelude {
    pub use crate::typeclass::*;

    pub use crate::control::*;

    pub use crate::effect::*;
}

pub mod typeclass;

pub mod control;

pub mod effect;
