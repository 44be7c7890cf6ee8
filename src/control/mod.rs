//! Pure outcome types and helpers.
//!
//! This module provides the context-free building blocks of the effect core:
//!
//! - [`ResultExt`], [`try_catch`], [`lift_throwable`], [`from_predicate`]:
//!   helpers around the standard two-branch `Result`
//! - [`from_result`], [`to_result`]: `Option` / `Result` conversions
//! - [`These`]: a three-branch outcome that accumulates errors
//! - [`Either`]: the continue/done tag of stack-safe loops
//!
//! # Examples
//!
//! ## Short-circuiting with Result
//!
//! ```rust
//! let total: Result<i32, String> = Ok(1)
//!     .and_then(|n| if n > 0 { Ok(n + 1) } else { Err("negative".to_string()) })
//!     .map(|n| n * 10);
//! assert_eq!(total, Ok(20));
//! ```
//!
//! ## Accumulating with These
//!
//! ```rust
//! use lamina::control::These;
//!
//! let result: These<Vec<&str>, i32> = These::both(vec!["deprecated flag"], 1)
//!     .flat_map(|n| These::both(vec!["slow disk"], n + 1));
//! assert_eq!(result, These::both(vec!["slow disk", "deprecated flag"], 2));
//! ```

mod either;
mod option;
mod result;
mod these;

pub use either::Either;
pub use option::{from_result, to_result};
pub use result::{ResultExt, from_predicate, lift_throwable, try_catch};
pub use these::These;
