//! Deferred computations and the stacks built on them.
//!
//! # Synchronous layers
//!
//! - [`IO`]: a deferred synchronous computation
//! - [`Reader`]: a computation reading an environment
//! - [`State`]: a computation threading a state
//!
//! Side effects are deferred until the computation is run, and nothing is
//! memoized: running the same value twice runs its effects twice.
//!
//! ```rust
//! use lamina::effect::IO;
//!
//! let io = IO::pure(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| IO::pure(x + 1));
//!
//! assert_eq!(io.run_unsafe(), 21);
//! ```
//!
//! # Asynchronous stacks (requires `async` feature)
//!
//! - [`AsyncIO`]: a deferred asynchronous computation
//! - [`AsyncResult`]: `AsyncIO` over `Result`
//! - [`ReaderAsync`]: `Reader` over `AsyncIO`
//! - [`ReaderAsyncResult`]: `Reader` over `AsyncResult`
//! - [`StateReaderAsyncResult`]: `State` over `ReaderAsyncResult`
//!
//! Every stack offers `traverse_with_index`. Stacks without state also
//! offer parallel traversals, which invoke every element before awaiting
//! any and return results in input order.

// =============================================================================
// Errors and Configuration
// =============================================================================

mod config;
mod error;

pub use config::ParallelConfig;
pub use error::{ConfigError, PanicError};

// =============================================================================
// Synchronous Layers
// =============================================================================

mod io;
mod reader;
mod state;

pub use io::IO;
pub use reader::Reader;
pub use state::State;

// =============================================================================
// Asynchronous Stacks (requires async feature)
// =============================================================================

#[cfg(feature = "async")]
mod async_io;
#[cfg(feature = "async")]
mod async_result;
#[cfg(feature = "async")]
mod reader_async;
#[cfg(feature = "async")]
mod reader_async_result;
#[cfg(feature = "async")]
mod state_reader_async_result;
#[cfg(feature = "async")]
mod traverse;

#[cfg(feature = "async")]
pub use async_io::{AsyncIO, Race};
#[cfg(feature = "async")]
pub use async_result::AsyncResult;
#[cfg(feature = "async")]
pub use reader_async::ReaderAsync;
#[cfg(feature = "async")]
pub use reader_async_result::ReaderAsyncResult;
#[cfg(feature = "async")]
pub use state_reader_async_result::StateReaderAsyncResult;
