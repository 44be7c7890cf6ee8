//! Runtime configuration for parallel traversal.

use std::num::NonZeroUsize;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Concurrency settings for `traverse_par_with_index_config`.
///
/// The default is unbounded: every element is started before any is awaited.
///
/// # Examples
///
/// ```rust
/// use lamina::effect::{ConfigError, ParallelConfig};
///
/// assert_eq!(ParallelConfig::default().max_concurrency(), None);
/// assert_eq!(ParallelConfig::bounded(4).map(|c| c.max_concurrency()), Ok(Some(4)));
/// assert_eq!(ParallelConfig::bounded(0), Err(ConfigError::InvalidConcurrency));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParallelConfig {
    max_concurrency: Option<NonZeroUsize>,
}

impl ParallelConfig {
    /// No limit on in-flight elements.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_concurrency: None,
        }
    }

    /// At most `limit` elements in flight at once.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConcurrency`] if `limit` is zero.
    pub fn bounded(limit: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(limit)
            .map(|limit| Self {
                max_concurrency: Some(limit),
            })
            .ok_or(ConfigError::InvalidConcurrency)
    }

    /// The concurrency limit, or `None` when unbounded.
    #[must_use]
    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency.map(NonZeroUsize::get)
    }
}
