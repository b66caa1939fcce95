//! Chunk size configuration.
//!
//! ## Four Knobs
//!
//! ```text
//! min_size <= target_size <= max_size,   overlap < target_size
//!
//! |--- min ---|-------- target --------|------------ max ------------|
//!    dropped      split accumulations     accumulations grow up to
//!    or merged    above this into         here before a flush is
//!    forward      sentence windows        forced
//! ```
//!
//! - `target_size`: the size sentence windows aim for when an accumulation
//!   has to be split.
//! - `min_size`: accumulations shorter than this are never emitted on their
//!   own. Before a heading they are merged forward, at end of document they
//!   are dropped.
//! - `max_size`: the ceiling an accumulation may grow to before it is
//!   flushed. Single blocks larger than this are split on their own.
//! - `overlap`: trailing context carried from one sentence window into the
//!   next.
//!
//! All sizes are counted in characters (Unicode scalar values), not bytes.
//!
//! An invalid combination is rejected when the config is built, whether
//! through [`ChunkConfig::new`], [`ChunkConfig::from_env`], or serde, so
//! chunking itself never has to fail.

use std::env;

use serde::{Deserialize, Serialize};

/// Default target window size in characters.
pub const DEFAULT_TARGET_SIZE: usize = 1000;
/// Default minimum emitted size in characters.
pub const DEFAULT_MIN_SIZE: usize = 100;
/// Default maximum accumulation size in characters.
pub const DEFAULT_MAX_SIZE: usize = 2000;
/// Default overlap in characters.
pub const DEFAULT_OVERLAP: usize = 200;

const ENV_TARGET_SIZE: &str = "WIKICRAFT_CHUNK_SIZE";
const ENV_MIN_SIZE: &str = "WIKICRAFT_MIN_CHUNK_SIZE";
const ENV_MAX_SIZE: &str = "WIKICRAFT_MAX_CHUNK_SIZE";
const ENV_OVERLAP: &str = "WIKICRAFT_CHUNK_OVERLAP";

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Validated chunking configuration.
///
/// # Examples
///
/// ```rust
/// use strata::ChunkConfig;
///
/// let config = ChunkConfig::default();
/// assert_eq!(config.target_size(), 1000);
/// assert_eq!(config.min_size(), 100);
/// assert_eq!(config.max_size(), 2000);
/// assert_eq!(config.overlap(), 200);
///
/// // Overlap must stay below the target
/// assert!(ChunkConfig::new(500, 50, 1000, 500).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChunkConfig")]
pub struct ChunkConfig {
    target_size: usize,
    min_size: usize,
    max_size: usize,
    overlap: usize,
}

impl ChunkConfig {
    /// Build a config, checking the ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is zero, if
    /// `min_size <= target_size <= max_size` does not hold, or if
    /// `overlap >= target_size`.
    pub fn new(
        target_size: usize,
        min_size: usize,
        max_size: usize,
        overlap: usize,
    ) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("target_size", target_size),
            ("min_size", min_size),
            ("max_size", max_size),
            ("overlap", overlap),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroSize { field });
            }
        }
        if min_size > target_size {
            return Err(ConfigError::MinExceedsTarget {
                min: min_size,
                target: target_size,
            });
        }
        if target_size > max_size {
            return Err(ConfigError::TargetExceedsMax {
                target: target_size,
                max: max_size,
            });
        }
        if overlap >= target_size {
            return Err(ConfigError::OverlapNotBelowTarget {
                overlap,
                target: target_size,
            });
        }

        Ok(Self {
            target_size,
            min_size,
            max_size,
            overlap,
        })
    }

    /// Build a config from `WIKICRAFT_*` environment variables.
    ///
    /// Reads `WIKICRAFT_CHUNK_SIZE` (target), `WIKICRAFT_MIN_CHUNK_SIZE`,
    /// `WIKICRAFT_MAX_CHUNK_SIZE` and `WIKICRAFT_CHUNK_OVERLAP`. Unset, empty
    /// or unparsable values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting combination is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(
            env_usize(ENV_TARGET_SIZE, DEFAULT_TARGET_SIZE),
            env_usize(ENV_MIN_SIZE, DEFAULT_MIN_SIZE),
            env_usize(ENV_MAX_SIZE, DEFAULT_MAX_SIZE),
            env_usize(ENV_OVERLAP, DEFAULT_OVERLAP),
        )
    }

    /// The size sentence windows aim for.
    #[must_use]
    pub const fn target_size(&self) -> usize {
        self.target_size
    }

    /// Accumulations shorter than this are not emitted.
    #[must_use]
    pub const fn min_size(&self) -> usize {
        self.min_size
    }

    /// The largest an accumulation may grow before it is flushed.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Characters of trailing context carried into the next window.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// Unvalidated mirror used for deserialization.
#[derive(Deserialize)]
struct RawChunkConfig {
    #[serde(default = "default_target")]
    target_size: usize,
    #[serde(default = "default_min")]
    min_size: usize,
    #[serde(default = "default_max")]
    max_size: usize,
    #[serde(default = "default_overlap")]
    overlap: usize,
}

const fn default_target() -> usize {
    DEFAULT_TARGET_SIZE
}

const fn default_min() -> usize {
    DEFAULT_MIN_SIZE
}

const fn default_max() -> usize {
    DEFAULT_MAX_SIZE
}

const fn default_overlap() -> usize {
    DEFAULT_OVERLAP
}

impl TryFrom<RawChunkConfig> for ChunkConfig {
    type Error = ConfigError;

    fn try_from(raw: RawChunkConfig) -> Result<Self, Self::Error> {
        Self::new(raw.target_size, raw.min_size, raw.max_size, raw.overlap)
    }
}

/// Error when configuring chunk sizes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Every size must be positive.
    #[error("{field} must be > 0")]
    ZeroSize {
        /// Name of the offending field.
        field: &'static str,
    },

    /// `min_size` must not exceed `target_size`.
    #[error("min_size ({min}) must be <= target_size ({target})")]
    MinExceedsTarget {
        /// The minimum size.
        min: usize,
        /// The target it exceeded.
        target: usize,
    },

    /// `target_size` must not exceed `max_size`.
    #[error("target_size ({target}) must be <= max_size ({max})")]
    TargetExceedsMax {
        /// The target size.
        target: usize,
        /// The max it exceeded.
        max: usize,
    },

    /// `overlap` must be strictly below `target_size`.
    #[error("overlap ({overlap}) must be < target_size ({target})")]
    OverlapNotBelowTarget {
        /// The overlap.
        overlap: usize,
        /// The target it reached.
        target: usize,
    },
}
