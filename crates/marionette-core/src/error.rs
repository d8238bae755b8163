//! Error types for IK configuration loading and validation.

use std::path::PathBuf;

/// Errors that can occur while loading or validating an [`IkConfig`].
///
/// [`IkConfig`]: crate::config::IkConfig
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The per-solve pass budget is zero.
    #[error("iteration budget must be at least 1")]
    ZeroIterations,

    /// A chain was configured with no joints.
    #[error("chain with effector {effector} has no joints")]
    EmptyChain { effector: String },

    /// A rotation limit falls outside `[-pi, pi]`.
    #[error("rotation limit out of range on {bone} axis {axis}: {value}")]
    LimitOutOfRange { bone: String, axis: char, value: f64 },

    /// A lower rotation limit exceeds its upper counterpart.
    #[error("rotation_min exceeds rotation_max on {bone} axis {axis}: {min} > {max}")]
    MinExceedsMax {
        bone: String,
        axis: char,
        min: f64,
        max: f64,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
