//! Errors reported while loading `ferrule.toml`.

use std::path::PathBuf;

/// Why a `ferrule.toml` configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML, or a key is unknown or of the wrong type.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// An entry of `evaluator.folds` names no known fold.
    #[error("unknown fold `{0}` in evaluator.folds")]
    UnknownFold(String),

    /// The fold list cannot be turned into an evaluator.
    #[error("invalid evaluator.folds: {0}")]
    InvalidFolds(String),
}
