//! Error types.
//!
//! Event handling never fails: resolution misses, malformed attributes and
//! missing markup are absorbed where they happen. What remains are the
//! setup-time failures below, surfaced from config loading, logging setup and
//! module initialization.

use std::path::PathBuf;

use thiserror::Error;

/// Selector parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected {found:?} at offset {offset} in selector {input:?}")]
    Unexpected {
        input: String,
        offset: usize,
        found: char,
    },
    #[error("unexpected end of selector {input:?}")]
    UnexpectedEnd { input: String },
}

/// Configuration load failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    #[error("invalid namespace {0:?}: expected lowercase letters, digits or '-'")]
    Namespace(String),
}

/// Top-level error for runtime setup and module initialization.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to install tracing subscriber: {0}")]
    Logging(String),
    #[error("module `{module}` panicked during init")]
    InitPanic { module: String },
}
