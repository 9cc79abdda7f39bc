// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A filter broke its output contract (no data, zero length, bad length).
    #[error("content filter `{filter}` returned invalid output: {reason}")]
    InvalidFilterOutput {
        filter: String,
        reason: &'static str,
    },

    #[error("content filter `{filter}` failed: {source}")]
    Filter {
        filter: String,
        #[source]
        source: BoxError,
    },

    #[error("content filter `{filter}` could not build a context: {source}")]
    Context {
        filter: String,
        #[source]
        source: BoxError,
    },

    #[error("payload exceeds the configured limit of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl ChainError {
    /// Wrap a filter-specific failure (bad key, corrupt block, ...).
    pub fn filter<E>(filter: impl Into<String>, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ChainError::Filter {
            filter: filter.into(),
            source: err.into(),
        }
    }

    pub fn context<E>(filter: impl Into<String>, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ChainError::Context {
            filter: filter.into(),
            source: err.into(),
        }
    }

    /// True for collaborator contract breaches, which are never retried.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, ChainError::InvalidFilterOutput { .. })
    }
}

impl From<ChainError> for std::io::Error {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Io(io) => io,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;
