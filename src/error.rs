use std::io;
use thiserror::Error;

/// Errors surfaced while building a simulation or reading its configuration.
#[derive(Debug, Error)]
pub enum SimError {
    /// Settings that cannot produce a valid population
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("{context}: {source}")]
    Config {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Preset(String),
}

impl SimError {
    pub fn config(context: impl Into<String>, source: io::Error) -> Self {
        SimError::Config {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
