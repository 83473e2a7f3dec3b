use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    NotFound(String),

    #[error("invalid definition for instrument '{instrument_id}': {reason}")]
    InvalidDefinition {
        instrument_id: String,
        reason: String,
    },

    #[error("instrument key '{key}' is already registered")]
    DuplicateKey { key: String },

    #[error("failed to parse instrument definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InstrumentError {
    pub(crate) fn invalid(instrument_id: &str, reason: impl Into<String>) -> Self {
        InstrumentError::InvalidDefinition {
            instrument_id: instrument_id.to_string(),
            reason: reason.into(),
        }
    }
}
