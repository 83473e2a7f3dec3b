use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("assessment not found: {id}")]
    NotFound { id: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("migration v{version} failed: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to seal payload")]
    Seal,

    #[error("failed to unseal payload (wrong key or tampered data)")]
    Unseal,

    #[error("corrupted record {id}: {reason}")]
    Corrupted { id: String, reason: String },
}
