use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::crypto::{SealingKey, hash_subject};
use crate::db::{open_database, open_memory_database};
use crate::error::StorageError;

/// Encrypted assessment store over a single SQLite connection.
///
/// Response sets, results and audit details are sealed before they touch
/// disk. Only severity, risk level and timestamps stay queryable in the clear.
pub struct AssessmentStore {
    pub(crate) conn: Connection,
    pub(crate) key: SealingKey,
    subject_salt: String,
}

impl AssessmentStore {
    pub fn open(path: &Path, key: SealingKey, subject_salt: impl Into<String>) -> Result<Self, StorageError> {
        let conn = open_database(path)?;
        info!(path = %path.display(), "assessment store opened");
        Ok(Self {
            conn,
            key,
            subject_salt: subject_salt.into(),
        })
    }

    pub fn open_in_memory(key: SealingKey, subject_salt: impl Into<String>) -> Result<Self, StorageError> {
        Ok(Self {
            conn: open_memory_database()?,
            key,
            subject_salt: subject_salt.into(),
        })
    }

    /// Pseudonymous identifier for a raw subject id under this store's salt.
    pub fn subject_hash(&self, subject: &str) -> String {
        hash_subject(&self.subject_salt, subject)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

pub(crate) fn to_millis(ts: jiff::Timestamp) -> i64 {
    ts.as_millisecond()
}

pub(crate) fn from_millis(id: &str, ms: i64) -> Result<jiff::Timestamp, StorageError> {
    jiff::Timestamp::from_millisecond(ms).map_err(|e| StorageError::Corrupted {
        id: id.to_string(),
        reason: format!("timestamp {ms}: {e}"),
    })
}
