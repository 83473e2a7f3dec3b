use mindscan_audit::AuditEvent;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{AssessmentStore, from_millis, to_millis};

/// A crisis assessment as persisted. Level, score and the immediate-action bit
/// stay queryable; the full assessment is sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrisisRecord {
    pub id: Uuid,
    /// `None` for anonymous assessments.
    pub subject_hash: Option<String>,
    pub level: String,
    pub score: u32,
    pub immediate_action: bool,
    pub details: serde_json::Value,
    pub created_at: jiff::Timestamp,
}

impl CrisisRecord {
    pub fn new(
        subject_hash: Option<String>,
        level: impl Into<String>,
        score: u32,
        immediate_action: bool,
        details: serde_json::Value,
        created_at: jiff::Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_hash,
            level: level.into(),
            score,
            immediate_action,
            details,
            created_at,
        }
    }
}

struct CrisisRow {
    id: String,
    subject_hash: Option<String>,
    level: String,
    score: i64,
    immediate_action: bool,
    sealed_details: String,
    created_at: i64,
}

impl AssessmentStore {
    /// Store a crisis record and its audit entry in one transaction.
    /// Returns the audit row id.
    pub fn save_crisis_record(&self, record: &CrisisRecord, event: &AuditEvent) -> Result<i64, StorageError> {
        let sealed_details = self.key.seal_json(&record.details)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO crisis_records (id, subject_hash, level, score, immediate_action, sealed_details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id.to_string(),
                record.subject_hash,
                record.level,
                record.score,
                record.immediate_action,
                sealed_details,
                to_millis(record.created_at),
            ],
        )?;
        let audit_id = self.insert_audit(&tx, event)?;
        tx.commit()?;

        debug!(id = %record.id, level = %record.level, "crisis record saved");
        Ok(audit_id)
    }

    /// Crisis records for one subject, newest first.
    pub fn crisis_records(&self, subject_hash: &str) -> Result<Vec<CrisisRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_hash, level, score, immediate_action, sealed_details, created_at
             FROM crisis_records WHERE subject_hash = ?1 ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map(params![subject_hash], |row| {
                Ok(CrisisRow {
                    id: row.get(0)?,
                    subject_hash: row.get(1)?,
                    level: row.get(2)?,
                    score: row.get(3)?,
                    immediate_action: row.get(4)?,
                    sealed_details: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(|row| self.unseal_crisis_row(row)).collect()
    }

    fn unseal_crisis_row(&self, row: CrisisRow) -> Result<CrisisRecord, StorageError> {
        let corrupted = |reason: String| StorageError::Corrupted {
            id: row.id.clone(),
            reason,
        };
        let id = Uuid::parse_str(&row.id).map_err(|e| corrupted(e.to_string()))?;
        let score = u32::try_from(row.score).map_err(|e| corrupted(format!("score {}: {e}", row.score)))?;

        Ok(CrisisRecord {
            id,
            details: self.key.unseal_json(&row.sealed_details)?,
            created_at: from_millis(&row.id, row.created_at)?,
            subject_hash: row.subject_hash,
            level: row.level,
            score,
            immediate_action: row.immediate_action,
        })
    }
}
