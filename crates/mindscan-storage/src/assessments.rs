use std::collections::BTreeMap;

use mindscan_core::models::answer::ResponseSet;
use mindscan_core::models::assessment::AssessmentRecord;
use mindscan_core::models::result::ClassificationResult;
use mindscan_audit::AuditEvent;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{AssessmentStore, from_millis, to_millis};

/// Aggregate counts over the stored assessments. Nothing here identifies a subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStatistics {
    pub total_assessments: u64,
    pub by_severity: BTreeMap<String, u64>,
    pub immediate_action: u64,
    pub crisis_records: u64,
    pub audit_entries: u64,
}

struct SealedRow {
    id: String,
    subject_hash: String,
    instrument_id: String,
    sealed_responses: String,
    sealed_result: String,
    created_at: i64,
    expires_at: Option<i64>,
}

impl SealedRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            subject_hash: row.get(1)?,
            instrument_id: row.get(2)?,
            sealed_responses: row.get(3)?,
            sealed_result: row.get(4)?,
            created_at: row.get(5)?,
            expires_at: row.get(6)?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, subject_hash, instrument_id, sealed_responses, sealed_result, \
     created_at, expires_at FROM assessments";

impl AssessmentStore {
    pub fn save_assessment(&self, record: &AssessmentRecord) -> Result<(), StorageError> {
        self.insert_assessment(&self.conn, record)?;
        debug!(id = %record.id, instrument = %record.instrument_id, "assessment saved");
        Ok(())
    }

    /// Store an assessment and its audit entry in one transaction. Either
    /// both rows are written or neither is. Returns the audit row id.
    pub fn save_assessment_with_audit(&self, record: &AssessmentRecord, event: &AuditEvent) -> Result<i64, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        self.insert_assessment(&tx, record)?;
        let audit_id = self.insert_audit(&tx, event)?;
        tx.commit()?;
        debug!(id = %record.id, instrument = %record.instrument_id, audit_id, "assessment saved with audit entry");
        Ok(audit_id)
    }

    fn insert_assessment(&self, conn: &Connection, record: &AssessmentRecord) -> Result<(), StorageError> {
        let sealed_responses = self.key.seal_json(&record.responses)?;
        let sealed_result = self.key.seal_json(&record.result)?;

        conn.execute(
            "INSERT INTO assessments (id, subject_hash, instrument_id, sealed_responses, sealed_result,
                 severity, risk_level, immediate_action, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.id.to_string(),
                record.subject_hash,
                record.instrument_id,
                sealed_responses,
                sealed_result,
                record.result.severity.as_str(),
                record.result.risk_level.as_str(),
                record.result.immediate_action_required,
                to_millis(record.created_at),
                record.expires_at.map(to_millis),
            ],
        )?;
        Ok(())
    }

    /// Records past their retention window read as not found, even before
    /// the next purge removes them.
    pub fn get_assessment(&self, id: Uuid) -> Result<AssessmentRecord, StorageError> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.to_string()],
                SealedRow::from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound { id: id.to_string() })?;
        let record = self.unseal_row(row)?;
        if record.is_expired(jiff::Timestamp::now()) {
            return Err(StorageError::NotFound { id: id.to_string() });
        }
        Ok(record)
    }

    /// Newest first, at most `limit` unexpired records.
    pub fn list_for_subject(&self, subject_hash: &str, limit: usize) -> Result<Vec<AssessmentRecord>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let now = to_millis(jiff::Timestamp::now());
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE subject_hash = ?1 AND (expires_at IS NULL OR expires_at > ?3)
             ORDER BY created_at DESC, rowid DESC LIMIT ?2"
        ))?;
        let rows = stmt
            .query_map(params![subject_hash, limit, now], SealedRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(|row| self.unseal_row(row)).collect()
    }

    /// Erase every assessment and crisis record for a subject. Returns the
    /// number of rows removed.
    pub fn delete_subject(&self, subject_hash: &str) -> Result<usize, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let assessments = tx.execute("DELETE FROM assessments WHERE subject_hash = ?1", params![subject_hash])?;
        let crisis_records = tx.execute("DELETE FROM crisis_records WHERE subject_hash = ?1", params![subject_hash])?;
        tx.commit()?;
        info!(assessments, crisis_records, "subject data erased");
        Ok(assessments + crisis_records)
    }

    /// Remove assessments whose retention window ended at or before `now`.
    pub fn purge_expired(&self, now: jiff::Timestamp) -> Result<usize, StorageError> {
        let purged = self.conn.execute(
            "DELETE FROM assessments WHERE expires_at IS NOT NULL AND expires_at <= ?1",
            params![to_millis(now)],
        )?;
        if purged > 0 {
            info!(purged, "expired assessments purged");
        }
        Ok(purged)
    }

    pub fn statistics(&self) -> Result<StorageStatistics, StorageError> {
        let mut stats = StorageStatistics::default();

        let mut stmt = self
            .conn
            .prepare("SELECT severity, COUNT(*) FROM assessments GROUP BY severity")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        for (severity, count) in rows {
            let count = count.max(0) as u64;
            stats.total_assessments += count;
            stats.by_severity.insert(severity, count);
        }

        stats.immediate_action = self.count("SELECT COUNT(*) FROM assessments WHERE immediate_action = 1")?;
        stats.crisis_records = self.count("SELECT COUNT(*) FROM crisis_records")?;
        stats.audit_entries = self.count("SELECT COUNT(*) FROM audit_log")?;
        Ok(stats)
    }

    fn count(&self, sql: &str) -> Result<u64, StorageError> {
        let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    fn unseal_row(&self, row: SealedRow) -> Result<AssessmentRecord, StorageError> {
        let id = Uuid::parse_str(&row.id).map_err(|e| StorageError::Corrupted {
            id: row.id.clone(),
            reason: e.to_string(),
        })?;
        let responses: ResponseSet = self.key.unseal_json(&row.sealed_responses)?;
        let result: ClassificationResult = self.key.unseal_json(&row.sealed_result)?;
        let expires_at = row
            .expires_at
            .map(|ms| from_millis(&row.id, ms))
            .transpose()?;

        Ok(AssessmentRecord {
            id,
            subject_hash: row.subject_hash,
            instrument_id: row.instrument_id,
            responses,
            result,
            created_at: from_millis(&row.id, row.created_at)?,
            expires_at,
        })
    }
}
