use mindscan_audit::{AuditAction, AuditEvent};
use rusqlite::{Connection, params};

use crate::error::StorageError;
use crate::store::{AssessmentStore, from_millis, to_millis};

struct AuditRow {
    id: i64,
    subject_hash: Option<String>,
    action: String,
    resource_type: String,
    resource_id: String,
    success: bool,
    sealed_details: Option<String>,
    created_at: i64,
}

impl AssessmentStore {
    /// Persist an audit event. Details are sealed like assessment payloads.
    pub fn append_audit(&self, event: &AuditEvent) -> Result<i64, StorageError> {
        self.insert_audit(&self.conn, event)
    }

    /// Insert on `conn`, which may be a transaction over this store's connection.
    pub(crate) fn insert_audit(&self, conn: &Connection, event: &AuditEvent) -> Result<i64, StorageError> {
        let sealed_details = event
            .details
            .as_ref()
            .map(|details| self.key.seal_json(details))
            .transpose()?;

        conn.execute(
            "INSERT INTO audit_log (subject_hash, action, resource_type, resource_id, success, sealed_details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.subject_hash,
                event.action.as_str(),
                event.resource_type,
                event.resource_id,
                event.success,
                sealed_details,
                to_millis(event.occurred_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Audit entries for one subject, oldest first.
    pub fn audit_trail(&self, subject_hash: &str) -> Result<Vec<AuditEvent>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_hash, action, resource_type, resource_id, success, sealed_details, created_at
             FROM audit_log WHERE subject_hash = ?1 ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![subject_hash], |row| {
                Ok(AuditRow {
                    id: row.get(0)?,
                    subject_hash: row.get(1)?,
                    action: row.get(2)?,
                    resource_type: row.get(3)?,
                    resource_id: row.get(4)?,
                    success: row.get(5)?,
                    sealed_details: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(|row| self.audit_event(row)).collect()
    }

    fn audit_event(&self, row: AuditRow) -> Result<AuditEvent, StorageError> {
        let row_id = format!("audit:{}", row.id);
        let action: AuditAction = row.action.parse().map_err(|e: mindscan_audit::AuditError| StorageError::Corrupted {
            id: row_id.clone(),
            reason: e.to_string(),
        })?;
        let details = row
            .sealed_details
            .as_deref()
            .map(|sealed| self.key.unseal_json(sealed))
            .transpose()?;

        Ok(AuditEvent {
            action,
            resource_type: row.resource_type,
            resource_id: row.resource_id,
            subject_hash: row.subject_hash,
            success: row.success,
            details,
            occurred_at: from_millis(&row_id, row.created_at)?,
        })
    }
}
