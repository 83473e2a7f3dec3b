use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use crate::error::AuditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AuditAction {
    AssessmentScored,
    AssessmentStored,
    AssessmentViewed,
    SubjectDataErased,
    CrisisAssessed,
    ReportExported,
    RetentionPurged,
}

impl AuditAction {
    pub const ALL: [AuditAction; 7] = [
        AuditAction::AssessmentScored,
        AuditAction::AssessmentStored,
        AuditAction::AssessmentViewed,
        AuditAction::SubjectDataErased,
        AuditAction::CrisisAssessed,
        AuditAction::ReportExported,
        AuditAction::RetentionPurged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AssessmentScored => "assessment_scored",
            AuditAction::AssessmentStored => "assessment_stored",
            AuditAction::AssessmentViewed => "assessment_viewed",
            AuditAction::SubjectDataErased => "subject_data_erased",
            AuditAction::CrisisAssessed => "crisis_assessed",
            AuditAction::ReportExported => "report_exported",
            AuditAction::RetentionPurged => "retention_purged",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AuditError::UnknownAction(s.to_string()))
    }
}

/// A structured audit event.
///
/// Events are logged via `tracing` and can be persisted by the storage
/// layer. Subjects appear only as salted hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub subject_hash: Option<String>,
    pub success: bool,
    pub details: Option<serde_json::Value>,
    pub occurred_at: jiff::Timestamp,
}

impl AuditEvent {
    pub fn new(action: AuditAction, resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            subject_hash: None,
            success: true,
            details: None,
            occurred_at: jiff::Timestamp::now(),
        }
    }

    pub fn for_subject(mut self, subject_hash: impl Into<String>) -> Self {
        self.subject_hash = Some(subject_hash.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    /// Emit this audit event via tracing. Failures log at warn.
    pub fn emit(&self) {
        let subject = self.subject_hash.as_deref().unwrap_or("-");
        if self.success {
            info!(
                audit.action = %self.action,
                audit.resource_type = %self.resource_type,
                audit.resource_id = %self.resource_id,
                audit.subject_hash = %subject,
                "audit event"
            );
        } else {
            warn!(
                audit.action = %self.action,
                audit.resource_type = %self.resource_type,
                audit.resource_id = %self.resource_id,
                audit.subject_hash = %subject,
                "audit event (failed)"
            );
        }
    }
}
