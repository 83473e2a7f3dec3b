use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::answer::ResponseSet;
use super::result::ClassificationResult;

/// A scored submission as persisted by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentRecord {
    pub id: Uuid,
    /// Salted hash of the subject identifier. Raw identifiers are never stored.
    pub subject_hash: String,
    pub instrument_id: String,
    pub responses: ResponseSet,
    pub result: ClassificationResult,
    pub created_at: jiff::Timestamp,
    pub expires_at: Option<jiff::Timestamp>,
}

impl AssessmentRecord {
    pub fn new(
        subject_hash: impl Into<String>,
        responses: ResponseSet,
        result: ClassificationResult,
        created_at: jiff::Timestamp,
        expires_at: Option<jiff::Timestamp>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_hash: subject_hash.into(),
            instrument_id: result.instrument_id.clone(),
            responses,
            result,
            created_at,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: jiff::Timestamp) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
