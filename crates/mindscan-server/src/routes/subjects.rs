use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use mindscan_audit::{AuditAction, AuditEvent};
use mindscan_core::models::assessment::AssessmentRecord;

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct Erased {
    pub subject_hash: String,
    pub deleted: usize,
}

/// Newest first.
pub async fn list_subject_assessments(
    State(state): State<AppState>,
    Path(subject): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<AssessmentRecord>>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let store = state.store.lock().await;
    let subject_hash = store.subject_hash(&subject);
    let records = store.list_for_subject(&subject_hash, limit)?;

    let event = AuditEvent::new(AuditAction::AssessmentViewed, "subject", &subject_hash)
        .for_subject(&subject_hash)
        .with_details(serde_json::json!({ "count": records.len() }));
    event.emit();
    store.append_audit(&event)?;

    Ok(Json(records))
}

/// Right-to-erasure: removes every stored assessment and crisis record for
/// the subject.
/// The pseudonymous audit trail is kept.
pub async fn erase_subject(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<Erased>, ApiError> {
    let store = state.store.lock().await;
    let subject_hash = store.subject_hash(&subject);
    let deleted = store.delete_subject(&subject_hash)?;

    let event = AuditEvent::new(AuditAction::SubjectDataErased, "subject", &subject_hash)
        .for_subject(&subject_hash)
        .with_details(serde_json::json!({ "deleted": deleted }));
    event.emit();
    store.append_audit(&event)?;

    Ok(Json(Erased { subject_hash, deleted }))
}
