use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mindscan_audit::{AuditAction, AuditEvent};
use mindscan_core::models::assessment::AssessmentRecord;
use mindscan_core::models::result::ClassificationResult;
use mindscan_instruments::{Interpretation, interpret};

use crate::error::ApiError;
use crate::routes::response_set;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateAssessment {
    pub instrument_id: String,
    /// Raw subject identifier. Hashed before storage.
    pub subject: String,
    pub responses: serde_json::Value,
}

#[derive(Serialize)]
pub struct CreatedAssessment {
    pub id: Uuid,
    pub subject_hash: String,
    pub expires_at: Option<jiff::Timestamp>,
    pub result: ClassificationResult,
    pub interpretation: Interpretation,
}

/// Score, seal and store a submission.
pub async fn create_assessment(
    State(state): State<AppState>,
    body: Result<Json<CreateAssessment>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedAssessment>), ApiError> {
    let Json(req) = body?;
    if req.subject.trim().is_empty() {
        return Err(ApiError::BadRequest("subject must not be empty".to_string()));
    }

    let definition = state.registry.resolve(&req.instrument_id)?;
    let responses = response_set(req.responses)?;
    let result = mindscan_instruments::classify(definition, &responses);

    let now = jiff::Timestamp::now();
    let expires_at = state
        .retention
        .map(|retention| now.checked_add(retention))
        .transpose()
        .map_err(|e| ApiError::Internal(format!("retention overflow: {e}")))?;

    let store = state.store.lock().await;
    let subject_hash = store.subject_hash(&req.subject);
    let record = AssessmentRecord::new(subject_hash.clone(), responses, result, now, expires_at);

    let event = AuditEvent::new(AuditAction::AssessmentStored, "assessment", record.id.to_string())
        .for_subject(&subject_hash)
        .with_details(serde_json::json!({
            "instrument_id": record.instrument_id,
            "severity": record.result.severity,
            "risk_level": record.result.risk_level,
            "immediate_action_required": record.result.immediate_action_required,
        }));

    if let Err(e) = store.save_assessment_with_audit(&record, &event) {
        event.failed().emit();
        return Err(e.into());
    }
    event.emit();
    drop(store);

    let interpretation = interpret(&record.result);
    Ok((
        StatusCode::CREATED,
        Json(CreatedAssessment {
            id: record.id,
            subject_hash,
            expires_at,
            result: record.result,
            interpretation,
        }),
    ))
}

pub async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssessmentRecord>, ApiError> {
    let store = state.store.lock().await;
    let record = store.get_assessment(id)?;

    let event = AuditEvent::new(AuditAction::AssessmentViewed, "assessment", id.to_string())
        .for_subject(&record.subject_hash);
    event.emit();
    store.append_audit(&event)?;

    Ok(Json(record))
}
