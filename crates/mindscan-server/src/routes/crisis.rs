use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mindscan_audit::{AuditAction, AuditEvent};
use mindscan_instruments::crisis::EmergencyContact;
use mindscan_instruments::scoring::Question;
use mindscan_instruments::{CrisisAssessment, assess_crisis, emergency_contacts, follow_up_questions};

use mindscan_storage::CrisisRecord;

use crate::error::ApiError;
use crate::routes::response_set;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CrisisParams {
    /// Raw subject identifier. Hashed before storage; omitted for anonymous checks.
    pub subject: Option<String>,
}

#[derive(Serialize)]
pub struct CrisisResponse {
    pub record_id: Uuid,
    pub assessment: CrisisAssessment,
    /// Present whenever professional contact is advised.
    pub emergency_contacts: Vec<EmergencyContact>,
}

/// Assess crisis risk and persist the sealed assessment with its audit entry.
pub async fn assess(
    State(state): State<AppState>,
    params: Result<Query<CrisisParams>, QueryRejection>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<CrisisResponse>, ApiError> {
    let Query(params) = params?;
    let Json(body) = body?;
    let responses = response_set(body)?;
    let assessment = assess_crisis(&responses);

    if assessment.immediate_action_required {
        tracing::warn!(level = %assessment.level, score = assessment.score, "crisis assessment requires immediate action");
    }

    let store = state.store.lock().await;
    let subject_hash = params
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| store.subject_hash(s));

    let details = serde_json::to_value(&assessment).map_err(|e| ApiError::Internal(e.to_string()))?;
    let record = CrisisRecord::new(
        subject_hash.clone(),
        assessment.level.to_string(),
        assessment.score,
        assessment.immediate_action_required,
        details,
        jiff::Timestamp::now(),
    );

    let event = AuditEvent::new(AuditAction::CrisisAssessed, "crisis", record.id.to_string()).with_details(
        serde_json::json!({
            "level": assessment.level,
            "score": assessment.score,
            "immediate_action_required": assessment.immediate_action_required,
        }),
    );
    let event = match &subject_hash {
        Some(hash) => event.for_subject(hash),
        None => event,
    };

    if let Err(e) = store.save_crisis_record(&record, &event) {
        event.failed().emit();
        return Err(e.into());
    }
    event.emit();
    drop(store);

    let emergency_contacts = if assessment.professional_contact_required {
        emergency_contacts().to_vec()
    } else {
        Vec::new()
    };
    Ok(Json(CrisisResponse {
        record_id: record.id,
        assessment,
        emergency_contacts,
    }))
}

/// Stored crisis records for a subject, newest first.
pub async fn subject_crisis_records(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> Result<Json<Vec<CrisisRecord>>, ApiError> {
    let store = state.store.lock().await;
    let subject_hash = store.subject_hash(&subject);
    let records = store.crisis_records(&subject_hash)?;

    let event = AuditEvent::new(AuditAction::AssessmentViewed, "crisis", &subject_hash)
        .for_subject(&subject_hash)
        .with_details(serde_json::json!({ "count": records.len() }));
    event.emit();
    store.append_audit(&event)?;

    Ok(Json(records))
}

pub async fn contacts() -> Json<Vec<EmergencyContact>> {
    Json(emergency_contacts().to_vec())
}

pub async fn followups(body: Result<Json<serde_json::Value>, JsonRejection>) -> Result<Json<Vec<Question>>, ApiError> {
    let Json(body) = body?;
    let responses = response_set(body)?;
    Ok(Json(follow_up_questions(&responses)))
}
