use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;

use mindscan_audit::{AuditAction, AuditEvent};
use mindscan_core::models::result::DomainScore;
use mindscan_instruments::diagnose::condition_scores;
use mindscan_instruments::{ComorbidityRisk, ProvisionalDiagnosis, comorbidity_risk, diagnose};

use crate::error::ApiError;
use crate::routes::response_set;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DiagnoseResponse {
    pub diagnoses: Vec<ProvisionalDiagnosis>,
    pub condition_scores: Vec<DomainScore>,
    pub comorbidity: Vec<ComorbidityRisk>,
}

/// Provisional patterns across a combined response set. Each registered
/// instrument with at least one answered item is scored to feed the
/// comorbidity check. Nothing is persisted.
pub async fn diagnose_responses(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<DiagnoseResponse>, ApiError> {
    let Json(body) = body?;
    let responses = response_set(body)?;

    let results: Vec<_> = state
        .registry
        .definitions()
        .iter()
        .filter(|d| d.questions.iter().any(|q| responses.contains(&q.id)))
        .map(|d| mindscan_instruments::classify(d, &responses))
        .collect();
    let condition_scores = condition_scores(&results);
    let comorbidity = comorbidity_risk(&condition_scores);
    let diagnoses = diagnose(&responses);

    AuditEvent::new(AuditAction::AssessmentScored, "diagnosis", "-")
        .with_details(serde_json::json!({
            "patterns": diagnoses.iter().map(|d| d.condition.as_str()).collect::<Vec<_>>(),
            "comorbidity": comorbidity.iter().map(|c| c.pattern.as_str()).collect::<Vec<_>>(),
        }))
        .emit();

    Ok(Json(DiagnoseResponse {
        diagnoses,
        condition_scores,
        comorbidity,
    }))
}
