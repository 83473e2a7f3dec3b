use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Serialize;

use mindscan_audit::{AuditAction, AuditEvent};
use mindscan_core::models::result::ClassificationResult;
use mindscan_instruments::{InstrumentDefinition, Interpretation, ValidationReport, interpret, validate_responses};

use crate::error::ApiError;
use crate::routes::response_set;
use crate::state::AppState;

#[derive(Serialize)]
pub struct InstrumentSummary {
    id: String,
    name: String,
    aliases: Vec<String>,
    question_count: usize,
    max_score: u32,
    domains: Vec<String>,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub result: ClassificationResult,
    pub interpretation: Interpretation,
}

pub async fn list_instruments(State(state): State<AppState>) -> Json<Vec<InstrumentSummary>> {
    let instruments = state
        .registry
        .definitions()
        .iter()
        .map(|d| InstrumentSummary {
            id: d.id.clone(),
            name: d.name.clone(),
            aliases: d.aliases.clone(),
            question_count: d.questions.len(),
            max_score: d.max_score,
            domains: d.domains().into_iter().map(str::to_string).collect(),
        })
        .collect();
    Json(instruments)
}

pub async fn get_instrument_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InstrumentDefinition>, ApiError> {
    Ok(Json(state.registry.resolve(&id)?.clone()))
}

/// Stateless scoring. Nothing is persisted.
pub async fn score(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let definition = state.registry.resolve(&id)?;
    let Json(body) = body?;
    let responses = response_set(body)?;

    let result = mindscan_instruments::classify(definition, &responses);
    AuditEvent::new(AuditAction::AssessmentScored, "instrument", &definition.id)
        .with_details(serde_json::json!({
            "severity": result.severity,
            "risk_level": result.risk_level,
        }))
        .emit();

    let interpretation = interpret(&result);
    Ok(Json(ScoreResponse { result, interpretation }))
}

pub async fn validate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ValidationReport>, ApiError> {
    let definition = state.registry.resolve(&id)?;
    let Json(body) = body?;
    let responses = response_set(body)?;
    Ok(Json(validate_responses(definition, &responses)))
}
