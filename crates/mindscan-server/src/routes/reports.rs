use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use mindscan_audit::{AuditAction, AuditEvent};
use mindscan_export::docx::generate_docx;
use mindscan_export::render::render_report;
use mindscan_export::styles::DocumentStyles;
use mindscan_export::ScreeningReport;
use mindscan_instruments::interpret;

use crate::error::ApiError;
use crate::state::AppState;

const DOCX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Docx,
}

impl ExportFormat {
    fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Docx => "docx",
        }
    }
}

#[derive(Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub format: ExportFormat,
}

/// Render a stored assessment as Markdown or DOCX.
pub async fn export_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;

    let store = state.store.lock().await;
    let record = store.get_assessment(id)?;

    let report = ScreeningReport::build(&record.result, &interpret(&record.result), jiff::Timestamp::now());
    let markdown = render_report(&report, None)?;

    let event = AuditEvent::new(AuditAction::ReportExported, "assessment", id.to_string())
        .for_subject(&record.subject_hash)
        .with_details(serde_json::json!({ "format": params.format.as_str() }));
    event.emit();
    store.append_audit(&event)?;
    drop(store);

    let response = match params.format {
        ExportFormat::Markdown => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string())],
            markdown,
        )
            .into_response(),
        ExportFormat::Docx => {
            let bytes = generate_docx(&markdown, &DocumentStyles::default())?;
            (
                [
                    (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}.docx\"", report.file_stem()),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
    };
    Ok(response)
}
