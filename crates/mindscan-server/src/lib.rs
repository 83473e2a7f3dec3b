//! mindscan-server
//!
//! HTTP surface over the screening engine and the encrypted assessment store.

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Instruments: definitions and stateless scoring
        .route("/instruments", get(routes::instruments::list_instruments))
        .route("/instruments/{id}", get(routes::instruments::get_instrument_detail))
        .route("/instruments/{id}/score", post(routes::instruments::score))
        .route("/instruments/{id}/validate", post(routes::instruments::validate))
        // Stored assessments
        .route("/assessments", post(routes::assessments::create_assessment))
        .route("/assessments/{id}", get(routes::assessments::get_assessment))
        .route("/assessments/{id}/report", get(routes::reports::export_report))
        .route(
            "/subjects/{subject}/assessments",
            get(routes::subjects::list_subject_assessments),
        )
        .route(
            "/subjects/{subject}/crisis-records",
            get(routes::crisis::subject_crisis_records),
        )
        .route("/subjects/{subject}", delete(routes::subjects::erase_subject))
        // Crisis support
        .route("/crisis/assess", post(routes::crisis::assess))
        .route("/crisis/contacts", get(routes::crisis::contacts))
        .route("/followups", post(routes::crisis::followups))
        .route("/diagnose", post(routes::diagnose::diagnose_responses))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}

/// Delete expired assessments and record the purge.
pub async fn purge_expired(state: &AppState) -> Result<usize, mindscan_storage::StorageError> {
    let store = state.store.lock().await;
    let purged = store.purge_expired(jiff::Timestamp::now())?;
    if purged > 0 {
        let event = mindscan_audit::AuditEvent::new(mindscan_audit::AuditAction::RetentionPurged, "assessment", "*")
            .with_details(serde_json::json!({ "purged": purged }));
        event.emit();
        store.append_audit(&event)?;
    }
    Ok(purged)
}
