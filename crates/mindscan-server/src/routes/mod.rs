pub mod assessments;
pub mod crisis;
pub mod diagnose;
pub mod health;
pub mod instruments;
pub mod reports;
pub mod subjects;

use mindscan_core::models::answer::ResponseSet;

use crate::error::ApiError;

/// Lenient conversion of a request body into a response set.
pub(crate) fn response_set(body: serde_json::Value) -> Result<ResponseSet, ApiError> {
    Ok(ResponseSet::from_json(body)?)
}
