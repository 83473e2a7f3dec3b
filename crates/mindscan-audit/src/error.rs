use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("unknown audit action: {0}")]
    UnknownAction(String),
}
