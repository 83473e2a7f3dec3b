use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("response set must be a JSON object keyed by question id")]
    NotAnObject,

    #[error("unsupported answer for '{question_id}': {reason}")]
    UnsupportedAnswer { question_id: String, reason: String },

    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
