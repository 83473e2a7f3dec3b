pub mod error;
pub mod events;

pub use error::AuditError;
pub use events::{AuditAction, AuditEvent};
