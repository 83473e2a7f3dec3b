//! mindscan-storage
//!
//! Local SQLite persistence for scored assessments, crisis records and their
//! audit trail.
//! Payloads are sealed with AES-256-GCM; subjects are stored as salted hashes.

pub mod assessments;
pub mod audit_log;
pub mod crisis_records;
pub mod crypto;
pub mod db;
pub mod error;
pub mod store;

pub use assessments::StorageStatistics;
pub use crisis_records::CrisisRecord;
pub use crypto::SealingKey;
pub use error::StorageError;
pub use store::AssessmentStore;
