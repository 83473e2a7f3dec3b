//! mindscan-instruments
//!
//! Screening instrument definitions and the scoring engine. Pure data and
//! pure functions: a response set plus a definition in, a
//! `ClassificationResult` out. File access is limited to the explicit
//! definition loaders in [`registry`].

pub mod aggregate;
pub mod classify;
pub mod crisis;
pub mod diagnose;
pub mod error;
pub mod flags;
pub mod followup;
pub mod instruments;
pub mod interpret;
pub mod normalize;
pub mod registry;
pub mod scoring;
pub mod validation;

pub use classify::classify;
pub use crisis::{CrisisAssessment, CrisisLevel, assess_crisis, emergency_contacts};
pub use diagnose::{ComorbidityRisk, ProvisionalDiagnosis, comorbidity_risk, diagnose};
pub use error::InstrumentError;
pub use followup::follow_up_questions;
pub use instruments::BuiltinInstrument;
pub use interpret::{Interpretation, interpret};
pub use registry::InstrumentRegistry;
pub use scoring::InstrumentDefinition;
pub use validation::{ValidationReport, validate_responses};
