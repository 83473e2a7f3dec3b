use serde::{Deserialize, Serialize};

use mindscan_core::models::result::{ClassificationResult, DomainScore, RiskLevel, SeverityBand};
use mindscan_instruments::crisis::{EmergencyContact, emergency_contacts};
use mindscan_instruments::interpret::Interpretation;

const DISCLAIMER: &str = "This screening result is not a diagnosis. \
    Results should be reviewed by a qualified mental health professional.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFlag {
    pub message: String,
    pub severity: RiskLevel,
    pub crisis: bool,
}

/// Everything a report template can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub title: String,
    pub instrument_id: String,
    pub instrument_name: String,
    pub generated_at: jiff::Timestamp,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub percent_of_max: f64,
    pub severity: SeverityBand,
    pub severity_label: String,
    pub risk_level: RiskLevel,
    pub immediate_action_required: bool,
    pub flags: Vec<ReportFlag>,
    pub domain_scores: Vec<DomainScore>,
    pub highest_domain: Option<DomainScore>,
    pub narrative: String,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
    /// Only populated when the result calls for urgent contact.
    pub emergency_contacts: Vec<EmergencyContact>,
    pub disclaimer: String,
}

impl ScreeningReport {
    pub fn build(
        result: &ClassificationResult,
        interpretation: &Interpretation,
        generated_at: jiff::Timestamp,
    ) -> Self {
        let urgent = result.immediate_action_required
            || result.has_crisis_flag()
            || result.risk_level >= RiskLevel::High;

        Self {
            title: format!("{} Screening Report", result.instrument_name),
            instrument_id: result.instrument_id.clone(),
            instrument_name: result.instrument_name.clone(),
            generated_at,
            total_score: result.total_score,
            max_possible_score: result.max_possible_score,
            percent_of_max: (result.percent_of_max() * 10.0).round() / 10.0,
            severity: result.severity,
            severity_label: result.severity_label.clone(),
            risk_level: result.risk_level,
            immediate_action_required: result.immediate_action_required,
            flags: result
                .flags
                .iter()
                .map(|f| ReportFlag {
                    message: f.message.clone(),
                    severity: f.severity,
                    crisis: f.crisis_indicator,
                })
                .collect(),
            domain_scores: result.domain_scores.clone(),
            highest_domain: interpretation.highest_domain.clone(),
            narrative: interpretation.narrative.clone(),
            recommendations: interpretation.recommendations.clone(),
            next_steps: interpretation.next_steps.clone(),
            emergency_contacts: if urgent {
                emergency_contacts().to_vec()
            } else {
                Vec::new()
            },
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    pub fn file_stem(&self) -> String {
        format!("{}-report-{}", self.instrument_id, self.generated_at.as_second())
    }
}
