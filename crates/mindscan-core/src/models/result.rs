use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Ordered severity classification derived from an instrument total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityBand {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}

impl SeverityBand {
    pub const ALL: [SeverityBand; 5] = [
        SeverityBand::Minimal,
        SeverityBand::Mild,
        SeverityBand::Moderate,
        SeverityBand::ModeratelySevere,
        SeverityBand::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Minimal => "minimal",
            SeverityBand::Mild => "mild",
            SeverityBand::Moderate => "moderate",
            SeverityBand::ModeratelySevere => "moderately_severe",
            SeverityBand::Severe => "severe",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityBand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeverityBand::ALL
            .into_iter()
            .find(|band| band.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "severity band",
                value: s.to_string(),
            })
    }
}

/// Ordered risk scale shared by flag severities and the aggregate risk level.
///
/// `None` sorts lowest so the aggregate of an empty flag set is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::None,
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| CoreError::UnknownVariant {
                kind: "risk level",
                value: s.to_string(),
            })
    }
}

/// A red-flag rule that fired for a response set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TriggeredFlag {
    pub id: String,
    /// The question whose answer triggered the rule. Empty for rules over
    /// domain sums.
    pub question_id: String,
    pub severity: RiskLevel,
    pub crisis_indicator: bool,
    pub message: String,
}

/// Aggregated (uncapped) score for one symptom domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainScore {
    pub domain: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WarningKind {
    /// A free-text answer matched neither the option list nor the synonym table.
    UnrecognizedResponse,
    /// A numeric answer was NaN or infinite.
    NonFiniteNumber,
    /// The response set carried a key the instrument neither scores nor flags on.
    UnknownQuestion,
}

/// Non-fatal normalization anomaly. The default substitution has already
/// been applied when one of these is reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseWarning {
    pub question_id: String,
    pub kind: WarningKind,
    pub raw: String,
    pub substituted: f64,
}

/// Output of one classification call. Fully determined by the response set
/// and the instrument definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClassificationResult {
    pub instrument_id: String,
    pub instrument_name: String,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub severity: SeverityBand,
    /// Instrument-specific band name (e.g. "likely_mild", "poor").
    pub severity_label: String,
    pub risk_level: RiskLevel,
    pub immediate_action_required: bool,
    pub flags: Vec<TriggeredFlag>,
    pub domain_scores: Vec<DomainScore>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ResponseWarning>,
}

impl ClassificationResult {
    pub fn domain(&self, name: &str) -> Option<f64> {
        self.domain_scores
            .iter()
            .find(|d| d.domain == name)
            .map(|d| d.score)
    }

    pub fn has_crisis_flag(&self) -> bool {
        self.flags.iter().any(|f| f.crisis_indicator)
    }

    /// Total as a percentage of the instrument maximum.
    pub fn percent_of_max(&self) -> f64 {
        if self.max_possible_score == 0 {
            return 0.0;
        }
        f64::from(self.total_score) / f64::from(self.max_possible_score) * 100.0
    }
}
