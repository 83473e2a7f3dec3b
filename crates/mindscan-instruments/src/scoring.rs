use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mindscan_core::models::result::{RiskLevel, SeverityBand};

use crate::error::InstrumentError;

/// How a question is answered in the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScaleKind {
    /// Slider or number input.
    Numeric,
    /// One label out of a fixed list.
    SingleChoice,
    /// Any number of labels out of a fixed list.
    MultiChoice,
}

/// Closed interval of valid normalized values for a question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Immutable question definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub kind: ScaleKind,
    pub range: ScoreRange,
    pub domain: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub reverse_scored: bool,
    #[serde(default)]
    pub crisis_indicator: bool,
    /// Added to the normalized (and possibly reversed) value before weighting.
    #[serde(default)]
    pub offset: f64,
    /// Choice labels; a label's index is its value.
    #[serde(default)]
    pub options: Vec<String>,
}

fn default_weight() -> f64 {
    1.0
}

impl Question {
    pub fn scale(id: &str, domain: &str, min: f64, max: f64) -> Self {
        Self {
            id: id.to_string(),
            text: String::new(),
            kind: ScaleKind::SingleChoice,
            range: ScoreRange::new(min, max),
            domain: domain.to_string(),
            weight: 1.0,
            reverse_scored: false,
            crisis_indicator: false,
            offset: 0.0,
            options: Vec::new(),
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn kind(mut self, kind: ScaleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse_scored = true;
        self
    }

    pub fn crisis(mut self) -> Self {
        self.crisis_indicator = true;
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }
}

/// One row of a cutoff table: `[min, max] → label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CutoffBand {
    pub min: u32,
    pub max: u32,
    pub label: String,
    pub severity: SeverityBand,
}

impl CutoffBand {
    pub fn new(min: u32, max: u32, label: &str, severity: SeverityBand) -> Self {
        Self {
            min,
            max,
            label: label.to_string(),
            severity,
        }
    }

    pub fn contains(&self, score: u32) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Predicate {
    /// Normalized value is at least `value`.
    AtLeast { value: f64 },
    /// Raw choice answer equals one of `choices` (case-insensitive).
    OneOf { choices: Vec<String> },
    /// Sum of the uncapped domain scores exceeds `value`. The rule's
    /// `question_ids` are not consulted.
    DomainSumAbove { value: f64 },
}

impl Predicate {
    fn threshold(&self) -> Option<f64> {
        match self {
            Predicate::AtLeast { value } | Predicate::DomainSumAbove { value } => Some(*value),
            Predicate::OneOf { .. } => None,
        }
    }
}

/// "If the answer to any of `question_ids` meets `predicate`, raise `id`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FlagRule {
    pub id: String,
    pub question_ids: Vec<String>,
    pub predicate: Predicate,
    pub severity: RiskLevel,
    #[serde(default)]
    pub crisis_indicator: bool,
    pub message: String,
}

impl FlagRule {
    pub fn at_least(
        id: &str,
        question_ids: &[&str],
        value: f64,
        severity: RiskLevel,
        message: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            question_ids: question_ids.iter().map(|q| q.to_string()).collect(),
            predicate: Predicate::AtLeast { value },
            severity,
            crisis_indicator: false,
            message: message.to_string(),
        }
    }

    pub fn domain_sum_above(id: &str, value: f64, severity: RiskLevel, message: &str) -> Self {
        Self {
            id: id.to_string(),
            question_ids: Vec::new(),
            predicate: Predicate::DomainSumAbove { value },
            severity,
            crisis_indicator: false,
            message: message.to_string(),
        }
    }

    pub fn crisis(mut self) -> Self {
        self.crisis_indicator = true;
        self
    }
}

/// Preprocessing applied to a response set before it is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Derivation {
    /// PSQI component scores computed from raw sleep-diary answers
    /// (`hours_sleep`, `time_in_bed`, `sleep_latency_minutes`, ...).
    SleepDiary,
}

/// Declarative definition of one instrument: questions, cutoffs and rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub max_score: u32,
    pub questions: Vec<Question>,
    pub cutoffs: Vec<CutoffBand>,
    #[serde(default)]
    pub flag_rules: Vec<FlagRule>,
    #[serde(default)]
    pub derivation: Option<Derivation>,
}

impl InstrumentDefinition {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Domain names in first-appearance order.
    pub fn domains(&self) -> Vec<&str> {
        let mut domains: Vec<&str> = Vec::new();
        for q in &self.questions {
            if !domains.contains(&q.domain.as_str()) {
                domains.push(&q.domain);
            }
        }
        domains
    }

    /// Id followed by aliases.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Check the structural invariants the engine relies on.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        let id = self.id.as_str();
        if id.trim().is_empty() {
            return Err(InstrumentError::invalid(id, "id must not be empty"));
        }
        if self.questions.is_empty() {
            return Err(InstrumentError::invalid(id, "at least one question is required"));
        }

        for (i, q) in self.questions.iter().enumerate() {
            if self.questions[..i].iter().any(|other| other.id == q.id) {
                return Err(InstrumentError::invalid(id, format!("duplicate question id '{}'", q.id)));
            }
            if !q.range.min.is_finite() || !q.range.max.is_finite() || q.range.min > q.range.max {
                return Err(InstrumentError::invalid(
                    id,
                    format!("question '{}' has invalid range [{}, {}]", q.id, q.range.min, q.range.max),
                ));
            }
            if !q.weight.is_finite() || q.weight < 0.0 {
                return Err(InstrumentError::invalid(
                    id,
                    format!("question '{}' has invalid weight {}", q.id, q.weight),
                ));
            }
            if !q.offset.is_finite() || q.offset < 0.0 {
                return Err(InstrumentError::invalid(
                    id,
                    format!("question '{}' has invalid offset {}", q.id, q.offset),
                ));
            }
        }

        self.validate_cutoffs()?;

        for rule in &self.flag_rules {
            let over_domains = matches!(rule.predicate, Predicate::DomainSumAbove { .. });
            if rule.question_ids.is_empty() && !over_domains {
                return Err(InstrumentError::invalid(id, format!("flag rule '{}' names no questions", rule.id)));
            }
            if rule.predicate.threshold().is_some_and(|value| !value.is_finite()) {
                return Err(InstrumentError::invalid(id, format!("flag rule '{}' has a non-finite threshold", rule.id)));
            }
        }

        Ok(())
    }

    fn validate_cutoffs(&self) -> Result<(), InstrumentError> {
        let id = self.id.as_str();
        let (Some(first), Some(last)) = (self.cutoffs.first(), self.cutoffs.last()) else {
            return Err(InstrumentError::invalid(id, "cutoff table is empty"));
        };
        if first.min != 0 {
            return Err(InstrumentError::invalid(id, format!("first band '{}' must start at 0", first.label)));
        }
        if last.max != self.max_score {
            return Err(InstrumentError::invalid(
                id,
                format!("last band '{}' ends at {} but max_score is {}", last.label, last.max, self.max_score),
            ));
        }
        for band in &self.cutoffs {
            if band.min > band.max {
                return Err(InstrumentError::invalid(id, format!("band '{}' has min > max", band.label)));
            }
        }
        for pair in self.cutoffs.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.min != prev.max + 1 {
                return Err(InstrumentError::invalid(
                    id,
                    format!(
                        "bands '{}' and '{}' leave a gap or overlap ({} → {})",
                        prev.label, next.label, prev.max, next.min
                    ),
                ));
            }
        }
        Ok(())
    }
}
