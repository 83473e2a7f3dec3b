//! Provisional diagnostic patterns and comorbidity risk.
//!
//! Screening aids only: a pattern that meets its criteria is a prompt for a
//! clinical assessment, not a diagnosis.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mindscan_core::models::answer::ResponseSet;
use mindscan_core::models::result::{ClassificationResult, DomainScore};

use crate::crisis::numeric_value;

/// Answers at or above this count toward a criterion ("more than half the days").
const ENDORSED: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Condition {
    MajorDepression,
    GeneralizedAnxiety,
    PanicDisorder,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::MajorDepression => "major_depression",
            Condition::GeneralizedAnxiety => "generalized_anxiety",
            Condition::PanicDisorder => "panic_disorder",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProvisionalDiagnosis {
    pub condition: Condition,
    /// 0.0 to 1.0, rounded to two places.
    pub confidence: f64,
    pub rationale: Vec<String>,
    pub core_symptoms_met: u32,
    /// For panic disorder, the number of attack symptoms endorsed.
    pub additional_symptoms_met: u32,
    pub total_criteria_met: u32,
}

/// A symptom and the response ids it may be answered under. Built-in item
/// ids come first.
struct Symptom(&'static [&'static str]);

impl Symptom {
    fn endorsed(&self, responses: &ResponseSet) -> bool {
        self.0
            .iter()
            .find_map(|id| numeric_value(responses, id))
            .is_some_and(|v| v >= ENDORSED)
    }
}

struct Criteria {
    condition: Condition,
    core: &'static [Symptom],
    additional: &'static [Symptom],
}

const MAJOR_DEPRESSION: Criteria = Criteria {
    condition: Condition::MajorDepression,
    core: &[Symptom(&["dep_002", "mood_low"]), Symptom(&["dep_001", "anhedonia"])],
    additional: &[
        Symptom(&["dep_006", "appetite"]),
        Symptom(&["dep_003", "sleep"]),
        Symptom(&["dep_009", "psychomotor"]),
        Symptom(&["dep_004", "fatigue"]),
        Symptom(&["dep_007", "worthlessness"]),
        Symptom(&["dep_008", "concentration"]),
        Symptom(&["dep_005", "suicidal_ideation"]),
    ],
};

const GENERALIZED_ANXIETY: Criteria = Criteria {
    condition: Condition::GeneralizedAnxiety,
    core: &[
        Symptom(&["gad_003", "excessive_worry"]),
        Symptom(&["gad_002", "difficulty_controlling"]),
    ],
    additional: &[
        Symptom(&["gad_005", "restless"]),
        Symptom(&["dep_004", "fatigue"]),
        Symptom(&["dep_008", "concentration"]),
        Symptom(&["gad_006", "irritability"]),
        Symptom(&["gad_004", "muscle_tension"]),
        Symptom(&["dep_003", "sleep_disturbance"]),
    ],
};

const PANIC_DISORDER: Criteria = Criteria {
    condition: Condition::PanicDisorder,
    core: &[Symptom(&["anx_001", "panic_attacks"]), Symptom(&["anticipatory_anxiety"])],
    additional: &[
        Symptom(&["palpitations"]),
        Symptom(&["sweating"]),
        Symptom(&["trembling"]),
        Symptom(&["shortness_breath"]),
        Symptom(&["choking"]),
        Symptom(&["chest_pain"]),
        Symptom(&["nausea"]),
        Symptom(&["dizziness"]),
        Symptom(&["derealization"]),
        Symptom(&["fear_losing_control"]),
        Symptom(&["fear_dying"]),
        Symptom(&["numbness"]),
        Symptom(&["chills"]),
    ],
};

fn count(symptoms: &[Symptom], responses: &ResponseSet) -> u32 {
    symptoms.iter().filter(|s| s.endorsed(responses)).count() as u32
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn evaluate(criteria: &Criteria, responses: &ResponseSet) -> Option<ProvisionalDiagnosis> {
    let core = count(criteria.core, responses);
    let additional = count(criteria.additional, responses);
    let total = core + additional;
    let (c, a) = (f64::from(core), f64::from(additional));

    let (confidence, rationale) = match criteria.condition {
        Condition::MajorDepression if core >= 1 && total >= 5 => (
            (c * 0.3 + a * 0.1).min(0.9),
            vec![
                format!("Core depressive symptoms present ({core}/{})", criteria.core.len()),
                format!("Additional symptoms present ({additional}/{})", criteria.additional.len()),
            ],
        ),
        Condition::MajorDepression if core >= 1 && total >= 3 => {
            (0.4, vec!["Subsyndromal depression pattern identified".to_string()])
        }
        Condition::GeneralizedAnxiety if core >= 1 && additional >= 3 => (
            (c * 0.4 + a * 0.1).min(0.8),
            vec![
                format!("Excessive worry pattern present ({core}/{})", criteria.core.len()),
                format!("Physical anxiety symptoms present ({additional}/{})", criteria.additional.len()),
            ],
        ),
        Condition::PanicDisorder if core >= 1 && additional >= 4 => (
            (a * 0.15).min(0.7),
            vec![format!(
                "Panic attack criteria met ({additional}/{} symptoms)",
                criteria.additional.len()
            )],
        ),
        _ => return None,
    };

    Some(ProvisionalDiagnosis {
        condition: criteria.condition,
        confidence: round2(confidence),
        rationale,
        core_symptoms_met: core,
        additional_symptoms_met: additional,
        total_criteria_met: total,
    })
}

/// Patterns whose criteria are met, most confident first. A symptom counts
/// when its answer normalizes to 2 or more.
pub fn diagnose(responses: &ResponseSet) -> Vec<ProvisionalDiagnosis> {
    let mut found: Vec<ProvisionalDiagnosis> = [MAJOR_DEPRESSION, GENERALIZED_ANXIETY, PANIC_DISORDER]
        .iter()
        .filter_map(|criteria| evaluate(criteria, responses))
        .collect();
    found.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    found
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComorbidityRisk {
    pub pattern: String,
    pub conditions: Vec<String>,
    /// Capped at 100.
    pub risk_score: f64,
    pub prevalence: f64,
    pub recommendation: String,
}

struct ComorbidityPattern {
    name: &'static str,
    conditions: [&'static str; 2],
    threshold: f64,
    multiplier: f64,
    prevalence: f64,
}

const PATTERNS: [ComorbidityPattern; 4] = [
    ComorbidityPattern {
        name: "depression_anxiety",
        conditions: ["depression", "anxiety"],
        threshold: 30.0,
        multiplier: 1.5,
        prevalence: 0.6,
    },
    ComorbidityPattern {
        name: "anxiety_substance",
        conditions: ["anxiety", "substance_use"],
        threshold: 25.0,
        multiplier: 1.3,
        prevalence: 0.3,
    },
    ComorbidityPattern {
        name: "depression_sleep",
        conditions: ["depression", "sleep"],
        threshold: 35.0,
        multiplier: 1.4,
        prevalence: 0.8,
    },
    ComorbidityPattern {
        name: "trauma_depression",
        conditions: ["trauma", "depression"],
        threshold: 30.0,
        multiplier: 1.6,
        prevalence: 0.5,
    },
];

/// Condition-level scores (0-100) from instrument results: each built-in
/// instrument's percentage of maximum under the condition it screens.
pub fn condition_scores(results: &[ClassificationResult]) -> Vec<DomainScore> {
    results
        .iter()
        .filter_map(|r| {
            let condition = match r.instrument_id.as_str() {
                "phq9" => "depression",
                "gad7" => "anxiety",
                "pss10" => "trauma",
                "psqi" => "sleep",
                _ => return None,
            };
            Some(DomainScore {
                domain: condition.to_string(),
                score: round2(r.percent_of_max()),
            })
        })
        .collect()
}

/// Patterns where every involved condition scores above the pattern's
/// threshold. The risk score is the higher of the two scores times the
/// pattern multiplier.
pub fn comorbidity_risk(scores: &[DomainScore]) -> Vec<ComorbidityRisk> {
    let score_of = |name: &str| {
        scores
            .iter()
            .find(|d| d.domain == name)
            .map_or(0.0, |d| d.score)
    };

    PATTERNS
        .iter()
        .filter(|p| p.conditions.iter().all(|c| score_of(c) > p.threshold))
        .map(|p| {
            let highest = p.conditions.iter().map(|c| score_of(c)).fold(0.0, f64::max);
            ComorbidityRisk {
                pattern: p.name.to_string(),
                conditions: p.conditions.iter().map(|c| c.to_string()).collect(),
                risk_score: round2((highest * p.multiplier).min(100.0)),
                prevalence: p.prevalence,
                recommendation: format!("Comprehensive assessment for {} needed", p.conditions.join(" and ")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_rounded() {
        assert_eq!(round2(0.3 + 0.4), 0.7);
        assert_eq!(round2(1.0 / 3.0), 0.33);
    }
}
