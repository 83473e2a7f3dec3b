//! Built-in screening instruments.
//!
//! Each definition is plain data, built once on first use.

pub mod gad7;
pub mod k10;
pub mod phq9;
pub mod psqi;
pub mod pss10;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mindscan_core::models::result::RiskLevel;

use crate::error::InstrumentError;
use crate::scoring::{FlagRule, InstrumentDefinition};

/// Closed set of instruments that ship with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BuiltinInstrument {
    Phq9,
    Gad7,
    Pss10,
    Psqi,
    K10,
}

impl BuiltinInstrument {
    pub const ALL: [BuiltinInstrument; 5] = [
        BuiltinInstrument::Phq9,
        BuiltinInstrument::Gad7,
        BuiltinInstrument::Pss10,
        BuiltinInstrument::Psqi,
        BuiltinInstrument::K10,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BuiltinInstrument::Phq9 => "phq9",
            BuiltinInstrument::Gad7 => "gad7",
            BuiltinInstrument::Pss10 => "pss10",
            BuiltinInstrument::Psqi => "psqi",
            BuiltinInstrument::K10 => "k10",
        }
    }

    pub fn definition(&self) -> &'static InstrumentDefinition {
        match self {
            BuiltinInstrument::Phq9 => &phq9::DEFINITION,
            BuiltinInstrument::Gad7 => &gad7::DEFINITION,
            BuiltinInstrument::Pss10 => &pss10::DEFINITION,
            BuiltinInstrument::Psqi => &psqi::DEFINITION,
            BuiltinInstrument::K10 => &k10::DEFINITION,
        }
    }
}

impl fmt::Display for BuiltinInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BuiltinInstrument {
    type Err = InstrumentError;

    /// Accepts the id or any alias, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        BuiltinInstrument::ALL
            .into_iter()
            .find(|b| b.definition().keys().any(|k| k.eq_ignore_ascii_case(key)))
            .ok_or_else(|| InstrumentError::NotFound(s.to_string()))
    }
}

/// Uncapped domain-sum total above which impairment is flagged.
pub const FUNCTIONAL_IMPAIRMENT_THRESHOLD: f64 = 25.0;

/// Red-flag rules evaluated for every instrument.
///
/// These key off question ids from the wider questionnaire bank, so they
/// fire whenever such answers are submitted alongside an instrument.
pub fn shared_red_flags() -> Vec<FlagRule> {
    vec![
        FlagRule::at_least(
            "suicidal_ideation",
            &["suicidal_ideation", "death_wishes", "self_harm"],
            1.0,
            RiskLevel::High,
            "Suicidal ideation or self-harm thoughts reported; immediate safety assessment required",
        )
        .crisis(),
        FlagRule::at_least(
            "critical_risk",
            &["suicidal_ideation", "self_harm", "substance_abuse", "psychosis"],
            2.0,
            RiskLevel::Critical,
            "Critical risk factor endorsed at a high level",
        )
        .crisis(),
        FlagRule::at_least(
            "high_risk_symptoms",
            &["severe_depression", "panic_attacks", "trauma_symptoms"],
            3.0,
            RiskLevel::High,
            "Severe depressive, panic or trauma symptoms reported",
        ),
        FlagRule::at_least(
            "substance_use",
            &["alcohol_use", "drug_use", "substance_problems"],
            2.0,
            RiskLevel::Moderate,
            "Concerning substance use patterns identified requiring specialized assessment",
        ),
        FlagRule::at_least(
            "psychotic_symptoms",
            &["hallucinations", "delusions", "paranoia", "reality_distortion"],
            1.0,
            RiskLevel::High,
            "Possible psychotic symptoms requiring urgent psychiatric evaluation",
        ),
        FlagRule::at_least(
            "trauma_symptoms",
            &["trauma_exposure", "ptsd_symptoms", "dissociation"],
            2.0,
            RiskLevel::Moderate,
            "Trauma-related symptoms requiring specialized trauma-informed care",
        ),
        FlagRule::domain_sum_above(
            "functional_impairment",
            FUNCTIONAL_IMPAIRMENT_THRESHOLD,
            RiskLevel::Moderate,
            "Severe functional impairment across multiple life domains",
        ),
    ]
}

/// Option labels shared by the two-week frequency scales (PHQ-9, GAD-7).
pub(crate) const FREQUENCY_OPTIONS: [&str; 4] = [
    "Not at all",
    "Several days",
    "More than half the days",
    "Nearly every day",
];
