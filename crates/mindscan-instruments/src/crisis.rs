//! Crisis level assessment.
//!
//! An additive risk score over crisis-relevant answers, banded into five
//! levels. Classification only; notifying anyone is the caller's job.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mindscan_core::models::answer::{Answer, ResponseSet};

use crate::normalize::{digits, synonym};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CrisisLevel {
    Minimal,
    Low,
    Moderate,
    High,
    Critical,
}

impl CrisisLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 10 => CrisisLevel::Critical,
            s if s >= 8 => CrisisLevel::High,
            s if s >= 5 => CrisisLevel::Moderate,
            s if s >= 2 => CrisisLevel::Low,
            _ => CrisisLevel::Minimal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CrisisLevel::Minimal => "minimal",
            CrisisLevel::Low => "low",
            CrisisLevel::Moderate => "moderate",
            CrisisLevel::High => "high",
            CrisisLevel::Critical => "critical",
        }
    }

    /// 1 (minimal) through 5 (critical).
    pub fn rank(&self) -> u8 {
        match self {
            CrisisLevel::Minimal => 1,
            CrisisLevel::Low => 2,
            CrisisLevel::Moderate => 3,
            CrisisLevel::High => 4,
            CrisisLevel::Critical => 5,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CrisisLevel::Minimal => "Minimal risk: some distressing thoughts but no immediate danger",
            CrisisLevel::Low => "Low risk: mild suicidal ideation without plan or intent",
            CrisisLevel::Moderate => "Moderate risk: suicidal ideation with some planning or preparation",
            CrisisLevel::High => "High risk: suicidal ideation with specific plan and means",
            CrisisLevel::Critical => "Critical risk: imminent suicide attempt or severe self-harm",
        }
    }

    pub fn response_time(&self) -> &'static str {
        match self {
            CrisisLevel::Minimal => "within_24_hours",
            CrisisLevel::Low => "within_4_hours",
            CrisisLevel::Moderate => "within_1_hour",
            CrisisLevel::High | CrisisLevel::Critical => "immediate",
        }
    }

    pub fn monitoring(&self) -> &'static str {
        match self {
            CrisisLevel::Minimal => "weekly_check_in",
            CrisisLevel::Low => "daily_check_in",
            CrisisLevel::Moderate => "every_4_hours",
            CrisisLevel::High => "continuous",
            CrisisLevel::Critical => "continuous_supervision",
        }
    }

    pub fn interventions(&self) -> &'static [&'static str] {
        match self {
            CrisisLevel::Minimal => &[
                "Self-care resource provision",
                "Mental health education",
                "Scheduled follow-up",
                "Support group referral",
            ],
            CrisisLevel::Low => &[
                "Safety planning",
                "Crisis helpline information",
                "Family/friend notification (with consent)",
                "Professional counseling referral",
            ],
            CrisisLevel::Moderate => &[
                "Immediate safety assessment",
                "Crisis counselor contact",
                "Emergency contact notification",
                "Mental health professional referral",
            ],
            CrisisLevel::High => &[
                "Emergency services activation",
                "Immediate professional intervention",
                "Family/emergency contact notification",
                "Hospital/crisis center referral",
            ],
            CrisisLevel::Critical => &[
                "Emergency services (112)",
                "Immediate hospitalization",
                "Crisis team dispatch",
                "Family notification",
            ],
        }
    }
}

impl fmt::Display for CrisisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CrisisAssessment {
    pub level: CrisisLevel,
    pub level_rank: u8,
    pub score: u32,
    pub description: String,
    pub response_time: String,
    pub monitoring: String,
    pub risk_factors: Vec<String>,
    pub protective_factors: Vec<String>,
    pub recommended_interventions: Vec<String>,
    pub immediate_action_required: bool,
    pub professional_contact_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    pub number: String,
    pub availability: String,
    pub languages: String,
    pub description: String,
}

static CONTACTS: LazyLock<Vec<EmergencyContact>> = LazyLock::new(|| {
    let contact = |id: &str, name: &str, number: &str, availability: &str, languages: &str, description: &str| {
        EmergencyContact {
            id: id.to_string(),
            name: name.to_string(),
            number: number.to_string(),
            availability: availability.to_string(),
            languages: languages.to_string(),
            description: description.to_string(),
        }
    };
    vec![
        contact(
            "tele_manas",
            "Tele MANAS - National Mental Health Helpline",
            "1800-891-4416",
            "24/7",
            "Hindi, English, Regional languages",
            "Government of India mental health support helpline",
        ),
        contact(
            "national_suicide_prevention",
            "National Suicide Prevention Helpline",
            "9152987821",
            "24/7",
            "Hindi, English",
            "Suicide prevention and crisis support",
        ),
        contact(
            "emergency_services",
            "Emergency Services",
            "112",
            "24/7",
            "All Indian languages",
            "National emergency services (Police, Fire, Medical)",
        ),
        contact(
            "nimhans_helpline",
            "NIMHANS Helpline",
            "080-26995000",
            "Monday-Saturday, 9 AM - 5 PM",
            "English, Hindi, Kannada",
            "National Institute of Mental Health expert consultation",
        ),
        contact(
            "samaritans_mumbai",
            "Samaritans Mumbai",
            "9820466726",
            "24/7",
            "English, Hindi, Marathi",
            "Crisis emotional support",
        ),
        contact(
            "sneha_chennai",
            "SNEHA Suicide Prevention",
            "044-24640050",
            "24/7",
            "English, Tamil",
            "Suicide prevention and emotional support",
        ),
    ]
});

pub fn emergency_contacts() -> &'static [EmergencyContact] {
    &CONTACTS
}

/// Numeric reading of an answer: numbers as-is, choices via the synonym
/// table or digit strings.
pub(crate) fn numeric_value(responses: &ResponseSet, question_id: &str) -> Option<f64> {
    match responses.get(question_id)? {
        Answer::Numeric(v) if v.is_finite() => Some(*v),
        Answer::Numeric(_) => None,
        Answer::Choice(raw) => synonym(raw).or_else(|| digits(raw)),
        Answer::MultiChoice(_) => None,
    }
}

pub(crate) fn choice_is(responses: &ResponseSet, question_id: &str, expected: &str) -> bool {
    responses
        .get(question_id)
        .and_then(Answer::as_choice)
        .is_some_and(|c| c.trim().eq_ignore_ascii_case(expected))
}

pub fn assess_crisis(responses: &ResponseSet) -> CrisisAssessment {
    let mut score = 0u32;
    let mut risk_factors = Vec::new();
    let mut protective_factors = Vec::new();
    let mut add = |points: u32, factor: &str| {
        score += points;
        risk_factors.push(factor.to_string());
    };

    match numeric_value(responses, "dep_005").unwrap_or(0.0) {
        v if v >= 3.0 => add(4, "Frequent thoughts of death or self-harm"),
        v if v >= 2.0 => add(3, "Occasional thoughts of death or self-harm"),
        v if v >= 1.0 => add(1, "Rare thoughts of death or self-harm"),
        _ => {}
    }

    for (choice, points, factor) in [
        ("Right now", 5, "Immediate suicidal ideation"),
        ("Often", 4, "Frequent suicidal thoughts"),
        ("Sometimes", 2, "Occasional suicidal thoughts"),
    ] {
        if choice_is(responses, "crisis_suicide_001", choice) {
            add(points, factor);
            break;
        }
    }

    for (choice, points, factor) in [
        ("Detailed plan", 5, "Detailed suicide plan"),
        ("Specific plan", 4, "Specific suicide plan"),
        ("Vague thoughts", 2, "Vague suicide planning"),
    ] {
        if choice_is(responses, "crisis_suicide_002", choice) {
            add(points, factor);
            break;
        }
    }

    if ["severity_function_001", "severity_social_001", "anx_005"]
        .iter()
        .any(|id| numeric_value(responses, id).is_some_and(|v| v >= 4.0))
    {
        add(2, "Severe functional impairment");
    }

    if choice_is(responses, "sub_004", "Yes") {
        add(1, "Substance use reported");
    }

    if ["Yes, once", "Yes, multiple times"]
        .iter()
        .any(|c| choice_is(responses, "trauma_001", c))
    {
        add(1, "Trauma history");
    }

    if numeric_value(responses, "gen_006").is_some_and(|v| v >= 3.0) {
        protective_factors.push("Strong coping confidence".to_string());
    }
    if choice_is(responses, "sub_001", "No") {
        protective_factors.push("No alcohol use".to_string());
    }
    if numeric_value(responses, "sleep_001").is_some_and(|v| v <= 1.0) {
        protective_factors.push("Good sleep quality".to_string());
    }

    let level = CrisisLevel::from_score(score);
    CrisisAssessment {
        level,
        level_rank: level.rank(),
        score,
        description: level.description().to_string(),
        response_time: level.response_time().to_string(),
        monitoring: level.monitoring().to_string(),
        risk_factors,
        protective_factors,
        recommended_interventions: level.interventions().iter().map(|s| s.to_string()).collect(),
        immediate_action_required: score >= 8,
        professional_contact_required: score >= 2,
    }
}
