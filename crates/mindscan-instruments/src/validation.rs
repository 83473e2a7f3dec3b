//! Advisory response validation. Scoring never consults this.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mindscan_core::models::answer::{Answer, ResponseSet};

use crate::normalize::resolve_choice;
use crate::scoring::{InstrumentDefinition, Question, ScaleKind};

/// Minimum number of numeric answers before identical answers are suspicious.
const STRAIGHT_LINE_MIN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IssueKind {
    KindMismatch,
    OutOfRange,
    UnknownOption,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationIssue {
    pub question_id: String,
    pub kind: IssueKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationReport {
    pub valid: bool,
    pub missing: Vec<String>,
    pub issues: Vec<ValidationIssue>,
    /// Consistency observations; never affect `valid`.
    pub warnings: Vec<String>,
}

pub fn validate_responses(definition: &InstrumentDefinition, responses: &ResponseSet) -> ValidationReport {
    let mut missing = Vec::new();
    let mut issues = Vec::new();

    for question in &definition.questions {
        match responses.get(&question.id) {
            None => missing.push(question.id.clone()),
            Some(answer) => issues.extend(check_answer(question, answer)),
        }
    }

    ValidationReport {
        valid: missing.is_empty() && issues.is_empty(),
        missing,
        issues,
        warnings: consistency_warnings(responses),
    }
}

fn issue(question: &Question, kind: IssueKind, message: String) -> ValidationIssue {
    ValidationIssue {
        question_id: question.id.clone(),
        kind,
        message,
    }
}

fn check_answer(question: &Question, answer: &Answer) -> Vec<ValidationIssue> {
    let range = question.range;
    match (question.kind, answer) {
        (_, Answer::Numeric(v)) if !v.is_finite() || !range.contains(*v) => vec![issue(
            question,
            IssueKind::OutOfRange,
            format!("{}: {} is outside [{}, {}]", question.id, v, range.min, range.max),
        )],
        (ScaleKind::MultiChoice, Answer::Numeric(_)) => vec![issue(
            question,
            IssueKind::KindMismatch,
            format!("{}: expected a list of selections", question.id),
        )],
        (ScaleKind::Numeric | ScaleKind::SingleChoice, Answer::MultiChoice(_)) => vec![issue(
            question,
            IssueKind::KindMismatch,
            format!("{}: expected a single answer, got a list", question.id),
        )],
        (_, Answer::Choice(raw)) => match resolve_choice(question, raw) {
            None => vec![issue(
                question,
                IssueKind::UnknownOption,
                format!("{}: '{}' is not a recognized answer", question.id, raw),
            )],
            Some(v) if !range.contains(v) => vec![issue(
                question,
                IssueKind::OutOfRange,
                format!("{}: '{}' maps to {} outside [{}, {}]", question.id, raw, v, range.min, range.max),
            )],
            Some(_) => Vec::new(),
        },
        (ScaleKind::MultiChoice, Answer::MultiChoice(selected)) => selected
            .iter()
            .filter(|s| {
                !s.trim().eq_ignore_ascii_case("none of the above")
                    && !question.options.iter().any(|o| o.trim().eq_ignore_ascii_case(s.trim()))
            })
            .map(|s| {
                issue(
                    question,
                    IssueKind::UnknownOption,
                    format!("{}: '{}' is not one of the listed options", question.id, s),
                )
            })
            .collect(),
        (ScaleKind::Numeric | ScaleKind::SingleChoice, Answer::Numeric(_)) => Vec::new(),
    }
}

/// Answer patterns that suggest inattentive responding.
pub fn consistency_warnings(responses: &ResponseSet) -> Vec<String> {
    let mut warnings = Vec::new();

    let numeric: Vec<f64> = responses.iter().filter_map(|(_, a)| a.as_numeric()).collect();
    if numeric.len() >= STRAIGHT_LINE_MIN && numeric.iter().all(|v| *v == numeric[0]) {
        warnings.push("All scale responses are identical; please review your answers".to_string());
    }

    let general_zero = responses
        .get("gen_001")
        .and_then(Answer::as_numeric)
        .is_some_and(|v| v == 0.0);
    let depressed = responses
        .get("dep_001")
        .and_then(Answer::as_numeric)
        .is_some_and(|v| v >= 2.0);
    if general_zero && depressed {
        warnings.push("Some responses appear contradictory; please review".to_string());
    }

    warnings
}
