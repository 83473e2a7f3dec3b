//! Response Normalizer: raw [`Answer`] → numeric value inside a question's range.
//!
//! Normalization never fails. Anomalies are substituted with a safe default
//! and reported as a [`ResponseWarning`] alongside the value.

use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::warn;

use mindscan_core::models::answer::Answer;
use mindscan_core::models::result::{ResponseWarning, WarningKind};

use crate::scoring::Question;

/// Case-insensitive Likert phrases accepted for any choice question.
static SYNONYMS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    HashMap::from([
        ("never", 0.0),
        ("almost never", 1.0),
        ("rarely", 1.0),
        ("sometimes", 2.0),
        ("fairly often", 3.0),
        ("often", 3.0),
        ("very often", 4.0),
        ("always", 4.0),
        ("not at all", 0.0),
        ("several days", 1.0),
        ("more than half", 2.0),
        ("more than half the days", 2.0),
        ("nearly every day", 3.0),
        ("no difficulty", 0.0),
        ("somewhat difficult", 1.0),
        ("very difficult", 2.0),
        ("extremely difficult", 3.0),
        ("very good", 0.0),
        ("fairly good", 1.0),
        ("fairly bad", 2.0),
        ("very bad", 3.0),
        ("none", 0.0),
        ("mild", 1.0),
        ("moderate", 2.0),
        ("severe", 3.0),
        ("extreme", 4.0),
        ("no", 0.0),
        ("yes", 1.0),
    ])
});

const NONE_OF_THE_ABOVE: &str = "none of the above";

/// A normalized value plus the warning raised while producing it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: f64,
    pub warning: Option<ResponseWarning>,
}

impl Normalized {
    fn clean(value: f64) -> Self {
        Self { value, warning: None }
    }
}

/// Look up a phrase in the shared synonym table.
pub fn synonym(phrase: &str) -> Option<f64> {
    SYNONYMS.get(phrase.trim().to_lowercase().as_str()).copied()
}

/// Normalize one answer against its question. `None` (unanswered) is 0.
///
/// Substitutions are logged at `warn` once per call.
pub fn normalize(question: &Question, answer: Option<&Answer>) -> Normalized {
    let normalized = resolve(question, answer);
    if let Some(w) = &normalized.warning {
        match w.kind {
            WarningKind::NonFiniteNumber => {
                warn!(question_id = %w.question_id, raw = %w.raw, "non-finite numeric answer, substituting scale minimum")
            }
            _ => warn!(question_id = %w.question_id, raw = %w.raw, "unrecognized response, substituting 0"),
        }
    }
    normalized
}

/// The normalized value alone, without logging. For callers re-reading an
/// answer that [`normalize`] has already reported on.
pub(crate) fn value_of(question: &Question, answer: Option<&Answer>) -> f64 {
    resolve(question, answer).value
}

fn resolve(question: &Question, answer: Option<&Answer>) -> Normalized {
    let range = question.range;
    match answer {
        None => Normalized::clean(0.0),
        Some(Answer::Numeric(v)) if v.is_finite() => Normalized::clean(range.clamp(*v)),
        Some(Answer::Numeric(v)) => Normalized {
            value: range.min,
            warning: Some(ResponseWarning {
                question_id: question.id.clone(),
                kind: WarningKind::NonFiniteNumber,
                raw: v.to_string(),
                substituted: range.min,
            }),
        },
        Some(Answer::Choice(raw)) => match resolve_choice(question, raw) {
            Some(v) => Normalized::clean(range.clamp(v)),
            None => {
                let substituted = range.clamp(0.0);
                Normalized {
                    value: substituted,
                    warning: Some(ResponseWarning {
                        question_id: question.id.clone(),
                        kind: WarningKind::UnrecognizedResponse,
                        raw: raw.clone(),
                        substituted,
                    }),
                }
            }
        },
        Some(Answer::MultiChoice(selected)) => {
            let count = selected
                .iter()
                .filter(|s| !s.trim().eq_ignore_ascii_case(NONE_OF_THE_ABOVE))
                .count();
            Normalized::clean(range.clamp(count as f64))
        }
    }
}

/// `max - value`. Applied to already normalized values.
pub fn reverse(question: &Question, value: f64) -> f64 {
    question.range.max - value
}

/// What one normalized answer adds to its domain and to the total.
pub fn contribution(question: &Question, value: f64) -> f64 {
    let oriented = if question.reverse_scored {
        reverse(question, value)
    } else {
        value
    };
    (oriented + question.offset) * question.weight
}

pub(crate) fn resolve_choice(question: &Question, raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Some(index) = question
        .options
        .iter()
        .position(|o| o.trim().eq_ignore_ascii_case(trimmed))
    {
        return Some(index as f64);
    }
    if let Some(v) = synonym(trimmed) {
        return Some(v);
    }
    digits(trimmed)
}

/// A non-empty string of ASCII digits as a number. Signs, decimals and
/// spelled-out values like "inf" are rejected.
pub(crate) fn digits(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse::<f64>().ok();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Question;

    #[test]
    fn option_labels_win_over_synonyms() {
        // "Never" would be 0 via the table, but here it is the second option.
        let q = Question::scale("q", "d", 0.0, 3.0).options(&["Always", "Never"]);
        assert_eq!(resolve_choice(&q, "never"), Some(1.0));
    }

    #[test]
    fn digit_strings_parse() {
        let q = Question::scale("q", "d", 0.0, 3.0);
        assert_eq!(resolve_choice(&q, " 2 "), Some(2.0));
        assert_eq!(resolve_choice(&q, "-2"), None);
        assert_eq!(resolve_choice(&q, "2.5"), None);
        assert_eq!(digits("inf"), None);
        assert_eq!(digits("NaN"), None);
    }
}
