//! Domain Aggregator.

use mindscan_core::models::answer::ResponseSet;
use mindscan_core::models::result::{DomainScore, ResponseWarning};

use crate::normalize::{contribution, normalize};
use crate::scoring::InstrumentDefinition;

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Capped at `max_score`, truncated toward zero.
    pub total: u32,
    /// Sum before capping and truncation.
    pub raw_total: f64,
    /// Uncapped per-domain sums in first-appearance order.
    pub domain_scores: Vec<DomainScore>,
    pub warnings: Vec<ResponseWarning>,
}

pub fn aggregate(definition: &InstrumentDefinition, responses: &ResponseSet) -> Aggregate {
    let mut raw_total = 0.0;
    let mut domain_scores: Vec<DomainScore> = Vec::new();
    let mut warnings = Vec::new();

    for question in &definition.questions {
        let normalized = normalize(question, responses.get(&question.id));
        if let Some(warning) = normalized.warning {
            warnings.push(warning);
        }

        let value = contribution(question, normalized.value);
        raw_total += value;

        match domain_scores.iter_mut().find(|d| d.domain == question.domain) {
            Some(bucket) => bucket.score += value,
            None => domain_scores.push(DomainScore {
                domain: question.domain.clone(),
                score: value,
            }),
        }
    }

    Aggregate {
        total: cap_total(raw_total, definition.max_score),
        raw_total,
        domain_scores,
        warnings,
    }
}

fn cap_total(raw: f64, max_score: u32) -> u32 {
    // Truncate, don't round. NaN maps to 0 via `as`.
    raw.clamp(0.0, f64::from(max_score)).trunc() as u32
}

#[cfg(test)]
mod tests {
    use super::cap_total;

    #[test]
    fn totals_truncate_and_cap() {
        assert_eq!(cap_total(12.9, 27), 12);
        assert_eq!(cap_total(31.0, 27), 27);
        assert_eq!(cap_total(-3.0, 27), 0);
    }
}
