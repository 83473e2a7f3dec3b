//! Severity Classifier and the end-to-end `classify` call.

use std::borrow::Cow;

use tracing::{debug, warn};

use mindscan_core::models::answer::ResponseSet;
use mindscan_core::models::result::{ClassificationResult, ResponseWarning, SeverityBand, WarningKind};

use crate::aggregate::aggregate;
use crate::flags::{evaluate, rules_for};
use crate::instruments::psqi;
use crate::scoring::{Derivation, InstrumentDefinition};

/// Band for `total`: the first cutoff containing it, else the
/// percentage-of-max heuristic. Total function, never fails.
pub fn severity_for(definition: &InstrumentDefinition, total: u32) -> (SeverityBand, String) {
    if let Some(band) = definition.cutoffs.iter().find(|b| b.contains(total)) {
        return (band.severity, band.label.clone());
    }

    warn!(
        instrument_id = %definition.id,
        total,
        "total outside cutoff table, using percentage fallback"
    );
    let band = percentage_band(total, definition.max_score);
    (band, band.as_str().to_string())
}

pub fn percentage_band(total: u32, max_score: u32) -> SeverityBand {
    let percent = if max_score == 0 {
        0.0
    } else {
        f64::from(total) / f64::from(max_score) * 100.0
    };
    match percent {
        p if p >= 80.0 => SeverityBand::Severe,
        p if p >= 60.0 => SeverityBand::Moderate,
        p if p >= 30.0 => SeverityBand::Mild,
        _ => SeverityBand::Minimal,
    }
}

/// Score one response set against one instrument.
///
/// Pure: the same inputs always yield an identical result.
pub fn classify(definition: &InstrumentDefinition, responses: &ResponseSet) -> ClassificationResult {
    let (responses, mut warnings) = derive(definition, responses);
    let aggregate = aggregate(definition, &responses);
    let (severity, severity_label) = severity_for(definition, aggregate.total);
    let outcome = evaluate(definition, &responses, &aggregate.domain_scores);

    warnings.extend(aggregate.warnings);
    warnings.extend(unknown_keys(definition, &responses));

    debug!(
        instrument_id = %definition.id,
        total = aggregate.total,
        raw_total = aggregate.raw_total,
        severity = %severity,
        risk_level = %outcome.risk_level,
        flags = outcome.flags.len(),
        "classified response set"
    );

    ClassificationResult {
        instrument_id: definition.id.clone(),
        instrument_name: definition.name.clone(),
        total_score: aggregate.total,
        max_possible_score: definition.max_score,
        severity,
        severity_label,
        risk_level: outcome.risk_level,
        immediate_action_required: outcome.immediate_action_required,
        flags: outcome.flags,
        domain_scores: aggregate.domain_scores,
        warnings,
    }
}

fn derive<'a>(
    definition: &InstrumentDefinition,
    responses: &'a ResponseSet,
) -> (Cow<'a, ResponseSet>, Vec<ResponseWarning>) {
    let derived = match definition.derivation {
        Some(Derivation::SleepDiary) => psqi::derive_components(responses),
        None => None,
    };
    match derived {
        Some((set, warnings)) => (Cow::Owned(set), warnings),
        None => (Cow::Borrowed(responses), Vec::new()),
    }
}

/// Keys that are neither scored nor read by any flag rule.
fn unknown_keys(definition: &InstrumentDefinition, responses: &ResponseSet) -> Vec<ResponseWarning> {
    let rules = rules_for(definition);
    let warnings: Vec<ResponseWarning> = responses
        .iter()
        .filter(|(id, _)| {
            definition.question(id).is_none() && !rules.iter().any(|r| r.question_ids.iter().any(|q| q == id))
        })
        .map(|(id, answer)| ResponseWarning {
            question_id: id.to_string(),
            kind: WarningKind::UnknownQuestion,
            raw: answer.to_string(),
            substituted: 0.0,
        })
        .collect();

    if !warnings.is_empty() {
        warn!(
            instrument_id = %definition.id,
            count = warnings.len(),
            "response keys not used by this instrument"
        );
    }
    warnings
}
