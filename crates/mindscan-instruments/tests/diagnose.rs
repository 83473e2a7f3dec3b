use mindscan_core::models::answer::{Answer, ResponseSet};
use mindscan_core::models::result::DomainScore;
use mindscan_instruments::diagnose::{Condition, condition_scores};
use mindscan_instruments::{BuiltinInstrument, classify, comorbidity_risk, diagnose};

fn uniform(prefix: &str, count: usize, value: f64) -> ResponseSet {
    (1..=count)
        .map(|i| (format!("{prefix}_{i:03}"), Answer::Numeric(value)))
        .collect()
}

fn scores(pairs: &[(&str, f64)]) -> Vec<DomainScore> {
    pairs
        .iter()
        .map(|(domain, score)| DomainScore {
            domain: domain.to_string(),
            score: *score,
        })
        .collect()
}

#[test]
fn full_depressive_pattern_is_capped_at_point_nine() {
    let found = diagnose(&uniform("dep", 9, 2.0));

    assert_eq!(found.len(), 1);
    let mdd = &found[0];
    assert_eq!(mdd.condition, Condition::MajorDepression);
    assert_eq!(mdd.core_symptoms_met, 2);
    assert_eq!(mdd.additional_symptoms_met, 7);
    assert_eq!(mdd.total_criteria_met, 9);
    assert_eq!(mdd.confidence, 0.9);
    assert_eq!(mdd.rationale[0], "Core depressive symptoms present (2/2)");
}

#[test]
fn three_symptoms_with_one_core_is_subsyndromal() {
    let responses = ResponseSet::new()
        .with("dep_002", "More than half the days")
        .with("dep_003", 2)
        .with("dep_004", 3)
        .with("dep_006", 1);
    let found = diagnose(&responses);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].confidence, 0.4);
    assert_eq!(found[0].rationale, vec!["Subsyndromal depression pattern identified"]);
}

#[test]
fn symptoms_without_a_core_item_do_not_count() {
    let responses = ResponseSet::new()
        .with("dep_003", 3)
        .with("dep_004", 3)
        .with("dep_006", 3)
        .with("dep_007", 3)
        .with("dep_008", 3);
    assert!(diagnose(&responses).is_empty());
    assert!(diagnose(&uniform("dep", 9, 1.0)).is_empty());
}

#[test]
fn anxiety_needs_worry_and_three_additional_symptoms() {
    let responses = ResponseSet::new()
        .with("gad_002", 3)
        .with("gad_004", 2)
        .with("gad_005", 2)
        .with("gad_006", "often");
    let found = diagnose(&responses);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].condition, Condition::GeneralizedAnxiety);
    assert_eq!(found[0].confidence, 0.7);

    let two_additional = responses.clone().with("gad_006", 0);
    assert!(diagnose(&two_additional).is_empty());
}

#[test]
fn panic_pattern_counts_attack_symptoms() {
    let responses = ResponseSet::new()
        .with("panic_attacks", "often")
        .with("palpitations", 2)
        .with("sweating", 2)
        .with("trembling", "sometimes")
        .with("dizziness", 3)
        .with("nausea", 1);
    let found = diagnose(&responses);

    assert_eq!(found.len(), 1);
    let panic = &found[0];
    assert_eq!(panic.condition, Condition::PanicDisorder);
    assert_eq!(panic.additional_symptoms_met, 4);
    assert_eq!(panic.confidence, 0.6);
    assert_eq!(panic.rationale, vec!["Panic attack criteria met (4/13 symptoms)"]);
}

#[test]
fn diagnoses_are_ordered_by_confidence() {
    let responses = uniform("dep", 9, 2.0)
        .with("anx_001", 3)
        .with("palpitations", 3)
        .with("sweating", 3)
        .with("chills", 3)
        .with("choking", 3);
    let conditions: Vec<Condition> = diagnose(&responses).into_iter().map(|d| d.condition).collect();

    assert_eq!(conditions, vec![Condition::MajorDepression, Condition::PanicDisorder]);
}

#[test]
fn comorbidity_requires_both_conditions_above_threshold() {
    let risks = comorbidity_risk(&scores(&[("depression", 40.0), ("anxiety", 35.0), ("sleep", 20.0)]));

    assert_eq!(risks.len(), 1);
    let risk = &risks[0];
    assert_eq!(risk.pattern, "depression_anxiety");
    assert_eq!(risk.conditions, vec!["depression", "anxiety"]);
    assert_eq!(risk.risk_score, 60.0);
    assert_eq!(risk.prevalence, 0.6);
    assert_eq!(risk.recommendation, "Comprehensive assessment for depression and anxiety needed");

    assert!(comorbidity_risk(&scores(&[("depression", 30.0), ("anxiety", 90.0)])).is_empty());
}

#[test]
fn comorbidity_risk_is_capped_at_100() {
    let risks = comorbidity_risk(&scores(&[("trauma", 70.0), ("depression", 80.0)]));

    assert_eq!(risks.len(), 1);
    assert_eq!(risks[0].pattern, "trauma_depression");
    assert_eq!(risks[0].risk_score, 100.0);
}

#[test]
fn condition_scores_come_from_instrument_results() {
    let phq9 = classify(BuiltinInstrument::Phq9.definition(), &uniform("dep", 9, 1.0));
    let gad7 = classify(BuiltinInstrument::Gad7.definition(), &uniform("gad", 7, 2.0));
    let k10 = classify(BuiltinInstrument::K10.definition(), &ResponseSet::new());

    let conditions = condition_scores(&[phq9, gad7, k10]);
    assert_eq!(conditions, scores(&[("depression", 33.33), ("anxiety", 66.67)]));

    let risks = comorbidity_risk(&conditions);
    assert_eq!(risks.len(), 1);
    assert_eq!(risks[0].risk_score, 100.0);
}
