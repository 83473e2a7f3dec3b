use mindscan_core::models::answer::{Answer, ResponseSet};
use mindscan_core::models::result::{RiskLevel, SeverityBand};
use mindscan_instruments::validation::IssueKind;
use mindscan_instruments::{
    BuiltinInstrument, CrisisLevel, assess_crisis, classify, emergency_contacts, follow_up_questions, interpret,
    validate_responses,
};

fn ids(questions: &[mindscan_instruments::scoring::Question]) -> Vec<&str> {
    questions.iter().map(|q| q.id.as_str()).collect()
}

#[test]
fn crisis_minimal_without_risk_factors() {
    let assessment = assess_crisis(&ResponseSet::new().with("dep_005", 0));
    assert_eq!(assessment.level, CrisisLevel::Minimal);
    assert_eq!(assessment.level_rank, 1);
    assert_eq!(assessment.score, 0);
    assert!(!assessment.professional_contact_required);
    assert!(!assessment.immediate_action_required);
}

#[test]
fn crisis_score_accumulates_across_answers() {
    let responses = ResponseSet::new()
        .with("dep_005", 2)
        .with("crisis_suicide_001", "Sometimes")
        .with("sub_004", "yes");
    let assessment = assess_crisis(&responses);

    assert_eq!(assessment.score, 3 + 2 + 1);
    assert_eq!(assessment.level, CrisisLevel::Moderate);
    assert_eq!(assessment.response_time, "within_1_hour");
    assert!(assessment.professional_contact_required);
    assert!(!assessment.immediate_action_required);
    assert_eq!(assessment.risk_factors.len(), 3);
}

#[test]
fn crisis_plan_with_immediate_ideation_is_critical() {
    let responses = ResponseSet::new()
        .with("dep_005", 3)
        .with("crisis_suicide_001", "Right now")
        .with("crisis_suicide_002", "Detailed plan");
    let assessment = assess_crisis(&responses);

    assert_eq!(assessment.score, 14);
    assert_eq!(assessment.level, CrisisLevel::Critical);
    assert_eq!(assessment.level_rank, 5);
    assert!(assessment.immediate_action_required);
    assert_eq!(assessment.monitoring, "continuous_supervision");
    assert!(assessment.recommended_interventions.iter().any(|i| i.contains("112")));
}

#[test]
fn crisis_reads_only_plain_digit_strings() {
    for raw in ["inf", "NaN", "-3", "2.5"] {
        let assessment = assess_crisis(&ResponseSet::new().with("dep_005", raw));
        assert_eq!(assessment.score, 0, "dep_005 = {raw:?}");
        assert_eq!(assessment.level, CrisisLevel::Minimal);
    }
    assert_eq!(assess_crisis(&ResponseSet::new().with("dep_005", " 3 ")).score, 4);
}

#[test]
fn crisis_high_threshold_is_eight() {
    let responses = ResponseSet::new()
        .with("dep_005", 2)
        .with("crisis_suicide_002", "Specific plan")
        .with("trauma_001", "Yes, multiple times");
    let assessment = assess_crisis(&responses);
    assert_eq!(assessment.score, 8);
    assert_eq!(assessment.level, CrisisLevel::High);
    assert!(assessment.immediate_action_required);
}

#[test]
fn crisis_records_protective_factors() {
    let responses = ResponseSet::new()
        .with("gen_006", 3)
        .with("sub_001", "No")
        .with("sleep_001", 1)
        .with("severity_social_001", 4);
    let assessment = assess_crisis(&responses);

    assert_eq!(assessment.protective_factors.len(), 3);
    assert_eq!(assessment.score, 2);
    assert_eq!(assessment.level, CrisisLevel::Low);
}

#[test]
fn crisis_levels_are_monotone_in_score() {
    let mut previous = CrisisLevel::Minimal;
    for score in 0..20 {
        let level = CrisisLevel::from_score(score);
        assert!(level >= previous);
        previous = level;
    }
}

#[test]
fn emergency_contacts_include_national_helplines() {
    let contacts = emergency_contacts();
    assert!(contacts.iter().any(|c| c.number == "1800-891-4416"));
    assert!(contacts.iter().any(|c| c.number == "112"));
}

#[test]
fn follow_ups_for_suicidality_and_symptoms() {
    let responses = ResponseSet::new().with("dep_005", 1).with("anx_001", 2);
    let questions = follow_up_questions(&responses);

    assert_eq!(
        ids(&questions),
        vec![
            "crisis_suicide_001",
            "crisis_suicide_002",
            "crisis_harm_001",
            "panic_freq_001",
            "panic_trigger_001",
        ]
    );
    assert!(questions[0].crisis_indicator);
    assert_eq!(questions[0].options.len(), 4);
}

#[test]
fn follow_ups_for_substance_and_ocd() {
    let responses = ResponseSet::new().with("sub_001", "Yes").with("anx_003", 2).with("gen_001", 0);
    assert_eq!(
        ids(&follow_up_questions(&responses)),
        vec![
            "crisis_harm_001",
            "ocd_compulsion_001",
            "alcohol_problems_001",
            "alcohol_problems_002"
        ]
    );
}

#[test]
fn follow_ups_for_high_preliminary_severity() {
    let responses = ResponseSet::new().with("gen_001", 3).with("gen_002", 3);
    assert_eq!(
        ids(&follow_up_questions(&responses)),
        vec!["severity_function_001", "severity_social_001"]
    );
    assert!(follow_up_questions(&ResponseSet::new()).is_empty());
}

#[test]
fn validation_reports_missing_and_invalid_answers() {
    let definition = BuiltinInstrument::Phq9.definition();
    let responses = ResponseSet::new()
        .with("dep_001", 5)
        .with("dep_002", "sort of")
        .with("dep_003", Answer::MultiChoice(vec!["x".to_string()]))
        .with("dep_004", "Several days");
    let report = validate_responses(definition, &responses);

    assert!(!report.valid);
    assert_eq!(report.missing.len(), 5);
    let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, vec![IssueKind::OutOfRange, IssueKind::UnknownOption, IssueKind::KindMismatch]);
}

#[test]
fn validation_is_clean_for_complete_answers() {
    let definition = BuiltinInstrument::Gad7.definition();
    let responses: ResponseSet = (1..=7).map(|i| (format!("gad_{i:03}"), Answer::Numeric((i % 4) as f64))).collect();
    let report = validate_responses(definition, &responses);

    assert!(report.valid);
    assert!(report.issues.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn validation_warns_about_straight_lining_and_contradictions() {
    let definition = BuiltinInstrument::Phq9.definition();
    let mut responses: ResponseSet = (1..=9).map(|i| (format!("dep_{i:03}"), Answer::Numeric(2.0))).collect();
    assert_eq!(validate_responses(definition, &responses).warnings.len(), 1);

    responses.insert("gen_001", 0);
    let report = validate_responses(definition, &responses);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("contradictory"));
    assert!(report.valid);
}

#[test]
fn interpretation_uses_uncapped_domain_sums() {
    let responses: ResponseSet = (1..=9).map(|i| (format!("dep_{i:03}"), Answer::Numeric(3.0))).collect();
    let result = classify(BuiltinInstrument::Phq9.definition(), &responses);
    let interpretation = interpret(&result);

    assert_eq!(result.severity, SeverityBand::Severe);
    assert!(interpretation.recommendations[0].starts_with("URGENT"));
    assert!(interpretation.recommendations.iter().any(|r| r.contains("mood symptoms")));
    assert!(interpretation.recommendations.iter().any(|r| r.contains("cognitive")));
    assert!(interpretation.next_steps[0].starts_with("IMMEDIATE"));
    assert_eq!(interpretation.next_steps.len(), 8);

    let highest = interpretation.highest_domain.unwrap();
    assert_eq!(highest.domain, "neurovegetative");
    assert_eq!(highest.score, 9.0);
    assert!(interpretation.narrative.contains("'neurovegetative'"));
}

#[test]
fn interpretation_for_low_risk_result() {
    let result = classify(BuiltinInstrument::Gad7.definition(), &ResponseSet::new().with("gad_001", 1));
    let interpretation = interpret(&result);

    assert_eq!(result.risk_level, RiskLevel::None);
    assert!(interpretation.narrative.starts_with("The GAD-7 indicates minimal symptoms"));
    assert_eq!(interpretation.recommendations.len(), 4);
    assert!(interpretation.next_steps[0].starts_with("Continue monitoring"));
}

#[test]
fn k10_all_threes_flags_functional_impairment() {
    let responses: ResponseSet = (1..=10).map(|i| (format!("k10_{i:03}"), Answer::Numeric(3.0))).collect();
    let result = classify(BuiltinInstrument::K10.definition(), &responses);

    assert_eq!(result.total_score, 40);
    assert_eq!(result.severity_label, "likely_severe");
    let flag = result.flags.iter().find(|f| f.id == "functional_impairment").unwrap();
    assert_eq!(flag.message, "Severe functional impairment across multiple life domains");
    assert_eq!(flag.question_id, "");
    assert_eq!(result.risk_level, RiskLevel::Moderate);
    assert!(!result.immediate_action_required);
    assert!(interpret(&result).next_steps[0].starts_with("IMMEDIATE"));
}

#[test]
fn functional_impairment_needs_domain_sum_above_25() {
    let k10 = BuiltinInstrument::K10.definition();
    // Empty items contribute 1 each, so five items at 3 sum to exactly 25.
    let at_25: ResponseSet = (1..=5).map(|i| (format!("k10_{i:03}"), Answer::Numeric(3.0))).collect();
    assert!(classify(k10, &at_25).flags.is_empty());

    let at_26 = at_25.with("k10_006", 1);
    let ids: Vec<String> = classify(k10, &at_26).flags.into_iter().map(|f| f.id).collect();
    assert_eq!(ids, vec!["functional_impairment"]);
}

#[test]
fn any_flag_escalates_next_steps() {
    let responses: ResponseSet = (1..=7)
        .map(|i| (format!("gad_{i:03}"), Answer::Numeric(0.0)))
        .chain([("hallucinations".to_string(), Answer::Numeric(1.0))])
        .collect();
    let result = classify(BuiltinInstrument::Gad7.definition(), &responses);

    let ids: Vec<&str> = result.flags.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["psychotic_symptoms"]);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert!(!result.has_crisis_flag());
    assert!(interpret(&result).next_steps[0].starts_with("IMMEDIATE"));
}
