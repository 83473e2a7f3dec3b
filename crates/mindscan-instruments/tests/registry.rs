use std::fs;

use mindscan_core::models::answer::ResponseSet;
use mindscan_core::models::result::SeverityBand;
use mindscan_instruments::scoring::{CutoffBand, InstrumentDefinition, Question};
use mindscan_instruments::{BuiltinInstrument, InstrumentError, InstrumentRegistry};

fn custom(id: &str) -> InstrumentDefinition {
    InstrumentDefinition {
        id: id.to_string(),
        name: "Wellbeing check".to_string(),
        aliases: vec!["Wellbeing".to_string()],
        description: None,
        max_score: 6,
        questions: vec![
            Question::scale("wb_001", "energy", 0.0, 3.0),
            Question::scale("wb_002", "energy", 0.0, 3.0),
        ],
        cutoffs: vec![
            CutoffBand::new(0, 2, "fine", SeverityBand::Minimal),
            CutoffBand::new(3, 6, "check_in", SeverityBand::Mild),
        ],
        flag_rules: vec![],
        derivation: None,
    }
}

fn reason(err: InstrumentError) -> String {
    match err {
        InstrumentError::InvalidDefinition { reason, .. } => reason,
        other => panic!("expected InvalidDefinition, got {other:?}"),
    }
}

#[test]
fn builtin_resolves_ids_and_aliases() {
    let registry = InstrumentRegistry::builtin();
    assert_eq!(registry.len(), 5);

    assert_eq!(registry.resolve("phq9").unwrap().id, "phq9");
    assert_eq!(registry.resolve("  Depression Screening ").unwrap().id, "phq9");
    assert_eq!(registry.resolve("gad-7").unwrap().id, "gad7");
    assert_eq!(registry.resolve("stress & trauma assessment").unwrap().id, "pss10");
    assert_eq!(registry.resolve("K10").unwrap().id, "k10");
    assert!(matches!(
        registry.resolve("Substance Use Screening"),
        Err(InstrumentError::NotFound(_))
    ));
}

#[test]
fn builtin_enum_parses_aliases() {
    assert_eq!("Sleep Disorders Screening".parse::<BuiltinInstrument>().unwrap(), BuiltinInstrument::Psqi);
    assert_eq!(BuiltinInstrument::Gad7.to_string(), "gad7");
    assert!("unknown".parse::<BuiltinInstrument>().is_err());
}

#[test]
fn custom_definitions_register_and_classify() {
    let registry = InstrumentRegistry::builtin().with_definition(custom("wellbeing")).unwrap();
    let result = registry
        .classify("wellbeing", &ResponseSet::new().with("wb_001", 2).with("wb_002", "sometimes"))
        .unwrap();

    assert_eq!(result.total_score, 4);
    assert_eq!(result.severity_label, "check_in");
    assert_eq!(result.domain("energy"), Some(4.0));
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = InstrumentRegistry::builtin().with_definition(custom("PHQ9")).unwrap_err();
    assert!(matches!(err, InstrumentError::DuplicateKey { ref key } if key == "phq9"));

    let mut dup_alias = custom("wellbeing");
    dup_alias.aliases.push("GAD-7".to_string());
    assert!(matches!(
        InstrumentRegistry::builtin().with_definition(dup_alias),
        Err(InstrumentError::DuplicateKey { .. })
    ));
}

#[test]
fn gapped_or_overlapping_bands_are_rejected() {
    let mut gapped = custom("gapped");
    gapped.cutoffs[1].min = 4;
    assert!(reason(gapped.validate().unwrap_err()).contains("gap or overlap"));

    let mut overlapping = custom("overlapping");
    overlapping.cutoffs[1].min = 2;
    assert!(reason(overlapping.validate().unwrap_err()).contains("gap or overlap"));

    let mut short = custom("short");
    short.cutoffs[1].max = 5;
    assert!(reason(short.validate().unwrap_err()).contains("max_score is 6"));

    let mut late_start = custom("late");
    late_start.cutoffs[0].min = 1;
    assert!(reason(late_start.validate().unwrap_err()).contains("must start at 0"));

    let mut empty = custom("empty");
    empty.cutoffs.clear();
    assert!(reason(empty.validate().unwrap_err()).contains("cutoff table is empty"));
}

#[test]
fn malformed_questions_are_rejected() {
    let mut dup = custom("dup");
    dup.questions.push(Question::scale("wb_001", "energy", 0.0, 3.0));
    assert!(reason(dup.validate().unwrap_err()).contains("duplicate question id"));

    let mut inverted = custom("inverted");
    inverted.questions[0].range.min = 5.0;
    assert!(reason(inverted.validate().unwrap_err()).contains("invalid range"));

    let mut negative = custom("negative");
    negative.questions[1].weight = -1.0;
    assert!(reason(negative.validate().unwrap_err()).contains("invalid weight"));

    let mut nameless = custom(" ");
    nameless.aliases.clear();
    assert!(reason(nameless.validate().unwrap_err()).contains("id must not be empty"));
}

#[test]
fn load_dir_reads_json_definitions_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    let json = serde_json::json!({
        "id": "sleepiness",
        "name": "Daytime sleepiness",
        "aliases": ["ESS-lite"],
        "max_score": 6,
        "questions": [
            {"id": "ess_001", "kind": "single_choice", "range": {"min": 0.0, "max": 3.0}, "domain": "sleepiness"},
            {"id": "ess_002", "kind": "numeric", "range": {"min": 0.0, "max": 3.0}, "domain": "sleepiness", "reverse_scored": true}
        ],
        "cutoffs": [
            {"min": 0, "max": 3, "label": "normal", "severity": "minimal"},
            {"min": 4, "max": 6, "label": "excessive", "severity": "moderate"}
        ],
        "flag_rules": [
            {
                "id": "dozing_driving",
                "question_ids": ["ess_001"],
                "predicate": {"kind": "at_least", "value": 3.0},
                "severity": "high",
                "message": "Dozing while driving"
            }
        ]
    });
    fs::write(dir.path().join("b_sleepiness.json"), serde_json::to_vec(&json).unwrap()).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a definition").unwrap();

    let registry = InstrumentRegistry::builtin().load_dir(dir.path()).unwrap();
    assert_eq!(registry.len(), 6);

    let definition = registry.resolve("ess-lite").unwrap();
    assert_eq!(definition.questions[0].weight, 1.0);

    let result = registry
        .classify("sleepiness", &ResponseSet::new().with("ess_001", 3).with("ess_002", 0))
        .unwrap();
    assert_eq!(result.total_score, 6);
    assert_eq!(result.severity_label, "excessive");
    assert_eq!(result.flags.len(), 1);
    assert!(!result.immediate_action_required);
}

#[test]
fn load_dir_surfaces_parse_and_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    assert!(matches!(
        InstrumentRegistry::empty().load_dir(dir.path()),
        Err(InstrumentError::Parse(_))
    ));

    let missing = dir.path().join("does-not-exist");
    assert!(matches!(
        InstrumentRegistry::empty().load_dir(&missing),
        Err(InstrumentError::Io { .. })
    ));
}
