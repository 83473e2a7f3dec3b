use mindscan_core::models::answer::ResponseSet;
use mindscan_core::models::result::ClassificationResult;
use mindscan_export::docx::generate_docx;
use mindscan_export::render::{render_report, render_template};
use mindscan_export::styles::DocumentStyles;
use mindscan_export::{ExportError, ScreeningReport};
use mindscan_instruments::{BuiltinInstrument, classify, interpret};

/// Every item at `value` except the suicidality item, which is left at 0.
fn phq9(value: f64) -> ClassificationResult {
    let responses: ResponseSet = (1..=9)
        .map(|i| (format!("dep_{i:03}"), if i == 5 { 0.0 } else { value }))
        .collect();
    classify(BuiltinInstrument::Phq9.definition(), &responses)
}

fn phq9_crisis() -> ClassificationResult {
    let responses: ResponseSet = (1..=9).map(|i| (format!("dep_{i:03}"), 3.0)).collect();
    classify(BuiltinInstrument::Phq9.definition(), &responses)
}

fn report_for(result: &ClassificationResult) -> ScreeningReport {
    let generated_at = jiff::Timestamp::from_second(1_700_000_000).unwrap();
    ScreeningReport::build(result, &interpret(result), generated_at)
}

#[test]
fn report_carries_result_and_interpretation() {
    let result = phq9(1.0);
    let report = report_for(&result);

    assert_eq!(report.title, "PHQ-9 Screening Report");
    assert_eq!(report.total_score, 8);
    assert_eq!(report.max_possible_score, 27);
    assert_eq!(report.percent_of_max, 29.6);
    assert_eq!(report.severity_label, "mild");
    assert_eq!(report.recommendations, interpret(&result).recommendations);
    assert!(report.emergency_contacts.is_empty());
}

#[test]
fn crisis_reports_include_emergency_contacts() {
    let report = report_for(&phq9_crisis());
    assert!(report.immediate_action_required);
    assert!(report.emergency_contacts.iter().any(|c| c.number == "112"));
}

#[test]
fn default_template_renders_sections() {
    let markdown = render_report(&report_for(&phq9(1.0)), None).unwrap();

    assert!(markdown.starts_with("# PHQ-9 Screening Report"));
    assert!(markdown.contains("**Total score:** 8 / 27"));
    assert!(markdown.contains("## Domain Scores"));
    assert!(markdown.contains("\n1. "));
    assert!(!markdown.contains("IMMEDIATE ACTION REQUIRED"));
    assert!(!markdown.contains("## Emergency Contacts"));
}

#[test]
fn crisis_report_renders_alerts() {
    let markdown = render_report(&report_for(&phq9_crisis()), None).unwrap();

    assert!(markdown.contains("> IMMEDIATE ACTION REQUIRED"));
    assert!(markdown.contains("## Risk Flags"));
    assert!(markdown.contains("## Emergency Contacts"));
}

#[test]
fn caller_template_is_used() {
    let report = report_for(&phq9(2.0));
    let rendered = render_report(&report, Some("{{ instrument_id }}={{ total_score }}")).unwrap();
    assert_eq!(rendered, "phq9=16");
}

#[test]
fn template_errors_are_distinguished() {
    let report = report_for(&phq9(0.0));

    let parse = render_template("bad", "{% if %}", &report).unwrap_err();
    assert!(matches!(parse, ExportError::TemplateParse(_)));

    let render = render_template("missing", "{{ no_such_field }}", &report).unwrap_err();
    assert!(matches!(render, ExportError::TemplateRender(_)));
}

#[test]
fn docx_output_is_a_zip_package() {
    let markdown = render_report(&report_for(&phq9_crisis()), None).unwrap();
    let bytes = generate_docx(&markdown, &DocumentStyles::default()).unwrap();

    assert!(bytes.len() > 100);
    assert_eq!(&bytes[..2], b"PK");
}
