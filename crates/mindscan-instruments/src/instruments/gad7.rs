use std::sync::LazyLock;

use mindscan_core::models::result::SeverityBand;

use super::{FREQUENCY_OPTIONS, shared_red_flags};
use crate::scoring::{CutoffBand, InstrumentDefinition, Question};

/// GAD-7: Generalized Anxiety Disorder scale, seven items scored 0-3.
pub static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
    let item = |id: &str, domain: &str, text: &str| {
        Question::scale(id, domain, 0.0, 3.0)
            .text(text)
            .options(&FREQUENCY_OPTIONS)
    };

    InstrumentDefinition {
        id: "gad7".to_string(),
        name: "GAD-7".to_string(),
        aliases: vec!["Anxiety Disorders Screening".to_string(), "GAD-7".to_string()],
        description: Some("Generalized anxiety severity screen".to_string()),
        max_score: 21,
        questions: vec![
            item("gad_001", "worry", "Feeling nervous, anxious, or on edge"),
            item("gad_002", "worry", "Not being able to stop or control worrying"),
            item("gad_003", "worry", "Worrying too much about different things"),
            item("gad_004", "physical_tension", "Trouble relaxing"),
            item("gad_005", "physical_tension", "Being so restless that it is hard to sit still"),
            item("gad_006", "irritability", "Becoming easily annoyed or irritable"),
            item("gad_007", "apprehension", "Feeling afraid, as if something awful might happen"),
        ],
        cutoffs: vec![
            CutoffBand::new(0, 4, "minimal", SeverityBand::Minimal),
            CutoffBand::new(5, 9, "mild", SeverityBand::Mild),
            CutoffBand::new(10, 14, "moderate", SeverityBand::Moderate),
            CutoffBand::new(15, 21, "severe", SeverityBand::Severe),
        ],
        flag_rules: shared_red_flags(),
        derivation: None,
    }
});
