use std::sync::LazyLock;

use mindscan_core::models::result::SeverityBand;

use super::shared_red_flags;
use crate::scoring::{CutoffBand, InstrumentDefinition, Question};

const OPTIONS: [&str; 5] = [
    "None of the time",
    "A little of the time",
    "Some of the time",
    "Most of the time",
    "All of the time",
];

/// K10: Kessler Psychological Distress Scale. Answers are collected on 0-4
/// and each item contributes 1-5, so a fully answered form totals 10-50.
pub static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
    let item = |id: &str, domain: &str, text: &str| {
        Question::scale(id, domain, 0.0, 4.0)
            .text(text)
            .options(&OPTIONS)
            .offset(1.0)
    };

    InstrumentDefinition {
        id: "k10".to_string(),
        name: "K10".to_string(),
        aliases: vec!["General Mental Health Screening".to_string(), "K10".to_string()],
        description: Some("Non-specific psychological distress over the past 30 days".to_string()),
        max_score: 50,
        questions: vec![
            item("k10_001", "anxiety", "Tired out for no good reason"),
            item("k10_002", "anxiety", "Nervous"),
            item("k10_003", "anxiety", "So nervous that nothing could calm you down"),
            item("k10_004", "depression", "Hopeless"),
            item("k10_005", "anxiety", "Restless or fidgety"),
            item("k10_006", "anxiety", "So restless you could not sit still"),
            item("k10_007", "depression", "Depressed"),
            item("k10_008", "fatigue", "That everything was an effort"),
            item("k10_009", "depression", "So sad that nothing could cheer you up"),
            item("k10_010", "depression", "Worthless"),
        ],
        cutoffs: vec![
            CutoffBand::new(0, 15, "likely_well", SeverityBand::Minimal),
            CutoffBand::new(16, 21, "likely_mild", SeverityBand::Mild),
            CutoffBand::new(22, 29, "likely_moderate", SeverityBand::Moderate),
            CutoffBand::new(30, 50, "likely_severe", SeverityBand::Severe),
        ],
        flag_rules: shared_red_flags(),
        derivation: None,
    }
});
