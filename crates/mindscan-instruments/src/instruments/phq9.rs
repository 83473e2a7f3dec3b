use std::sync::LazyLock;

use mindscan_core::models::result::{RiskLevel, SeverityBand};

use super::{FREQUENCY_OPTIONS, shared_red_flags};
use crate::scoring::{CutoffBand, FlagRule, InstrumentDefinition, Question};

/// PHQ-9: Patient Health Questionnaire, nine items scored 0-3 over the past
/// two weeks. `dep_005` asks about thoughts of death or self-harm.
pub static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
    let item = |id: &str, domain: &str, text: &str| {
        Question::scale(id, domain, 0.0, 3.0)
            .text(text)
            .options(&FREQUENCY_OPTIONS)
    };

    let mut flag_rules = shared_red_flags();
    flag_rules.push(
        FlagRule::at_least(
            "phq9_suicidality",
            &["dep_005"],
            2.0,
            RiskLevel::Critical,
            "Frequent thoughts of death or self-harm; urgent safety assessment required",
        )
        .crisis(),
    );

    InstrumentDefinition {
        id: "phq9".to_string(),
        name: "PHQ-9".to_string(),
        aliases: vec!["Depression Screening".to_string(), "PHQ-9".to_string()],
        description: Some("Depression severity screen".to_string()),
        max_score: 27,
        questions: vec![
            item("dep_001", "mood", "Little interest or pleasure in doing things"),
            item("dep_002", "mood", "Feeling down, depressed, or hopeless"),
            item("dep_003", "neurovegetative", "Trouble falling or staying asleep, or sleeping too much"),
            item("dep_004", "neurovegetative", "Feeling tired or having little energy"),
            item(
                "dep_005",
                "suicidality",
                "Thoughts that you would be better off dead, or of hurting yourself",
            )
            .crisis(),
            item("dep_006", "neurovegetative", "Poor appetite or overeating"),
            item(
                "dep_007",
                "cognitive",
                "Feeling bad about yourself, or that you are a failure or have let yourself or your family down",
            ),
            item(
                "dep_008",
                "cognitive",
                "Trouble concentrating on things, such as reading or watching television",
            ),
            item(
                "dep_009",
                "psychomotor",
                "Moving or speaking so slowly that other people could have noticed, or being fidgety or restless",
            ),
        ],
        cutoffs: vec![
            CutoffBand::new(0, 4, "minimal", SeverityBand::Minimal),
            CutoffBand::new(5, 9, "mild", SeverityBand::Mild),
            CutoffBand::new(10, 14, "moderate", SeverityBand::Moderate),
            CutoffBand::new(15, 19, "moderately_severe", SeverityBand::ModeratelySevere),
            CutoffBand::new(20, 27, "severe", SeverityBand::Severe),
        ],
        flag_rules,
        derivation: None,
    }
});
