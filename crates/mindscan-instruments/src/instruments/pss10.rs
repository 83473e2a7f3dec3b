use std::sync::LazyLock;

use mindscan_core::models::result::SeverityBand;

use super::shared_red_flags;
use crate::scoring::{CutoffBand, InstrumentDefinition, Question};

const OPTIONS: [&str; 5] = ["Never", "Almost never", "Sometimes", "Fairly often", "Very often"];

/// PSS-10: Perceived Stress Scale. Items 4, 5, 7 and 8 are positively worded
/// and reverse-scored.
pub static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
    let item = |id: &str, domain: &str, text: &str| {
        Question::scale(id, domain, 0.0, 4.0).text(text).options(&OPTIONS)
    };

    InstrumentDefinition {
        id: "pss10".to_string(),
        name: "PSS-10".to_string(),
        aliases: vec!["Stress & Trauma Assessment".to_string(), "PSS-10".to_string()],
        description: Some("Perceived stress over the last month".to_string()),
        max_score: 40,
        questions: vec![
            item(
                "pss_001",
                "perceived_helplessness",
                "Been upset because of something that happened unexpectedly",
            ),
            item(
                "pss_002",
                "perceived_helplessness",
                "Felt that you were unable to control the important things in your life",
            ),
            item("pss_003", "emotional_distress", "Felt nervous and stressed"),
            item(
                "pss_004",
                "perceived_self_efficacy",
                "Felt confident about your ability to handle your personal problems",
            )
            .reversed(),
            item("pss_005", "perceived_self_efficacy", "Felt that things were going your way").reversed(),
            item(
                "pss_006",
                "perceived_helplessness",
                "Found that you could not cope with all the things that you had to do",
            ),
            item(
                "pss_007",
                "perceived_self_efficacy",
                "Been able to control irritations in your life",
            )
            .reversed(),
            item("pss_008", "perceived_self_efficacy", "Felt that you were on top of things").reversed(),
            item(
                "pss_009",
                "emotional_distress",
                "Been angered because of things that happened that were outside of your control",
            ),
            item(
                "pss_010",
                "perceived_helplessness",
                "Felt difficulties were piling up so high that you could not overcome them",
            ),
        ],
        cutoffs: vec![
            CutoffBand::new(0, 13, "minimal", SeverityBand::Minimal),
            CutoffBand::new(14, 19, "mild", SeverityBand::Mild),
            CutoffBand::new(20, 26, "moderate", SeverityBand::Moderate),
            CutoffBand::new(27, 40, "severe", SeverityBand::Severe),
        ],
        flag_rules: shared_red_flags(),
        derivation: None,
    }
});
