//! Adaptive follow-up questions triggered by earlier answers.

use mindscan_core::models::answer::{Answer, ResponseSet};

use crate::crisis::{choice_is, numeric_value};
use crate::scoring::Question;

const PRELIMINARY_SEVERITY_PERCENT: f64 = 70.0;

fn choice(id: &str, domain: &str, text: &str, options: &[&str]) -> Question {
    Question::scale(id, domain, 0.0, (options.len().saturating_sub(1)) as f64)
        .text(text)
        .options(options)
}

fn impairment(id: &str, text: &str) -> Question {
    choice(
        id,
        "functional_impairment",
        text,
        &["Not at all", "Slightly", "Moderately", "Considerably", "Extremely"],
    )
}

/// Numeric answers summed against an assumed 0-4 scale, as a percentage.
pub fn preliminary_severity(responses: &ResponseSet) -> f64 {
    let numeric: Vec<f64> = responses
        .iter()
        .filter_map(|(_, a)| a.as_numeric())
        .filter(|v| v.is_finite())
        .collect();
    if numeric.is_empty() {
        return 0.0;
    }
    numeric.iter().sum::<f64>() / (numeric.len() as f64 * 4.0) * 100.0
}

/// Extra questions to ask given the answers so far, in a fixed order:
/// crisis probes, branching follow-ups, then severity probes.
pub fn follow_up_questions(responses: &ResponseSet) -> Vec<Question> {
    let mut questions: Vec<Question> = Vec::new();
    let at_least = |id: &str, v: f64| numeric_value(responses, id).is_some_and(|x| x >= v);

    if at_least("dep_005", 1.0) {
        questions.push(
            choice(
                "crisis_suicide_001",
                "crisis",
                "Are you currently having thoughts of ending your life?",
                &["No", "Sometimes", "Often", "Right now"],
            )
            .crisis(),
        );
        questions.push(
            choice(
                "crisis_suicide_002",
                "crisis",
                "Do you have a plan for how you would end your life?",
                &["No", "Vague thoughts", "Specific plan", "Detailed plan"],
            )
            .crisis(),
        );
    }

    let elevated_symptom = responses.iter().any(|(id, answer)| {
        (id.starts_with("anx_") || id.starts_with("dep_"))
            && matches!(answer, Answer::Numeric(v) if *v >= 2.0)
    });
    if elevated_symptom {
        questions.push(
            choice(
                "crisis_harm_001",
                "crisis",
                "Have you had thoughts of harming yourself in ways other than ending your life?",
                &["Never", "Rarely", "Sometimes", "Often"],
            )
            .crisis(),
        );
    }

    if at_least("anx_001", 2.0) {
        questions.push(choice(
            "panic_freq_001",
            "panic",
            "How often do you experience these panic attacks?",
            &["Once a month", "Weekly", "Multiple times per week", "Daily"],
        ));
        questions.push(choice(
            "panic_trigger_001",
            "panic",
            "Do these panic attacks seem to be triggered by specific situations?",
            &["No clear trigger", "Social situations", "Specific places", "Physical sensations"],
        ));
    }

    if at_least("anx_003", 2.0) {
        questions.push(choice(
            "ocd_compulsion_001",
            "obsessive_compulsive",
            "Do you feel compelled to perform certain behaviors repeatedly to reduce anxiety?",
            &["Never", "Sometimes", "Often", "Always"],
        ));
    }

    if choice_is(responses, "sub_001", "Yes") {
        questions.push(choice(
            "alcohol_problems_001",
            "substance_use",
            "Have you ever felt you should cut down on your drinking?",
            &["No", "Yes"],
        ));
        questions.push(choice(
            "alcohol_problems_002",
            "substance_use",
            "Have people annoyed you by criticizing your drinking?",
            &["No", "Yes"],
        ));
    }

    if preliminary_severity(responses) >= PRELIMINARY_SEVERITY_PERCENT {
        questions.push(impairment(
            "severity_function_001",
            "How much do your symptoms interfere with your work or daily activities?",
        ));
        questions.push(impairment(
            "severity_social_001",
            "How much do your symptoms interfere with your social relationships?",
        ));
    }

    let mut seen = std::collections::HashSet::new();
    questions.retain(|q| seen.insert(q.id.clone()));
    questions
}
