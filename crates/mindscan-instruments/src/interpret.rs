//! Narrative interpretation, recommendations and next steps for a result.
//!
//! Domain thresholds read the uncapped domain sums.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mindscan_core::models::result::{ClassificationResult, DomainScore, RiskLevel, SeverityBand};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Interpretation {
    pub narrative: String,
    pub highest_domain: Option<DomainScore>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

pub fn interpret(result: &ClassificationResult) -> Interpretation {
    let highest_domain = highest_domain(&result.domain_scores);

    let mut narrative = severity_narrative(result);
    if let Some(domain) = &highest_domain {
        narrative.push_str(&format!(
            "\n\nThe highest scoring domain is '{}' with a score of {}, suggesting this area may require particular attention in treatment planning.",
            domain.domain, domain.score
        ));
    }

    Interpretation {
        narrative,
        highest_domain,
        recommendations: recommendations(result),
        next_steps: next_steps(result),
    }
}

/// First domain with the maximum score.
fn highest_domain(scores: &[DomainScore]) -> Option<DomainScore> {
    scores
        .iter()
        .fold(None::<&DomainScore>, |best, d| match best {
            Some(b) if b.score >= d.score => Some(b),
            _ => Some(d),
        })
        .cloned()
}

fn severity_narrative(result: &ClassificationResult) -> String {
    let total = result.total_score;
    match result.severity {
        SeverityBand::Minimal => format!(
            "The {} indicates minimal symptoms with little functional impairment. The total score of {total} suggests that current symptoms are within the normal range or represent mild, transient concerns that may not require clinical intervention.",
            result.instrument_name
        ),
        SeverityBand::Mild => format!(
            "The assessment reveals mild symptoms that may warrant attention. With a total score of {total}, there are emerging concerns that could benefit from self-care strategies, lifestyle modifications, and monitoring for potential progression."
        ),
        SeverityBand::Moderate => format!(
            "Moderate symptoms are present with a total score of {total}, indicating clinically significant concerns that are likely causing noticeable functional impairment. Professional evaluation and intervention are recommended to prevent symptom progression and improve quality of life."
        ),
        SeverityBand::ModeratelySevere => format!(
            "The assessment indicates moderately severe symptoms (score: {total}) with significant functional impairment across multiple life domains. Immediate professional intervention is recommended, with consideration for comprehensive treatment planning including therapy and possible medication evaluation."
        ),
        SeverityBand::Severe => format!(
            "Severe symptoms are present with a total score of {total}, indicating substantial functional impairment and significant distress. Urgent professional evaluation is required, with consideration for intensive treatment interventions and close monitoring for safety concerns."
        ),
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn recommendations(result: &ClassificationResult) -> Vec<String> {
    let mut recs = match result.severity {
        SeverityBand::Minimal | SeverityBand::Mild => to_strings(&[
            "Continue regular self-care practices including adequate sleep, exercise, and stress management",
            "Practice mindfulness and relaxation techniques adapted for Indian cultural context",
            "Maintain social connections and family support systems",
            "Monitor symptoms and seek help if they worsen or persist",
        ]),
        SeverityBand::Moderate => to_strings(&[
            "Seek professional consultation with a qualified mental health provider",
            "Consider structured therapy such as Cognitive Behavioral Therapy (CBT)",
            "Engage family support while maintaining personal autonomy as per Mental Healthcare Act 2017",
            "Implement lifestyle modifications including regular exercise and sleep hygiene",
        ]),
        SeverityBand::ModeratelySevere | SeverityBand::Severe => to_strings(&[
            "Urgent professional evaluation by psychiatrist or clinical psychologist required",
            "Consider comprehensive treatment plan including therapy and medication assessment",
            "Ensure safety planning and crisis support resources are in place",
            "Contact Tele MANAS (1800-891-4416) for immediate professional guidance",
            "Involve trusted family members in treatment planning with patient consent",
        ]),
    };

    let above = |domains: &[&str], threshold: f64| {
        domains
            .iter()
            .any(|d| result.domain(d).is_some_and(|score| score > threshold))
    };

    if above(&["suicidality"], 2.0) {
        recs.insert(
            0,
            "URGENT: Immediate safety assessment required due to concerning responses about self-harm thoughts"
                .to_string(),
        );
    }
    if above(
        &["sleep_quality", "sleep_duration", "sleep_disturbances", "daytime_dysfunction"],
        2.0,
    ) {
        recs.push(
            "Address sleep disturbances through sleep hygiene education and possible sleep study evaluation"
                .to_string(),
        );
    }
    if above(&["worry", "physical_tension", "anxiety"], 6.0) {
        recs.push(
            "Consider anxiety-specific interventions including relaxation training and gradual exposure techniques"
                .to_string(),
        );
    }
    if above(&["mood"], 4.0) {
        recs.push("Address mood symptoms through structured therapy and lifestyle modifications".to_string());
    }
    if above(&["perceived_helplessness"], 8.0) {
        recs.push("Focus on stress management and building coping skills through therapy".to_string());
    }
    if above(&["cognitive"], 3.0) {
        recs.push(
            "Address concentration and cognitive concerns through cognitive rehabilitation techniques".to_string(),
        );
    }

    recs
}

/// Any triggered flag escalates to the immediate steps, whatever its severity.
fn next_steps(result: &ClassificationResult) -> Vec<String> {
    let mut steps = if result.risk_level == RiskLevel::Critical || !result.flags.is_empty() {
        to_strings(&[
            "IMMEDIATE: Contact emergency services (112) or nearest emergency department if in immediate danger",
            "Contact Tele MANAS helpline: 1800-891-4416 for crisis intervention",
            "Ensure continuous supervision until professional evaluation is completed",
            "Remove access to means of self-harm if suicide risk is present",
        ])
    } else if result.risk_level == RiskLevel::High {
        to_strings(&[
            "Schedule urgent appointment with mental health professional within 24-48 hours",
            "Contact Tele MANAS (1800-891-4416) for immediate guidance and support",
            "Inform trusted family member or friend about current mental health status",
            "Consider taking time off work/studies if functioning is significantly impaired",
        ])
    } else if result.risk_level == RiskLevel::Moderate {
        to_strings(&[
            "Schedule appointment with mental health professional within 1-2 weeks",
            "Begin implementing recommended self-care strategies immediately",
            "Monitor symptoms daily and seek urgent help if worsening",
            "Access Tele MANAS resources for ongoing support and guidance",
        ])
    } else {
        to_strings(&[
            "Continue monitoring symptoms and maintain healthy lifestyle practices",
            "Consider preventive mental health consultation if symptoms persist",
            "Utilize available mental health resources and educational materials",
            "Schedule follow-up assessment if concerns arise",
        ])
    };

    steps.extend(to_strings(&[
        "Save this analysis report for discussion with healthcare provider",
        "Review Mental Healthcare Act 2017 rights and protections available",
        "Consider engaging family support while maintaining personal autonomy",
        "Access additional resources through National Mental Health Programme",
    ]));
    steps
}
