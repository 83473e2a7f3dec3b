//! Risk/Crisis Flagger.
//!
//! Every rule is evaluated independently against the whole response set. A
//! rule fires at most once, reporting the first of its questions that met the
//! predicate. Domain-sum rules read the uncapped sums from aggregation.

use mindscan_core::models::answer::{Answer, ResponseSet};
use mindscan_core::models::result::{DomainScore, RiskLevel, TriggeredFlag};

use crate::normalize::value_of;
use crate::scoring::{FlagRule, InstrumentDefinition, Predicate, Question};

/// Threshold for the implicit rule attached to every crisis-indicator question.
const CRISIS_ITEM_THRESHOLD: f64 = 1.0;

/// Outcome of evaluating all rules for one submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlagOutcome {
    pub flags: Vec<TriggeredFlag>,
    pub risk_level: RiskLevel,
    pub immediate_action_required: bool,
}

/// Explicit rules of the definition followed by one implicit `crisis:<id>`
/// rule per crisis-indicator question.
pub fn rules_for(definition: &InstrumentDefinition) -> Vec<FlagRule> {
    let mut rules = definition.flag_rules.clone();
    for q in definition.questions.iter().filter(|q| q.crisis_indicator) {
        rules.push(
            FlagRule::at_least(
                &format!("crisis:{}", q.id),
                &[q.id.as_str()],
                CRISIS_ITEM_THRESHOLD,
                RiskLevel::High,
                "Crisis indicator endorsed; immediate safety assessment required",
            )
            .crisis(),
        );
    }
    rules
}

pub fn evaluate(
    definition: &InstrumentDefinition,
    responses: &ResponseSet,
    domain_scores: &[DomainScore],
) -> FlagOutcome {
    let flags: Vec<TriggeredFlag> = rules_for(definition)
        .iter()
        .filter_map(|rule| fire(definition, rule, responses, domain_scores))
        .collect();

    FlagOutcome {
        risk_level: flags.iter().map(|f| f.severity).max().unwrap_or_default(),
        immediate_action_required: flags.iter().any(|f| f.crisis_indicator),
        flags,
    }
}

fn fire(
    definition: &InstrumentDefinition,
    rule: &FlagRule,
    responses: &ResponseSet,
    domain_scores: &[DomainScore],
) -> Option<TriggeredFlag> {
    let question_id = match &rule.predicate {
        Predicate::DomainSumAbove { value } => {
            let sum: f64 = domain_scores.iter().map(|d| d.score).sum();
            if sum <= *value {
                return None;
            }
            String::new()
        }
        predicate => rule
            .question_ids
            .iter()
            .find(|qid| matches(definition, predicate, qid, responses.get(qid)))?
            .clone(),
    };

    Some(TriggeredFlag {
        id: rule.id.clone(),
        question_id,
        severity: rule.severity,
        crisis_indicator: rule.crisis_indicator,
        message: rule.message.clone(),
    })
}

fn matches(definition: &InstrumentDefinition, predicate: &Predicate, question_id: &str, answer: Option<&Answer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };
    match predicate {
        Predicate::AtLeast { value } => {
            // Defined questions were already normalized (and any warning
            // logged) during aggregation.
            let normalized = match definition.question(question_id) {
                Some(q) => value_of(q, Some(answer)),
                None => value_of(&Question::scale(question_id, "", 0.0, 4.0), Some(answer)),
            };
            normalized >= *value
        }
        Predicate::OneOf { choices } => {
            let hit = |raw: &str| choices.iter().any(|c| c.trim().eq_ignore_ascii_case(raw.trim()));
            match answer {
                Answer::Choice(raw) => hit(raw),
                Answer::MultiChoice(selected) => selected.iter().any(|s| hit(s)),
                Answer::Numeric(_) => false,
            }
        }
        Predicate::DomainSumAbove { .. } => false,
    }
}
