use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A raw answer as submitted by the questionnaire front end.
///
/// On the wire this is untagged: a JSON number, a string, or an array of
/// strings (multi-select).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Answer {
    Numeric(f64),
    Choice(String),
    MultiChoice(Vec<String>),
}

impl Answer {
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Answer::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Answer::Choice(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Numeric(v) => write!(f, "{v}"),
            Answer::Choice(s) => f.write_str(s),
            Answer::MultiChoice(selected) => f.write_str(&selected.join(", ")),
        }
    }
}

impl From<f64> for Answer {
    fn from(value: f64) -> Self {
        Answer::Numeric(value)
    }
}

impl From<i32> for Answer {
    fn from(value: i32) -> Self {
        Answer::Numeric(f64::from(value))
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Choice(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Choice(value)
    }
}

impl From<Vec<String>> for Answer {
    fn from(value: Vec<String>) -> Self {
        Answer::MultiChoice(value)
    }
}

/// Question id → raw answer for one submission.
///
/// Backed by a `BTreeMap` so serialization order is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseSet(BTreeMap<String, Answer>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, question_id: impl Into<String>, answer: impl Into<Answer>) -> Self {
        self.0.insert(question_id.into(), answer.into());
        self
    }

    pub fn insert(&mut self, question_id: impl Into<String>, answer: impl Into<Answer>) {
        self.0.insert(question_id.into(), answer.into());
    }

    pub fn remove(&mut self, question_id: &str) -> Option<Answer> {
        self.0.remove(question_id)
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.0.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Lenient conversion from free-form form JSON.
    ///
    /// Booleans become "yes"/"no" choices and `null` entries are dropped
    /// (treated as unanswered). Nested objects and arrays holding anything
    /// other than strings are rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let serde_json::Value::Object(map) = value else {
            return Err(CoreError::NotAnObject);
        };

        let mut responses = ResponseSet::new();
        for (question_id, raw) in map {
            let answer = match raw {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(b) => Answer::Choice(if b { "yes" } else { "no" }.to_string()),
                serde_json::Value::Number(n) => match n.as_f64() {
                    Some(v) => Answer::Numeric(v),
                    None => {
                        return Err(CoreError::UnsupportedAnswer {
                            question_id,
                            reason: format!("number {n} is not representable"),
                        });
                    }
                },
                serde_json::Value::String(s) => Answer::Choice(s),
                serde_json::Value::Array(items) => {
                    let mut selected = Vec::with_capacity(items.len());
                    for item in items {
                        match item {
                            serde_json::Value::String(s) => selected.push(s),
                            other => {
                                return Err(CoreError::UnsupportedAnswer {
                                    question_id,
                                    reason: format!("multi-select entries must be strings, got {other}"),
                                });
                            }
                        }
                    }
                    Answer::MultiChoice(selected)
                }
                serde_json::Value::Object(_) => {
                    return Err(CoreError::UnsupportedAnswer {
                        question_id,
                        reason: "nested objects are not answers".to_string(),
                    });
                }
            };
            responses.0.insert(question_id, answer);
        }
        Ok(responses)
    }
}

impl<K: Into<String>, A: Into<Answer>> FromIterator<(K, A)> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, a)| (k.into(), a.into())).collect())
    }
}
