use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mindscan_core::models::answer::ResponseSet;
use mindscan_core::models::result::{ResponseWarning, SeverityBand};

use super::shared_red_flags;
use crate::normalize::normalize;
use crate::scoring::{CutoffBand, Derivation, InstrumentDefinition, Question};

const HOURS_SLEEP: &str = "hours_sleep";
const TIME_IN_BED: &str = "time_in_bed";
const LATENCY_MINUTES: &str = "sleep_latency_minutes";
const LATENCY_DIFFICULTY: &str = "sleep_latency_difficulty";
const TROUBLE_STAYING_AWAKE: &str = "trouble_staying_awake";
const ENTHUSIASM_PROBLEMS: &str = "enthusiasm_problems";

/// Night-time disturbance ratings, in questionnaire order.
const DISTURBANCES: [&str; 9] = [
    "wake_middle",
    "bathroom",
    "breathe",
    "cough_snore",
    "cold",
    "hot",
    "bad_dreams",
    "pain",
    "other_disturb",
];

/// Assumed when a diary omits them.
const DEFAULT_HOURS_SLEEP: f64 = 7.0;
const DEFAULT_TIME_IN_BED: f64 = 8.0;

/// PSQI: Pittsburgh Sleep Quality Index. The instrument is scored from seven
/// component scores (0-3 each). Raw diary answers are converted to components
/// before scoring; see [`derive_components`].
pub static DEFINITION: LazyLock<InstrumentDefinition> = LazyLock::new(|| {
    let component = |id: &str, text: &str| Question::scale(id, id, 0.0, 3.0).text(text);

    InstrumentDefinition {
        id: "psqi".to_string(),
        name: "PSQI".to_string(),
        aliases: vec!["Sleep Disorders Screening".to_string(), "PSQI".to_string()],
        description: Some("Sleep quality over the past month".to_string()),
        max_score: 21,
        questions: vec![
            component("sleep_quality", "Subjective sleep quality")
                .options(&["Very good", "Fairly good", "Fairly bad", "Very bad"]),
            component("sleep_latency", "Sleep latency"),
            component("sleep_duration", "Sleep duration"),
            component("sleep_efficiency", "Habitual sleep efficiency"),
            component("sleep_disturbances", "Sleep disturbances"),
            component("sleep_medication", "Use of sleeping medication").options(&[
                "Not during the past month",
                "Less than once a week",
                "Once or twice a week",
                "Three or more times a week",
            ]),
            component("daytime_dysfunction", "Daytime dysfunction"),
        ],
        cutoffs: vec![
            CutoffBand::new(0, 5, "good", SeverityBand::Minimal),
            CutoffBand::new(6, 21, "poor", SeverityBand::Moderate),
        ],
        flag_rules: shared_red_flags(),
        derivation: Some(Derivation::SleepDiary),
    }
});

/// Keys that only appear in a raw diary. `sleep_quality` and
/// `sleep_medication` are shared with the component ids.
fn diary_keys() -> impl Iterator<Item = &'static str> {
    [
        HOURS_SLEEP,
        TIME_IN_BED,
        LATENCY_MINUTES,
        LATENCY_DIFFICULTY,
        TROUBLE_STAYING_AWAKE,
        ENTHUSIASM_PROBLEMS,
    ]
    .into_iter()
    .chain(DISTURBANCES)
}

/// Replace raw diary answers with the seven component scores.
///
/// `None` when the set holds no raw diary key. Component ids already present
/// in `responses` are kept as submitted. Keys outside the diary pass through
/// untouched so red-flag rules still see them.
pub fn derive_components(responses: &ResponseSet) -> Option<(ResponseSet, Vec<ResponseWarning>)> {
    let (diary, warnings) = SleepDiary::from_responses(responses)?;

    let mut derived = responses.clone();
    for key in diary_keys() {
        derived.remove(key);
    }
    for (id, value) in diary.to_responses().iter() {
        if !responses.contains(id) {
            derived.insert(id, value.clone());
        }
    }
    Some((derived, warnings))
}

/// Raw sleep-diary answers for one PSQI administration.
///
/// Ratings are on the 0-3 frequency scale ("not during the past month" to
/// "three or more times a week").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SleepDiary {
    pub subjective_quality: u8,
    pub latency_minutes: f64,
    /// Could not fall asleep within 30 minutes.
    pub latency_difficulty: u8,
    pub hours_slept: f64,
    pub hours_in_bed: f64,
    /// Woke in the night, bathroom, breathing, snoring, cold, hot, bad dreams,
    /// pain, other.
    #[serde(default)]
    pub disturbances: Vec<u8>,
    pub medication: u8,
    pub trouble_staying_awake: u8,
    pub enthusiasm_problems: u8,
}

impl SleepDiary {
    /// Read a diary from raw answers, normalizing each one. Missing ratings
    /// count as 0; missing sleep and bed hours fall back to 7 and 8.
    pub fn from_responses(responses: &ResponseSet) -> Option<(SleepDiary, Vec<ResponseWarning>)> {
        if !diary_keys().any(|key| responses.contains(key)) {
            return None;
        }

        let mut warnings = Vec::new();
        let mut read = |id: &str, max: f64, default: f64| -> f64 {
            let Some(answer) = responses.get(id) else {
                return default;
            };
            let question = DEFINITION
                .question(id)
                .cloned()
                .unwrap_or_else(|| Question::scale(id, id, 0.0, max));
            let normalized = normalize(&question, Some(answer));
            if let Some(warning) = normalized.warning {
                warnings.push(warning);
            }
            normalized.value
        };
        let mut rating = |id: &str| read(id, 3.0, 0.0) as u8;

        let subjective_quality = rating("sleep_quality");
        let latency_difficulty = rating(LATENCY_DIFFICULTY);
        let medication = rating("sleep_medication");
        let trouble_staying_awake = rating(TROUBLE_STAYING_AWAKE);
        let enthusiasm_problems = rating(ENTHUSIASM_PROBLEMS);
        let disturbances = DISTURBANCES.into_iter().map(|id| rating(id)).collect();

        let diary = SleepDiary {
            subjective_quality,
            latency_minutes: read(LATENCY_MINUTES, 24.0 * 60.0, 0.0),
            latency_difficulty,
            hours_slept: read(HOURS_SLEEP, 24.0, DEFAULT_HOURS_SLEEP),
            hours_in_bed: read(TIME_IN_BED, 24.0, DEFAULT_TIME_IN_BED),
            disturbances,
            medication,
            trouble_staying_awake,
            enthusiasm_problems,
        };
        Some((diary, warnings))
    }

    /// The seven component scores as a response set for [`DEFINITION`].
    pub fn to_responses(&self) -> ResponseSet {
        let disturbance_sum: u32 = self.disturbances.iter().map(|&d| u32::from(d.min(3))).sum();
        let latency_sum = latency_band(self.latency_minutes) + u32::from(self.latency_difficulty.min(3));
        let daytime_sum =
            u32::from(self.trouble_staying_awake.min(3)) + u32::from(self.enthusiasm_problems.min(3));

        ResponseSet::new()
            .with("sleep_quality", f64::from(self.subjective_quality.min(3)))
            .with("sleep_latency", f64::from(pair_component(latency_sum)))
            .with("sleep_duration", f64::from(duration_component(self.hours_slept)))
            .with(
                "sleep_efficiency",
                f64::from(efficiency_component(self.hours_slept, self.hours_in_bed)),
            )
            .with("sleep_disturbances", f64::from(disturbance_component(disturbance_sum)))
            .with("sleep_medication", f64::from(self.medication.min(3)))
            .with("daytime_dysfunction", f64::from(pair_component(daytime_sum)))
    }
}

fn latency_band(minutes: f64) -> u32 {
    match minutes {
        m if m <= 15.0 => 0,
        m if m <= 30.0 => 1,
        m if m <= 60.0 => 2,
        _ => 3,
    }
}

/// Two 0-3 items summed, then banded back to 0-3.
fn pair_component(sum: u32) -> u32 {
    match sum {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        _ => 3,
    }
}

fn duration_component(hours: f64) -> u32 {
    match hours {
        h if h >= 7.0 => 0,
        h if h >= 6.0 => 1,
        h if h >= 5.0 => 2,
        _ => 3,
    }
}

fn efficiency_component(hours_slept: f64, hours_in_bed: f64) -> u32 {
    if hours_in_bed <= 0.0 {
        return 3;
    }
    match hours_slept / hours_in_bed * 100.0 {
        e if e >= 85.0 => 0,
        e if e >= 75.0 => 1,
        e if e >= 65.0 => 2,
        _ => 3,
    }
}

fn disturbance_component(sum: u32) -> u32 {
    match sum {
        0 => 0,
        1..=9 => 1,
        10..=18 => 2,
        _ => 3,
    }
}
