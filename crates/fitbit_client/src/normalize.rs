//! Profile Normalizer.
//!
//! Converts the upstream payload shapes seen in the wild into one canonical
//! [`UserProfile`]:
//!
//! 1. already-canonical objects (`user` + `activity` present) pass through;
//! 2. objects carrying a name-like key are mined field by field under fixed
//!    key priority lists;
//! 3. a one-level `profile` / `data` wrapper is unwrapped first;
//! 4. strings are parsed as JSON and re-dispatched, falling back to fixed
//!    regex token extraction;
//! 5. anything else yields the built-in sample profile.
//!
//! The function never fails: internal parse errors are treated as "nothing
//! recognized". No clock reads, no I/O; output depends only on the input.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::goals::suggest_goals;
use crate::measures::{bmi, round1};
use crate::profile::{
    Activity, HeartRate, User, UserProfile, defaults, empty_preferences, no_connected_apps,
    sample_profile,
};

/// Keys that mark an object as describing a person.
const NAME_KEYS: [&str; 8] = [
    "name",
    "fullName",
    "full_name",
    "displayName",
    "display_name",
    "firstName",
    "first_name",
    "username",
];

const WEIGHT_KEYS: [&str; 5] = ["weight", "weightKg", "weight_kg", "bodyWeight", "body_weight"];
const HEIGHT_KEYS: [&str; 3] = ["height", "heightCm", "height_cm"];
const GENDER_KEYS: [&str; 2] = ["gender", "sex"];
const BIRTH_KEYS: [&str; 3] = ["dateOfBirth", "birthdate", "birthday"];
const STEPS_KEYS: [&str; 5] = ["steps", "stepCount", "step_count", "dailySteps", "daily_steps"];
const CALORIES_KEYS: [&str; 3] = ["calories", "caloriesOut", "calories_out"];
const ACTIVE_MINUTES_KEYS: [&str; 2] = ["activeMinutes", "active_minutes"];
const SLEEP_HOURS_KEYS: [&str; 3] = ["sleepHours", "sleep_hours", "sleep"];
const SLEEP_MINUTES_KEYS: [&str; 2] = ["totalMinutesAsleep", "minutesAsleep"];
const RESTING_HR_KEYS: [&str; 4] = [
    "restingHeartRate",
    "resting_heart_rate",
    "restingHr",
    "resting",
];
const AVERAGE_HR_KEYS: [&str; 4] = [
    "averageHeartRate",
    "average_heart_rate",
    "avgHr",
    "average",
];

static STEPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d,]*)\s*steps").expect("steps regex"));
static SLEEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(\d+(?:\.\d+)?)\s*(?:hours?|hrs?|h)?\s*(?:of\s+)?sleep|slept\s+(?:for\s+)?(\d+(?:\.\d+)?))")
        .expect("sleep regex")
});
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:my name is|i am|i'm|name\s*[:=])\s*([A-Za-z][A-Za-z'\-]*(?:\s+[A-Za-z][A-Za-z'\-]*)?)")
        .expect("name regex")
});

/// Normalize an arbitrary JSON value into the canonical profile.
pub fn normalize_value(input: &Value) -> UserProfile {
    match input {
        Value::String(s) => normalize_text(s),
        Value::Object(obj) => {
            if is_canonical(obj) {
                return from_canonical(input);
            }
            if has_name_key(obj) {
                return from_fields(obj);
            }
            // Generic wrapper: unwrap one level, then run the same checks on
            // the inner object.
            for wrapper in ["profile", "data"] {
                if let Some(Value::Object(inner)) = obj.get(wrapper) {
                    if is_canonical(inner) {
                        return from_canonical(&Value::Object(inner.clone()));
                    }
                    return from_fields(inner);
                }
            }
            sample_profile()
        }
        _ => sample_profile(),
    }
}

/// Normalize a text payload: JSON first, then fixed regex token extraction.
/// Text where none of the tokens match is "nothing recognized" and yields
/// the sample profile.
pub fn normalize_text(input: &str) -> UserProfile {
    match serde_json::from_str::<Value>(input) {
        // A bare JSON string unwraps one quoting level and is mined as text.
        Ok(Value::String(inner)) => return normalize_text(&inner),
        Ok(parsed) => return normalize_value(&parsed),
        Err(_) => {}
    }

    let steps = STEPS_RE
        .captures(input)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<u64>().ok());
    let sleep_hours = SLEEP_RE.captures(input).and_then(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    });
    let name = NAME_RE
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());

    if steps.is_none() && sleep_hours.is_none() && name.is_none() {
        return sample_profile();
    }

    let activity = Activity {
        steps: steps.unwrap_or(defaults::STEPS),
        sleep_hours: sleep_hours.map(round1).unwrap_or(defaults::SLEEP_HOURS),
        ..Activity::default()
    };
    let goals = suggest_goals(&activity);
    UserProfile {
        user: User {
            name: name.unwrap_or_else(|| defaults::NAME.to_string()),
            ..User::default()
        },
        activity,
        goals,
        ..UserProfile::default()
    }
}

fn is_canonical(obj: &Map<String, Value>) -> bool {
    obj.contains_key("user") && obj.contains_key("activity")
}

fn has_name_key(obj: &Map<String, Value>) -> bool {
    NAME_KEYS.iter().any(|k| obj.contains_key(*k))
}

/// Canonical payloads deserialize leniently (every field defaults) so the
/// output round-trips unchanged for well-formed input. A payload that looks
/// canonical but does not decode is treated as unrecognized.
fn from_canonical(input: &Value) -> UserProfile {
    serde_json::from_value::<UserProfile>(input.clone()).unwrap_or_else(|err| {
        tracing::debug!(%err, "canonical-looking payload failed to decode");
        sample_profile()
    })
}

/// Field-priority extraction over a person-shaped object. Every field not
/// found gets its fixed default; BMI is always recomputed from the extracted
/// weight and height, never read from the payload.
fn from_fields(obj: &Map<String, Value>) -> UserProfile {
    let weight = lookup_f64(obj, &WEIGHT_KEYS).unwrap_or(defaults::WEIGHT_KG);
    let height = lookup_f64(obj, &HEIGHT_KEYS).unwrap_or(defaults::HEIGHT_CM);
    let age = lookup_u64(obj, &["age"])
        .and_then(|v| u32::try_from(v).ok())
        .or_else(|| {
            lookup_str(obj, &BIRTH_KEYS)
                .as_deref()
                .and_then(crate::measures::age_from_date_of_birth)
        })
        .unwrap_or(defaults::AGE);

    let sleep_hours = lookup_f64(obj, &SLEEP_HOURS_KEYS)
        .or_else(|| lookup_f64(obj, &SLEEP_MINUTES_KEYS).map(|m| m / 60.0))
        .map(round1)
        .unwrap_or(defaults::SLEEP_HOURS);
    let active_minutes = lookup_u64(obj, &ACTIVE_MINUTES_KEYS)
        .or_else(|| {
            let very = lookup_u64(obj, &["veryActiveMinutes"]);
            let fairly = lookup_u64(obj, &["fairlyActiveMinutes"]);
            match (very, fairly) {
                (None, None) => None,
                (v, f) => Some(v.unwrap_or(0) + f.unwrap_or(0)),
            }
        })
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(defaults::ACTIVE_MINUTES);

    let activity = Activity {
        steps: lookup_u64(obj, &STEPS_KEYS).unwrap_or(defaults::STEPS),
        calories: lookup_u64(obj, &CALORIES_KEYS)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(defaults::CALORIES),
        active_minutes,
        sleep_hours,
        heart_rate: HeartRate {
            resting: lookup_u64(obj, &RESTING_HR_KEYS)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults::RESTING_HR),
            average: lookup_u64(obj, &AVERAGE_HR_KEYS)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults::AVERAGE_HR),
        },
    };

    let goals = suggest_goals(&activity);
    UserProfile {
        id: "local-user".to_string(),
        user: User {
            name: extract_name(obj).unwrap_or_else(|| defaults::NAME.to_string()),
            age,
            gender: lookup_str(obj, &GENDER_KEYS)
                .unwrap_or_else(|| defaults::GENDER.to_string()),
            weight,
            height,
            bmi: bmi(weight, height),
        },
        activity,
        goals,
        connected_apps: no_connected_apps(),
        preferences: empty_preferences(),
        last_sync: String::new(),
        created_at: String::new(),
    }
}

fn extract_name(obj: &Map<String, Value>) -> Option<String> {
    for key in ["name", "fullName", "full_name", "displayName", "display_name"] {
        if let Some(name) = obj.get(key).and_then(Value::as_str) {
            if !name.trim().is_empty() {
                return Some(name.trim().to_string());
            }
        }
    }
    // First/last pairs are concatenated the way the upstream profile does.
    let first = lookup_str(obj, &["firstName", "first_name", "username"])?;
    let full = match lookup_str(obj, &["lastName", "last_name"]) {
        Some(last) => format!("{} {}", first, last),
        None => first,
    };
    Some(full)
}

/// First hit wins across the priority list, checked at the top level and
/// then one level under the daily-summary wrappers.
fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    for key in keys {
        if let Some(v) = obj.get(*key) {
            return Some(v);
        }
    }
    for wrapper in ["summary", "activity", "heartRate", "heart_rate"] {
        if let Some(Value::Object(inner)) = obj.get(wrapper) {
            for key in keys {
                if let Some(v) = inner.get(*key) {
                    return Some(v);
                }
            }
        }
    }
    None
}

fn lookup_f64(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    match lookup(obj, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lookup_u64(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    match lookup(obj, keys)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0).round() as u64)),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn lookup_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match lookup(obj, keys)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
