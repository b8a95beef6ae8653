//! Minimal `FitbitClient` trait, canonical profile model and the upstream
//! payload normalizer, with a reqwest-based implementation.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use thiserror::Error;

pub mod config;
pub mod goals;
pub mod http_client;
pub mod measures;
pub mod normalize;
pub mod profile;
pub mod retry;

pub use profile::{Activity, HeartRate, User, UserProfile, sample_profile};

#[derive(Debug, Error)]
pub enum FitbitError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("configuration error: {0}")]
    Config(String),
}

impl FitbitError {
    pub fn from_status(status: u16, body: String) -> Self {
        FitbitError::Api { status, body }
    }
}

/// `GET /1/user/-/profile.json` → `{"user": {...}}`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpstreamUser {
    pub encoded_id: Option<String>,
    pub full_name: Option<String>,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    /// `YYYY-MM-DD`.
    pub date_of_birth: Option<String>,
    pub age: Option<u32>,
    /// Kilograms.
    pub weight: Option<f64>,
    /// Centimeters.
    pub height: Option<f64>,
}

impl UpstreamUser {
    /// Best display name the upstream profile offers, falling back to the
    /// fixed default.
    pub fn display_name(&self) -> String {
        for candidate in [&self.full_name, &self.display_name] {
            if let Some(name) = candidate {
                if !name.trim().is_empty() {
                    return name.trim().to_string();
                }
            }
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first.trim(), last.trim()),
            (Some(first), None) => first.trim().to_string(),
            _ => profile::defaults::NAME.to_string(),
        }
    }
}

/// `GET /1/user/-/activities/date/{date}.json` → `{"summary": {...}}`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivitySummaryDay {
    pub steps: Option<u64>,
    pub calories_out: Option<u32>,
    pub very_active_minutes: Option<u32>,
    pub fairly_active_minutes: Option<u32>,
}

/// `GET /1/user/-/sleep/date/{date}.json` → `{"summary": {...}}`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SleepSummaryDay {
    pub total_minutes_asleep: Option<f64>,
    pub efficiency: Option<u32>,
}

/// `GET /1/user/-/activities/heart/date/{date}/1d.json`, first entry of the
/// `activities-heart` array.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct HeartRateDay {
    pub resting_heart_rate: Option<u32>,
    pub average_heart_rate: Option<u32>,
}

#[async_trait]
pub trait FitbitClient: Send + Sync + 'static {
    async fn get_user_profile(&self) -> Result<UpstreamUser, FitbitError>;

    /// Daily activity summary; `date` is `YYYY-MM-DD` or `today`.
    async fn get_activity_summary(&self, date: &str)
    -> Result<ActivitySummaryDay, FitbitError>;

    async fn get_sleep_summary(&self, date: &str) -> Result<SleepSummaryDay, FitbitError>;

    async fn get_heart_rate_summary(&self, date: &str) -> Result<HeartRateDay, FitbitError>;

    /// Fan out the four reads concurrently, fan in, and combine the results
    /// into one canonical profile. Any single failure fails the whole
    /// snapshot; there is no partial-result handling.
    async fn fetch_snapshot(&self, date: &str) -> Result<UserProfile, FitbitError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upstream_user_prefers_full_name() {
        let u = UpstreamUser {
            full_name: Some("Sarah Johnson".into()),
            first_name: Some("Sarah".into()),
            ..UpstreamUser::default()
        };
        assert_eq!(u.display_name(), "Sarah Johnson");
    }

    #[test]
    fn upstream_user_concatenates_first_last() {
        let u = UpstreamUser {
            first_name: Some("Sarah".into()),
            last_name: Some("Johnson".into()),
            ..UpstreamUser::default()
        };
        assert_eq!(u.display_name(), "Sarah Johnson");
    }

    #[test]
    fn upstream_user_defaults_when_anonymous() {
        assert_eq!(UpstreamUser::default().display_name(), "Guest");
    }

    #[test]
    fn activity_summary_tolerates_extra_fields() {
        let payload = json!({
            "steps": 12450,
            "caloriesOut": 1850,
            "veryActiveMinutes": 30,
            "fairlyActiveMinutes": 22,
            "floors": 9
        });
        let day: ActivitySummaryDay = serde_json::from_value(payload).expect("decode");
        assert_eq!(day.steps, Some(12450));
        assert_eq!(day.calories_out, Some(1850));
    }

    #[test]
    fn heart_rate_day_tolerates_missing_resting() {
        let day: HeartRateDay = serde_json::from_value(json!({})).expect("decode");
        assert_eq!(day.resting_heart_rate, None);
    }
}
