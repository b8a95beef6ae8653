//! Canonical user-profile model.
//!
//! Every upstream shape the importer understands is funnelled into
//! [`UserProfile`]. After normalization all fields are present; missing
//! upstream data is replaced by the fixed defaults in [`defaults`], never by
//! null. Serialized field names follow the upstream camelCase convention.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::goals::suggest_goals;
use crate::measures::{bmi, round1};
use crate::{ActivitySummaryDay, HeartRateDay, SleepSummaryDay, UpstreamUser};

/// Fixed substitutes for fields the upstream payload does not carry.
pub mod defaults {
    pub const NAME: &str = "Guest";
    pub const AGE: u32 = 30;
    pub const GENDER: &str = "not specified";
    pub const WEIGHT_KG: f64 = 70.0;
    pub const HEIGHT_CM: f64 = 170.0;
    pub const STEPS: u64 = 6000;
    pub const CALORIES: u32 = 2000;
    pub const ACTIVE_MINUTES: u32 = 30;
    pub const SLEEP_HOURS: f64 = 7.0;
    pub const RESTING_HR: u32 = 65;
    pub const AVERAGE_HR: u32 = 72;
}

pub const INTEGRATIONS: [&str; 3] = ["Fitbit", "Oura", "Apple Health"];

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct HeartRate {
    pub resting: u32,
    pub average: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Kilograms.
    pub weight: f64,
    /// Centimeters.
    pub height: f64,
    pub bmi: f64,
}

impl Default for User {
    fn default() -> Self {
        Self {
            name: defaults::NAME.to_string(),
            age: defaults::AGE,
            gender: defaults::GENDER.to_string(),
            weight: defaults::WEIGHT_KG,
            height: defaults::HEIGHT_CM,
            bmi: bmi(defaults::WEIGHT_KG, defaults::HEIGHT_CM),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct Activity {
    pub steps: u64,
    pub calories: u32,
    pub active_minutes: u32,
    pub sleep_hours: f64,
    pub heart_rate: HeartRate,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            steps: defaults::STEPS,
            calories: defaults::CALORIES,
            active_minutes: defaults::ACTIVE_MINUTES,
            sleep_hours: defaults::SLEEP_HOURS,
            heart_rate: HeartRate {
                resting: defaults::RESTING_HR,
                average: defaults::AVERAGE_HR,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub user: User,
    pub activity: Activity,
    /// Ordered; duplicates are preserved (rule evaluation order).
    pub goals: Vec<String>,
    pub connected_apps: BTreeMap<String, bool>,
    /// Opaque to the normalizer.
    pub preferences: serde_json::Value,
    pub last_sync: String,
    pub created_at: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        let activity = Activity::default();
        let goals = suggest_goals(&activity);
        Self {
            id: "local-user".to_string(),
            user: User::default(),
            activity,
            goals,
            connected_apps: no_connected_apps(),
            preferences: empty_preferences(),
            last_sync: String::new(),
            created_at: String::new(),
        }
    }
}

impl UserProfile {
    /// Recompute `user.bmi` from the current weight and height. Upstream
    /// values are never trusted once weight or height change.
    pub fn refresh_bmi(&mut self) {
        self.user.bmi = bmi(self.user.weight, self.user.height);
    }

    /// Combine the four upstream daily reads into one canonical profile.
    /// BMI is computed, goals are suggested from the combined activity and
    /// the Fitbit integration is flagged as connected. `lastSync` and
    /// `createdAt` are left for the caller to stamp.
    pub fn from_snapshot(
        user: UpstreamUser,
        activity: ActivitySummaryDay,
        sleep: SleepSummaryDay,
        heart: HeartRateDay,
    ) -> Self {
        let weight = user.weight.unwrap_or(defaults::WEIGHT_KG);
        let height = user.height.unwrap_or(defaults::HEIGHT_CM);
        let age = user
            .age
            .or_else(|| {
                user.date_of_birth
                    .as_deref()
                    .and_then(crate::measures::age_from_date_of_birth)
            })
            .unwrap_or(defaults::AGE);

        let active_minutes = activity
            .very_active_minutes
            .unwrap_or(0)
            .saturating_add(activity.fairly_active_minutes.unwrap_or(0));
        let combined = Activity {
            steps: activity.steps.unwrap_or(defaults::STEPS),
            calories: activity.calories_out.unwrap_or(defaults::CALORIES),
            active_minutes: if active_minutes > 0 {
                active_minutes
            } else {
                defaults::ACTIVE_MINUTES
            },
            sleep_hours: sleep
                .total_minutes_asleep
                .map(|m| round1(m / 60.0))
                .unwrap_or(defaults::SLEEP_HOURS),
            heart_rate: HeartRate {
                resting: heart.resting_heart_rate.unwrap_or(defaults::RESTING_HR),
                average: heart.average_heart_rate.unwrap_or(defaults::AVERAGE_HR),
            },
        };

        let goals = suggest_goals(&combined);
        let mut apps = no_connected_apps();
        apps.insert("Fitbit".to_string(), true);

        Self {
            id: user.encoded_id.clone().unwrap_or_else(|| "fitbit-user".to_string()),
            user: User {
                name: user.display_name(),
                age,
                gender: user
                    .gender
                    .unwrap_or_else(|| defaults::GENDER.to_string()),
                weight,
                height,
                bmi: bmi(weight, height),
            },
            activity: combined,
            goals,
            connected_apps: apps,
            preferences: empty_preferences(),
            last_sync: String::new(),
            created_at: String::new(),
        }
    }
}

/// All known integrations, disconnected.
pub fn no_connected_apps() -> BTreeMap<String, bool> {
    INTEGRATIONS
        .iter()
        .map(|app| (app.to_string(), false))
        .collect()
}

pub(crate) fn empty_preferences() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// The documented fallback profile, returned whenever nothing in the input
/// is recognized. Matches the simulated upstream payload used throughout
/// development; fixed so the normalizer stays referentially transparent.
pub fn sample_profile() -> UserProfile {
    let mut apps = no_connected_apps();
    apps.insert("Fitbit".to_string(), true);
    UserProfile {
        id: "sample-user".to_string(),
        user: User {
            name: "Sarah Johnson".to_string(),
            age: 28,
            gender: "female".to_string(),
            weight: 65.2,
            height: 165.0,
            bmi: 23.9,
        },
        activity: Activity {
            steps: 12450,
            calories: 1850,
            active_minutes: 52,
            sleep_hours: 8.2,
            heart_rate: HeartRate {
                resting: 58,
                average: 72,
            },
        },
        goals: vec![
            "Improve Sleep Quality".to_string(),
            "Increase Daily Steps".to_string(),
        ],
        connected_apps: apps,
        preferences: empty_preferences(),
        last_sync: "2025-06-01T08:00:00Z".to_string(),
        created_at: "2025-06-01T08:00:00Z".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_serialization_uses_camel_case() {
        let v = serde_json::to_value(sample_profile()).expect("serialize");
        assert!(v.get("connectedApps").is_some());
        assert!(v["activity"].get("sleepHours").is_some());
        assert!(v["activity"]["heartRate"].get("resting").is_some());
        assert!(v.get("lastSync").is_some());
    }

    #[test]
    fn default_profile_has_every_field_populated() {
        let p = UserProfile::default();
        assert_eq!(p.user.name, defaults::NAME);
        assert_eq!(p.user.bmi, 24.2); // 70 kg at 170 cm
        assert_eq!(p.goals, vec!["Boost Energy".to_string()]);
        assert_eq!(p.connected_apps.len(), INTEGRATIONS.len());
        assert!(p.connected_apps.values().all(|v| !v));
    }

    #[test]
    fn refresh_bmi_tracks_weight_changes() {
        let mut p = sample_profile();
        p.user.weight = 75.5;
        p.user.height = 175.0;
        p.refresh_bmi();
        assert_eq!(p.user.bmi, 24.7);
    }

    #[test]
    fn snapshot_combines_upstream_reads() {
        let user = UpstreamUser {
            full_name: Some("Alex Kim".to_string()),
            weight: Some(80.0),
            height: Some(180.0),
            age: Some(41),
            gender: Some("male".to_string()),
            ..UpstreamUser::default()
        };
        let activity = ActivitySummaryDay {
            steps: Some(4200),
            calories_out: Some(2600),
            very_active_minutes: Some(12),
            fairly_active_minutes: Some(20),
        };
        let sleep = SleepSummaryDay {
            total_minutes_asleep: Some(372.0),
            efficiency: Some(91),
        };
        let heart = HeartRateDay {
            resting_heart_rate: Some(74),
            average_heart_rate: None,
        };

        let p = UserProfile::from_snapshot(user, activity, sleep, heart);
        assert_eq!(p.user.name, "Alex Kim");
        assert_eq!(p.user.bmi, 24.7);
        assert_eq!(p.activity.active_minutes, 32);
        assert_eq!(p.activity.sleep_hours, 6.2);
        assert_eq!(p.connected_apps["Fitbit"], true);
        // sleep<7, steps<10k, calories>2500, resting>70 all fire in order
        assert_eq!(
            p.goals,
            vec![
                "Improve Sleep",
                "Boost Energy",
                "Fat Loss",
                "Improve Sleep",
                "Boost Energy"
            ]
        );
    }
}
