//! Rule-based goal suggestion.
//!
//! Four threshold checks evaluated in a fixed order, each appending zero or
//! more labels. Rules are additive and not mutually exclusive; duplicate
//! labels are kept (rule 4 re-appends labels rules 1 and 2 may already have
//! produced). An empty result is replaced by the maintenance pair.

use crate::profile::Activity;

pub const IMPROVE_SLEEP: &str = "Improve Sleep";
pub const BOOST_ENERGY: &str = "Boost Energy";
pub const FAT_LOSS: &str = "Fat Loss";
pub const MAINTAIN_HEALTH: &str = "Maintain Health";
pub const LONGEVITY: &str = "Longevity";

const SLEEP_HOURS_FLOOR: f64 = 7.0;
const STEPS_FLOOR: u64 = 10_000;
const CALORIES_CEILING: u32 = 2_500;
const RESTING_HR_CEILING: u32 = 70;

pub fn suggest_goals(activity: &Activity) -> Vec<String> {
    let mut goals = Vec::new();

    if activity.sleep_hours < SLEEP_HOURS_FLOOR {
        goals.push(IMPROVE_SLEEP.to_string());
    }
    if activity.steps < STEPS_FLOOR {
        goals.push(BOOST_ENERGY.to_string());
    }
    if activity.calories > CALORIES_CEILING {
        goals.push(FAT_LOSS.to_string());
    }
    if activity.heart_rate.resting > RESTING_HR_CEILING {
        goals.push(IMPROVE_SLEEP.to_string());
        goals.push(BOOST_ENERGY.to_string());
    }

    if goals.is_empty() {
        goals.push(MAINTAIN_HEALTH.to_string());
        goals.push(LONGEVITY.to_string());
    }
    goals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::HeartRate;

    fn activity(steps: u64, calories: u32, sleep_hours: f64, resting: u32) -> Activity {
        Activity {
            steps,
            calories,
            active_minutes: 30,
            sleep_hours,
            heart_rate: HeartRate {
                resting,
                average: 72,
            },
        }
    }

    #[test]
    fn short_sleep_alone() {
        let goals = suggest_goals(&activity(12_000, 2_000, 6.0, 65));
        assert_eq!(goals, vec![IMPROVE_SLEEP]);
    }

    #[test]
    fn all_thresholds_met_yields_maintenance_pair() {
        let goals = suggest_goals(&activity(12_000, 2_000, 8.0, 65));
        assert_eq!(goals, vec![MAINTAIN_HEALTH, LONGEVITY]);
    }

    #[test]
    fn elevated_resting_hr_duplicates_labels() {
        let goals = suggest_goals(&activity(4_000, 2_600, 6.0, 75));
        assert_eq!(
            goals,
            vec![
                IMPROVE_SLEEP,
                BOOST_ENERGY,
                FAT_LOSS,
                IMPROVE_SLEEP,
                BOOST_ENERGY
            ]
        );
    }

    #[test]
    fn boundary_values_do_not_fire() {
        // 7h sleep, 10k steps, 2500 kcal and resting 70 all sit exactly on
        // their thresholds.
        let goals = suggest_goals(&activity(10_000, 2_500, 7.0, 70));
        assert_eq!(goals, vec![MAINTAIN_HEALTH, LONGEVITY]);
    }
}
