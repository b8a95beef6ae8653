//! "Simulate time passing" demo perturbation.
//!
//! Replaces the stored profile's measured values with fresh plausible ones:
//! steps, sleep, heart rate, weight and age move; BMI is recomputed from the
//! new weight. Goals stay as stored.

use fitbit_client::UserProfile;
use fitbit_client::measures::round1;
use rand::{Rng, RngExt};

pub fn simulate_time_passing<R: Rng + ?Sized>(profile: &mut UserProfile, rng: &mut R) {
    profile.activity.steps = rng.random_range(3_000..15_000);
    profile.activity.sleep_hours = round1(rng.random_range(5.0..9.0));
    profile.activity.heart_rate.resting = rng.random_range(55..=80);
    profile.activity.heart_rate.average = rng.random_range(65..=95);

    let drift = rng.random_range(-3.0..=3.0);
    profile.user.weight = round1((profile.user.weight + drift).max(40.0));
    profile.user.age += rng.random_range(0..=2);

    profile.refresh_bmi();
}
