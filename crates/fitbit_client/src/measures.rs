//! BMI and age arithmetic.

use chrono::{Datelike, NaiveDate, Utc};

/// Round to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Body-mass index from weight in kilograms and height in centimeters,
/// rounded to one decimal. Non-positive height yields 0.0 rather than a
/// division blow-up.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    if height_cm <= 0.0 || weight_kg <= 0.0 {
        return 0.0;
    }
    let height_m = height_cm / 100.0;
    round1(weight_kg / (height_m * height_m))
}

/// Whole years between `birth` and `today`, decremented by one when the
/// birthday has not yet occurred in the current year.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Parse an upstream `dateOfBirth` (`YYYY-MM-DD`) and compute the age as of
/// today. Unparseable or future dates yield `None`.
pub fn age_from_date_of_birth(dob: &str) -> Option<u32> {
    let birth = NaiveDate::parse_from_str(dob, "%Y-%m-%d").ok()?;
    let age = age_on(birth, Utc::now().date_naive());
    u32::try_from(age).ok()
}
