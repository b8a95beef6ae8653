//! Prompt builders for the AI webhook.
//!
//! Plain string builders; the webhook owns the model side, we only shape the
//! text it receives.

use fitbit_client::UserProfile;

/// Comma-joined list of connected integrations, or "None".
fn connected_apps(profile: &UserProfile) -> String {
    let apps: Vec<&str> = profile
        .connected_apps
        .iter()
        .filter(|(_, connected)| **connected)
        .map(|(name, _)| name.as_str())
        .collect();
    if apps.is_empty() {
        "None".to_string()
    } else {
        apps.join(", ")
    }
}

fn profile_summary(profile: &UserProfile) -> String {
    format!(
        "User Profile:\n\
         - Name: {}\n\
         - Age: {} years old\n\
         - Gender: {}\n\
         - Weight: {} kg\n\
         - Height: {} cm\n\
         - BMI: {}\n\
         - Daily Steps: {}\n\
         - Calories Burned: {}\n\
         - Sleep: {} hours\n\
         - Resting Heart Rate: {} bpm\n\
         - Health Goals: {}\n\
         - Connected Health Apps: {}",
        profile.user.name,
        profile.user.age,
        profile.user.gender,
        profile.user.weight,
        profile.user.height,
        profile.user.bmi,
        profile.activity.steps,
        profile.activity.calories,
        profile.activity.sleep_hours,
        profile.activity.heart_rate.resting,
        profile.goals.join(", "),
        connected_apps(profile),
    )
}

pub fn insight_prompt(profile: &UserProfile) -> String {
    format!(
        "You are a personalized health coach. Based on the following user \
         profile, provide actionable health insights and recommendations:\n\n\
         {}\n\n\
         Please provide:\n\
         1. A personalized greeting\n\
         2. BMI analysis and what it means\n\
         3. Specific recommendations for their health goals\n\
         4. Suggested lifestyle changes\n\
         5. Next steps to get started\n\n\
         Keep the response friendly, encouraging, and actionable. Format it \
         nicely with clear sections.",
        profile_summary(profile)
    )
}

pub fn chat_prompt(profile: &UserProfile, message: &str) -> String {
    format!(
        "You are a personal health coach chatting with a user. Answer their \
         question using the profile below; stay concise, friendly and \
         practical.\n\n{}\n\nUser message: {}",
        profile_summary(profile),
        message
    )
}

pub fn recommendation_prompt(profile: &UserProfile) -> String {
    format!(
        "You are a health product advisor. Based on the user profile below, \
         recommend products matched to their goals.\n\n{}\n\n\
         Respond with ONLY a JSON array, no prose, where each element is an \
         object with \"name\", \"category\" and \"reason\" string fields.",
        profile_summary(profile)
    )
}
