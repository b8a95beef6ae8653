//! Manual signup and the stored-profile lifecycle.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use metrics::counter;

use crate::error::{CoachError, CoachResult};
use crate::state::{SharedState, ViewState};
use crate::types::SignupParams;
use fitbit_client::goals::suggest_goals;
use fitbit_client::profile::no_connected_apps;
use fitbit_client::{Activity, User, UserProfile};

/// Build a profile from the signup form. Required fields are checked up
/// front; no network is involved.
pub async fn signup(
    State(state): State<SharedState>,
    Json(params): Json<SignupParams>,
) -> CoachResult<Json<UserProfile>> {
    let profile = profile_from_signup(params)?;
    let stored = state.store.save(profile)?;
    state.set_view(ViewState::Profile).await;
    counter!("coach_signups_total").increment(1);
    Ok(Json(stored))
}

pub async fn get_profile(State(state): State<SharedState>) -> CoachResult<Json<UserProfile>> {
    let profile = state
        .store
        .load()
        .ok_or_else(|| CoachError::NotFound("no profile imported yet".into()))?;
    Ok(Json(profile))
}

pub async fn reset_profile(State(state): State<SharedState>) -> CoachResult<StatusCode> {
    state.store.reset()?;
    state.set_view(ViewState::Import).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the stored measurements with fresh demo values.
pub async fn simulate(State(state): State<SharedState>) -> CoachResult<Json<UserProfile>> {
    let mut profile = state
        .store
        .load()
        .ok_or_else(|| CoachError::NotFound("no profile to simulate".into()))?;
    crate::demo::simulate_time_passing(&mut profile, &mut rand::rng());
    profile.last_sync = Utc::now().to_rfc3339();
    let stored = state.store.save(profile)?;
    Ok(Json(stored))
}

fn profile_from_signup(params: SignupParams) -> CoachResult<UserProfile> {
    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| CoachError::Validation("name is required".into()))?
        .to_string();
    let age = params
        .age
        .ok_or_else(|| CoachError::Validation("age is required".into()))?;
    let weight = params
        .weight
        .filter(|w| *w > 0.0)
        .ok_or_else(|| CoachError::Validation("weight (kg) is required".into()))?;
    let height = params
        .height
        .filter(|h| *h > 0.0)
        .ok_or_else(|| CoachError::Validation("height (cm) is required".into()))?;

    let activity = Activity::default();
    let goals = if params.goals.is_empty() {
        suggest_goals(&activity)
    } else {
        params.goals
    };
    let mut connected_apps = no_connected_apps();
    for (app, connected) in params.integrations {
        connected_apps.insert(app, connected);
    }

    let mut profile = UserProfile {
        id: uuid::Uuid::new_v4().to_string(),
        user: User {
            name,
            age,
            gender: params.gender.unwrap_or_else(|| "other".to_string()),
            weight,
            height,
            bmi: 0.0,
        },
        activity,
        goals,
        connected_apps,
        last_sync: Utc::now().to_rfc3339(),
        ..UserProfile::default()
    };
    profile.refresh_bmi();
    Ok(profile)
}
