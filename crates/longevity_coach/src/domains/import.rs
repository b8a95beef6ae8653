//! Importing upstream data into the profile slot.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use metrics::counter;

use crate::error::CoachResult;
use crate::state::{SharedState, ViewState};
use crate::types::ImportParams;
use fitbit_client::UserProfile;
use fitbit_client::normalize::normalize_text;

/// Fan out the four upstream reads, combine, persist. Any single upstream
/// failure fails the whole import.
pub async fn import(
    State(state): State<SharedState>,
    params: Option<Json<ImportParams>>,
) -> CoachResult<Json<UserProfile>> {
    let params = params.map(|Json(p)| p).unwrap_or_default();
    let date = params.date.as_deref().unwrap_or("today");

    let profile = state.client.fetch_snapshot(date).await?;
    let stored = state.store.save(profile)?;
    state.set_view(ViewState::Profile).await;
    counter!("coach_imports_total", "source" => "upstream").increment(1);
    Ok(Json(stored))
}

/// Push an arbitrary payload (JSON or text) through the normalizer. This
/// path never rejects a body; unrecognized input lands on the built-in
/// sample profile.
pub async fn import_payload(
    State(state): State<SharedState>,
    body: String,
) -> CoachResult<Json<UserProfile>> {
    let mut profile = normalize_text(&body);
    profile.last_sync = Utc::now().to_rfc3339();
    let stored = state.store.save(profile)?;
    state.set_view(ViewState::Profile).await;
    counter!("coach_imports_total", "source" => "payload").increment(1);
    Ok(Json(stored))
}
