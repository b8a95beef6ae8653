//! AI insight text and product recommendations.

use axum::Json;
use axum::extract::State;
use metrics::counter;

use crate::error::{CoachError, CoachResult};
use crate::prompts;
use crate::recommend::parse_products;
use crate::state::{SharedState, ViewState};
use crate::types::{InsightResult, RecommendationsResult};

pub async fn insights(State(state): State<SharedState>) -> CoachResult<Json<InsightResult>> {
    let profile = state
        .store
        .load()
        .ok_or_else(|| CoachError::NotFound("no profile imported yet".into()))?;

    let prompt = prompts::insight_prompt(&profile);
    let insight = state
        .insight
        .send(
            &prompt,
            &state.session.session_id,
            &state.session.fitbit_session,
        )
        .await;

    state.set_view(ViewState::Insights).await;
    counter!("coach_insights_total").increment(1);
    Ok(Json(InsightResult {
        insight,
        view: ViewState::Insights,
    }))
}

pub async fn recommendations(
    State(state): State<SharedState>,
) -> CoachResult<Json<RecommendationsResult>> {
    let profile = state
        .store
        .load()
        .ok_or_else(|| CoachError::NotFound("no profile imported yet".into()))?;

    let prompt = prompts::recommendation_prompt(&profile);
    let reply = state
        .insight
        .send(
            &prompt,
            &state.session.session_id,
            &state.session.fitbit_session,
        )
        .await;
    let products = parse_products(&reply);

    state.set_view(ViewState::Recommendations).await;
    counter!("coach_recommendations_total").increment(1);
    Ok(Json(RecommendationsResult {
        products,
        view: ViewState::Recommendations,
    }))
}
