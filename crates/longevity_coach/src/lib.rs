//! HTTP service driving the health-profile flow: import or sign up, read
//! the stored profile, then ask the AI webhook for insights, chat replies
//! and product recommendations.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

pub mod demo;
pub mod domains;
pub mod error;
pub mod insight;
pub mod prompts;
pub mod recommend;
pub mod state;
pub mod store;
pub mod types;

pub use error::{CoachError, CoachResult};
pub use insight::InsightClient;
pub use state::{AppState, SessionIds, SharedState, ViewState};
pub use store::ProfileStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn metrics_endpoint(State(state): State<SharedState>) -> impl IntoResponse {
    let body = state.metrics.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

async fn session(State(state): State<SharedState>) -> Json<types::SessionResult> {
    Json(types::SessionResult {
        view: state.view().await,
        session_id: state.session.session_id.clone(),
        fitbit_session: state.session.fitbit_session.clone(),
        has_profile: state.store.has_profile(),
    })
}

pub fn build_router(state: SharedState) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/session", get(session))
        .route("/signup", post(domains::profile::signup))
        .route("/import", post(domains::import::import))
        .route("/import/payload", post(domains::import::import_payload))
        .route(
            "/profile",
            get(domains::profile::get_profile).delete(domains::profile::reset_profile),
        )
        .route("/simulate", post(domains::profile::simulate))
        .route("/insights", get(domains::insights::insights))
        .route("/chat", post(domains::chat::chat))
        .route("/recommendations", get(domains::insights::recommendations))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}
