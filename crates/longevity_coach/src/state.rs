use metrics_exporter_prometheus::PrometheusHandle;
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::insight::InsightClient;
use crate::store::ProfileStore;
use fitbit_client::FitbitClient;

/// Which screen of the linear flow is active.
///
/// Exactly one variant at a time; the explicit tagged union replaces the
/// pile of independent visibility flags the original client juggled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Import,
    Profile,
    Insights,
    Chat,
    Recommendations,
}

/// Identifiers sent with every AI webhook call.
#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct SessionIds {
    pub session_id: String,
    pub fitbit_session: String,
}

impl SessionIds {
    pub fn generate() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            fitbit_session: Uuid::new_v4().to_string(),
        }
    }
}

pub struct AppState {
    pub client: Arc<dyn FitbitClient>,
    pub insight: InsightClient,
    pub store: ProfileStore,
    pub metrics: PrometheusHandle,
    pub session: SessionIds,
    view: RwLock<ViewState>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        client: Arc<dyn FitbitClient>,
        insight: InsightClient,
        store: ProfileStore,
        metrics: PrometheusHandle,
    ) -> Self {
        // A profile surviving from a previous run lands the flow on the
        // profile screen, not the import screen.
        let view = if store.has_profile() {
            ViewState::Profile
        } else {
            ViewState::Import
        };
        Self {
            client,
            insight,
            store,
            metrics,
            session: SessionIds::generate(),
            view: RwLock::new(view),
        }
    }

    pub async fn view(&self) -> ViewState {
        *self.view.read().await
    }

    pub async fn set_view(&self, view: ViewState) {
        *self.view.write().await = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_distinct() {
        let s = SessionIds::generate();
        assert_ne!(s.session_id, s.fitbit_session);
    }

    #[test]
    fn view_state_serializes_snake_case() {
        let v = serde_json::to_value(ViewState::Recommendations).unwrap();
        assert_eq!(v, serde_json::json!("recommendations"));
    }
}
