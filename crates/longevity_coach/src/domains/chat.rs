//! AI chat over the stored profile.

use axum::Json;
use axum::extract::State;
use metrics::counter;

use crate::error::{CoachError, CoachResult};
use crate::prompts;
use crate::state::{SharedState, ViewState};
use crate::types::{ChatParams, ChatResult};

pub async fn chat(
    State(state): State<SharedState>,
    Json(params): Json<ChatParams>,
) -> CoachResult<Json<ChatResult>> {
    let message = params.message.trim();
    if message.is_empty() {
        return Err(CoachError::Validation("message must not be empty".into()));
    }

    let profile = state
        .store
        .load()
        .ok_or_else(|| CoachError::NotFound("no profile imported yet".into()))?;

    let session_id = params
        .session_id
        .unwrap_or_else(|| state.session.session_id.clone());
    let prompt = prompts::chat_prompt(&profile, message);
    let reply = state
        .insight
        .send(&prompt, &session_id, &state.session.fitbit_session)
        .await;

    state.set_view(ViewState::Chat).await;
    counter!("coach_chat_messages_total").increment(1);
    Ok(Json(ChatResult {
        reply,
        session_id,
        view: ViewState::Chat,
    }))
}
