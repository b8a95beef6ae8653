//! Client for the opaque AI text-generation webhook.
//!
//! The endpoint takes `{chatinput, sessionId, fitbit_session}` and answers
//! in whatever shape its current configuration produces. Replies are
//! unwrapped by an ordered list of extractors, first match wins; any
//! transport failure or cascade miss degrades to a fixed fallback text, so
//! the send path is infallible from the caller's perspective.

use metrics::counter;
use serde_json::Value;
use std::time::Duration;

/// Returned whenever the webhook is unreachable, times out, or answers in a
/// shape nothing in the cascade recognizes.
pub const FALLBACK_INSIGHT: &str = "Thanks for sharing your health profile! \
General guidance while the coach is offline: keep a consistent sleep \
schedule, aim for daily movement, eat whole foods and stay hydrated. Small \
changes lead to big results.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One attempt at reading a reply out of a response body.
type Extractor = fn(&Value) -> Option<String>;

/// Tried in order; the first extractor returning text wins.
const EXTRACTORS: [Extractor; 7] = [
    first_element_output,
    |v| field_string(v, "response"),
    |v| field_string(v, "message"),
    |v| field_string(v, "text"),
    |v| field_string(v, "content"),
    openai_choices,
    bare_string,
];

#[derive(Clone, Debug)]
pub struct InsightClient {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl InsightClient {
    /// `endpoint` of `None` builds an offline client that always answers
    /// with the fallback text.
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build should not fail");
        Self { endpoint, client }
    }

    pub fn is_offline(&self) -> bool {
        self.endpoint.is_none()
    }

    /// Send a prompt and return the best-effort reply text. Never fails.
    pub async fn send(&self, chatinput: &str, session_id: &str, fitbit_session: &str) -> String {
        let Some(endpoint) = &self.endpoint else {
            counter!("coach_insight_fallbacks_total", "reason" => "offline").increment(1);
            return FALLBACK_INSIGHT.to_string();
        };

        let payload = serde_json::json!({
            "chatinput": chatinput,
            "sessionId": session_id,
            "fitbit_session": fitbit_session,
        });

        let body = match self.client.post(endpoint).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(%err, "insight response body unreadable");
                    counter!("coach_insight_fallbacks_total", "reason" => "transport")
                        .increment(1);
                    return FALLBACK_INSIGHT.to_string();
                }
            },
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "insight endpoint returned an error");
                counter!("coach_insight_fallbacks_total", "reason" => "status").increment(1);
                return FALLBACK_INSIGHT.to_string();
            }
            Err(err) => {
                tracing::warn!(%err, "insight endpoint unreachable");
                counter!("coach_insight_fallbacks_total", "reason" => "transport").increment(1);
                return FALLBACK_INSIGHT.to_string();
            }
        };

        match unwrap_reply(&body) {
            Some(reply) => reply,
            None => {
                tracing::warn!("insight response shape not recognized");
                counter!("coach_insight_fallbacks_total", "reason" => "shape").increment(1);
                FALLBACK_INSIGHT.to_string()
            }
        }
    }
}

/// Run the extractor cascade over a response body. A body that is not JSON
/// at all is taken as the reply text itself.
pub fn unwrap_reply(body: &str) -> Option<String> {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(_) => {
            let trimmed = body.trim();
            return (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
    };
    EXTRACTORS.iter().find_map(|extract| extract(&value))
}

/// `[{"output": "..."}]`, where the output may itself be a JSON document
/// with one of the usual text fields.
fn first_element_output(v: &Value) -> Option<String> {
    let output = v.as_array()?.first()?.get("output")?;
    let text = nonempty(output.as_str()?)?;
    if let Ok(nested) = serde_json::from_str::<Value>(&text) {
        for key in ["response", "message", "text", "content"] {
            if let Some(inner) = field_string(&nested, key) {
                return Some(inner);
            }
        }
    }
    Some(text)
}

fn field_string(v: &Value, key: &str) -> Option<String> {
    nonempty(v.get(key)?.as_str()?)
}

/// OpenAI-style `choices[0].message.content`.
fn openai_choices(v: &Value) -> Option<String> {
    nonempty(
        v.get("choices")?
            .as_array()?
            .first()?
            .get("message")?
            .get("content")?
            .as_str()?,
    )
}

fn bare_string(v: &Value) -> Option<String> {
    nonempty(v.as_str()?)
}

fn nonempty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
