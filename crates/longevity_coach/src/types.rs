use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::recommend::Product;
use crate::state::ViewState;

/// Manual profile creation. Name, age, weight and height are required;
/// their absence is a validation failure surfaced before any network call.
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SignupParams {
    pub name: Option<String>,
    pub age: Option<u32>,
    /// Kilograms.
    pub weight: Option<f64>,
    /// Centimeters.
    pub height: Option<f64>,
    pub gender: Option<String>,
    /// Selected goal labels; empty means "suggest for me".
    #[serde(default)]
    pub goals: Vec<String>,
    /// Integration name → connected flag.
    #[serde(default)]
    pub integrations: BTreeMap<String, bool>,
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct ImportParams {
    /// `YYYY-MM-DD` or `today` (default).
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ChatParams {
    pub message: String,
    /// Override for the server-generated session id.
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct InsightResult {
    pub insight: String,
    pub view: ViewState,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ChatResult {
    pub reply: String,
    pub session_id: String,
    pub view: ViewState,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RecommendationsResult {
    pub products: Vec<Product>,
    pub view: ViewState,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SessionResult {
    pub view: ViewState,
    pub session_id: String,
    pub fitbit_session: String,
    pub has_profile: bool,
}
