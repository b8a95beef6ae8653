//! HTTP client implementation for the upstream fitness API.
//!
//! This module provides a reqwest-based implementation of the [`FitbitClient`](crate::FitbitClient) trait.

use crate::retry::RetryPolicy;
use crate::{
    ActivitySummaryDay, FitbitClient, FitbitError, HeartRateDay, SleepSummaryDay, UpstreamUser,
    UserProfile,
};
use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use secrecy::{ExposeSecret, SecretString};

/// Client for the upstream fitness API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestFitbitClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl ReqwestFitbitClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the upstream API (e.g., "https://api.fitbit.com")
    /// * `access_token` - The OAuth Bearer token for the user
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client,
            retry: RetryPolicy::default(),
        }
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// Execute an authenticated GET with retry and expect a JSON response.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        endpoint: &'static str,
    ) -> Result<T, FitbitError> {
        counter!("fitbit_client_requests_total", "endpoint" => endpoint).increment(1);
        let this = self;
        self.retry
            .retry_async(is_retryable, move || async move {
                let resp = this.get_request(url).send().await?;
                this.handle_response(resp).await
            })
            .await
            .inspect_err(|err| {
                counter!("fitbit_client_request_errors_total", "endpoint" => endpoint)
                    .increment(1);
                tracing::debug!(endpoint, %err, "upstream request failed");
            })
    }

    /// Handle a response, converting status codes to appropriate errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, FitbitError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> FitbitError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => FitbitError::NotFound(body_snippet),
            401 | 403 => FitbitError::Auth(body_snippet),
            422 => FitbitError::InvalidInput(body_snippet),
            _ => FitbitError::from_status(status, body_snippet),
        }
    }
}

impl ReqwestFitbitClient {
    /// Validate a daily-summary date selector: the literal `today` or a
    /// `YYYY-MM-DD` calendar date.
    pub fn normalize_date(s: &str) -> Result<&str, FitbitError> {
        if s == "today" || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
            return Ok(s);
        }
        Err(FitbitError::InvalidInput(format!("invalid date: {}", s)))
    }
}

fn is_retryable(err: &FitbitError) -> bool {
    match err {
        FitbitError::Http(e) => e.is_timeout() || e.is_connect(),
        FitbitError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}

#[async_trait]
impl FitbitClient for ReqwestFitbitClient {
    async fn get_user_profile(&self) -> Result<UpstreamUser, FitbitError> {
        let url = format!("{}/1/user/-/profile.json", self.base_url);

        #[derive(serde::Deserialize)]
        struct ProfilePayload {
            user: Option<UpstreamUser>,
        }

        let payload: ProfilePayload = self.get_json(&url, "profile").await?;
        payload
            .user
            .ok_or_else(|| FitbitError::Config("missing user profile data".into()))
    }

    async fn get_activity_summary(
        &self,
        date: &str,
    ) -> Result<ActivitySummaryDay, FitbitError> {
        let date = Self::normalize_date(date)?;
        let url = format!("{}/1/user/-/activities/date/{}.json", self.base_url, date);

        #[derive(serde::Deserialize)]
        struct ActivityPayload {
            summary: Option<ActivitySummaryDay>,
        }

        let payload: ActivityPayload = self.get_json(&url, "activity").await?;
        Ok(payload.summary.unwrap_or_default())
    }

    async fn get_sleep_summary(&self, date: &str) -> Result<SleepSummaryDay, FitbitError> {
        let date = Self::normalize_date(date)?;
        let url = format!("{}/1/user/-/sleep/date/{}.json", self.base_url, date);

        #[derive(serde::Deserialize)]
        struct SleepPayload {
            summary: Option<SleepSummaryDay>,
        }

        let payload: SleepPayload = self.get_json(&url, "sleep").await?;
        Ok(payload.summary.unwrap_or_default())
    }

    async fn get_heart_rate_summary(&self, date: &str) -> Result<HeartRateDay, FitbitError> {
        let date = Self::normalize_date(date)?;
        let url = format!(
            "{}/1/user/-/activities/heart/date/{}/1d.json",
            self.base_url, date
        );

        #[derive(serde::Deserialize, Default)]
        struct HeartEntry {
            value: Option<HeartRateDay>,
        }
        #[derive(serde::Deserialize)]
        struct HeartPayload {
            #[serde(rename = "activities-heart", default)]
            activities_heart: Vec<HeartEntry>,
        }

        let payload: HeartPayload = self.get_json(&url, "heart_rate").await?;
        Ok(payload
            .activities_heart
            .into_iter()
            .next()
            .and_then(|entry| entry.value)
            .unwrap_or_default())
    }

    async fn fetch_snapshot(&self, date: &str) -> Result<UserProfile, FitbitError> {
        let date = Self::normalize_date(date)?;
        let (user, activity, sleep, heart) = tokio::try_join!(
            self.get_user_profile(),
            self.get_activity_summary(date),
            self.get_sleep_summary(date),
            self.get_heart_rate_summary(date),
        )?;

        counter!("fitbit_client_snapshots_total").increment(1);
        let mut profile = UserProfile::from_snapshot(user, activity, sleep, heart);
        profile.last_sync = Utc::now().to_rfc3339();
        tracing::info!(id = %profile.id, "imported upstream snapshot");
        Ok(profile)
    }
}
