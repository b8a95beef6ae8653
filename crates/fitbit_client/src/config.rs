use crate::FitbitError;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub access_token: SecretString,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, FitbitError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FitbitError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get("FITBIT_ACCESS_TOKEN")
            .ok_or_else(|| FitbitError::Config("FITBIT_ACCESS_TOKEN missing".into()))?;
        let base_url =
            get("FITBIT_BASE_URL").unwrap_or_else(|| "https://api.fitbit.com".into());
        Ok(Self {
            access_token: SecretString::new(token.into()),
            base_url,
        })
    }
}
