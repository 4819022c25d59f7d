use std::env;
use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_INTERVIEW_SECS: u32 = 20 * 60;

/// Where the practice API lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reads `LEARN_API_BASE_URL`, defaulting to the local dev server.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("LEARN_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        Self::new(base_url)
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

/// Bearer token for one signed-in user, handed to the HTTP client explicitly.
#[derive(Clone, Default)]
pub struct Credentials {
    token: Option<SecretString>,
}

impl Credentials {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        let token: String = token.into();
        if token.trim().is_empty() {
            return Self::anonymous();
        }
        Self {
            token: Some(SecretString::from(token)),
        }
    }

    /// Reads `LEARN_API_TOKEN`; anonymous when unset or blank.
    #[must_use]
    pub fn from_env() -> Self {
        env::var("LEARN_API_TOKEN").map_or_else(|_| Self::anonymous(), Self::bearer)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub(crate) fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Timing knobs shared by the session runners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    pub interview_budget_secs: u32,
    pub assessment_budget_secs: Option<u32>,
    pub tick: Duration,
    pub interview_redirect_delay: Duration,
    pub assessment_redirect_delay: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interview_budget_secs: DEFAULT_INTERVIEW_SECS,
            assessment_budget_secs: None,
            tick: Duration::from_secs(1),
            interview_redirect_delay: Duration::from_secs(2),
            assessment_redirect_delay: Duration::from_secs(3),
        }
    }
}

impl RunnerConfig {
    /// Defaults, with `LEARN_INTERVIEW_SECS` overriding the interview budget.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(secs) = env::var("LEARN_INTERVIEW_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u32>().ok())
        {
            config.interview_budget_secs = secs;
        }
        config
    }

    #[must_use]
    pub fn with_interview_budget(mut self, secs: u32) -> Self {
        self.interview_budget_secs = secs;
        self
    }

    #[must_use]
    pub fn with_assessment_budget(mut self, secs: Option<u32>) -> Self {
        self.assessment_budget_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ApiConfig::new("http://localhost:8000/");
        assert_eq!(
            config.endpoint("/api/interviews/abc"),
            "http://localhost:8000/api/interviews/abc"
        );
    }

    #[test]
    fn blank_token_is_anonymous() {
        assert!(!Credentials::bearer("  ").is_authenticated());
        assert!(Credentials::bearer("t0ken").is_authenticated());
    }

    #[test]
    fn credentials_debug_hides_token() {
        let rendered = format!("{:?}", Credentials::bearer("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn runner_defaults_match_session_timing() {
        let config = RunnerConfig::default();
        assert_eq!(config.interview_budget_secs, 1200);
        assert_eq!(config.assessment_budget_secs, None);
        assert_eq!(config.tick, Duration::from_secs(1));
    }
}
