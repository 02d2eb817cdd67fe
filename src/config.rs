//! Configuration for the E-utilities client
//!
//! A [`ClientConfig`] is built once at process start and handed to
//! [`PubMedClient::with_config`](crate::PubMedClient::with_config). Nothing below the
//! binary's `main` reads the environment.

use std::time::Duration;

use crate::retry::RetryConfig;

pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_TOOL: &str = "pubmed-proxy";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Identification, endpoint and resilience settings for upstream calls
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key; raises the allowed request rate when present
    pub api_key: Option<String>,
    /// Contact email sent with every request
    pub email: Option<String>,
    /// Tool identifier sent with every request
    pub tool: Option<String>,
    /// Override for the E-utilities base URL (used by tests)
    pub base_url: Option<String>,
    /// Override for the HTTP user agent
    pub user_agent: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry policy for every outbound call
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a configuration with defaults and no credentials
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_proxy::ClientConfig;
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// assert_eq!(config.effective_tool(), "pubmed-proxy");
    /// ```
    pub fn new() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            base_url: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            retry_config: RetryConfig::default(),
        }
    }

    /// Set the API key. An empty key is treated as unset.
    pub fn with_api_key<S: AsRef<str>>(mut self, api_key: S) -> Self {
        let key = api_key.as_ref().trim();
        self.api_key = (!key.is_empty()).then(|| key.to_string());
        self
    }

    pub fn with_email<S: AsRef<str>>(mut self, email: S) -> Self {
        let email = email.as_ref().trim();
        self.email = (!email.is_empty()).then(|| email.to_string());
        self
    }

    pub fn with_tool<S: AsRef<str>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.as_ref().to_string());
        self
    }

    pub fn with_base_url<S: AsRef<str>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.as_ref().trim_end_matches('/').to_string());
        self
    }

    pub fn with_user_agent<S: AsRef<str>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.as_ref().to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("pubmed-proxy/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Parameters appended to every E-utilities request
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("tool".to_string(), self.effective_tool().to_string())];

        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }

        params
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
