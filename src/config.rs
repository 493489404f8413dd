//! Client configuration
//!
//! A [`ClientConfig`] carries everything a client needs to talk to one API:
//! endpoint, wire format, credentials, pagination, connection overrides and
//! rate limiting. It is built in code with [`ClientConfig::builder`] or
//! loaded from YAML:
//!
//! ```yaml
//! endpoint: https://api.example.com/v1
//! access_token: "..."
//! page_size: 100
//! pagination:
//!   type: offset
//!   data_path: items
//! rate_limit:
//!   limit: 10
//!   period_secs: 1
//! ```

use crate::auth::Credentials;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClientConfig;
use crate::pagination::{PaginationConfig, Pager};
use crate::types::Format;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Client Config
// ============================================================================

/// Configuration of one API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL requests are joined onto
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Wire format (`json` unless configured otherwise)
    #[serde(default)]
    pub format: Format,

    /// Records per page requested by the pagers
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Value of the `User-Agent` header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Credential fields (`access_token`, `client_id`, ...)
    #[serde(flatten)]
    pub credentials: Credentials,

    /// How paged requests advance
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Connection overrides
    #[serde(default)]
    pub connection: ConnectionOptions,

    /// Throttle requests through a sliding window when set
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,

    /// Log requests and responses at debug level
    #[serde(default)]
    pub log_requests: bool,
}

fn default_page_size() -> u32 {
    500
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            format: Format::default(),
            page_size: default_page_size(),
            user_agent: default_user_agent(),
            credentials: Credentials::default(),
            pagination: PaginationConfig::default(),
            connection: ConnectionOptions::default(),
            rate_limit: None,
            log_requests: false,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde accepts but a client cannot use
    pub fn validate(&self) -> Result<()> {
        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.period()?;
        }
        Ok(())
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    /// A fresh pager for one paginated call
    pub fn pager(&self) -> Box<dyn Pager> {
        self.pagination.pager(self.page_size)
    }

    /// Whether the wire format is JSON
    pub fn is_json(&self) -> bool {
        self.format.is_json()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Set the wire format
    pub fn format(mut self, format: impl Into<Format>) -> Self {
        self.config.format = format.into();
        self
    }

    /// Set the page size
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Replace all credentials
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// Set the access token
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.credentials.access_token = Some(token.into());
        self
    }

    /// Set the token type
    pub fn token_type(mut self, token_type: impl Into<String>) -> Self {
        self.config.credentials.token_type = token_type.into();
        self
    }

    /// Set the client id and secret
    pub fn client(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.config.credentials.client_id = Some(id.into());
        self.config.credentials.client_secret = Some(secret.into());
        self
    }

    /// Set login credentials
    pub fn login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials.username = Some(username.into());
        self.config.credentials.password = Some(password.into());
        self
    }

    /// Set the pagination strategy
    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.config.pagination = pagination;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.connection.timeout_secs = timeout.as_secs();
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .connection
            .headers
            .insert(name.into(), value.into());
        self
    }

    /// Throttle to `limit` requests per `period`
    pub fn rate_limit(mut self, limit: usize, period: Duration) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            limit,
            period_secs: period.as_secs_f64(),
        });
        self
    }

    /// Turn request logging on or off
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.config.log_requests = enabled;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Overrides for the underlying connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionOptions {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            headers: HashMap::new(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl ConnectionOptions {
    /// Adapter configuration for these options
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }
}

// ============================================================================
// Rate Limiting
// ============================================================================

/// Sliding window rate limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests admitted per period
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Window length in seconds
    #[serde(default = "default_period")]
    pub period_secs: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            period_secs: default_period(),
        }
    }
}

fn default_limit() -> usize {
    300
}

fn default_period() -> f64 {
    60.0
}

impl RateLimitConfig {
    /// Window length.
    ///
    /// Fails for a negative, NaN or out of range `period_secs`.
    pub fn period(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.period_secs).map_err(|e| {
            Error::invalid_value("rate_limit.period_secs", format!("{}: {e}", self.period_secs))
        })
    }
}
