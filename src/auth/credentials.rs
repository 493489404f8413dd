//! Credential storage and header injection

use crate::error::{Error, Result};
use crate::types::{JsonValue, RequestOptions};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};

/// Token type used in the authorization header when none is configured
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

const CLIENT_ID_HEADER: &str = "client-id";
const CLIENT_SECRET_HEADER: &str = "client-secret";

/// Credentials known to a client
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access token sent as `Authorization: <token_type> <access_token>`
    #[serde(default)]
    pub access_token: Option<String>,

    /// Token type, `Bearer` unless the API says otherwise
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Sent as the `client-id` header
    #[serde(default)]
    pub client_id: Option<String>,

    /// Sent as the `client-secret` header
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Login name for wrappers that exchange it for a token
    #[serde(default)]
    pub username: Option<String>,

    /// Login password for wrappers that exchange it for a token
    #[serde(default)]
    pub password: Option<String>,

    /// Refresh token returned by the token endpoint
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Token lifetime in seconds as returned by the token endpoint
    #[serde(default)]
    pub token_expires: Option<i64>,
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            access_token: None,
            token_type: default_token_type(),
            client_id: None,
            client_secret: None,
            username: None,
            password: None,
            refresh_token: None,
            token_expires: None,
        }
    }
}

impl Credentials {
    /// Credentials with only a bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Add credential headers to a request.
    ///
    /// Nothing is added for fields that are not set.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        if let Some(token) = &self.access_token {
            let token_type = if self.token_type.is_empty() {
                DEFAULT_TOKEN_TYPE
            } else {
                self.token_type.as_str()
            };
            headers.insert(
                AUTHORIZATION,
                header_value("access_token", &format!("{token_type} {token}"))?,
            );
        }
        if let Some(id) = &self.client_id {
            headers.insert(
                HeaderName::from_static(CLIENT_ID_HEADER),
                header_value("client_id", id)?,
            );
        }
        if let Some(secret) = &self.client_secret {
            headers.insert(
                HeaderName::from_static(CLIENT_SECRET_HEADER),
                header_value("client_secret", secret)?,
            );
        }
        Ok(())
    }

    /// Username and password as request options, for a token endpoint
    pub fn login_params(&self) -> RequestOptions {
        let mut params = RequestOptions::new();
        params.insert("username".to_string(), self.username.clone().into());
        params.insert("password".to_string(), self.password.clone().into());
        params
    }

    /// Store the tokens of a token endpoint response.
    ///
    /// Reads `accessToken`, `tokenType`, `refreshToken` and `expiresIn`.
    /// Nothing is stored unless `accessToken` is a non-empty string.
    pub fn store_token(&mut self, response: &JsonValue) -> Result<String> {
        if response.is_null() {
            return Err(Error::decode("empty token response"));
        }
        let token = response
            .get("accessToken")
            .and_then(JsonValue::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::decode("no valid accessToken in token response"))?
            .to_string();

        self.access_token = Some(token.clone());
        self.token_type = response
            .get("tokenType")
            .and_then(JsonValue::as_str)
            .filter(|token_type| !token_type.is_empty())
            .unwrap_or(DEFAULT_TOKEN_TYPE)
            .to_string();
        self.refresh_token = response
            .get("refreshToken")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        self.token_expires = response.get("expiresIn").and_then(|expires| match expires {
            JsonValue::String(s) => s.parse().ok(),
            other => other.as_i64(),
        });
        Ok(token)
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| Error::invalid_value(field, format!("not a valid header value: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

// Secrets stay out of debug output
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("has_access_token", &self.access_token.is_some())
            .field("token_type", &self.token_type)
            .field("client_id", &self.client_id)
            .field("has_client_secret", &self.client_secret.is_some())
            .field("username", &self.username)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("token_expires", &self.token_expires)
            .finish_non_exhaustive()
    }
}
