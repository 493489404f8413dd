//! Username and password login

use super::ApiClient;
use crate::error::Result;
use crate::types::{Method, RequestOptions};
use tracing::debug;

impl ApiClient {
    /// Exchange the configured username and password for an access token.
    ///
    /// POSTs the login parameters merged with `options` to `path` and
    /// stores the returned tokens in the credentials, so later requests
    /// carry the new `Authorization` header. Returns the access token.
    pub async fn api_auth(&mut self, path: &str, options: &RequestOptions) -> Result<String> {
        let mut params = self.config.credentials.login_params();
        params.extend(options.clone());

        let response = self.dispatch(Method::POST, path, &params, None).await?;
        let token = self
            .config
            .credentials
            .store_token(&response.body.to_json())?;
        debug!("Authenticated against {}", path);
        Ok(token)
    }
}
