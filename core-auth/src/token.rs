//! OAuth 2.0 client-credentials grant against the Microsoft identity platform.

use core_http::{HttpClient, HttpMethod, HttpRequest};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::credentials::CredentialRecord;
use crate::error::{AuthError, Result};

/// Identity endpoint host.
const LOGIN_BASE: &str = "https://login.microsoftonline.com";

/// Default scope: all application permissions granted to the client.
const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Opaque bearer token, valid for the lifetime of one invocation.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw bearer string, for the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

// Token values must never end up in logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(***)")
    }
}

/// Token response from the identity endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}

/// Exchanges client credentials for a bearer token.
///
/// One request, no caching, no refresh: a fresh token is fetched on every
/// invocation and dropped with the process.
pub struct TokenProvider {
    http_client: Arc<dyn HttpClient>,
}

impl TokenProvider {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Acquire a bearer token via the client-credentials grant.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Transport`] when the endpoint is unreachable
    /// - [`AuthError::Rejected`] on any non-success status, carrying the
    ///   status code and raw response body
    /// - [`AuthError::InvalidResponse`] when the 200 body has no usable
    ///   access token
    #[instrument(skip_all, fields(tenant = %creds.tenant))]
    pub async fn acquire(&self, creds: &CredentialRecord) -> Result<AccessToken> {
        let url = format!("{}/{}/oauth2/v2.0/token", LOGIN_BASE, creds.tenant);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("scope", DEFAULT_SCOPE),
        ];
        let encoded = serde_urlencoded::to_string(params)
            .map_err(|e| AuthError::InvalidResponse(format!("failed to encode form body: {}", e)))?;

        let request = HttpRequest::new(HttpMethod::Post, url).form(encoded);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !response.is_success() {
            let status = response.status;
            let body = response.text();
            warn!(status = status, "Token request rejected by identity endpoint");
            return Err(AuthError::Rejected { status, body });
        }

        let token_response: TokenResponse = response
            .json()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        debug!(
            expires_in = token_response.expires_in,
            "Acquired bearer token"
        );

        Ok(AccessToken::new(token_response.access_token))
    }
}
