//! Auth API endpoints
//!
//! Only the credential refresh lives here. Login and registration belong to
//! other front-ends.

use crate::client::MenuClient;
use crate::error::{ApiResult, RefreshError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Body of `POST /auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Long-lived credential being exchanged
    pub refresh_token: String,
}

/// Reply of `POST /auth/refresh`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New short-lived bearer token
    #[serde(default)]
    pub access_token: Option<String>,
    /// Rotated refresh token, when the server issues one
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Auth API interface
#[derive(Clone)]
pub struct AuthApi {
    client: MenuClient,
}

impl AuthApi {
    pub(crate) fn new(client: MenuClient) -> Self {
        Self { client }
    }

    /// Exchange a refresh token for new credentials
    ///
    /// POST /auth/refresh, outside the client's interception: no bearer
    /// token is attached and a 401 here never triggers another refresh.
    /// Nothing is stored.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<RefreshResponse> {
        let config = self.client.config();
        let response = request_refresh(
            self.client.refresh_http(),
            &config.refresh_url(),
            config.refresh_timeout,
            refresh_token,
        )
        .await?;
        Ok(response)
    }
}

/// Raw refresh call on a transport without interception
#[instrument(skip(http, refresh_token))]
pub(crate) async fn request_refresh(
    http: &Client,
    url: &str,
    timeout: Duration,
    refresh_token: &str,
) -> Result<RefreshResponse, RefreshError> {
    let body = RefreshRequest {
        refresh_token: refresh_token.to_string(),
    };

    let response = http
        .post(url)
        .timeout(timeout)
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                RefreshError::Timeout(timeout)
            } else {
                RefreshError::Transport(e.to_string())
            }
        })?;

    let status = response.status();
    debug!(status = status.as_u16(), "Refresh endpoint responded");

    let bytes = response
        .bytes()
        .await
        .map_err(|e| RefreshError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(RefreshError::Rejected {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| RefreshError::Decode(e.to_string()))
}
