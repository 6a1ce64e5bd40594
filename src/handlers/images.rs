//! Image upload relay.
//!
//! `POST /api/images` (session required, enforced by the authorization hook)
//! asks the image-hosting API for a one-time direct-upload URL with the
//! server-held credentials and relays it back. One upstream attempt; any
//! failure surfaces as a 500. File type and size limits documented by the
//! upstream are not enforced here.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ImagesConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Upstream calls get one attempt bounded by this client-level timeout.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the image-hosting direct-upload endpoint.
#[derive(Debug, Clone)]
pub struct ImagesClient {
    http: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl ImagesClient {
    pub fn new(config: &ImagesConfig) -> Result<Self, reqwest::Error> {
        let endpoint = format!(
            "https://api.cloudflare.com/client/v4/accounts/{}/images/v2/direct_upload",
            config.account_id
        );
        Self::with_endpoint(endpoint, config.api_token.clone())
    }

    /// Client against an explicit endpoint URL. Tests point this at a local
    /// or unreachable address.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_token: api_token.into(),
        })
    }

    /// Requests a one-time direct-upload URL from the upstream API.
    pub async fn request_upload_url(&self) -> Result<String, AppError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::ImageUpstream(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "image API returned non-success");
            return Err(AppError::ImageUpstream(format!(
                "upstream returned {}",
                response.status()
            )));
        }

        let body: DirectUploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ImageUpstream(e.to_string()))?;

        Ok(body.result.upload_url)
    }
}

/// Upstream response for a direct-upload request.
#[derive(Debug, Deserialize)]
struct DirectUploadResponse {
    result: UploadResult,
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    #[serde(rename = "uploadURL")]
    upload_url: String,
    #[serde(default)]
    #[allow(dead_code)]
    id: String,
}

/// Response body relayed to the caller.
#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    #[serde(rename = "uploadURL")]
    pub upload_url: String,
}

/// `POST /api/images`: relay a direct-upload URL to the signed-in caller.
pub async fn create_upload_url(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<UploadUrlResponse>), AppError> {
    let client = state
        .images
        .as_ref()
        .ok_or_else(|| AppError::ImageUpstream("image hosting is not configured".to_string()))?;

    let upload_url = client.request_upload_url().await?;

    Ok((StatusCode::CREATED, Json(UploadUrlResponse { upload_url })))
}
