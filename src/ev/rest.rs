use super::types::{EvResponse, WagerRequest};
use super::{EvError, EvService};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const EV_GAME_PATH: &str = "/ev/game";

/// HTTP client for the external scoring service.
pub struct EvClient {
    client: Client,
    base_url: String,
}

impl EvClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EV_GAME_PATH)
    }

    /// POST the wager and decode the EV breakdown.
    pub async fn evaluate_game(&self, request: &WagerRequest) -> Result<EvResponse, EvError> {
        let url = self.endpoint();
        tracing::debug!(%url, slug = %request.slug, side = request.side.as_str(), "POST ev");

        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string())
            } else {
                body
            };
            tracing::warn!(status = status.as_u16(), %message, "ev request rejected");
            return Err(EvError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| EvError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EvService for EvClient {
    async fn evaluate(&self, request: &WagerRequest) -> Result<EvResponse, EvError> {
        self.evaluate_game(request).await
    }
}
