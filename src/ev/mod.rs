pub mod rest;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;
use types::{EvResponse, WagerRequest};

/// Failure talking to the scoring service. The `Display` form is what the
/// user sees on the page.
#[derive(Debug, Error)]
pub enum EvError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx reply; `message` is the body, or the status text if empty.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait EvService: Send + Sync {
    async fn evaluate(&self, request: &WagerRequest) -> Result<EvResponse, EvError>;
}
