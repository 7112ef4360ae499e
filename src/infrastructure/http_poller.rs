// HTTP poll client - Fallback event source while the socket is down
use crate::application::envelope_poller::EnvelopePoller;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct HttpPoller {
    client: reqwest::Client,
    url: String,
}

impl HttpPoller {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build poll client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl EnvelopePoller for HttpPoller {
    async fn poll_envelopes(&self) -> Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send poll request")?;

        if !response.status().is_success() {
            anyhow::bail!("Poll request failed with status {}", response.status());
        }

        response
            .json::<Vec<serde_json::Value>>()
            .await
            .context("Failed to parse poll response")
    }
}
