// Poll source trait for the transport's fallback path
use async_trait::async_trait;

#[async_trait]
pub trait EnvelopePoller: Send + Sync {
    /// Fetch whatever envelopes the robot has queued since the last poll.
    /// Entries are left undecoded so one bad entry cannot sink the batch.
    async fn poll_envelopes(&self) -> anyhow::Result<Vec<serde_json::Value>>;
}
