// WebSocket transport - Live robot feed with an HTTP poll fallback

use crate::application::envelope_poller::EnvelopePoller;
use crate::application::event_dispatcher::EventDispatcher;
use crate::application::robot_store::RobotStore;
use crate::infrastructure::config::TransportSettings;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),
}

/// Reads envelopes from the robot's WebSocket and hands them to the
/// [`EventDispatcher`]. While the socket is down the robot is marked offline,
/// the HTTP fallback is polled at a fixed interval, and the socket is retried
/// after a fixed delay.
pub struct WebSocketTransport {
    ws_url: String,
    store: RobotStore,
    dispatcher: EventDispatcher,
    poller: Arc<dyn EnvelopePoller>,
    poll_interval: Duration,
    reconnect_delay: Duration,
    connect_timeout: Duration,
}

impl WebSocketTransport {
    pub fn new(settings: &TransportSettings, store: RobotStore, poller: Arc<dyn EnvelopePoller>) -> Self {
        Self {
            ws_url: settings.ws_url.clone(),
            dispatcher: EventDispatcher::new(store.clone()),
            store,
            poller,
            poll_interval: settings.poll_interval(),
            reconnect_delay: settings.reconnect_delay(),
            connect_timeout: settings.connect_timeout(),
        }
    }

    /// connect -> read -> on loss, poll for `reconnect_delay` -> reconnect
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                result = self.connect_and_read(&cancel) => match result {
                    Ok(()) => tracing::info!("WebSocket disconnected, falling back to polling"),
                    Err(e) => tracing::warn!(error = %e, url = %self.ws_url, "WebSocket unavailable, falling back to polling"),
                },
            }

            if cancel.is_cancelled() {
                break;
            }
            self.store.set_online(false);

            if !self.poll_until_reconnect(&cancel).await {
                break;
            }
            tracing::info!(url = %self.ws_url, "Attempting WebSocket reconnection");
        }

        self.store.set_online(false);
        tracing::info!("Transport stopped");
    }

    async fn connect_and_read(&self, cancel: &CancellationToken) -> Result<(), TransportError> {
        let connect = tokio_tungstenite::connect_async(self.ws_url.as_str());
        let (mut stream, _) = tokio::time::timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| TransportError::ConnectTimeout(self.connect_timeout))??;
        tracing::info!(url = %self.ws_url, "WebSocket connected");
        self.store.set_online(true);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        self.dispatcher.apply_text(&text);
                    }
                    Some(Ok(Message::Close(_))) | None => return Ok(()),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                },
            }
        }
    }

    // Returns false when cancelled.
    async fn poll_until_reconnect(&self, cancel: &CancellationToken) -> bool {
        let reconnect = tokio::time::sleep(self.reconnect_delay);
        tokio::pin!(reconnect);

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return false,
                _ = &mut reconnect => return true,
                _ = ticker.tick() => match self.poller.poll_envelopes().await {
                    Ok(batch) => {
                        let applied = self.dispatcher.apply_batch(batch);
                        tracing::debug!(applied, "Applied polled events");
                    }
                    Err(e) => tracing::debug!(error = %e, "Poll failed"),
                },
            }
        }
    }
}
