// Chunked JSON streaming utilities
use crate::domain::envelope::EventEnvelope;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::broadcast::{self, error::RecvError};

/// Create a chunked newline-delimited JSON response
pub fn chunked_json_stream<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = EventEnvelope> + Send + 'static,
{
    let byte_stream = stream.map(|envelope| serialize_chunk(&envelope));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// One envelope per line
fn serialize_chunk(envelope: &EventEnvelope) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(envelope).map_err(std::io::Error::other)?;
    let mut chunk = BytesMut::with_capacity(json.len() + 1);
    chunk.put_slice(&json);
    chunk.put_u8(b'\n');
    Ok(chunk.freeze())
}

/// Stream store events to an HTTP client. Slow readers skip what they missed.
pub fn stream_from_receiver(mut rx: broadcast::Receiver<EventEnvelope>) -> impl IntoResponse {
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(envelope) => yield envelope,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Stream reader lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    match chunked_json_stream(stream) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::envelope::RobotEvent;
    use crate::domain::telemetry::RobotMode;

    #[test]
    fn test_chunk_is_one_json_line() {
        let envelope = EventEnvelope::new(RobotEvent::ModeChange(RobotMode::Scanning), 3);
        let chunk = serialize_chunk(&envelope).unwrap();
        assert_eq!(chunk.last(), Some(&b'\n'));

        let line = std::str::from_utf8(&chunk[..chunk.len() - 1]).unwrap();
        assert_eq!(EventEnvelope::decode(line).unwrap(), envelope);
    }
}
