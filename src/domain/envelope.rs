// Event envelope - Shape shared by generator output and transport messages
use super::alert::AlertEvent;
use super::health::HealthSnapshot;
use super::mission::MissionState;
use super::system::SystemInfo;
use super::telemetry::{RobotMode, TelemetrySample};
use super::vision::VisionFrame;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown envelope type '{0}'")]
    UnknownType(String),

    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One typed event, as applied to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum RobotEvent {
    Telemetry(TelemetrySample),
    Vision(VisionFrame),
    Health(HealthSnapshot),
    Alert(AlertEvent),
    Mission(MissionState),
    System(SystemInfo),
    ModeChange(RobotMode),
}

impl RobotEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            RobotEvent::Telemetry(_) => "telemetry",
            RobotEvent::Vision(_) => "vision",
            RobotEvent::Health(_) => "health",
            RobotEvent::Alert(_) => "alert",
            RobotEvent::Mission(_) => "mission",
            RobotEvent::System(_) => "system",
            RobotEvent::ModeChange(_) => "mode_change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeChangePayload {
    pub mode: RobotMode,
}

/// `{ "type": ..., "payload": ..., "timestamp": ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope {
    pub event: RobotEvent,
    pub timestamp: i64,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    payload: serde_json::Value,
    timestamp: i64,
}

#[derive(Serialize)]
struct WireEnvelope<'a, P: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    payload: P,
    timestamp: i64,
}

impl EventEnvelope {
    pub fn new(event: RobotEvent, timestamp: i64) -> Self {
        Self { event, timestamp }
    }

    /// Decode a text frame. Nothing is partially decoded: either the whole
    /// envelope is valid or an error comes back.
    pub fn decode(text: &str) -> Result<Self, EnvelopeError> {
        let raw: RawEnvelope = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    /// Decode an already-parsed JSON value (e.g. one element of a poll batch).
    pub fn from_value(value: serde_json::Value) -> Result<Self, EnvelopeError> {
        let raw: RawEnvelope = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawEnvelope) -> Result<Self, EnvelopeError> {
        let event = match raw.kind.as_str() {
            "telemetry" => RobotEvent::Telemetry(payload("telemetry", raw.payload)?),
            "vision" => RobotEvent::Vision(payload("vision", raw.payload)?),
            "health" => RobotEvent::Health(payload("health", raw.payload)?),
            "alert" => RobotEvent::Alert(payload("alert", raw.payload)?),
            "mission" => RobotEvent::Mission(payload("mission", raw.payload)?),
            "system" => RobotEvent::System(payload("system", raw.payload)?),
            "mode_change" => {
                let change: ModeChangePayload = payload("mode_change", raw.payload)?;
                RobotEvent::ModeChange(change.mode)
            }
            other => return Err(EnvelopeError::UnknownType(other.to_string())),
        };

        Ok(Self {
            event,
            timestamp: raw.timestamp,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn payload<T: DeserializeOwned>(
    kind: &'static str,
    value: serde_json::Value,
) -> Result<T, EnvelopeError> {
    serde_json::from_value(value).map_err(|source| EnvelopeError::InvalidPayload { kind, source })
}

impl Serialize for EventEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.event.kind();
        let timestamp = self.timestamp;
        match &self.event {
            RobotEvent::Telemetry(p) => WireEnvelope { kind, payload: p, timestamp }.serialize(serializer),
            RobotEvent::Vision(p) => WireEnvelope { kind, payload: p, timestamp }.serialize(serializer),
            RobotEvent::Health(p) => WireEnvelope { kind, payload: p, timestamp }.serialize(serializer),
            RobotEvent::Alert(p) => WireEnvelope { kind, payload: p, timestamp }.serialize(serializer),
            RobotEvent::Mission(p) => WireEnvelope { kind, payload: p, timestamp }.serialize(serializer),
            RobotEvent::System(p) => WireEnvelope { kind, payload: p, timestamp }.serialize(serializer),
            RobotEvent::ModeChange(mode) => WireEnvelope {
                kind,
                payload: ModeChangePayload { mode: *mode },
                timestamp,
            }
            .serialize(serializer),
        }
    }
}
