// Vision detection domain models
use super::telemetry::GeoPoint;
use serde::{Deserialize, Serialize};

/// Bounding box in normalized image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionBox {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub confidence: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionFrame {
    pub frame_id: u64,
    pub timestamp: i64,
    pub boxes: Vec<DetectionBox>,
}

impl VisionFrame {
    pub fn empty(timestamp: i64) -> Self {
        Self {
            frame_id: 0,
            timestamp,
            boxes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionHistoryEntry {
    pub id: String,
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub detection_type: String,
    pub confidence: f64,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
}
