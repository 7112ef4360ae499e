// System identity and device health
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceHealth {
    Healthy,
    Degraded,
    Fault,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub hash: String,
    pub input_shape: String,
    pub runtime: String,
    pub last_loaded: i64,
    pub inference_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceHealthMap {
    pub camera: DeviceHealth,
    pub motors: DeviceHealth,
    pub sprayer: DeviceHealth,
    pub gps: DeviceHealth,
}

/// Slow-changing identity; only replaced wholesale, never touched by ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub bot_id: String,
    pub bot_name: String,
    pub firmware_version: String,
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    pub device_health: DeviceHealthMap,
    pub uptime: u64,
}

impl SystemInfo {
    /// Identity of the demo robot the dashboard boots with.
    pub fn default_robot(now: i64) -> Self {
        Self {
            bot_id: "AGR-BOT-001".to_string(),
            bot_name: "Aavek".to_string(),
            firmware_version: "2.4.1".to_string(),
            models: vec![
                ModelInfo {
                    name: "YOLOv8-AgriDetect".to_string(),
                    version: "1.2.0".to_string(),
                    hash: "a3f2c1d4".to_string(),
                    input_shape: "640x640x3".to_string(),
                    runtime: "TensorRT".to_string(),
                    last_loaded: now - 3_600_000,
                    inference_time_ms: 18.0,
                },
                ModelInfo {
                    name: "PlantNet-Health".to_string(),
                    version: "0.9.3".to_string(),
                    hash: "b7e4f2a1".to_string(),
                    input_shape: "224x224x3".to_string(),
                    runtime: "ONNX".to_string(),
                    last_loaded: now - 3_600_000,
                    inference_time_ms: 24.0,
                },
            ],
            device_health: DeviceHealthMap {
                camera: DeviceHealth::Healthy,
                motors: DeviceHealth::Healthy,
                sprayer: DeviceHealth::Healthy,
                gps: DeviceHealth::Healthy,
            },
            uptime: 14_523,
        }
    }
}
