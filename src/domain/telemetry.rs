// Telemetry data domain models
use serde::{Deserialize, Serialize};

/// Robot operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotMode {
    Idle,
    Scanning,
    Spraying,
    Alert,
    Returning,
}

impl RobotMode {
    /// True while the robot is driving over the field.
    pub fn is_moving(self) -> bool {
        matches!(self, RobotMode::Scanning | RobotMode::Spraying)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub timestamp: i64,
    pub battery: f64,
    pub pesticide: f64,
    pub cpu: f64,
    pub fps: f64,
    pub latency: f64,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    pub position: GeoPoint,
    pub heading: f64,
    pub speed: f64,
}

/// Single point of a metric history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl HistoricalDataPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Point on the robot's recent path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: i64,
}

/// Names of the metrics that keep a bounded history in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Battery,
    Pesticide,
    Cpu,
    Latency,
    HealthScore,
    Infection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_modes() {
        assert!(RobotMode::Scanning.is_moving());
        assert!(RobotMode::Spraying.is_moving());
        assert!(!RobotMode::Idle.is_moving());
        assert!(!RobotMode::Returning.is_moving());
        assert!(!RobotMode::Alert.is_moving());
    }

    #[test]
    fn test_sample_json_shape() {
        let json = r#"{
            "timestamp": 1700000000000,
            "battery": 84.9, "pesticide": 72.0, "cpu": 44, "fps": 30, "latency": 12,
            "position": {"lat": 37.7749, "lng": -122.4194},
            "heading": 45, "speed": 0.5
        }"#;
        let sample: TelemetrySample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.battery, 84.9);
        assert_eq!(sample.temperature, None);
        assert_eq!(serde_json::to_string(&RobotMode::Returning).unwrap(), "\"returning\"");
    }
}
