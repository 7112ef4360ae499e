// Alert domain model
use super::health::SeverityLevel;
use super::telemetry::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    DiseaseDetected,
    PestDetected,
    LowBattery,
    LowPesticide,
    HardwareFault,
    BoundaryBreach,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: SeverityLevel,
    pub confidence: f64,
    pub timestamp: i64,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_ref: Option<String>,
    pub suggested_action: String,
    #[serde(default)]
    pub acknowledged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_json_uses_type_key() {
        let json = r#"{
            "id": "alert-1", "type": "hardware_fault", "severity": "critical",
            "confidence": 0.9, "timestamp": 1, "location": {"lat": 1.0, "lng": 2.0},
            "suggestedAction": "Halt operations and diagnose"
        }"#;
        let alert: AlertEvent = serde_json::from_str(json).unwrap();
        assert_eq!(alert.alert_type, AlertType::HardwareFault);
        assert_eq!(alert.severity, SeverityLevel::Critical);
        assert!(!alert.acknowledged);
    }
}
