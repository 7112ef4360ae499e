// Alert generator - Rare Bernoulli-triggered field alerts
use crate::domain::alert::{AlertEvent, AlertType};
use crate::domain::drift::random_in_range;
use crate::domain::health::SeverityLevel;
use crate::domain::telemetry::GeoPoint;
use rand::Rng;

pub const ALERT_PROBABILITY: f64 = 0.02;

struct AlertTemplate {
    alert_type: AlertType,
    severity: SeverityLevel,
    action: &'static str,
}

const ALERT_CATALOG: [AlertTemplate; 5] = [
    AlertTemplate {
        alert_type: AlertType::DiseaseDetected,
        severity: SeverityLevel::High,
        action: "Initiate targeted spray protocol",
    },
    AlertTemplate {
        alert_type: AlertType::PestDetected,
        severity: SeverityLevel::Medium,
        action: "Mark zone for inspection",
    },
    AlertTemplate {
        alert_type: AlertType::LowBattery,
        severity: SeverityLevel::Medium,
        action: "Return to charging station",
    },
    AlertTemplate {
        alert_type: AlertType::LowPesticide,
        severity: SeverityLevel::Low,
        action: "Schedule tank refill",
    },
    AlertTemplate {
        alert_type: AlertType::HardwareFault,
        severity: SeverityLevel::Critical,
        action: "Halt operations and diagnose",
    },
];

/// Fixed action text for an alert type, if the catalog carries one.
pub fn suggested_action(alert_type: AlertType) -> Option<&'static str> {
    ALERT_CATALOG
        .iter()
        .find(|t| t.alert_type == alert_type)
        .map(|t| t.action)
}

/// One trial per tick; `None` means no alert this tick.
pub fn maybe_generate<R: Rng + ?Sized>(rng: &mut R, location: GeoPoint, now: i64) -> Option<AlertEvent> {
    if !rng.random_bool(ALERT_PROBABILITY) {
        return None;
    }

    let template = &ALERT_CATALOG[rng.random_range(0..ALERT_CATALOG.len())];
    Some(AlertEvent {
        id: format!("alert-{}", uuid::Uuid::new_v4()),
        alert_type: template.alert_type,
        severity: template.severity,
        confidence: random_in_range(rng, 0.75, 0.98),
        timestamp: now,
        location,
        snapshot_ref: None,
        suggested_action: template.action.to_string(),
        acknowledged: false,
    })
}
