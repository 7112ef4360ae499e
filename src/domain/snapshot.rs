// Robot snapshot - The single aggregated view every reader consumes
use super::alert::AlertEvent;
use super::health::{HealthSnapshot, SeverityLevel, ZoneStat};
use super::history::BoundedHistory;
use super::mission::{MissionState, SprayUsageEntry};
use super::system::SystemInfo;
use super::telemetry::{GeoPoint, HistoricalDataPoint, Metric, RobotMode, TelemetrySample, TrailPoint};
use super::vision::{DetectionHistoryEntry, VisionFrame};
use serde::Serialize;

pub const METRIC_HISTORY_CAPACITY: usize = 60;
pub const POSITION_TRAIL_CAPACITY: usize = 100;
pub const ALERT_CAPACITY: usize = 50;
pub const DETECTION_HISTORY_CAPACITY: usize = 200;
pub const SPRAY_USAGE_CAPACITY: usize = 100;
pub const MISSION_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryHistory {
    pub battery: BoundedHistory<HistoricalDataPoint>,
    pub pesticide: BoundedHistory<HistoricalDataPoint>,
    pub cpu: BoundedHistory<HistoricalDataPoint>,
    pub latency: BoundedHistory<HistoricalDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthHistory {
    pub score: BoundedHistory<HistoricalDataPoint>,
    pub infection: BoundedHistory<HistoricalDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSnapshot {
    pub mode: RobotMode,
    pub telemetry: TelemetrySample,
    pub vision: VisionFrame,
    pub health: HealthSnapshot,
    pub alerts: BoundedHistory<AlertEvent>,
    pub missions: BoundedHistory<MissionState>,
    pub system: SystemInfo,
    pub is_online: bool,
    pub last_update: i64,
    pub is_simulating: bool,
    pub telemetry_history: TelemetryHistory,
    pub health_history: HealthHistory,
    pub detection_history: BoundedHistory<DetectionHistoryEntry>,
    pub spray_usage: BoundedHistory<SprayUsageEntry>,
    pub position_trail: BoundedHistory<TrailPoint>,
}

impl RobotSnapshot {
    /// Boot-time state of the demo robot.
    pub fn initial(now: i64) -> Self {
        Self {
            mode: RobotMode::Scanning,
            telemetry: TelemetrySample {
                timestamp: now,
                battery: 85.0,
                pesticide: 72.0,
                cpu: 45.0,
                fps: 30.0,
                latency: 12.0,
                temperature: Some(28.0),
                humidity: Some(65.0),
                position: GeoPoint::new(37.7749, -122.4194),
                heading: 45.0,
                speed: 0.5,
            },
            vision: VisionFrame::empty(now),
            health: HealthSnapshot {
                timestamp: now,
                plant_health_score: 78.0,
                infection_percent: 12.0,
                severity_level: SeverityLevel::Low,
                leaf_count: 1247,
                zone_stats: vec![
                    zone("z1", "North Field", 8.0, 412, now - 300_000),
                    zone("z2", "East Sector", 15.0, 398, now - 600_000),
                    zone("z3", "South Rows", 22.0, 437, now - 900_000),
                ],
            },
            alerts: BoundedHistory::new(ALERT_CAPACITY),
            missions: BoundedHistory::new(MISSION_CAPACITY),
            system: SystemInfo::default_robot(now),
            is_online: true,
            last_update: now,
            is_simulating: false,
            telemetry_history: TelemetryHistory {
                battery: BoundedHistory::new(METRIC_HISTORY_CAPACITY),
                pesticide: BoundedHistory::new(METRIC_HISTORY_CAPACITY),
                cpu: BoundedHistory::new(METRIC_HISTORY_CAPACITY),
                latency: BoundedHistory::new(METRIC_HISTORY_CAPACITY),
            },
            health_history: HealthHistory {
                score: BoundedHistory::new(METRIC_HISTORY_CAPACITY),
                infection: BoundedHistory::new(METRIC_HISTORY_CAPACITY),
            },
            detection_history: BoundedHistory::new(DETECTION_HISTORY_CAPACITY),
            spray_usage: BoundedHistory::new(SPRAY_USAGE_CAPACITY),
            position_trail: BoundedHistory::new(POSITION_TRAIL_CAPACITY),
        }
    }

    /// Metric history by name.
    pub fn history(&self, metric: Metric) -> &BoundedHistory<HistoricalDataPoint> {
        match metric {
            Metric::Battery => &self.telemetry_history.battery,
            Metric::Pesticide => &self.telemetry_history.pesticide,
            Metric::Cpu => &self.telemetry_history.cpu,
            Metric::Latency => &self.telemetry_history.latency,
            Metric::HealthScore => &self.health_history.score,
            Metric::Infection => &self.health_history.infection,
        }
    }

    pub fn active_mission(&self) -> Option<&MissionState> {
        self.missions
            .iter()
            .find(|m| m.status == super::mission::MissionStatus::Active)
    }
}

fn zone(id: &str, name: &str, infection_level: f64, leaf_count: u32, last_scanned: i64) -> ZoneStat {
    ZoneStat {
        zone_id: id.to_string(),
        zone_name: name.to_string(),
        infection_level,
        leaf_count,
        last_scanned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_snapshot() {
        let snapshot = RobotSnapshot::initial(1_000_000);
        assert_eq!(snapshot.mode, RobotMode::Scanning);
        assert_eq!(snapshot.telemetry.battery, 85.0);
        assert_eq!(snapshot.health.zone_stats.len(), 3);
        assert!(snapshot.alerts.is_empty());
        assert_eq!(snapshot.history(Metric::Battery).capacity(), METRIC_HISTORY_CAPACITY);
        assert_eq!(snapshot.position_trail.capacity(), POSITION_TRAIL_CAPACITY);
        assert_eq!(snapshot.detection_history.capacity(), DETECTION_HISTORY_CAPACITY);
    }

    #[test]
    fn test_snapshot_json_is_camel_case() {
        let value = serde_json::to_value(RobotSnapshot::initial(0)).unwrap();
        assert!(value.get("isOnline").is_some());
        assert!(value.get("telemetryHistory").is_some());
        assert_eq!(value["health"]["zoneStats"][2]["zoneName"], "South Rows");
    }
}
