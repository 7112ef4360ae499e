// Mission domain models
use serde::{Deserialize, Serialize};

/// Most recent log entries kept on a mission.
pub const MAX_MISSION_LOGS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    TargetedSpray,
    ZoneScan,
    ReturnBase,
    PerimeterCheck,
}

/// `queued -> active -> {completed | failed | cancelled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Queued,
    Active,
    Completed,
    Failed,
    Cancelled,
}

impl MissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MissionStatus::Completed | MissionStatus::Failed | MissionStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionLogKind {
    Info,
    Action,
    Confirm,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionLog {
    pub timestamp: i64,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: MissionLogKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEstimate {
    pub battery_required: f64,
    pub pesticide_required: f64,
    #[serde(rename = "estimatedDuration")]
    pub estimated_duration_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionState {
    pub mission_id: String,
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub target_count: u32,
    pub progress: f64,
    pub resource_estimate: ResourceEstimate,
    #[serde(default)]
    pub logs: Vec<MissionLog>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl MissionState {
    /// Append a log entry, dropping the oldest past [`MAX_MISSION_LOGS`].
    pub fn push_log(&mut self, log: MissionLog) {
        self.logs.push(log);
        if self.logs.len() > MAX_MISSION_LOGS {
            let excess = self.logs.len() - MAX_MISSION_LOGS;
            self.logs.drain(..excess);
        }
    }
}

/// Pesticide dispensed for a finished mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprayUsageEntry {
    pub timestamp: i64,
    pub amount: f64,
    pub mission_id: String,
    pub target_count: u32,
}
