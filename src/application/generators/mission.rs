// Mission generator - Creates queued missions and advances the active one
use crate::domain::drift::{clamp, random_in_range};
use crate::domain::mission::{
    MissionLog, MissionLogKind, MissionState, MissionStatus, MissionType, ResourceEstimate,
};
use rand::Rng;

pub const CREATE_PROBABILITY: f64 = 0.005;
pub const LOG_PROBABILITY: f64 = 0.1;
pub const MAX_TRACKED_MISSIONS: usize = 5;

const PROGRESS_LOGS: [(&str, MissionLogKind); 5] = [
    ("Target acquired", MissionLogKind::Info),
    ("Spray nozzle activated", MissionLogKind::Action),
    ("GPIO confirm: valve open", MissionLogKind::Confirm),
    ("Coverage verified", MissionLogKind::Info),
    ("Moving to next target", MissionLogKind::Action),
];

/// Drives `queued` creation and `active -> completed`. The `queued -> active`
/// step belongs to an operator and never happens here.
#[derive(Debug, Clone, Default)]
pub struct MissionGenerator {
    // fractional progress of the mission currently being advanced
    progress: Option<(String, f64)>,
}

impl MissionGenerator {
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        active: Option<&MissionState>,
        mission_count: usize,
        now: i64,
    ) -> Option<MissionState> {
        match active {
            Some(mission) => Some(self.advance(rng, mission, now)),
            None => {
                if mission_count < MAX_TRACKED_MISSIONS && rng.random_bool(CREATE_PROBABILITY) {
                    Some(create_mission(rng, now))
                } else {
                    None
                }
            }
        }
    }

    fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, mission: &MissionState, now: i64) -> MissionState {
        let current = match &self.progress {
            Some((id, value)) if *id == mission.mission_id => *value,
            _ => mission.progress,
        };
        let progress = clamp(current + random_in_range(rng, 0.5, 2.0), 0.0, 100.0);

        let mut next = mission.clone();
        if rng.random_bool(LOG_PROBABILITY) {
            let (message, kind) = PROGRESS_LOGS[rng.random_range(0..PROGRESS_LOGS.len())];
            next.push_log(MissionLog {
                timestamp: now,
                message: message.to_string(),
                kind,
            });
        }

        let complete = progress >= 100.0;
        next.progress = progress.round();
        next.started_at = mission.started_at.or(Some(now));
        if complete {
            next.status = MissionStatus::Completed;
            next.completed_at = Some(now);
            self.progress = None;
        } else {
            next.status = MissionStatus::Active;
            next.completed_at = None;
            self.progress = Some((mission.mission_id.clone(), progress));
        }
        next
    }
}

fn create_mission<R: Rng + ?Sized>(rng: &mut R, now: i64) -> MissionState {
    MissionState {
        mission_id: format!("mission-{}", uuid::Uuid::new_v4().simple()),
        mission_type: MissionType::TargetedSpray,
        status: MissionStatus::Queued,
        target_count: rng.random_range(3..12),
        progress: 0.0,
        resource_estimate: ResourceEstimate {
            battery_required: random_in_range(rng, 10.0, 25.0).round(),
            pesticide_required: random_in_range(rng, 5.0, 15.0).round(),
            estimated_duration_secs: random_in_range(rng, 120.0, 360.0).round() as u32,
        },
        logs: vec![MissionLog {
            timestamp: now,
            message: "Mission created".to_string(),
            kind: MissionLogKind::Info,
        }],
        created_at: now,
        started_at: None,
        completed_at: None,
    }
}
