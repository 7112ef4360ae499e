// Robot store - Sole write path into the aggregated robot snapshot
use crate::domain::alert::AlertEvent;
use crate::domain::envelope::{EventEnvelope, RobotEvent};
use crate::domain::health::HealthSnapshot;
use crate::domain::mission::{MissionState, MissionStatus, SprayUsageEntry};
use crate::domain::now_ms;
use crate::domain::snapshot::RobotSnapshot;
use crate::domain::system::SystemInfo;
use crate::domain::telemetry::{HistoricalDataPoint, RobotMode, TelemetrySample, TrailPoint};
use crate::domain::vision::{DetectionHistoryEntry, VisionFrame};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared handle to the robot snapshot.
///
/// Every action holds the write lock for its full duration, so readers only
/// ever observe whole updates. None of the actions can fail.
#[derive(Clone)]
pub struct RobotStore {
    state: Arc<RwLock<RobotSnapshot>>,
    events: broadcast::Sender<EventEnvelope>,
}

impl RobotStore {
    pub fn new(initial: RobotSnapshot) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(initial)),
            events,
        }
    }

    /// Subscribe to every event applied from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> RobotSnapshot {
        self.read().clone()
    }

    /// Borrow the snapshot for a short read without cloning it.
    pub fn with_snapshot<T>(&self, f: impl FnOnce(&RobotSnapshot) -> T) -> T {
        f(&self.read())
    }

    pub fn mode(&self) -> RobotMode {
        self.read().mode
    }

    pub fn is_simulating(&self) -> bool {
        self.read().is_simulating
    }

    pub fn set_mode(&self, mode: RobotMode) {
        let now = now_ms();
        let mut state = self.write();
        state.mode = mode;
        state.last_update = now;
        self.publish(RobotEvent::ModeChange(mode), now);
    }

    /// Samples that are older than, or identical to, the current one are
    /// dropped so a replayed feed does not grow the histories.
    pub fn apply_telemetry(&self, telemetry: TelemetrySample) {
        let now = now_ms();
        let mut state = self.write();
        if is_stale(telemetry.timestamp, &telemetry, state.telemetry.timestamp, &state.telemetry) {
            return;
        }

        let ts = telemetry.timestamp;
        let history = &mut state.telemetry_history;
        history.battery.push_back(HistoricalDataPoint::new(ts, telemetry.battery));
        history.pesticide.push_back(HistoricalDataPoint::new(ts, telemetry.pesticide));
        history.cpu.push_back(HistoricalDataPoint::new(ts, telemetry.cpu));
        history.latency.push_back(HistoricalDataPoint::new(ts, telemetry.latency));
        state.position_trail.push_back(TrailPoint {
            lat: telemetry.position.lat,
            lng: telemetry.position.lng,
            timestamp: ts,
        });
        state.telemetry = telemetry.clone();
        state.last_update = now;
        self.publish(RobotEvent::Telemetry(telemetry), now);
    }

    pub fn apply_vision(&self, vision: VisionFrame) {
        let now = now_ms();
        let mut state = self.write();
        state.vision = vision.clone();
        state.last_update = now;
        self.publish(RobotEvent::Vision(vision), now);
    }

    /// Same staleness rule as [`RobotStore::apply_telemetry`].
    pub fn apply_health(&self, health: HealthSnapshot) {
        let now = now_ms();
        let mut state = self.write();
        if is_stale(health.timestamp, &health, state.health.timestamp, &state.health) {
            return;
        }

        let ts = health.timestamp;
        state
            .health_history
            .score
            .push_back(HistoricalDataPoint::new(ts, health.plant_health_score));
        state
            .health_history
            .infection
            .push_back(HistoricalDataPoint::new(ts, health.infection_percent));
        state.health = health.clone();
        state.last_update = now;
        self.publish(RobotEvent::Health(health), now);
    }

    /// Alerts are kept newest-first. An alert whose id is already stored is
    /// refreshed in place and keeps its acknowledgement.
    pub fn add_alert(&self, mut alert: AlertEvent) {
        let now = now_ms();
        let mut state = self.write();
        let id = alert.id.clone();
        if let Some(existing) = state.alerts.iter().find(|a| a.id == id) {
            alert.acknowledged |= existing.acknowledged;
        }
        if let Err(alert) = state.alerts.replace_where(alert.clone(), |a| a.id == id) {
            state.alerts.push_front(alert);
        }
        state.last_update = now;
        self.publish(RobotEvent::Alert(alert), now);
    }

    /// Flip `acknowledged` on the matching alert. Unknown ids are ignored.
    pub fn acknowledge_alert(&self, alert_id: &str) -> bool {
        let mut state = self.write();
        match state.alerts.iter_mut().find(|a| a.id == alert_id) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Replace in place by `mission_id`, or append. A mission that already
    /// reached a terminal status is never moved back to a live one.
    pub fn upsert_mission(&self, mission: MissionState) {
        let now = now_ms();
        let mut state = self.write();
        if upsert_into(&mut state, mission.clone()) {
            state.last_update = now;
            self.publish(RobotEvent::Mission(mission), now);
        }
    }

    /// Run one mission step against the current active mission under a
    /// single write lock. `step` receives the active mission (if any) and
    /// the number of tracked missions.
    pub fn step_active_mission<F>(&self, step: F) -> Option<MissionState>
    where
        F: FnOnce(Option<&MissionState>, usize) -> Option<MissionState>,
    {
        let now = now_ms();
        let mut state = self.write();
        let next = step(state.active_mission(), state.missions.len())?;
        if !upsert_into(&mut state, next.clone()) {
            return None;
        }
        state.last_update = now;
        self.publish(RobotEvent::Mission(next.clone()), now);
        Some(next)
    }

    /// Operator-driven status change (e.g. `queued -> active`, cancel, fail).
    pub fn set_mission_status(&self, mission_id: &str, status: MissionStatus) -> Option<MissionState> {
        let now = now_ms();
        let mut state = self.write();
        let mission = state.missions.iter_mut().find(|m| m.mission_id == mission_id)?;
        mission.status = status;
        if status.is_terminal() && mission.completed_at.is_none() {
            mission.completed_at = Some(now);
        }
        let updated = mission.clone();
        state.last_update = now;
        self.publish(RobotEvent::Mission(updated.clone()), now);
        Some(updated)
    }

    pub fn replace_system_info(&self, system: SystemInfo) {
        let now = now_ms();
        let mut state = self.write();
        state.system = system.clone();
        state.last_update = now;
        self.publish(RobotEvent::System(system), now);
    }

    pub fn set_online(&self, is_online: bool) {
        let mut state = self.write();
        state.is_online = is_online;
        state.last_update = now_ms();
    }

    pub fn set_simulating(&self, is_simulating: bool) {
        self.write().is_simulating = is_simulating;
    }

    /// Detection history is kept newest-first.
    pub fn add_detection_to_history(&self, entry: DetectionHistoryEntry) {
        self.write().detection_history.push_front(entry);
    }

    /// Spray usage is kept newest-first.
    pub fn add_spray_usage(&self, entry: SprayUsageEntry) {
        self.write().spray_usage.push_front(entry);
    }

    // Called with the write guard held so subscribers see events in apply order.
    fn publish(&self, event: RobotEvent, timestamp: i64) {
        // no subscribers is fine
        let _ = self.events.send(EventEnvelope::new(event, timestamp));
    }

    // A panic while holding the lock cannot leave a half-applied action
    // behind (every action is a plain field swap), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, RobotSnapshot> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RobotSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_stale<T: PartialEq>(ts: i64, incoming: &T, current_ts: i64, current: &T) -> bool {
    ts < current_ts || incoming == current
}

// Returns false when the update was refused.
fn upsert_into(state: &mut RobotSnapshot, mission: MissionState) -> bool {
    let id = mission.mission_id.clone();
    let reopens = state
        .missions
        .iter()
        .any(|m| m.mission_id == id && m.status.is_terminal() && !mission.status.is_terminal());
    if reopens {
        tracing::debug!(mission_id = %id, "Ignoring update to a finished mission");
        return false;
    }
    if let Err(mission) = state.missions.replace_where(mission, |m| m.mission_id == id) {
        state.missions.push_back(mission);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::AlertType;
    use crate::domain::health::SeverityLevel;
    use crate::domain::mission::{MissionType, ResourceEstimate};
    use crate::domain::snapshot::{ALERT_CAPACITY, METRIC_HISTORY_CAPACITY, POSITION_TRAIL_CAPACITY};
    use crate::domain::telemetry::{GeoPoint, Metric};
    use pretty_assertions::assert_eq;

    fn store() -> RobotStore {
        RobotStore::new(RobotSnapshot::initial(0))
    }

    fn sample(i: i64) -> TelemetrySample {
        TelemetrySample {
            timestamp: i,
            battery: 100.0 - i as f64 * 0.1,
            pesticide: 50.0,
            cpu: 40.0,
            fps: 30.0,
            latency: 10.0,
            temperature: None,
            humidity: None,
            position: GeoPoint::new(i as f64, 0.0),
            heading: 0.0,
            speed: 0.0,
        }
    }

    fn alert(id: &str) -> AlertEvent {
        AlertEvent {
            id: id.to_string(),
            alert_type: AlertType::PestDetected,
            severity: SeverityLevel::Medium,
            confidence: 0.8,
            timestamp: 0,
            location: GeoPoint::new(0.0, 0.0),
            snapshot_ref: None,
            suggested_action: "Mark zone for inspection".to_string(),
            acknowledged: false,
        }
    }

    fn mission(id: &str, progress: f64) -> MissionState {
        MissionState {
            mission_id: id.to_string(),
            mission_type: MissionType::ZoneScan,
            status: MissionStatus::Queued,
            target_count: 3,
            progress,
            resource_estimate: ResourceEstimate {
                battery_required: 10.0,
                pesticide_required: 5.0,
                estimated_duration_secs: 120,
            },
            logs: Vec::new(),
            created_at: 0,
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn test_metric_history_is_fifo() {
        let store = store();
        let n = 75;
        for i in 0..n {
            store.apply_telemetry(sample(i));
        }

        let snapshot = store.snapshot();
        for metric in [Metric::Battery, Metric::Pesticide, Metric::Cpu, Metric::Latency] {
            assert_eq!(snapshot.history(metric).len(), METRIC_HISTORY_CAPACITY);
        }
        let timestamps: Vec<i64> = snapshot.history(Metric::Battery).iter().map(|p| p.timestamp).collect();
        let expected: Vec<i64> = (n - METRIC_HISTORY_CAPACITY as i64..n).collect();
        assert_eq!(timestamps, expected);
        assert_eq!(snapshot.telemetry.timestamp, n - 1);
    }

    #[test]
    fn test_position_trail_capped() {
        let store = store();
        for i in 0..150 {
            store.apply_telemetry(sample(i));
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.position_trail.len(), POSITION_TRAIL_CAPACITY);
        assert_eq!(snapshot.position_trail.first().map(|p| p.timestamp), Some(50));
        assert_eq!(snapshot.position_trail.last().map(|p| p.lat), Some(149.0));
    }

    #[test]
    fn test_alerts_newest_first_and_capped() {
        let store = store();
        for i in 0..60 {
            store.add_alert(alert(&format!("a{i}")));
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.alerts.len(), ALERT_CAPACITY);
        assert_eq!(snapshot.alerts.first().map(|a| a.id.as_str()), Some("a59"));
        assert_eq!(snapshot.alerts.last().map(|a| a.id.as_str()), Some("a10"));
    }

    #[test]
    fn test_acknowledge_only_touches_target() {
        let store = store();
        for id in ["a1", "a2", "a3"] {
            store.add_alert(alert(id));
        }
        let before = store.snapshot().alerts;

        assert!(store.acknowledge_alert("a2"));
        let after = store.snapshot().alerts;

        assert_eq!(after.len(), before.len());
        for (old, new) in before.iter().zip(after.iter()) {
            if old.id == "a2" {
                assert!(new.acknowledged);
                assert_eq!(AlertEvent { acknowledged: false, ..new.clone() }, *old);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_acknowledge_unknown_is_noop() {
        let store = store();
        store.add_alert(alert("a1"));
        let before = store.snapshot();
        assert!(!store.acknowledge_alert("missing"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let store = store();
        store.upsert_mission(mission("m1", 0.0));
        store.upsert_mission(mission("m2", 0.0));
        store.upsert_mission(mission("m3", 0.0));

        let mut replacement = mission("m2", 40.0);
        replacement.status = MissionStatus::Active;
        store.upsert_mission(replacement.clone());

        let snapshot = store.snapshot();
        let ids: Vec<&str> = snapshot.missions.iter().map(|m| m.mission_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
        assert_eq!(snapshot.missions.get(1), Some(&replacement));
    }

    #[test]
    fn test_set_mission_status() {
        let store = store();
        store.upsert_mission(mission("m1", 0.0));

        let active = store.set_mission_status("m1", MissionStatus::Active).unwrap();
        assert_eq!(active.status, MissionStatus::Active);
        assert_eq!(active.completed_at, None);
        assert_eq!(store.snapshot().active_mission().map(|m| m.mission_id.clone()), Some("m1".to_string()));

        let cancelled = store.set_mission_status("m1", MissionStatus::Cancelled).unwrap();
        assert!(cancelled.completed_at.is_some());
        assert!(store.set_mission_status("nope", MissionStatus::Active).is_none());
    }

    #[test]
    fn test_flags_and_mode() {
        let store = store();
        store.set_simulating(true);
        store.set_online(false);
        store.set_mode(RobotMode::Returning);

        let snapshot = store.snapshot();
        assert!(snapshot.is_simulating);
        assert!(!snapshot.is_online);
        assert_eq!(snapshot.mode, RobotMode::Returning);
        assert!(snapshot.last_update > 0);
    }

    #[test]
    fn test_system_replaced_wholesale() {
        let store = store();
        let mut system = SystemInfo::default_robot(0);
        system.bot_name = "Rover".to_string();
        system.models.clear();
        store.replace_system_info(system.clone());
        assert_eq!(store.snapshot().system, system);
    }

    #[test]
    fn test_applied_events_are_published() {
        let store = store();
        let mut rx = store.subscribe();

        store.set_mode(RobotMode::Idle);
        store.add_alert(alert("a1"));

        assert_eq!(rx.try_recv().unwrap().event, RobotEvent::ModeChange(RobotMode::Idle));
        assert!(matches!(rx.try_recv().unwrap().event, RobotEvent::Alert(a) if a.id == "a1"));
    }

    #[test]
    fn test_detection_history_newest_first() {
        let store = store();
        for i in 0..205 {
            store.add_detection_to_history(DetectionHistoryEntry {
                id: format!("d{i}"),
                timestamp: i,
                detection_type: "Leaf Spot".to_string(),
                confidence: 0.9,
                location: GeoPoint::new(0.0, 0.0),
                action_taken: None,
            });
        }
        let snapshot = store.snapshot();
        assert_eq!(snapshot.detection_history.len(), 200);
        assert_eq!(snapshot.detection_history.first().map(|d| d.timestamp), Some(204));
    }

    #[test]
    fn test_repeated_alert_refreshes_in_place() {
        let store = store();
        store.add_alert(alert("a1"));
        store.add_alert(alert("a2"));
        assert!(store.acknowledge_alert("a1"));

        store.add_alert(alert("a1"));
        store.add_alert(alert("a1"));

        let snapshot = store.snapshot();
        let ids: Vec<&str> = snapshot.alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);
        assert!(snapshot.alerts.iter().find(|a| a.id == "a1").is_some_and(|a| a.acknowledged));
    }

    #[test]
    fn test_stale_and_repeated_telemetry_ignored() {
        let store = store();
        store.apply_telemetry(sample(10));
        store.apply_telemetry(sample(10));
        store.apply_telemetry(sample(4));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.history(Metric::Battery).len(), 1);
        assert_eq!(snapshot.position_trail.len(), 1);
        assert_eq!(snapshot.telemetry.timestamp, 10);
    }

    #[test]
    fn test_repeated_health_ignored() {
        let store = store();
        let mut health = store.snapshot().health;
        health.timestamp = 5;
        health.plant_health_score = 70.0;
        store.apply_health(health.clone());
        store.apply_health(health);

        assert_eq!(store.snapshot().history(Metric::HealthScore).len(), 1);
    }

    #[test]
    fn test_finished_mission_is_not_reopened() {
        let store = store();
        store.upsert_mission(mission("m1", 0.0));
        store.set_mission_status("m1", MissionStatus::Cancelled);

        let mut stale = mission("m1", 41.0);
        stale.status = MissionStatus::Active;
        store.upsert_mission(stale);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.missions.len(), 1);
        assert_eq!(snapshot.missions.first().map(|m| m.status), Some(MissionStatus::Cancelled));
        assert_eq!(snapshot.missions.first().map(|m| m.progress), Some(0.0));
    }

    #[test]
    fn test_step_active_mission_sees_current_state() {
        let store = store();
        store.upsert_mission(mission("m1", 0.0));
        store.upsert_mission(mission("m2", 0.0));
        store.set_mission_status("m2", MissionStatus::Active);

        let stepped = store.step_active_mission(|active, count| {
            assert_eq!(count, 2);
            let mut next = active?.clone();
            next.progress = 12.0;
            Some(next)
        });
        assert_eq!(stepped.map(|m| m.mission_id), Some("m2".to_string()));
        assert_eq!(store.snapshot().missions.get(1).map(|m| m.progress), Some(12.0));

        store.set_mission_status("m2", MissionStatus::Failed);
        let stepped = store.step_active_mission(|active, _| {
            assert!(active.is_none());
            None
        });
        assert!(stepped.is_none());
    }

    #[test]
    fn test_published_order_matches_applied_order() {
        let store = store();
        let mut rx = store.subscribe();

        let writers: Vec<_> = (0..2)
            .map(|w| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.add_alert(alert(&format!("w{w}-{i}")));
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let mut received = Vec::new();
        while let Ok(envelope) = rx.try_recv() {
            if let RobotEvent::Alert(a) = envelope.event {
                received.push(a.id);
            }
        }
        assert_eq!(received.len(), 200);

        let stored: Vec<String> = store.snapshot().alerts.iter().map(|a| a.id.clone()).collect();
        let newest_received: Vec<String> = received.iter().rev().take(ALERT_CAPACITY).cloned().collect();
        assert_eq!(stored, newest_received);
    }
}
