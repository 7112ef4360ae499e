// Event dispatcher - Routes decoded envelopes to the matching store action
use crate::application::robot_store::RobotStore;
use crate::domain::envelope::{EventEnvelope, RobotEvent};

#[derive(Clone)]
pub struct EventDispatcher {
    store: RobotStore,
}

impl EventDispatcher {
    pub fn new(store: RobotStore) -> Self {
        Self { store }
    }

    pub fn apply(&self, envelope: EventEnvelope) {
        match envelope.event {
            RobotEvent::Telemetry(t) => self.store.apply_telemetry(t),
            RobotEvent::Vision(v) => self.store.apply_vision(v),
            RobotEvent::Health(h) => self.store.apply_health(h),
            RobotEvent::Alert(a) => self.store.add_alert(a),
            RobotEvent::Mission(m) => self.store.upsert_mission(m),
            RobotEvent::System(s) => self.store.replace_system_info(s),
            RobotEvent::ModeChange(mode) => self.store.set_mode(mode),
        }
        self.store.set_online(true);
    }

    /// Decode and apply one text frame. Bad frames are logged and dropped;
    /// the store is untouched. Returns whether the frame was applied.
    pub fn apply_text(&self, text: &str) -> bool {
        match EventEnvelope::decode(text) {
            Ok(envelope) => {
                tracing::debug!(kind = envelope.event.kind(), "Applying transport event");
                self.apply(envelope);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding transport message");
                false
            }
        }
    }

    /// Apply a batch from the poll fallback, skipping bad entries.
    pub fn apply_batch(&self, batch: Vec<serde_json::Value>) -> usize {
        let mut applied = 0;
        for value in batch {
            match EventEnvelope::from_value(value) {
                Ok(envelope) => {
                    self.apply(envelope);
                    applied += 1;
                }
                Err(e) => tracing::warn!(error = %e, "Discarding polled message"),
            }
        }
        applied
    }
}
