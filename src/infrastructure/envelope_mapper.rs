// Mapper from the aggregated snapshot back to wire envelopes
use crate::domain::envelope::{EventEnvelope, RobotEvent};
use crate::domain::snapshot::RobotSnapshot;

/// Envelopes that describe the current snapshot, in the order a consumer
/// should apply them. Served to pollers as the fallback feed.
pub fn snapshot_to_envelopes(snapshot: &RobotSnapshot) -> Vec<EventEnvelope> {
    let ts = snapshot.last_update;
    let mut envelopes = vec![
        EventEnvelope::new(RobotEvent::ModeChange(snapshot.mode), ts),
        EventEnvelope::new(RobotEvent::Telemetry(snapshot.telemetry.clone()), snapshot.telemetry.timestamp),
        EventEnvelope::new(RobotEvent::Vision(snapshot.vision.clone()), snapshot.vision.timestamp),
        EventEnvelope::new(RobotEvent::Health(snapshot.health.clone()), snapshot.health.timestamp),
    ];

    envelopes.extend(
        snapshot
            .missions
            .iter()
            .map(|m| EventEnvelope::new(RobotEvent::Mission(m.clone()), ts)),
    );

    // alerts are stored newest-first; replay oldest-first so a consumer
    // prepending them ends up with the same order
    let mut alerts: Vec<_> = snapshot.alerts.iter().collect();
    alerts.reverse();
    envelopes.extend(
        alerts
            .into_iter()
            .map(|a| EventEnvelope::new(RobotEvent::Alert(a.clone()), a.timestamp)),
    );

    envelopes
}
