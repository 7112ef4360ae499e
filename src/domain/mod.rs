// Domain layer - Robot state entities, no I/O
pub mod alert;
pub mod drift;
pub mod envelope;
pub mod health;
pub mod history;
pub mod mission;
pub mod snapshot;
pub mod system;
pub mod telemetry;
pub mod vision;

/// Wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
