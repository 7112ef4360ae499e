// Simulation scheduler - Fixed-cadence driver feeding the engine into the store
use crate::application::generators::vision::{DetectionCategory, archetype_for};
use crate::application::robot_store::RobotStore;
use crate::application::simulation_engine::SimulationEngine;
use crate::domain::mission::{MissionStatus, SprayUsageEntry};
use crate::domain::now_ms;
use crate::domain::telemetry::RobotMode;
use crate::domain::vision::{DetectionHistoryEntry, VisionFrame};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);
pub const HEALTH_EVERY_TICKS: u64 = 5;

/// What a single tick produced, mostly for logging and tests.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    pub tick: u64,
    pub detections: usize,
    pub health_updated: bool,
    pub alert_raised: bool,
    pub mission_status: Option<MissionStatus>,
    pub mode_changed: Option<RobotMode>,
}

#[derive(Clone)]
pub struct SimulationScheduler {
    engine: Arc<Mutex<SimulationEngine>>,
    store: RobotStore,
    tick_interval: Duration,
    ticks: Arc<AtomicU64>,
    running: Arc<Mutex<Option<CancellationToken>>>,
}

impl SimulationScheduler {
    pub fn new(engine: SimulationEngine, store: RobotStore, tick_interval: Duration) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            store,
            tick_interval,
            ticks: Arc::new(AtomicU64::new(0)),
            running: Arc::new(Mutex::new(None)),
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        lock(&self.running).is_some()
    }

    /// Spawn the recurring driver. Returns `false` if it was already running.
    pub fn start(&self) -> bool {
        let token = {
            let mut running = lock(&self.running);
            if running.is_some() {
                return false;
            }
            let token = CancellationToken::new();
            *running = Some(token.clone());
            token
        };

        self.store.set_simulating(true);
        tracing::info!(
            interval_ms = self.tick_interval.as_millis() as u64,
            "Starting robot data simulation"
        );

        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.run(token).await });
        true
    }

    /// Cancel the driver and clear the simulating flag. Returns `false` if
    /// nothing was running.
    pub fn stop(&self) -> bool {
        let Some(token) = lock(&self.running).take() else {
            return false;
        };
        token.cancel();
        self.store.set_simulating(false);
        tracing::info!(ticks = self.tick_count(), "Simulation stopped");
        true
    }

    /// Put every generator back to its initial state.
    pub fn reset(&self) {
        lock(&self.engine).reset();
        self.ticks.store(0, Ordering::SeqCst);
        tracing::info!("Simulation state reset");
    }

    async fn run(&self, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // first tick of a tokio interval completes immediately
        interval.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    if !self.store.is_simulating() {
                        continue;
                    }
                    self.tick();
                }
            }
        }
    }

    /// Advance the simulation by one tick. Each store action finishes before
    /// the next generator runs.
    pub fn tick(&self) -> TickReport {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        let now = now_ms();
        let mut engine = lock(&self.engine);
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        let mode = self.store.mode();
        let telemetry = engine.generate_telemetry(mode, now);
        self.store.apply_telemetry(telemetry);

        let vision = engine.generate_vision(mode, now);
        report.detections = vision.boxes.len();
        let findings = detection_entries(&vision, &engine, now);
        self.store.apply_vision(vision);
        for entry in findings {
            self.store.add_detection_to_history(entry);
        }

        if tick % HEALTH_EVERY_TICKS == 0 {
            let health = engine.generate_health(now);
            self.store.apply_health(health);
            report.health_updated = true;
        }

        if let Some(alert) = engine.maybe_alert(now) {
            tracing::info!(alert_type = ?alert.alert_type, severity = ?alert.severity, "Simulated alert");
            self.store.add_alert(alert);
            report.alert_raised = true;
        }

        let stepped = self
            .store
            .step_active_mission(|active, mission_count| engine.step_mission(active, mission_count, now));
        if let Some(mission) = stepped {
            if mission.status == MissionStatus::Completed {
                tracing::info!(mission_id = %mission.mission_id, "Mission completed");
                self.store.add_spray_usage(SprayUsageEntry {
                    timestamp: now,
                    amount: mission.resource_estimate.pesticide_required,
                    mission_id: mission.mission_id.clone(),
                    target_count: mission.target_count,
                });
            }
            report.mission_status = Some(mission.status);
        }

        if let Some(next) = engine.next_mode(self.store.mode()) {
            tracing::info!(mode = ?next, "Simulated mode change");
            self.store.set_mode(next);
            report.mode_changed = Some(next);
        }

        tracing::debug!(?report, "Simulation tick");
        report
    }
}

// Everything the detector flagged that isn't a healthy leaf.
fn detection_entries(vision: &VisionFrame, engine: &SimulationEngine, now: i64) -> Vec<DetectionHistoryEntry> {
    let location = engine.position();
    vision
        .boxes
        .iter()
        .filter(|b| {
            archetype_for(&b.label).is_some_and(|a| a.category != DetectionCategory::Healthy)
        })
        .map(|b| DetectionHistoryEntry {
            id: b.id.clone(),
            timestamp: now,
            detection_type: b.label.clone(),
            confidence: b.confidence,
            location,
            action_taken: None,
        })
        .collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
