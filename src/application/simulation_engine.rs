// Simulation engine - Owns every generator's running state and the random source
use crate::application::generators::alert;
use crate::application::generators::health::{HealthAccumulator, HealthGenerator};
use crate::application::generators::mission::MissionGenerator;
use crate::application::generators::mode::ModeCycler;
use crate::application::generators::telemetry::{TelemetryAccumulator, TelemetryGenerator};
use crate::application::generators::vision::VisionGenerator;
use crate::domain::alert::AlertEvent;
use crate::domain::health::HealthSnapshot;
use crate::domain::mission::MissionState;
use crate::domain::telemetry::{GeoPoint, RobotMode, TelemetrySample};
use crate::domain::vision::VisionFrame;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// One simulated robot. Independent engines never share state, and a seeded
/// engine replays the same event stream.
#[derive(Debug)]
pub struct SimulationEngine {
    rng: StdRng,
    telemetry: TelemetryGenerator,
    vision: VisionGenerator,
    health: HealthGenerator,
    mission: MissionGenerator,
    mode: ModeCycler,
}

impl SimulationEngine {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(rng)
    }

    pub fn with_rng(mut rng: StdRng) -> Self {
        let mode = ModeCycler::new(&mut rng);
        Self {
            rng,
            telemetry: TelemetryGenerator::default(),
            vision: VisionGenerator::default(),
            health: HealthGenerator::default(),
            mission: MissionGenerator::default(),
            mode,
        }
    }

    /// Start from explicit accumulator values instead of the defaults.
    pub fn with_state(mut self, telemetry: TelemetryAccumulator, health: HealthAccumulator) -> Self {
        self.telemetry = TelemetryGenerator::new(telemetry);
        self.health = HealthGenerator::new(health);
        self
    }

    /// Restore every accumulator and counter; the random source keeps running.
    pub fn reset(&mut self) {
        self.telemetry = TelemetryGenerator::default();
        self.vision = VisionGenerator::default();
        self.health = HealthGenerator::default();
        self.mission = MissionGenerator::default();
        self.mode = ModeCycler::new(&mut self.rng);
    }

    pub fn telemetry_state(&self) -> &TelemetryAccumulator {
        self.telemetry.state()
    }

    pub fn health_state(&self) -> &HealthAccumulator {
        self.health.state()
    }

    pub fn frame_counter(&self) -> u64 {
        self.vision.frame_counter()
    }

    pub fn position(&self) -> GeoPoint {
        self.telemetry.position()
    }

    pub fn generate_telemetry(&mut self, mode: RobotMode, now: i64) -> TelemetrySample {
        self.telemetry.generate(&mut self.rng, mode, now)
    }

    pub fn generate_vision(&mut self, mode: RobotMode, now: i64) -> VisionFrame {
        self.vision.generate(&mut self.rng, mode, now)
    }

    pub fn generate_health(&mut self, now: i64) -> HealthSnapshot {
        self.health.generate(&mut self.rng, now)
    }

    pub fn maybe_alert(&mut self, now: i64) -> Option<AlertEvent> {
        alert::maybe_generate(&mut self.rng, self.telemetry.position(), now)
    }

    pub fn step_mission(
        &mut self,
        active: Option<&MissionState>,
        mission_count: usize,
        now: i64,
    ) -> Option<MissionState> {
        self.mission.step(&mut self.rng, active, mission_count, now)
    }

    pub fn next_mode(&mut self, current: RobotMode) -> Option<RobotMode> {
        self.mode.next_mode(&mut self.rng, current)
    }
}
