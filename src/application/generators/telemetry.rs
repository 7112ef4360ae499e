// Telemetry generator - Smoothly drifting robot vitals
use crate::domain::drift::{clamp, drift, random_in_range, round_to};
use crate::domain::telemetry::{GeoPoint, RobotMode, TelemetrySample};
use rand::Rng;

const MIN_BATTERY: f64 = 5.0;
const SCANNING_STEP: f64 = 1e-5;
const SPRAYING_STEP: f64 = 5e-6;

/// Running values carried between ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryAccumulator {
    pub battery: f64,
    pub pesticide: f64,
    pub cpu: f64,
    pub fps: f64,
    pub latency: f64,
    pub position: GeoPoint,
    pub heading: f64,
    pub speed: f64,
}

impl Default for TelemetryAccumulator {
    fn default() -> Self {
        Self {
            battery: 85.0,
            pesticide: 72.0,
            cpu: 45.0,
            fps: 30.0,
            latency: 12.0,
            position: GeoPoint::new(37.7749, -122.4194),
            heading: 45.0,
            speed: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryGenerator {
    state: TelemetryAccumulator,
}

impl TelemetryGenerator {
    pub fn new(state: TelemetryAccumulator) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TelemetryAccumulator {
        &self.state
    }

    pub fn position(&self) -> GeoPoint {
        self.state.position
    }

    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, mode: RobotMode, now: i64) -> TelemetrySample {
        let s = &mut self.state;

        let drain = match mode {
            RobotMode::Spraying => 0.05,
            RobotMode::Scanning => 0.02,
            _ => 0.01,
        };
        s.battery = clamp(s.battery - drain, MIN_BATTERY, 100.0);

        if mode == RobotMode::Spraying {
            s.pesticide = clamp(s.pesticide - 0.1, 0.0, 100.0);
        }

        let cpu_target = match mode {
            RobotMode::Scanning => 65.0,
            RobotMode::Spraying => 55.0,
            _ => 35.0,
        };
        s.cpu = clamp(
            drift(s.cpu, cpu_target + random_in_range(rng, -5.0, 5.0), 0.1),
            0.0,
            100.0,
        );
        s.fps = clamp(drift(s.fps, 30.0 + random_in_range(rng, -3.0, 3.0), 0.2), 24.0, 32.0);
        s.latency = clamp(
            drift(s.latency, 12.0 + random_in_range(rng, -5.0, 8.0), 0.15),
            5.0,
            50.0,
        );

        if mode.is_moving() {
            s.heading = (s.heading + random_in_range(rng, -5.0, 5.0) + 360.0) % 360.0;
            let (step, speed) = if mode == RobotMode::Spraying {
                (SPRAYING_STEP, 0.3)
            } else {
                (SCANNING_STEP, 0.5)
            };
            let radians = s.heading.to_radians();
            s.position.lat += radians.cos() * step;
            s.position.lng += radians.sin() * step;
            s.speed = speed;
        } else {
            s.speed = 0.0;
        }

        TelemetrySample {
            timestamp: now,
            battery: round_to(s.battery, 1),
            pesticide: round_to(s.pesticide, 1),
            cpu: s.cpu.round(),
            fps: s.fps.round(),
            latency: s.latency.round(),
            temperature: Some(28.0 + random_in_range(rng, -2.0, 2.0)),
            humidity: Some(65.0 + random_in_range(rng, -5.0, 5.0)),
            position: s.position,
            heading: s.heading.round() % 360.0,
            speed: s.speed,
        }
    }
}
