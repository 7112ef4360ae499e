// Mode cycler - Timer-driven walk through the robot's operating modes
use crate::domain::drift::random_in_range;
use crate::domain::telemetry::RobotMode;
use rand::Rng;

pub const MODE_SEQUENCE: [RobotMode; 5] = [
    RobotMode::Idle,
    RobotMode::Scanning,
    RobotMode::Spraying,
    RobotMode::Scanning,
    RobotMode::Returning,
];

const MIN_DWELL_TICKS: f64 = 30.0;
const MAX_DWELL_TICKS: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct ModeCycler {
    counter: u32,
    threshold: f64,
    cursor: Option<usize>,
}

impl ModeCycler {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            counter: 0,
            threshold: random_in_range(rng, MIN_DWELL_TICKS, MAX_DWELL_TICKS),
            cursor: None,
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Count one tick; returns the next mode once the dwell threshold is passed.
    pub fn next_mode<R: Rng + ?Sized>(&mut self, rng: &mut R, current: RobotMode) -> Option<RobotMode> {
        self.counter += 1;
        if f64::from(self.counter) < self.threshold {
            return None;
        }

        self.counter = 0;
        self.threshold = random_in_range(rng, MIN_DWELL_TICKS, MAX_DWELL_TICKS);

        let next_index = match self.resolve_cursor(current) {
            Some(index) => (index + 1) % MODE_SEQUENCE.len(),
            None => 0,
        };
        self.cursor = Some(next_index);
        Some(MODE_SEQUENCE[next_index])
    }

    // Trust our own cursor unless the mode was changed behind our back.
    fn resolve_cursor(&self, current: RobotMode) -> Option<usize> {
        match self.cursor {
            Some(index) if MODE_SEQUENCE[index] == current => Some(index),
            _ => MODE_SEQUENCE.iter().position(|m| *m == current),
        }
    }
}
