// Vision generator - Synthetic detector output per camera frame
use crate::domain::drift::random_in_range;
use crate::domain::telemetry::RobotMode;
use crate::domain::vision::{DetectionBox, VisionFrame};
use rand::Rng;

const MAX_DETECTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionCategory {
    Disease,
    Pest,
    Healthy,
}

#[derive(Debug, Clone, Copy)]
pub struct DetectionArchetype {
    pub label: &'static str,
    pub category: DetectionCategory,
    pub color: &'static str,
}

pub const DETECTION_CATALOG: [DetectionArchetype; 6] = [
    DetectionArchetype {
        label: "Powdery Mildew",
        category: DetectionCategory::Disease,
        color: "#ef4444",
    },
    DetectionArchetype {
        label: "Aphid Colony",
        category: DetectionCategory::Pest,
        color: "#f97316",
    },
    DetectionArchetype {
        label: "Leaf Spot",
        category: DetectionCategory::Disease,
        color: "#eab308",
    },
    DetectionArchetype {
        label: "Healthy Leaf",
        category: DetectionCategory::Healthy,
        color: "#22c55e",
    },
    DetectionArchetype {
        label: "Caterpillar",
        category: DetectionCategory::Pest,
        color: "#f97316",
    },
    DetectionArchetype {
        label: "Rust Fungus",
        category: DetectionCategory::Disease,
        color: "#ef4444",
    },
];

/// Look up the archetype a detection label came from.
pub fn archetype_for(label: &str) -> Option<&'static DetectionArchetype> {
    DETECTION_CATALOG.iter().find(|a| a.label == label)
}

#[derive(Debug, Clone, Default)]
pub struct VisionGenerator {
    frame_counter: u64,
}

impl VisionGenerator {
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, mode: RobotMode, now: i64) -> VisionFrame {
        self.frame_counter += 1;
        let frame_id = self.frame_counter;

        let boxes = if mode.is_moving() {
            let count = rng.random_range(0..MAX_DETECTIONS);
            (0..count)
                .map(|i| {
                    let archetype = &DETECTION_CATALOG[rng.random_range(0..DETECTION_CATALOG.len())];
                    DetectionBox {
                        id: format!("det-{frame_id}-{i}"),
                        x: random_in_range(rng, 0.1, 0.7),
                        y: random_in_range(rng, 0.1, 0.7),
                        width: random_in_range(rng, 0.1, 0.25),
                        height: random_in_range(rng, 0.1, 0.25),
                        label: archetype.label.to_string(),
                        confidence: random_in_range(rng, 0.7, 0.98),
                        color: archetype.color.to_string(),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        VisionFrame {
            frame_id,
            timestamp: now,
            boxes,
        }
    }
}
