// Plant health domain models
use serde::{Deserialize, Serialize};

/// Ordinal severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityLevel {
    /// Classify a field-wide infection percentage.
    pub fn from_infection(infection_percent: f64) -> Self {
        if infection_percent > 30.0 {
            SeverityLevel::Critical
        } else if infection_percent > 20.0 {
            SeverityLevel::High
        } else if infection_percent > 10.0 {
            SeverityLevel::Medium
        } else {
            SeverityLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStat {
    pub zone_id: String,
    pub zone_name: String,
    pub infection_level: f64,
    pub leaf_count: u32,
    pub last_scanned: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub timestamp: i64,
    pub plant_health_score: f64,
    pub infection_percent: f64,
    pub severity_level: SeverityLevel,
    pub leaf_count: u32,
    pub zone_stats: Vec<ZoneStat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(SeverityLevel::from_infection(35.0), SeverityLevel::Critical);
        assert_eq!(SeverityLevel::from_infection(25.0), SeverityLevel::High);
        assert_eq!(SeverityLevel::from_infection(15.0), SeverityLevel::Medium);
        assert_eq!(SeverityLevel::from_infection(5.0), SeverityLevel::Low);
    }

    #[test]
    fn test_severity_boundaries_are_exclusive() {
        assert_eq!(SeverityLevel::from_infection(30.0), SeverityLevel::High);
        assert_eq!(SeverityLevel::from_infection(20.0), SeverityLevel::Medium);
        assert_eq!(SeverityLevel::from_infection(10.0), SeverityLevel::Low);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(SeverityLevel::Critical > SeverityLevel::High);
        assert!(SeverityLevel::Medium > SeverityLevel::Low);
    }
}
