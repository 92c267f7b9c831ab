use serde::{Deserialize, Serialize};

/// Coarse display classification of a continuous control value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    #[default]
    Medium,
    High,
}

impl Band {
    /// Threshold comparison against fixed cut points: at or below `low_cut`
    /// is Low, at or above `high_cut` is High, everything between Medium.
    pub fn classify(value: f64, low_cut: f64, high_cut: f64) -> Self {
        if value <= low_cut {
            Band::Low
        } else if value >= high_cut {
            Band::High
        } else {
            Band::Medium
        }
    }
}

/// Read-only projection of all environment quantities at a point in time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub oxygen: f64,
    pub carbon_dioxide: f64,
    pub toxins: f64,
    pub fish_count: usize,
    /// Arithmetic mean of fish health; 0 when the roster is empty.
    pub average_health: f64,
    pub plants: f64,
    pub algae: f64,
    pub light: f64,
    pub nutrients: f64,
    pub feed_level: Band,
    pub light_level: Band,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_uses_inclusive_cut_points() {
        assert_eq!(Band::classify(90.0, 90.0, 110.0), Band::Low);
        assert_eq!(Band::classify(90.1, 90.0, 110.0), Band::Medium);
        assert_eq!(Band::classify(110.0, 90.0, 110.0), Band::High);
        assert_eq!(Band::classify(100.0, 90.0, 110.0), Band::Medium);
    }
}
