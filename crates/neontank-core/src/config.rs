use serde::{Deserialize, Serialize};

/// Axis-aligned world rectangle the flock swims in.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl WorldBounds {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Tuning for the steering behavior. The numeric defaults are empirically
/// chosen tuning values with no deeper derivation; treat them as knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub bounds: WorldBounds,
    /// Radius for alignment/cohesion neighbor sensing.
    pub neighbor_radius: f64,
    /// Tighter radius inside which repulsion accumulates.
    pub separation_radius: f64,
    /// Hard lower clamp on resolved speed.
    pub min_speed: f64,
    /// Straight-line swim speed floor for the sick/calm state.
    pub low_health_speed: f64,
    /// Per-fish base speed is drawn uniformly from this range at spawn.
    pub base_speed_min: f64,
    pub base_speed_max: f64,
    /// Target speed = base_speed * (1 + boost * vitality).
    pub speed_boost: f64,
    /// Velocity blend factor per second: base + vitality term.
    pub steer_smoothing_base: f64,
    pub steer_smoothing_vitality: f64,
    /// Vertical speed cap as a fraction of target speed: base + vitality term.
    pub vertical_frac_base: f64,
    pub vertical_frac_vitality: f64,
    /// Distance from a wall at which avoidance starts (scaled by vitality).
    pub boundary_margin: f64,
    /// Wander re-draw interval range, stretched for low-vitality fish.
    pub wander_interval_min: f64,
    pub wander_interval_max: f64,
    pub wander_sluggish_scale: f64,
    /// Direction-flip cooldown at vitality 0 (max) and 1 (min).
    pub direction_cooldown_max: f64,
    pub direction_cooldown_min: f64,
    /// Steering weights; alignment/cohesion/avoidance/wander scale with
    /// vitality, separation eases off as vitality rises.
    pub weight_alignment: f64,
    pub weight_cohesion: f64,
    pub weight_separation_base: f64,
    pub weight_separation_ease: f64,
    pub weight_avoidance: f64,
    pub weight_wander: f64,
    /// Vitality ramp: clamp((health - floor) / span, 0, 1) squared.
    pub vitality_floor_health: f64,
    pub vitality_span: f64,
    /// Velocity changes smaller than this are not committed.
    pub commit_epsilon: f64,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            bounds: WorldBounds::default(),
            neighbor_radius: 120.0,
            separation_radius: 40.0,
            min_speed: 8.0,
            low_health_speed: 12.0,
            base_speed_min: 20.0,
            base_speed_max: 45.0,
            speed_boost: 0.8,
            steer_smoothing_base: 2.0,
            steer_smoothing_vitality: 4.0,
            vertical_frac_base: 0.15,
            vertical_frac_vitality: 0.35,
            boundary_margin: 60.0,
            wander_interval_min: 1.0,
            wander_interval_max: 3.0,
            wander_sluggish_scale: 0.8,
            direction_cooldown_max: 1.2,
            direction_cooldown_min: 0.4,
            weight_alignment: 0.8,
            weight_cohesion: 0.5,
            weight_separation_base: 1.6,
            weight_separation_ease: 0.6,
            weight_avoidance: 1.2,
            weight_wander: 0.6,
            vitality_floor_health: 60.0,
            vitality_span: 40.0,
            commit_epsilon: 0.01,
        }
    }
}

/// Full simulation configuration: chemistry rates, population defaults,
/// and flocking tuning. All values have working defaults; a config file
/// only needs the fields it overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Deterministic seed for reproducible runs.
    pub seed: u64,
    /// Fish present at construction.
    pub initial_fish: usize,

    // Fish
    pub fish_start_health: f64,
    pub fish_robustness: f64,
    /// Per-fish oxygen draw per step, proportional to current oxygen.
    pub oxygen_consumption_rate: f64,
    /// Fixed toxin waste per fish per step.
    pub fish_waste_rate: f64,
    /// Biomass added to the dead-fish pool per death.
    pub dead_fish_increment: f64,

    // Oxygen
    pub oxygen_start: f64,
    /// Transient upper bound fed by photosynthesis, above the general 100.
    pub photosynthesis_cap: f64,
    pub oxygen_low: f64,
    pub oxygen_medium: f64,
    pub oxygen_high: f64,

    // Carbon dioxide
    pub carbon_dioxide_start: f64,
    pub carbon_dioxide_minimum: f64,
    /// Exponential approach rate back up toward the minimum.
    pub carbon_dioxide_regeneration_rate: f64,

    // Toxins
    pub toxins_start: f64,
    pub toxin_decay_rate: f64,
    pub toxin_high_oxygen_decay_rate: f64,
    pub toxin_minimum: f64,
    pub toxin_danger: f64,
    pub toxin_safe: f64,

    // Plants
    pub plants_start: f64,
    pub plants_max: f64,
    pub plant_growth_rate: f64,
    pub plant_death_rate: f64,
    pub plant_photosynthesis_rate: f64,

    // Algae
    pub algae_start: f64,
    pub algae_max: f64,
    pub algae_growth_rate: f64,
    pub algae_photosynthesis_rate: f64,

    // Nutrients
    pub nutrients_start: f64,
    pub nutrients_max: f64,
    /// Denominator of the nutrient factor in photosynthesis.
    pub feed_mid: f64,
    /// Health rule thresholds.
    pub feed_low_threshold: f64,
    pub feed_high_threshold: f64,
    /// Display band cut points.
    pub feed_band_low_cut: f64,
    pub feed_band_high_cut: f64,

    // Light
    pub light_start: f64,
    pub light_max: f64,
    pub light_band_low_cut: f64,
    pub light_band_high_cut: f64,

    // Decaying biomass
    pub plant_decay_rate: f64,
    pub fish_decay_rate: f64,
    /// Scale on decayed plant matter entering the toxin pool.
    pub plant_toxicity: f64,

    pub flock: FlockConfig,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_fish: 6,
            fish_start_health: 50.0,
            fish_robustness: 20.0,
            oxygen_consumption_rate: 0.0008,
            fish_waste_rate: 0.0006,
            dead_fish_increment: 10.0,
            oxygen_start: 100.0,
            photosynthesis_cap: 120.0,
            oxygen_low: 40.0,
            oxygen_medium: 60.0,
            oxygen_high: 80.0,
            carbon_dioxide_start: 20.0,
            carbon_dioxide_minimum: 8.0,
            carbon_dioxide_regeneration_rate: 0.05,
            toxins_start: 2.0,
            toxin_decay_rate: 0.0015,
            toxin_high_oxygen_decay_rate: 0.004,
            toxin_minimum: 0.5,
            toxin_danger: 5.0,
            toxin_safe: 1.0,
            plants_start: 500.0,
            plants_max: 5000.0,
            plant_growth_rate: 0.005,
            plant_death_rate: 0.0005,
            plant_photosynthesis_rate: 0.0008,
            algae_start: 1.0,
            algae_max: 50.0,
            algae_growth_rate: 0.0008,
            algae_photosynthesis_rate: 0.0006,
            nutrients_start: 100.0,
            nutrients_max: 120.0,
            feed_mid: 100.0,
            feed_low_threshold: 80.0,
            feed_high_threshold: 120.0,
            feed_band_low_cut: 90.0,
            feed_band_high_cut: 110.0,
            light_start: 12.0,
            light_max: 20.0,
            light_band_low_cut: 11.0,
            light_band_high_cut: 13.0,
            plant_decay_rate: 0.02,
            fish_decay_rate: 0.002,
            plant_toxicity: 0.008,
            flock: FlockConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A rate or scale is not finite or is negative.
    InvalidRate { field: &'static str },
    /// A level, start value, or threshold is not finite or is negative.
    InvalidLevel { field: &'static str },
    /// Oxygen thresholds must satisfy low < medium < high.
    OxygenThresholdOrder,
    /// Band cut points must satisfy low < high.
    BandCutOrder { field: &'static str },
    /// World bounds must have positive, finite extent.
    InvalidBounds,
    /// A radius must be positive and finite.
    InvalidRadius { field: &'static str },
    /// Speeds must be positive, finite, and min <= max.
    InvalidSpeedRange,
    /// An interval range must be positive, finite, and min <= max.
    InvalidInterval { field: &'static str },
    /// The vitality span must be positive and finite.
    InvalidVitalitySpan,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidRate { field } => {
                write!(f, "{field} must be finite and non-negative")
            }
            ConfigError::InvalidLevel { field } => {
                write!(f, "{field} must be finite and non-negative")
            }
            ConfigError::OxygenThresholdOrder => {
                write!(f, "oxygen thresholds must satisfy low < medium < high")
            }
            ConfigError::BandCutOrder { field } => {
                write!(f, "{field} band cut points must satisfy low < high")
            }
            ConfigError::InvalidBounds => {
                write!(f, "world bounds must have positive finite extent")
            }
            ConfigError::InvalidRadius { field } => {
                write!(f, "{field} must be positive and finite")
            }
            ConfigError::InvalidSpeedRange => {
                write!(f, "speeds must be positive, finite, and min <= max")
            }
            ConfigError::InvalidInterval { field } => {
                write!(f, "{field} range must be positive, finite, and min <= max")
            }
            ConfigError::InvalidVitalitySpan => {
                write!(f, "vitality_span must be positive and finite")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn check_rate(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { field })
    }
}

fn check_level(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidLevel { field })
    }
}

impl TankConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate(self.oxygen_consumption_rate, "oxygen_consumption_rate")?;
        check_rate(self.fish_waste_rate, "fish_waste_rate")?;
        check_rate(
            self.carbon_dioxide_regeneration_rate,
            "carbon_dioxide_regeneration_rate",
        )?;
        check_rate(self.toxin_decay_rate, "toxin_decay_rate")?;
        check_rate(
            self.toxin_high_oxygen_decay_rate,
            "toxin_high_oxygen_decay_rate",
        )?;
        check_rate(self.plant_growth_rate, "plant_growth_rate")?;
        check_rate(self.plant_death_rate, "plant_death_rate")?;
        check_rate(self.plant_photosynthesis_rate, "plant_photosynthesis_rate")?;
        check_rate(self.algae_growth_rate, "algae_growth_rate")?;
        check_rate(self.algae_photosynthesis_rate, "algae_photosynthesis_rate")?;
        check_rate(self.plant_decay_rate, "plant_decay_rate")?;
        check_rate(self.fish_decay_rate, "fish_decay_rate")?;
        check_rate(self.plant_toxicity, "plant_toxicity")?;

        check_level(self.fish_start_health, "fish_start_health")?;
        check_level(self.fish_robustness, "fish_robustness")?;
        check_level(self.dead_fish_increment, "dead_fish_increment")?;
        check_level(self.oxygen_start, "oxygen_start")?;
        check_level(self.photosynthesis_cap, "photosynthesis_cap")?;
        check_level(self.carbon_dioxide_start, "carbon_dioxide_start")?;
        check_level(self.carbon_dioxide_minimum, "carbon_dioxide_minimum")?;
        check_level(self.toxins_start, "toxins_start")?;
        check_level(self.toxin_minimum, "toxin_minimum")?;
        check_level(self.toxin_danger, "toxin_danger")?;
        check_level(self.toxin_safe, "toxin_safe")?;
        check_level(self.plants_start, "plants_start")?;
        check_level(self.algae_start, "algae_start")?;
        check_level(self.algae_max, "algae_max")?;
        check_level(self.nutrients_start, "nutrients_start")?;
        check_level(self.nutrients_max, "nutrients_max")?;
        check_level(self.feed_low_threshold, "feed_low_threshold")?;
        check_level(self.feed_high_threshold, "feed_high_threshold")?;
        check_level(self.light_start, "light_start")?;
        check_level(self.light_max, "light_max")?;

        if !(self.plants_max.is_finite() && self.plants_max > 0.0) {
            return Err(ConfigError::InvalidLevel {
                field: "plants_max",
            });
        }
        if !(self.feed_mid.is_finite() && self.feed_mid > 0.0) {
            return Err(ConfigError::InvalidLevel { field: "feed_mid" });
        }
        if !(self.oxygen_low < self.oxygen_medium && self.oxygen_medium < self.oxygen_high) {
            return Err(ConfigError::OxygenThresholdOrder);
        }
        if self.feed_band_low_cut >= self.feed_band_high_cut {
            return Err(ConfigError::BandCutOrder { field: "feed" });
        }
        if self.light_band_low_cut >= self.light_band_high_cut {
            return Err(ConfigError::BandCutOrder { field: "light" });
        }

        self.flock.validate()
    }
}

impl FlockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bounds;
        if !(b.x.is_finite()
            && b.y.is_finite()
            && b.width.is_finite()
            && b.height.is_finite()
            && b.width > 0.0
            && b.height > 0.0)
        {
            return Err(ConfigError::InvalidBounds);
        }
        if !(self.neighbor_radius.is_finite() && self.neighbor_radius > 0.0) {
            return Err(ConfigError::InvalidRadius {
                field: "neighbor_radius",
            });
        }
        if !(self.separation_radius.is_finite() && self.separation_radius > 0.0) {
            return Err(ConfigError::InvalidRadius {
                field: "separation_radius",
            });
        }
        if !(self.boundary_margin.is_finite() && self.boundary_margin > 0.0) {
            return Err(ConfigError::InvalidRadius {
                field: "boundary_margin",
            });
        }
        let speeds_ok = [
            self.min_speed,
            self.low_health_speed,
            self.base_speed_min,
            self.base_speed_max,
        ]
        .iter()
        .all(|s| s.is_finite() && *s > 0.0)
            && self.base_speed_min <= self.base_speed_max;
        if !speeds_ok {
            return Err(ConfigError::InvalidSpeedRange);
        }
        if !(self.wander_interval_min.is_finite()
            && self.wander_interval_min > 0.0
            && self.wander_interval_max.is_finite()
            && self.wander_interval_min <= self.wander_interval_max)
        {
            return Err(ConfigError::InvalidInterval {
                field: "wander_interval",
            });
        }
        if !(self.direction_cooldown_min.is_finite()
            && self.direction_cooldown_min >= 0.0
            && self.direction_cooldown_max.is_finite()
            && self.direction_cooldown_min <= self.direction_cooldown_max)
        {
            return Err(ConfigError::InvalidInterval {
                field: "direction_cooldown",
            });
        }
        if !(self.vitality_span.is_finite() && self.vitality_span > 0.0) {
            return Err(ConfigError::InvalidVitalitySpan);
        }
        Ok(())
    }
}
