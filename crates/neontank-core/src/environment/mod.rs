use crate::component::Component;
use crate::config::{ConfigError, TankConfig};
use crate::constants::{ENVIRONMENT_RNG_STREAM, LEVEL_MAX, LEVEL_MIN, STEP_SECONDS};
use crate::fish::{FishHealth, FishId};
use crate::rng;
use crate::snapshot::{Band, Snapshot};
use rand_chacha::ChaCha12Rng;

mod phases;

/// Result of one `tick` call. `steps_run` may be 0 when less than one
/// simulated second has accumulated.
#[derive(Clone, Debug)]
pub struct TickOutcome {
    pub steps_run: u32,
    pub fish_died: u32,
    pub snapshot: Snapshot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddOutcome {
    pub added: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub removed: usize,
    pub total: usize,
}

/// Owns the full chemistry state and the live fish roster, and advances
/// both on a fixed-step scheduler decoupled from frame timing.
///
/// Every chemistry quantity is a [`Component`]; the kind-specific update
/// logic lives in the phase methods under `phases/`, which reach sibling
/// components through `&mut self` — the shared-context handle that keeps
/// each step a pure function of the pre-step state plus the seeded RNG.
pub struct Environment {
    pub(crate) oxygen: Component,
    pub(crate) carbon_dioxide: Component,
    pub(crate) toxins: Component,
    pub(crate) nutrients: Component,
    pub(crate) light: Component,
    pub(crate) plants: Component,
    pub(crate) algae: Component,
    pub(crate) dead_plants: Component,
    pub(crate) dead_fish: Component,
    fish: Vec<FishHealth>,
    /// Residual fractional simulated time carried between frames.
    accumulator: f64,
    feed_level: Band,
    light_level: Band,
    next_fish_id: u64,
    step_index: u64,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) config: TankConfig,
}

impl Environment {
    pub fn new(config: TankConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let initial_fish = config.initial_fish;
        let mut env = Self {
            oxygen: Component::new(config.oxygen_start, LEVEL_MIN, config.photosynthesis_cap),
            carbon_dioxide: Component::bounded(config.carbon_dioxide_start),
            toxins: Component::bounded(config.toxins_start),
            nutrients: Component::new(config.nutrients_start, LEVEL_MIN, config.nutrients_max),
            light: Component::new(config.light_start, LEVEL_MIN, config.light_max),
            plants: Component::new(config.plants_start, 0.0, config.plants_max),
            algae: Component::new(config.algae_start, 0.0, config.algae_max),
            dead_plants: Component::new(0.0, 0.0, f64::INFINITY),
            dead_fish: Component::new(0.0, 0.0, f64::INFINITY),
            fish: Vec::new(),
            accumulator: 0.0,
            feed_level: Band::Medium,
            light_level: Band::Medium,
            next_fish_id: 0,
            step_index: 0,
            rng: rng::derive_stream(config.seed, ENVIRONMENT_RNG_STREAM),
            config,
        };
        if initial_fish > 0 {
            env.add_fish(initial_fish);
        }
        Ok(env)
    }

    pub fn config(&self) -> &TankConfig {
        &self.config
    }

    /// Live roster in age order (oldest first).
    pub fn fish(&self) -> &[FishHealth] {
        &self.fish
    }

    pub fn fish_count(&self) -> usize {
        self.fish.len()
    }

    /// Advance simulated time. Runs one full fixed step per whole
    /// `STEP_SECONDS` accumulated; fractional time persists across calls,
    /// never discarded and never double-counted.
    pub fn tick(&mut self, delta_seconds: f64) -> TickOutcome {
        if delta_seconds.is_finite() && delta_seconds > 0.0 {
            self.accumulator += delta_seconds;
        }

        let mut steps_run = 0u32;
        let mut fish_died = 0u32;
        while self.accumulator >= STEP_SECONDS {
            self.accumulator -= STEP_SECONDS;
            fish_died += self.apply_step();
            steps_run += 1;
        }

        TickOutcome {
            steps_run,
            fish_died,
            snapshot: self.snapshot(),
        }
    }

    /// One fixed simulation step in the load-bearing total order. Later
    /// phases read the values earlier phases left behind; reordering
    /// changes the dynamics.
    fn apply_step(&mut self) -> u32 {
        let deaths = self.step_fish_phase();
        self.step_light_phase();
        self.step_plants_phase();
        self.step_algae_phase();
        self.step_oxygen_phase();
        self.step_carbon_dioxide_phase();
        self.step_toxins_phase();
        self.step_dead_plants_phase();
        self.step_dead_fish_phase();
        self.carbon_dioxide.clamp();
        self.step_index += 1;
        if deaths > 0 {
            log::debug!("step {}: {} fish died", self.step_index, deaths);
        }
        deaths
    }

    pub fn add_fish(&mut self, count: usize) -> AddOutcome {
        for _ in 0..count {
            let id = FishId::new(self.next_fish_id);
            self.next_fish_id += 1;
            self.fish.push(FishHealth::new(
                id,
                self.config.fish_start_health,
                self.config.fish_robustness,
            ));
        }
        log::debug!("added {} fish, roster now {}", count, self.fish.len());
        AddOutcome {
            added: count,
            total: self.fish.len(),
        }
    }

    /// Remove up to `count` fish from the newest end of the roster.
    /// Over-requests silently remove only what exists.
    pub fn remove_fish(&mut self, count: usize) -> RemoveOutcome {
        let removable = count.min(self.fish.len());
        self.fish.truncate(self.fish.len() - removable);
        RemoveOutcome {
            removed: removable,
            total: self.fish.len(),
        }
    }

    /// Partial water change: dilutes toxins and decaying biomass, adds
    /// oxygen, draws down carbon dioxide.
    pub fn water_change(&mut self) -> Snapshot {
        self.toxins.value *= 0.35;
        self.oxygen.value = (self.oxygen.value + 15.0).min(LEVEL_MAX);
        self.carbon_dioxide.value =
            (self.carbon_dioxide.value - 10.0).max(self.config.carbon_dioxide_minimum);
        self.dead_plants.value *= 0.5;
        self.dead_fish.value *= 0.5;
        log::info!(
            "water change: toxins {:.2}, oxygen {:.1}",
            self.toxins.value,
            self.oxygen.value
        );
        self.snapshot()
    }

    /// Set nutrients directly, bypassing decay dynamics, and recompute the
    /// display band.
    pub fn set_nutrient_level(&mut self, value: f64) -> Snapshot {
        self.nutrients.set_clamped(value);
        self.feed_level = Band::classify(
            self.nutrients.value,
            self.config.feed_band_low_cut,
            self.config.feed_band_high_cut,
        );
        self.snapshot()
    }

    /// Set light directly and recompute the display band.
    pub fn set_light_level(&mut self, value: f64) -> Snapshot {
        self.light.set_clamped(value);
        self.light_level = Band::classify(
            self.light.value,
            self.config.light_band_low_cut,
            self.config.light_band_high_cut,
        );
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        let total_health: f64 = self.fish.iter().map(|f| f.value).sum();
        let average_health = if self.fish.is_empty() {
            0.0
        } else {
            total_health / self.fish.len() as f64
        };
        Snapshot {
            oxygen: self.oxygen.value,
            carbon_dioxide: self.carbon_dioxide.value,
            toxins: self.toxins.value,
            fish_count: self.fish.len(),
            average_health,
            plants: self.plants.value,
            algae: self.algae.value,
            light: self.light.value,
            nutrients: self.nutrients.value,
            feed_level: self.feed_level,
            light_level: self.light_level,
        }
    }

    #[cfg(test)]
    pub(crate) fn accumulator(&self) -> f64 {
        self.accumulator
    }
}
