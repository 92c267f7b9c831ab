use super::super::Environment;
use crate::constants::{LEVEL_MAX, LEVEL_MIN};
use rand::Rng;

impl Environment {
    /// Per-fish respiration, waste, and health update, in roster order.
    /// Each fish sees the water state left behind by the fish before it.
    /// Returns the number of deaths this step.
    pub(in crate::environment) fn step_fish_phase(&mut self) -> u32 {
        let cfg = &self.config;
        let consumption_rate = cfg.oxygen_consumption_rate;
        let waste_rate = cfg.fish_waste_rate;
        let feed_low = cfg.feed_low_threshold;
        let feed_high = cfg.feed_high_threshold;
        let toxin_danger = cfg.toxin_danger;
        let toxin_safe = cfg.toxin_safe;
        let oxygen_low = cfg.oxygen_low;
        let oxygen_high = cfg.oxygen_high;
        let dead_fish_increment = cfg.dead_fish_increment;

        for fish in &mut self.fish {
            let consumption = self.oxygen.value * consumption_rate;
            self.oxygen.value = (self.oxygen.value - consumption).max(LEVEL_MIN);
            self.carbon_dioxide.value += consumption;
            self.toxins.value += waste_rate;

            if self.nutrients.value < feed_low {
                fish.value -= 0.5;
            }
            if self.nutrients.value > feed_high {
                fish.value += 0.5;
            }
            if self.toxins.value > toxin_danger {
                fish.value -= 1.0;
            }
            if self.oxygen.value < oxygen_low {
                fish.value -= oxygen_low - self.oxygen.value;
            }
            if self.toxins.value < toxin_safe {
                fish.value += 1.0;
            }
            if self.oxygen.value > oxygen_high {
                fish.value += self.oxygen.value - oxygen_high;
            }
            fish.value += self.rng.random_range(-1.0..=1.0);
            fish.value = fish.value.clamp(LEVEL_MIN, LEVEL_MAX);
        }

        // Deaths are resolved after all fish have respired; the per-fish
        // water mutations above are sequential either way.
        let mut deaths = 0u32;
        let dead_fish = &mut self.dead_fish;
        self.fish.retain(|fish| {
            if fish.is_dead() {
                deaths += 1;
                dead_fish.value += dead_fish_increment;
                false
            } else {
                true
            }
        });
        deaths
    }
}
