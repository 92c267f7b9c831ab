use super::super::Environment;

impl Environment {
    /// Oxygen only needs pulling back under the photosynthesis cap; the
    /// fish phase already floors it at zero.
    pub(in crate::environment) fn step_oxygen_phase(&mut self) {
        if self.oxygen.value > self.config.photosynthesis_cap {
            self.oxygen.value = self.config.photosynthesis_cap;
        }
    }

    /// Below its minimum, CO2 relaxes back up exponentially rather than
    /// snapping, modeling slow replenishment from the surface.
    pub(in crate::environment) fn step_carbon_dioxide_phase(&mut self) {
        let minimum = self.config.carbon_dioxide_minimum;
        let rate = self.config.carbon_dioxide_regeneration_rate;
        if self.carbon_dioxide.value < minimum {
            if rate > 0.0 {
                self.carbon_dioxide.value += (minimum - self.carbon_dioxide.value) * rate;
            } else {
                self.carbon_dioxide.value = minimum;
            }
        }
    }

    /// Toxin breakdown speeds up with oxygenation: base rate in poorly
    /// oxygenated water, 1.5x in the medium band, and a distinct higher
    /// rate above the high threshold.
    pub(in crate::environment) fn step_toxins_phase(&mut self) {
        let oxygen = self.oxygen.value;
        let decay_rate = if oxygen > self.config.oxygen_high {
            self.config.toxin_high_oxygen_decay_rate
        } else if oxygen >= self.config.oxygen_medium {
            self.config.toxin_decay_rate * 1.5
        } else {
            self.config.toxin_decay_rate
        };

        let retained = (1.0 - decay_rate).max(0.0);
        self.toxins.value *= retained;
        if self.toxins.value < self.config.toxin_minimum {
            self.toxins.value = self.config.toxin_minimum;
        }
    }
}
