use super::super::Environment;

impl Environment {
    /// Decaying plant matter leaches into the toxin pool, scaled by its
    /// toxicity factor.
    pub(in crate::environment) fn step_dead_plants_phase(&mut self) {
        if self.dead_plants.value <= 0.0 {
            return;
        }
        let decayed = self.dead_plants.value * self.config.plant_decay_rate;
        self.dead_plants.value -= decayed;
        self.toxins.value += decayed * self.config.plant_toxicity;
    }

    /// Decaying fish matter enters the toxin pool 1:1.
    pub(in crate::environment) fn step_dead_fish_phase(&mut self) {
        if self.dead_fish.value <= 0.0 {
            return;
        }
        let decayed = self.dead_fish.value * self.config.fish_decay_rate;
        self.dead_fish.value -= decayed;
        self.toxins.value += decayed;
    }
}
