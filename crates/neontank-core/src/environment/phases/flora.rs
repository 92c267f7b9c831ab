use super::super::Environment;

impl Environment {
    /// Light has no autonomous dynamics; it only changes through
    /// `set_light_level`. The phase exists so the step order stays explicit.
    pub(in crate::environment) fn step_light_phase(&mut self) {}

    /// Plant photosynthesis, logistic growth, and decay into dead matter.
    pub(in crate::environment) fn step_plants_phase(&mut self) {
        let fraction = self.plants.value / self.config.plants_max;
        let nutrient_factor = (self.nutrients.value / self.config.feed_mid).clamp(0.1, 2.0);
        let photosynthesis = fraction
            * self.carbon_dioxide.value
            * self.config.plant_photosynthesis_rate
            * self.light.value
            * nutrient_factor;

        self.carbon_dioxide.value =
            (self.carbon_dioxide.value - photosynthesis).max(self.config.carbon_dioxide_minimum);
        self.oxygen.value =
            (self.oxygen.value + photosynthesis).min(self.config.photosynthesis_cap);

        let grown = self.plants.value
            * (1.0 + self.config.plant_growth_rate * nutrient_factor * (1.0 - fraction));
        let decay = self.plants.value * self.config.plant_death_rate;
        self.plants.value = (grown - decay).max(0.0);
        self.dead_plants.value += decay;
        self.nutrients.value = (self.nutrients.value - nutrient_factor * 0.5).max(0.0);
    }

    /// Algae variant: photosynthesis scales with raw biomass rather than a
    /// capacity fraction, growth is geometric, and the bloom is capped.
    pub(in crate::environment) fn step_algae_phase(&mut self) {
        let nutrient_factor = (self.nutrients.value / self.config.feed_mid).clamp(0.1, 1.5);
        let biomass = self.algae.value.max(0.0);
        let photosynthesis = biomass
            * self.carbon_dioxide.value
            * self.config.algae_photosynthesis_rate
            * self.light.value
            * nutrient_factor;

        self.carbon_dioxide.value =
            (self.carbon_dioxide.value - photosynthesis).max(self.config.carbon_dioxide_minimum);
        self.oxygen.value =
            (self.oxygen.value + photosynthesis).min(self.config.photosynthesis_cap);

        self.algae.value = (self.algae.value
            * (1.0 + self.config.algae_growth_rate * nutrient_factor))
            .clamp(0.0, self.config.algae_max);
        self.nutrients.value = (self.nutrients.value - nutrient_factor * 0.2).max(0.0);
    }
}
