use crate::constants::{LEVEL_MAX, LEVEL_MIN};

/// Minimal state unit shared by every chemistry quantity and fish health:
/// a scalar with type-specific bounds applied on demand.
///
/// Updates happen through the owning [`crate::environment::Environment`]'s
/// step phases; the bounds here are the resting invariant, not a guard on
/// every intermediate write (plant output may push oxygen past its general
/// bound within a step, for example).
#[derive(Clone, Copy, Debug)]
pub struct Component {
    pub value: f64,
    min: f64,
    max: f64,
}

impl Component {
    pub fn new(initial: f64, min: f64, max: f64) -> Self {
        debug_assert!(min <= max, "component bounds inverted");
        Self {
            value: initial,
            min,
            max,
        }
    }

    /// Component with the global default [0, 100] bounds.
    pub fn bounded(initial: f64) -> Self {
        Self::new(initial, LEVEL_MIN, LEVEL_MAX)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Pull the value back into this component's bounds.
    pub fn clamp(&mut self) {
        if self.value < self.min {
            self.value = self.min;
        } else if self.value > self.max {
            self.value = self.max;
        }
    }

    /// Set the value directly, clamped into bounds. Non-finite input is
    /// ignored rather than rejected; degenerate writes are a no-op.
    pub fn set_clamped(&mut self, value: f64) {
        if value.is_finite() {
            self.value = value.clamp(self.min, self.max);
        }
    }
}
