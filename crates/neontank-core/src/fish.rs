/// Stable identity for a fish across its lifetime. IDs are assigned
/// monotonically by the environment, so roster order (= age order) and
/// ID order coincide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FishId(u64);

impl FishId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Health state for one live fish. Created by the environment when a fish
/// is added, removed from the roster the step its value drops below
/// `robustness`.
#[derive(Clone, Debug)]
pub struct FishHealth {
    id: FishId,
    /// Current health in [0, 100].
    pub value: f64,
    robustness: f64,
}

impl FishHealth {
    pub(crate) fn new(id: FishId, start: f64, robustness: f64) -> Self {
        Self {
            id,
            value: start,
            robustness,
        }
    }

    pub fn id(&self) -> FishId {
        self.id
    }

    /// Health threshold below which the fish dies.
    pub fn robustness(&self) -> f64 {
        self.robustness
    }

    pub fn is_dead(&self) -> bool {
        self.value < self.robustness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_strictly_below_robustness() {
        let mut fish = FishHealth::new(FishId::new(0), 50.0, 20.0);
        assert!(!fish.is_dead());
        fish.value = 20.0;
        assert!(!fish.is_dead());
        fish.value = 19.0;
        assert!(fish.is_dead());
    }
}
