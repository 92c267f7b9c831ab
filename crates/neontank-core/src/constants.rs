/// Simulated seconds advanced by one fixed model step.
pub const STEP_SECONDS: f64 = 1.0;

/// Global default lower bound for chemistry levels and fish health.
pub const LEVEL_MIN: f64 = 0.0;

/// Global default upper bound for chemistry levels and fish health.
pub const LEVEL_MAX: f64 = 100.0;

/// Prime multiplier used to derive independent RNG streams from a base seed.
/// Chosen so streams for consecutive indices have minimal overlap.
pub const RNG_DERIVATION_PRIME: u64 = 7919;

/// RNG stream index for the environment's health perturbation draws.
pub const ENVIRONMENT_RNG_STREAM: u64 = 0;

/// RNG stream index for the flocking controller's spawn and wander draws.
pub const FLOCK_RNG_STREAM: u64 = 1;
