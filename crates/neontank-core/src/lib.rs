//! Closed-ecosystem aquarium simulation core.
//!
//! A deterministic, fixed-step water-chemistry model (oxygen, carbon
//! dioxide, toxins, nutrients, light, plants, algae, decaying biomass)
//! coupled to a fish population, plus a continuous-time flocking
//! controller whose steering intensity is modulated by each fish's
//! health. Rendering, input, and assets are external collaborators; this
//! crate is pure in-memory state.

pub mod component;
pub mod config;
pub mod constants;
pub mod environment;
pub mod fish;
pub mod flock;
pub mod rng;
pub mod snapshot;
pub mod spatial;

pub use config::{ConfigError, FlockConfig, TankConfig, WorldBounds};
pub use environment::{AddOutcome, Environment, RemoveOutcome, TickOutcome};
pub use fish::{FishHealth, FishId};
pub use flock::{FlockController, FlockEntity};
pub use snapshot::{Band, Snapshot};
