//! Per-step update passes, one file per group of quantities. Each phase
//! is an `impl Environment` method so sibling components are reachable
//! through the owning environment. The calling order in
//! `Environment::apply_step` is part of the model.

mod fish;
mod flora;
mod gas;
mod waste;
