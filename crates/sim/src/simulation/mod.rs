//! Simulation engine and population management.
//!
//! This module provides the core simulation loop and population state for
//! Muller's ratchet simulations.

//! Re-exports
//!
//! The most commonly used simulation types are re-exported here for
//! convenience so consumers can import them from `ratchet_sim::simulation`.
//!
//! - `Simulation`: the simulation engine that runs generations and owns the
//!   run's random stream.
//! - `Population`: class-frequency map of the current generation.
//! - `SimulationBuilder`: fluent builder for constructing `Simulation` instances
//!   with sensible defaults and validation.
//! - `Snapshot`: read-only reporting record of one generation.

pub mod builder;
pub mod configs;
pub mod engine;
pub mod population;
pub mod snapshot;

pub use builder::SimulationBuilder;
pub use configs::{Configuration, ExecutionConfig, ModelParameters, TimeScale};
pub use engine::Simulation;
pub use population::Population;
pub use snapshot::{header_fields, Snapshot, HEADER_FIELDS};
