//! # Simulation Crate
//!
//! The `sim` crate provides the core logic of a Muller's ratchet simulator.
//! A population of asexual individuals is tracked as counts per number of
//! deleterious mutations carried. Each generation is produced by selection,
//! back-mutation and forward mutation, using either per-offspring sampling
//! ([`evolution::DirectReproduction`]) or sampling from the expected offspring
//! distribution ([`evolution::AnalyticReproduction`]).

pub mod errors;
pub mod evolution;
pub mod prelude;
pub mod simulation;

pub use errors::{Result, SimulationError};
