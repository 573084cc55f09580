//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use ratchet_sim::prelude::*;
//!
//! let mut sim = SimulationBuilder::new()
//!     .population_size(20)
//!     .generations(1)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//! sim.run().unwrap();
//! assert_eq!(sim.population().size(), 20);
//! ```

pub use crate::errors::{self, SimulationError};
pub use crate::evolution::{Algorithm, ProbabilityTable, Sampler, SelectionModel};
pub use crate::simulation::{
    Configuration, ExecutionConfig, ModelParameters, Population, Simulation, SimulationBuilder,
    Snapshot, TimeScale,
};
