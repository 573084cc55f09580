//! Shared default values for simulation configuration.
//! These values are used by both the `run` and `init` commands (via clap).

pub const POPULATION_SIZE: usize = 1000;

pub const MUTATION: f64 = 0.4;
pub const SELECTION: f64 = 0.1;
pub const BACKMUTATION: f64 = 0.0001;
pub const INITIAL_MUTATIONS: u32 = 0;

pub const CONFIG_FILE: &str = "ratchet.json";

/// Log filter used when `RUST_LOG` is unset.
pub const LOG_FILTER: &str = "warn";
