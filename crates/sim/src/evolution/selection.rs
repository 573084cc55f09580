//! Multiplicative selection against deleterious mutations.
//!
//! Each mutation carried beyond the fittest class currently present in the
//! population reduces fitness by a factor `1 - s`. Fitness is therefore
//! always relative: the fittest surviving class has fitness one, and the
//! ratchet's progress shows up as the fittest class moving upward.

use crate::errors::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Selection coefficient applied per excess mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionModel {
    coefficient: f64,
}

impl SelectionModel {
    /// Create a selection model.
    ///
    /// # Errors
    /// `InvalidParameter` unless `coefficient` is in [0, 1].
    pub fn new(coefficient: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&coefficient) {
            return Err(SimulationError::invalid(format!(
                "selection coefficient must be in [0, 1], got {coefficient}"
            )));
        }
        Ok(Self { coefficient })
    }

    /// No selection: every class has fitness one.
    pub fn neutral() -> Self {
        Self { coefficient: 0.0 }
    }

    /// The selection coefficient `s`.
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Fitness of a class carrying `excess` mutations more than the fittest
    /// class, `(1 - s)^excess`.
    pub fn relative_fitness(&self, excess: u32) -> f64 {
        let excess = i32::try_from(excess).unwrap_or(i32::MAX);
        (1.0 - self.coefficient).powi(excess)
    }

    /// Selection weight of a class with relative frequency `frequency`.
    pub fn weight(&self, frequency: f64, excess: u32) -> f64 {
        if frequency == 0.0 {
            return 0.0;
        }
        frequency * self.relative_fitness(excess)
    }
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::neutral()
    }
}
