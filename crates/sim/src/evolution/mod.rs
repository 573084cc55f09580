//! Evolutionary operators for the mutation-class model.
//!
//! Selection weights classes by relative fitness; reproduction draws the next
//! generation from the current one. Two reproduction algorithms are
//! available:
//!
//! - [`DirectReproduction`] samples a parent class for every offspring and
//!   perturbs its mutation count by back-mutation and forward mutation.
//! - [`AnalyticReproduction`] computes the expected offspring distribution
//!   once per generation and samples every offspring from it.

pub mod analytic;
pub mod direct;
pub mod sampling;
pub mod selection;

pub use analytic::{AnalyticReproduction, DEFAULT_LOOKBACK_WINDOW, MAX_ANALYTIC_MUTATION};
pub use direct::DirectReproduction;
pub use sampling::{ProbabilityTable, Sampler};
pub use selection::SelectionModel;

use crate::errors::{Result, SimulationError};
use crate::simulation::{ExecutionConfig, ModelParameters, Population};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Choice of reproduction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Per-offspring parent sampling with stochastic mutation
    Direct,
    /// Sampling from an analytically convolved offspring distribution
    #[default]
    Analytic,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Analytic => write!(f, "analytic"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "analytic" => Ok(Self::Analytic),
            other => Err(SimulationError::invalid(format!(
                "unknown algorithm '{other}' (expected 'direct' or 'analytic')"
            ))),
        }
    }
}

/// Reproduction strategy, selected once when a simulation is built.
#[derive(Debug, Clone)]
pub enum Reproduction {
    Direct(DirectReproduction),
    Analytic(AnalyticReproduction),
}

impl Reproduction {
    /// Build the strategy chosen in `execution`.
    pub fn new(params: &ModelParameters, execution: &ExecutionConfig) -> Self {
        match execution.algorithm {
            Algorithm::Direct => Self::Direct(DirectReproduction::new(params, execution.parallel)),
            Algorithm::Analytic => Self::Analytic(AnalyticReproduction::new(
                params,
                execution.lookback_window,
                execution.parallel,
            )),
        }
    }

    /// Which algorithm this strategy implements.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Direct(_) => Algorithm::Direct,
            Self::Analytic(_) => Algorithm::Analytic,
        }
    }

    /// Draw the next generation from `population`.
    pub fn next_generation(
        &self,
        population: &Population,
        sampler: &mut Sampler,
    ) -> Result<Offspring> {
        match self {
            Self::Direct(direct) => direct.next_generation(population, sampler),
            Self::Analytic(analytic) => analytic.next_generation(population, sampler),
        }
    }
}

/// Class distribution of a freshly drawn generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Offspring {
    classes: BTreeMap<u32, usize>,
    min_class: u32,
    max_class: u32,
}

impl Offspring {
    /// Count offspring by mutation class.
    ///
    /// Returns `None` if no offspring were drawn.
    pub fn tally(classes: impl IntoIterator<Item = u32>) -> Option<Self> {
        let mut counts = BTreeMap::new();
        for class in classes {
            *counts.entry(class).or_insert(0) += 1;
        }
        let min_class = *counts.keys().next()?;
        let max_class = *counts.keys().next_back()?;
        Some(Self {
            classes: counts,
            min_class,
            max_class,
        })
    }

    /// Total number of offspring.
    pub fn size(&self) -> usize {
        self.classes.values().sum()
    }

    /// Least-mutated class drawn.
    pub fn min_class(&self) -> u32 {
        self.min_class
    }

    /// Most-mutated class drawn.
    pub fn max_class(&self) -> u32 {
        self.max_class
    }

    pub(crate) fn into_classes(self) -> BTreeMap<u32, usize> {
        self.classes
    }
}

/// Draw `n` offspring classes with `draw`.
///
/// Sequential draws consume `sampler` directly. Parallel draws take one seed
/// per offspring from `sampler` and run each draw on its own sub-stream, so
/// results depend on the seed but not on the number of worker threads. The
/// two modes produce different trajectories for the same seed.
pub(crate) fn draw_offspring<F>(
    n: usize,
    parallel: bool,
    sampler: &mut Sampler,
    draw: F,
) -> Result<Offspring>
where
    F: Fn(&mut Sampler) -> Result<u32> + Sync,
{
    let classes: Vec<u32> = if parallel {
        let seeds = sampler.fork_seeds(n);
        seeds
            .par_iter()
            .map(|&seed| draw(&mut Sampler::from_seed(seed)))
            .collect::<Result<_>>()?
    } else {
        (0..n).map(|_| draw(sampler)).collect::<Result<_>>()?
    };

    Offspring::tally(classes).ok_or_else(|| {
        SimulationError::DegenerateState("no offspring were drawn".to_string())
    })
}
