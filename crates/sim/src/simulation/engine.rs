//! Simulation engine for Muller's ratchet.
//!
//! This module provides the main simulation loop: it owns the population,
//! the run's random stream and the chosen reproduction strategy, and
//! advances the population one generation at a time.

use crate::errors::{Result, SimulationError};
use crate::evolution::{Algorithm, Reproduction, Sampler};
use crate::simulation::{Configuration, Population, Snapshot};
use tracing::{debug, trace};

/// Main simulation engine.
#[derive(Debug)]
pub struct Simulation {
    /// Current population
    population: Population,
    /// Reproduction strategy, fixed at construction
    reproduction: Reproduction,
    /// The run's random stream
    sampler: Sampler,
    /// Full configuration
    configuration: Configuration,
}

impl Simulation {
    /// Create a new simulation from configuration.
    ///
    /// # Errors
    /// `InvalidParameter` if any model parameter is out of range.
    pub fn new(configuration: Configuration) -> Result<Self> {
        configuration.validate()?;
        let population = Population::new(&configuration.model)?;
        let reproduction = Reproduction::new(&configuration.model, &configuration.execution);
        let sampler = Sampler::new(configuration.execution.seed);

        debug!(
            algorithm = %reproduction.algorithm(),
            size = configuration.model.population_size,
            mutation = configuration.model.mutation,
            selection = configuration.model.selection,
            backmutation = configuration.model.backmutation,
            seed = ?configuration.execution.seed,
            "simulation initialised"
        );

        Ok(Self {
            population,
            reproduction,
            sampler,
            configuration,
        })
    }

    /// Get the current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Get the current generation number.
    pub fn generation(&self) -> usize {
        self.population.generation()
    }

    /// Get the full configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The reproduction algorithm in use.
    pub fn algorithm(&self) -> Algorithm {
        self.reproduction.algorithm()
    }

    /// Mean relative fitness of the current generation.
    pub fn mean_fitness(&self) -> Result<f64> {
        self.population.mean_fitness()
    }

    /// Mean number of mutations per individual in the current generation.
    pub fn first_moment(&self) -> f64 {
        self.population.first_moment()
    }

    /// Reporting record of the current generation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.population,
            &self.configuration.model,
            self.configuration.execution.time_scale,
        )
    }

    /// Number of generations between two reports.
    pub fn report_interval(&self) -> usize {
        self.configuration
            .execution
            .report_interval(self.population.size())
    }

    /// Total number of generations of a complete run.
    pub fn total_generations(&self) -> usize {
        self.configuration
            .execution
            .total_generations(self.population.size())
    }

    /// Check if the current generation is due for a report.
    pub fn is_report_generation(&self) -> bool {
        self.generation() % self.report_interval() == 0
    }

    /// Advance the simulation by exactly one generation.
    ///
    /// # Errors
    /// `DegenerateState` if the mean fitness is zero, `SamplingIntegrity`
    /// if an offspring distribution is broken. The population is left
    /// unchanged on error.
    pub fn reproduce(&mut self) -> Result<()> {
        let offspring = self
            .reproduction
            .next_generation(&self.population, &mut self.sampler)?;
        self.population.advance(offspring);

        trace!(
            generation = self.population.generation(),
            fittest = self.population.fittest_class(),
            classes = self.population.num_classes(),
            "generation complete"
        );
        Ok(())
    }

    /// Run the simulation for the configured number of generations.
    pub fn run(&mut self) -> Result<()> {
        let remaining = self.total_generations().saturating_sub(self.generation());
        self.run_for(remaining)
    }

    /// Run the simulation for a specific number of generations.
    pub fn run_for(&mut self, generations: usize) -> Result<()> {
        for _ in 0..generations {
            self.reproduce()?;
        }
        Ok(())
    }

    /// Run the configured number of generations, passing the initial state
    /// and every report generation's snapshot to `report`.
    pub fn run_with<F, E>(&mut self, mut report: F) -> std::result::Result<(), E>
    where
        F: FnMut(&Snapshot) -> std::result::Result<(), E>,
        E: From<SimulationError>,
    {
        report(&self.snapshot())?;
        while self.generation() < self.total_generations() {
            self.reproduce()?;
            if self.is_report_generation() {
                let snapshot = self.snapshot();
                debug!(
                    generation = snapshot.generation,
                    fittest = snapshot.fittest_class,
                    m1 = snapshot.mean_above_fittest,
                    "report"
                );
                report(&snapshot)?;
            }
        }
        Ok(())
    }
}
