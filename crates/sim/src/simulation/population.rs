//! Population state for the mutation-class model.
//!
//! A population is not a list of individuals but a sparse frequency
//! distribution: mutation class `k` (the number of deleterious mutations an
//! individual carries) maps to the number of individuals in that class.
//! Classes with no individuals are absent from the map and read as zero.

use crate::errors::{Result, SimulationError};
use crate::evolution::{Offspring, SelectionModel};
use crate::simulation::ModelParameters;
use std::cell::Cell;
use std::collections::BTreeMap;

/// A value computed for one generation, tagged with that generation.
type GenerationCache = Cell<Option<(usize, f64)>>;

/// Frequency distribution over mutation classes.
#[derive(Debug, Clone)]
pub struct Population {
    /// Individual count per occupied mutation class
    classes: BTreeMap<u32, usize>,
    /// Number of individuals (sum of all class counts)
    size: usize,
    /// Generation counter
    generation: usize,
    /// Least-mutated class present
    fittest_class: u32,
    /// Most-mutated class present
    max_class: u32,
    selection: SelectionModel,
    mean_fitness: GenerationCache,
    first_moment: GenerationCache,
}

impl Population {
    /// Create the initial population described by `params`: every individual
    /// carries `initial_mutations` mutations.
    ///
    /// # Errors
    /// `InvalidParameter` if any model parameter is out of range.
    pub fn new(params: &ModelParameters) -> Result<Self> {
        params.validate()?;
        let selection = SelectionModel::new(params.selection)?;
        let classes = BTreeMap::from([(params.initial_mutations, params.population_size)]);
        Ok(Self::from_parts(classes, selection))
    }

    /// Create a population from an arbitrary class distribution.
    ///
    /// Classes with a count of zero are dropped. The population size is the
    /// total count.
    ///
    /// # Errors
    /// `InvalidParameter` if the distribution is empty or `selection` is out
    /// of range.
    pub fn from_counts(
        counts: impl IntoIterator<Item = (u32, usize)>,
        selection: f64,
    ) -> Result<Self> {
        let selection = SelectionModel::new(selection)?;
        let mut classes = BTreeMap::new();
        for (class, count) in counts.into_iter().filter(|&(_, count)| count > 0) {
            *classes.entry(class).or_insert(0) += count;
        }
        if classes.is_empty() {
            return Err(SimulationError::invalid(
                "population must contain at least one individual",
            ));
        }
        Ok(Self::from_parts(classes, selection))
    }

    fn from_parts(classes: BTreeMap<u32, usize>, selection: SelectionModel) -> Self {
        let size = classes.values().sum();
        let fittest_class = classes.keys().next().copied().unwrap_or(0);
        let max_class = classes.keys().next_back().copied().unwrap_or(0);
        Self {
            classes,
            size,
            generation: 0,
            fittest_class,
            max_class,
            selection,
            mean_fitness: Cell::new(None),
            first_moment: Cell::new(None),
        }
    }

    /// Get the number of individuals.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The least-mutated class present, against which fitness is measured.
    pub fn fittest_class(&self) -> u32 {
        self.fittest_class
    }

    /// The most-mutated class present.
    pub fn max_class(&self) -> u32 {
        self.max_class
    }

    /// The selection model weighting the classes.
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Number of individuals in `class`, zero if the class is unoccupied.
    pub fn count(&self, class: u32) -> usize {
        self.classes.get(&class).copied().unwrap_or(0)
    }

    /// Relative frequency of `class`, zero if the class is unoccupied.
    pub fn frequency(&self, class: u32) -> f64 {
        self.count(class) as f64 / self.size as f64
    }

    /// Iterate over occupied classes and their counts, in ascending class
    /// order.
    pub fn classes(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.classes.iter().map(|(&class, &count)| (class, count))
    }

    /// Number of occupied classes.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Selection weight of `class`: its frequency scaled by its fitness
    /// relative to the fittest class. Zero for unoccupied classes.
    pub fn selection_weight(&self, class: u32) -> f64 {
        self.selection.weight(
            self.frequency(class),
            class.saturating_sub(self.fittest_class),
        )
    }

    /// Mean relative fitness of the population, cached per generation.
    ///
    /// # Errors
    /// `DegenerateState` if the mean fitness is exactly zero.
    pub fn mean_fitness(&self) -> Result<f64> {
        let mean = self.cached(&self.mean_fitness, || {
            self.classes
                .keys()
                .map(|&class| self.selection_weight(class))
                .sum()
        });
        if mean == 0.0 {
            return Err(SimulationError::DegenerateState(format!(
                "mean fitness is zero at generation {}",
                self.generation
            )));
        }
        Ok(mean)
    }

    /// Mean number of mutations per individual, cached per generation.
    pub fn first_moment(&self) -> f64 {
        self.cached(&self.first_moment, || {
            self.classes()
                .map(|(class, count)| f64::from(class) * count as f64)
                .sum::<f64>()
                / self.size as f64
        })
    }

    /// Mean number of mutations carried beyond the fittest class.
    pub fn mean_above_fittest(&self) -> f64 {
        self.first_moment() - f64::from(self.fittest_class)
    }

    /// Class counts from the fittest class up to the most-mutated class,
    /// with unoccupied classes reported as zero.
    pub fn distribution(&self) -> Vec<usize> {
        (self.fittest_class..=self.max_class)
            .map(|class| self.count(class))
            .collect()
    }

    /// Replace the distribution with the next generation's.
    pub(crate) fn advance(&mut self, offspring: Offspring) {
        debug_assert_eq!(offspring.size(), self.size);
        self.fittest_class = offspring.min_class();
        self.max_class = offspring.max_class();
        self.classes = offspring.into_classes();
        self.generation += 1;
    }

    fn cached(&self, cache: &GenerationCache, compute: impl FnOnce() -> f64) -> f64 {
        match cache.get() {
            Some((generation, value)) if generation == self.generation => value,
            _ => {
                let value = compute();
                cache.set(Some((self.generation, value)));
                value
            }
        }
    }
}
