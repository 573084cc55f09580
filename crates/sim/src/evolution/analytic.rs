//! Analytic reproduction.
//!
//! Instead of perturbing every offspring individually, the expected
//! offspring distribution is computed once per generation by convolving
//! selection, back-mutation and forward mutation over the whole population.
//! All offspring are then drawn from that single table.
//!
//! For a target class `k`, the unnormalised mass is
//!
//! ```text
//! x'(k) = e^-m / W̄ · Σ_i  xk_i · m^(k-i) / (k-i)!
//! xk_i  = Σ_{j >= i} w(j) · P[Binomial(j, b) = j - i]
//! ```
//!
//! where `w(j)` is the selection weight of class `j` and `W̄` the mean
//! fitness. The support of `x'` is infinite; classes are added in
//! increasing order until the table accumulates [`MIN_TABLE_TOTAL`].
//! Classes below the look-back window cannot be reached and are left out of
//! the table.

use crate::errors::{Result, SimulationError, MIN_TABLE_TOTAL};
use crate::evolution::{draw_offspring, Offspring, ProbabilityTable, Sampler};
use crate::simulation::{ModelParameters, Population};
use statrs::distribution::{Binomial, Discrete};

/// How many classes below the fittest class are considered as destinations
/// of back-mutation.
///
/// Reaching `d` classes below the fittest class requires `d` simultaneous
/// reversions, with probability on the order of `C(j, d) · b^d`. For the
/// back-mutation rates this model is meant for (`b` well below 0.01) the mass
/// lost beyond 15 classes is far below the 1e-4 tolerance of the table.
pub const DEFAULT_LOOKBACK_WINDOW: u32 = 15;

/// Largest mutation rate the analytic table supports.
///
/// Above this, `e^-m` and the kernel `m^d / d!` leave the range of `f64`
/// before the table can reach its tolerance.
pub const MAX_ANALYTIC_MUTATION: f64 = 700.0;

/// Classes examined beyond the most-mutated class before giving up on
/// reaching the table tolerance.
fn poisson_tail_allowance(mutation: f64) -> u32 {
    // float-to-int `as` saturates
    ((mutation + 10.0 * mutation.sqrt()).ceil() as u32).saturating_add(20)
}

/// The Poisson kernel `m^d / d!`, extended lazily by the recurrence
/// `kernel(d) = kernel(d - 1) · m / d`.
struct PoissonKernel {
    mutation: f64,
    terms: Vec<f64>,
}

impl PoissonKernel {
    fn new(mutation: f64) -> Self {
        Self {
            mutation,
            terms: vec![1.0],
        }
    }

    fn term(&mut self, d: u32) -> f64 {
        let d = d as usize;
        while self.terms.len() <= d {
            let n = self.terms.len();
            let next = self.terms[n - 1] * self.mutation / n as f64;
            self.terms.push(next);
        }
        self.terms[d]
    }
}

/// Reproduction by sampling from the expected offspring distribution.
#[derive(Debug, Clone)]
pub struct AnalyticReproduction {
    mutation: f64,
    backmutation: f64,
    lookback_window: u32,
    parallel: bool,
}

impl AnalyticReproduction {
    /// Create the strategy for the given model.
    pub fn new(params: &ModelParameters, lookback_window: u32, parallel: bool) -> Self {
        Self {
            mutation: params.mutation,
            backmutation: params.backmutation,
            lookback_window,
            parallel,
        }
    }

    /// Mass of the parent generation that lands in class `i` after
    /// selection and back-mutation, summed over source classes
    /// `i..=max_class`.
    fn mass_reaching(&self, population: &Population, i: u32, max_class: u32) -> Result<f64> {
        let mut mass = 0.0;
        for j in i..=max_class {
            let weight = population.selection_weight(j);
            if weight == 0.0 {
                continue;
            }
            if j == 0 || (self.backmutation == 0.0 && i == j) {
                mass += weight;
            } else if self.backmutation != 0.0 {
                let reverted = Binomial::new(self.backmutation, u64::from(j)).map_err(|e| {
                    SimulationError::invalid(format!(
                        "back-mutation rate {} rejected: {e}",
                        self.backmutation
                    ))
                })?;
                mass += weight * reverted.pmf(u64::from(j - i));
            }
        }
        Ok(mass)
    }

    /// Expected distribution of offspring classes, truncated once it
    /// accumulates [`MIN_TABLE_TOTAL`].
    ///
    /// If the tolerance is not reached within a Poisson tail allowance past
    /// the most-mutated class, the truncated table is returned as is and
    /// sampling from it reports `SamplingIntegrity`.
    ///
    /// # Errors
    /// `InvalidParameter` if the mutation rate exceeds
    /// [`MAX_ANALYTIC_MUTATION`], `DegenerateState` if the mean fitness is
    /// zero.
    pub fn expected_distribution(&self, population: &Population) -> Result<ProbabilityTable> {
        if self.mutation > MAX_ANALYTIC_MUTATION {
            return Err(SimulationError::invalid(format!(
                "mutation rate {} exceeds the analytic limit of {MAX_ANALYTIC_MUTATION}",
                self.mutation
            )));
        }
        let scale = (-self.mutation).exp() / population.mean_fitness()?;
        let lowest = population
            .fittest_class()
            .saturating_sub(self.lookback_window);
        let highest = population.max_class();

        let reach = (lowest..=highest)
            .map(|i| self.mass_reaching(population, i, highest))
            .collect::<Result<Vec<f64>>>()?;

        let limit = highest.saturating_add(poisson_tail_allowance(self.mutation));
        let mut kernel = PoissonKernel::new(self.mutation);
        let mut table = ProbabilityTable::new();

        for k in lowest..=limit {
            let mut mass = 0.0;
            for i in lowest..=k.min(highest) {
                mass += reach[(i - lowest) as usize] * kernel.term(k - i);
            }
            table.push(k, mass * scale);
            if table.total() >= MIN_TABLE_TOTAL {
                break;
            }
        }

        Ok(table)
    }

    /// Draw the next generation.
    pub fn next_generation(
        &self,
        population: &Population,
        sampler: &mut Sampler,
    ) -> Result<Offspring> {
        let table = self.expected_distribution(population)?;
        draw_offspring(population.size(), self.parallel, sampler, |rng| {
            rng.multinomial(&table)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(mutation: f64, selection: f64, backmutation: f64) -> AnalyticReproduction {
        AnalyticReproduction::new(
            &ModelParameters::new(50, mutation, selection, backmutation, 0),
            DEFAULT_LOOKBACK_WINDOW,
            false,
        )
    }

    #[test]
    fn test_poisson_kernel_terms() {
        let mut kernel = PoissonKernel::new(2.0);
        assert_eq!(kernel.term(0), 1.0);
        assert!((kernel.term(3) - 8.0 / 6.0).abs() < 1e-12);
        assert!((kernel.term(1) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_poisson_kernel_zero_rate() {
        let mut kernel = PoissonKernel::new(0.0);
        assert_eq!(kernel.term(0), 1.0);
        assert_eq!(kernel.term(4), 0.0);
    }

    #[test]
    fn test_table_reaches_tolerance() {
        let params = ModelParameters::new(50, 0.1, 0.05, 0.0, 0);
        let pop = Population::new(&params).unwrap();
        let table = strategy(0.1, 0.05, 0.0).expected_distribution(&pop).unwrap();
        assert!(table.total() >= MIN_TABLE_TOTAL);
    }

    #[test]
    fn test_table_matches_poisson_for_single_class() {
        // Single class at zero: offspring distribution is Poisson(m).
        let pop = Population::from_counts([(0, 50)], 0.05).unwrap();
        let table = strategy(0.5, 0.05, 0.0).expected_distribution(&pop).unwrap();

        let e = (-0.5f64).exp();
        assert!((table.probability(0) - e).abs() < 1e-12);
        assert!((table.probability(1) - 0.5 * e).abs() < 1e-12);
        assert!((table.probability(2) - 0.125 * e).abs() < 1e-12);
    }

    #[test]
    fn test_table_without_mutation_reproduces_selection() {
        let pop = Population::from_counts([(0, 5), (1, 5)], 0.5).unwrap();
        let table = strategy(0.0, 0.5, 0.0).expected_distribution(&pop).unwrap();

        assert!((table.probability(0) - 2.0 / 3.0).abs() < 1e-12);
        assert!((table.probability(1) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(table.last_class(), Some(1));
    }

    #[test]
    fn test_table_with_backmutation_moves_mass_down() {
        let pop = Population::from_counts([(2, 50)], 0.1).unwrap();
        let table = strategy(0.0, 0.1, 0.5).expected_distribution(&pop).unwrap();

        // Binomial(2, 0.5) reversions: classes 2, 1, 0 with 1/4, 1/2, 1/4
        assert!((table.probability(0) - 0.25).abs() < 1e-12);
        assert!((table.probability(1) - 0.5).abs() < 1e-12);
        assert!((table.probability(2) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_table_starts_at_lookback_window() {
        let pop = Population::from_counts([(30, 50)], 0.1).unwrap();
        let table = strategy(0.2, 0.1, 0.0).expected_distribution(&pop).unwrap();

        let classes: Vec<u32> = table.iter().map(|(class, _)| class).collect();
        assert_eq!(classes[0], 30 - DEFAULT_LOOKBACK_WINDOW);
        assert_eq!(table.probability(29), 0.0);
        assert!(table.total() >= MIN_TABLE_TOTAL);
    }

    #[test]
    fn test_next_generation_size_and_bounds() {
        let pop = Population::from_counts([(3, 40), (4, 10)], 0.1).unwrap();
        let mut sampler = Sampler::from_seed(17);
        let offspring = strategy(0.4, 0.1, 0.0)
            .next_generation(&pop, &mut sampler)
            .unwrap();

        assert_eq!(offspring.size(), 50);
        assert!(offspring.min_class() >= 3);
    }

    #[test]
    fn test_tail_allowance_saturates() {
        assert_eq!(poisson_tail_allowance(0.0), 20);
        assert_eq!(poisson_tail_allowance(5e9), u32::MAX);
    }

    #[test]
    fn test_mutation_above_limit_is_rejected() {
        let pop = Population::from_counts([(1, 1)], 0.1).unwrap();
        let mut sampler = Sampler::from_seed(1);
        let result = strategy(5e9, 0.1, 0.0).next_generation(&pop, &mut sampler);
        assert!(matches!(result, Err(SimulationError::InvalidParameter(_))));
    }

    #[test]
    fn test_large_mutation_within_limit() {
        let pop = Population::from_counts([(0, 20)], 0.1).unwrap();
        let table = strategy(MAX_ANALYTIC_MUTATION, 0.1, 0.0)
            .expected_distribution(&pop)
            .unwrap();
        assert!(table.total() >= MIN_TABLE_TOTAL);
    }

    #[test]
    fn test_high_classes_do_not_scan_from_zero() {
        let pop = Population::from_counts([(u32::MAX - 100, 10)], 0.1).unwrap();
        let table = strategy(0.4, 0.1, 0.0).expected_distribution(&pop).unwrap();
        assert_eq!(table.iter().next().map(|(class, _)| class), Some(u32::MAX - 115));
        assert!(table.total() >= MIN_TABLE_TOTAL);
    }
}
