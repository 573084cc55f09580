//! Read-only reporting records.

use crate::simulation::{ModelParameters, Population, TimeScale};
use serde::Serialize;

/// Column names of machine-readable reports, in record order.
pub const HEADER_FIELDS: [&str; 8] = ["t", "N", "s", "lambda", "mu", "k", "m1", "distribution"];

/// Column names of machine-readable reports.
pub fn header_fields() -> &'static [&'static str] {
    &HEADER_FIELDS
}

/// State of a population at one generation, sufficient for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Generations completed
    pub generation: usize,
    /// Time in the units of the run's time scale
    pub time: usize,
    pub population_size: usize,
    pub selection: f64,
    pub mutation: f64,
    pub backmutation: f64,
    /// Least-mutated class present
    pub fittest_class: u32,
    /// Mean number of mutations beyond the fittest class
    pub mean_above_fittest: f64,
    /// Class counts from `fittest_class` upward, zero-filled
    pub distribution: Vec<usize>,
}

impl Snapshot {
    /// Capture the current state of `population`.
    pub fn capture(
        population: &Population,
        params: &ModelParameters,
        time_scale: TimeScale,
    ) -> Self {
        let generation = population.generation();
        let time = match time_scale {
            TimeScale::Rescaled => generation / population.size(),
            TimeScale::Generations => generation,
        };
        Self {
            generation,
            time,
            population_size: population.size(),
            selection: params.selection,
            mutation: params.mutation,
            backmutation: params.backmutation,
            fittest_class: population.fittest_class(),
            mean_above_fittest: population.mean_above_fittest(),
            distribution: population.distribution(),
        }
    }

    /// Most-mutated class present.
    pub fn max_class(&self) -> u32 {
        self.fittest_class + self.distribution.len().saturating_sub(1) as u32
    }

    /// Number of individuals in `class`, zero for classes outside the
    /// recorded range.
    pub fn count(&self, class: u32) -> usize {
        class
            .checked_sub(self.fittest_class)
            .and_then(|offset| self.distribution.get(offset as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Counts of all classes from zero upward.
    pub fn full_distribution(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        (0..=self.max_class()).map(|class| (class, self.count(class)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_of(counts: &[(u32, usize)], time_scale: TimeScale) -> Snapshot {
        let pop = Population::from_counts(counts.iter().copied(), 0.1).unwrap();
        let params = ModelParameters::new(pop.size(), 0.4, 0.1, 0.0001, 0);
        Snapshot::capture(&pop, &params, time_scale)
    }

    #[test]
    fn test_header_fields() {
        assert_eq!(
            header_fields(),
            &["t", "N", "s", "lambda", "mu", "k", "m1", "distribution"]
        );
    }

    #[test]
    fn test_capture() {
        let snap = snapshot_of(&[(2, 6), (4, 4)], TimeScale::Generations);
        assert_eq!(snap.generation, 0);
        assert_eq!(snap.time, 0);
        assert_eq!(snap.population_size, 10);
        assert_eq!(snap.fittest_class, 2);
        assert_eq!(snap.distribution, vec![6, 0, 4]);
        // first moment 2.8, fittest 2
        assert!((snap.mean_above_fittest - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_count_and_full_distribution() {
        let snap = snapshot_of(&[(1, 3), (3, 2)], TimeScale::Rescaled);
        assert_eq!(snap.max_class(), 3);
        assert_eq!(snap.count(0), 0);
        assert_eq!(snap.count(1), 3);
        assert_eq!(snap.count(2), 0);
        assert_eq!(snap.count(7), 0);

        let full: Vec<(u32, usize)> = snap.full_distribution().collect();
        assert_eq!(full, vec![(0, 0), (1, 3), (2, 0), (3, 2)]);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = snapshot_of(&[(0, 5)], TimeScale::Rescaled);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"fittest_class\":0"));
        assert!(json.contains("\"distribution\":[5]"));
    }
}
