//! Population of hypotheses with incremental fittest tracking.

use super::hypothesis::Hypothesis;
use super::types::Individual;
use crate::schema::{Dataset, Schema};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A generation's hypotheses plus the fittest one found by the last
/// [`evaluate`](Population::evaluate).
#[derive(Debug, Clone, Default)]
pub struct Population {
    hypotheses: Vec<Hypothesis>,
    fittest: Option<usize>,
}

impl Population {
    pub fn new(hypotheses: Vec<Hypothesis>) -> Self {
        Self {
            hypotheses,
            fittest: None,
        }
    }

    /// Computes every hypothesis's fitness against `dataset` and records
    /// the fittest. Returns the maximum fitness, or 0 for an empty
    /// population.
    ///
    /// The fittest is the first hypothesis reaching the maximum, so the
    /// result does not depend on whether evaluation ran in parallel.
    /// Sequential evaluation tracks it as it goes; parallel evaluation
    /// reduces it afterwards. `parallel` is ignored without the
    /// `parallel` feature.
    pub fn evaluate(&mut self, dataset: &Dataset, schema: &Schema, parallel: bool) -> f64 {
        let best = if parallel {
            self.evaluate_parallel(dataset, schema)
        } else {
            self.evaluate_sequential(dataset, schema)
        };
        self.fittest = best.map(|(i, _)| i);
        best.map_or(0.0, |(_, f)| f)
    }

    fn evaluate_sequential(&mut self, dataset: &Dataset, schema: &Schema) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, h) in self.hypotheses.iter_mut().enumerate() {
            let fitness = h.compute_fitness(dataset, schema);
            if best.map_or(true, |(_, f)| fitness > f) {
                best = Some((i, fitness));
            }
        }
        best
    }

    #[cfg(feature = "parallel")]
    fn evaluate_parallel(&mut self, dataset: &Dataset, schema: &Schema) -> Option<(usize, f64)> {
        self.hypotheses
            .par_iter_mut()
            .enumerate()
            .map(|(i, h)| (i, h.compute_fitness(dataset, schema)))
            .reduce_with(|a, b| if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) { b } else { a })
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_parallel(&mut self, dataset: &Dataset, schema: &Schema) -> Option<(usize, f64)> {
        self.evaluate_sequential(dataset, schema)
    }

    /// Fittest hypothesis as of the last evaluation.
    pub fn fittest(&self) -> Option<&Hypothesis> {
        self.fittest.and_then(|i| self.hypotheses.get(i))
    }

    pub fn max_fitness(&self) -> f64 {
        self.fittest().map_or(0.0, Individual::fitness)
    }

    pub fn mean_fitness(&self) -> f64 {
        if self.hypotheses.is_empty() {
            return 0.0;
        }
        self.hypotheses.iter().map(Individual::fitness).sum::<f64>() / self.hypotheses.len() as f64
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    /// Mutable access. Forgets the recorded fittest, since callers may
    /// reorder or rewrite hypotheses.
    pub fn hypotheses_mut(&mut self) -> &mut [Hypothesis] {
        self.fittest = None;
        &mut self.hypotheses
    }

    pub fn push(&mut self, hypothesis: Hypothesis) {
        self.hypotheses.push(hypothesis);
    }

    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    pub fn into_inner(self) -> Vec<Hypothesis> {
        self.hypotheses
    }
}

impl Extend<Hypothesis> for Population {
    fn extend<T: IntoIterator<Item = Hypothesis>>(&mut self, iter: T) {
        self.hypotheses.extend(iter);
    }
}

impl FromIterator<Hypothesis> for Population {
    fn from_iter<T: IntoIterator<Item = Hypothesis>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
