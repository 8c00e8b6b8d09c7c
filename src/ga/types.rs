//! Core trait shared by the population and the selection strategies.
//!
//! Selection only needs to read fitness and to cache a per-individual
//! selection probability, so it is written against [`Individual`] rather
//! than against [`Hypothesis`](super::Hypothesis) directly.

/// A candidate solution carrying its own cached fitness and selection
/// probability.
///
/// Higher fitness is better (maximization).
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct Scored {
///     fitness: f64,
///     probability: f64,
/// }
///
/// impl Individual for Scored {
///     fn fitness(&self) -> f64 { self.fitness }
///     fn set_fitness(&mut self, f: f64) { self.fitness = f; }
///     fn probability(&self) -> f64 { self.probability }
///     fn set_probability(&mut self, p: f64) { self.probability = p; }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// Returns the cached fitness.
    fn fitness(&self) -> f64;

    /// Stores a freshly computed fitness.
    fn set_fitness(&mut self, fitness: f64);

    /// Returns the cached selection probability.
    fn probability(&self) -> f64;

    /// Stores the selection probability assigned by a strategy.
    fn set_probability(&mut self, probability: f64);
}
