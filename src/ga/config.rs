//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;
use crate::error::{Result, RuleGaError};

/// Highest attainable fitness: 100% accuracy, squared.
pub const MAX_FITNESS: f64 = 10_000.0;

/// When a run ends.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopCondition {
    /// Stop once the population's best fitness reaches this value.
    ///
    /// There is no internal time limit: an unreachable threshold runs
    /// until cancelled.
    FitnessThreshold(f64),

    /// Stop after this many generations.
    Generations(usize),
}

impl Default for StopCondition {
    fn default() -> Self {
        StopCondition::FitnessThreshold(95.0 * 95.0)
    }
}

/// Configuration for the rule-learning GA.
///
/// # Defaults
///
/// ```
/// use u_rulega::ga::{GaConfig, Selection, StopCondition};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 500);
/// assert_eq!(config.selection, Selection::Rank);
/// assert_eq!(config.stop, StopCondition::FitnessThreshold(9025.0));
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_rulega::ga::{GaConfig, Selection};
///
/// let config = GaConfig::generations(50)
///     .with_population_size(200)
///     .with_selection(Selection::FitnessProportionate)
///     .with_replacement_rate(0.5)
///     .with_rule_count(1, 4)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of hypotheses generated initially (`p`).
    ///
    /// Also the reference size for selection and crossover counts every
    /// generation, even when the actual population drifts from it.
    pub population_size: usize,

    /// Fraction of the population replaced by crossover offspring (`r`).
    ///
    /// Each generation keeps `⌊(1 - r)·p⌋` selected members and draws
    /// `⌊r·p / 2⌋` crossover pairs.
    pub replacement_rate: f64,

    /// Fraction of the new population mutated each generation (`m`).
    pub mutation_rate: f64,

    /// Minimum rules per initial hypothesis.
    pub min_rules: usize,

    /// Maximum rules per initial hypothesis.
    pub max_rules: usize,

    /// Termination rule.
    pub stop: StopCondition,

    /// Strategy for choosing surviving members.
    pub selection: Selection,

    /// Whether to evaluate hypotheses in parallel using rayon.
    ///
    /// Ignored unless the `parallel` feature is enabled.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            replacement_rate: 0.6,
            mutation_rate: 0.001,
            min_rules: 2,
            max_rules: 5,
            stop: StopCondition::default(),
            selection: Selection::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Default parameters, stopping after `n` generations.
    pub fn generations(n: usize) -> Self {
        Self::default().with_generations(n)
    }

    /// Default parameters, stopping at the given training accuracy
    /// (a fraction, e.g. `0.95`).
    pub fn threshold_accuracy(accuracy: f64) -> Self {
        Self::default().with_accuracy_threshold(accuracy)
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the replacement rate.
    pub fn with_replacement_rate(mut self, rate: f64) -> Self {
        self.replacement_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the inclusive range of rules per initial hypothesis.
    pub fn with_rule_count(mut self, min: usize, max: usize) -> Self {
        self.min_rules = min;
        self.max_rules = max;
        self
    }

    /// Sets the termination rule.
    pub fn with_stop(mut self, stop: StopCondition) -> Self {
        self.stop = stop;
        self
    }

    /// Stops after `n` generations.
    pub fn with_generations(self, n: usize) -> Self {
        self.with_stop(StopCondition::Generations(n))
    }

    /// Stops once best fitness reaches `threshold`.
    pub fn with_fitness_threshold(self, threshold: f64) -> Self {
        self.with_stop(StopCondition::FitnessThreshold(threshold))
    }

    /// Stops once best training accuracy reaches `accuracy` (a fraction
    /// in `[0, 1]`), i.e. fitness `(accuracy · 100)²`.
    pub fn with_accuracy_threshold(self, accuracy: f64) -> Self {
        let pct = accuracy * 100.0;
        self.with_fitness_threshold(pct * pct)
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Convenience builder for tournament selection.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(p))`.
    pub fn with_tournament_probability(self, p: f64) -> Self {
        self.with_selection(Selection::Tournament(p.clamp(0.0, 1.0)))
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of members kept by selection each generation.
    pub fn survivor_count(&self) -> usize {
        ((1.0 - self.replacement_rate) * self.population_size as f64) as usize
    }

    /// Number of crossover pairs drawn each generation.
    pub fn pair_count(&self) -> usize {
        (self.replacement_rate * self.population_size as f64 / 2.0) as usize
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(RuleGaError::InvalidConfig(msg.into()));

        if self.population_size < 2 {
            return invalid("population_size must be at least 2");
        }
        if !(0.0..=1.0).contains(&self.replacement_rate) {
            return invalid("replacement_rate must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid("mutation_rate must be within [0, 1]");
        }
        if self.min_rules == 0 {
            return invalid("min_rules must be at least 1");
        }
        if self.min_rules > self.max_rules {
            return invalid("min_rules must not exceed max_rules");
        }
        match self.stop {
            StopCondition::Generations(0) => {
                return invalid("generation count must be at least 1");
            }
            StopCondition::FitnessThreshold(t) if !(0.0..=MAX_FITNESS).contains(&t) => {
                return invalid("fitness threshold must be within [0, 10000]");
            }
            _ => {}
        }
        if let Selection::Tournament(p) = self.selection {
            if !(0.0..=1.0).contains(&p) {
                return invalid("tournament probability must be within [0, 1]");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 500);
        assert!((config.replacement_rate - 0.6).abs() < 1e-10);
        assert!((config.mutation_rate - 0.001).abs() < 1e-10);
        assert_eq!((config.min_rules, config.max_rules), (2, 5));
        assert_eq!(config.stop, StopCondition::FitnessThreshold(9025.0));
        assert_eq!(config.selection, Selection::Rank);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(200)
            .with_replacement_rate(0.3)
            .with_mutation_rate(0.05)
            .with_rule_count(1, 3)
            .with_generations(40)
            .with_selection(Selection::FitnessProportionate)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert!((config.replacement_rate - 0.3).abs() < 1e-10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!((config.min_rules, config.max_rules), (1, 3));
        assert_eq!(config.stop, StopCondition::Generations(40));
        assert_eq!(config.selection, Selection::FitnessProportionate);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_presets() {
        assert_eq!(GaConfig::generations(7).stop, StopCondition::Generations(7));
        match GaConfig::threshold_accuracy(0.9).stop {
            StopCondition::FitnessThreshold(t) => assert!((t - 8100.0).abs() < 1e-6),
            other => panic!("unexpected stop condition {other:?}"),
        }
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_replacement_rate(1.5)
            .with_mutation_rate(-0.5)
            .with_tournament_probability(2.0);
        assert!((config.replacement_rate - 1.0).abs() < 1e-10);
        assert!((config.mutation_rate - 0.0).abs() < 1e-10);
        assert_eq!(config.selection, Selection::Tournament(1.0));
    }

    #[test]
    fn test_generation_counts() {
        let config = GaConfig::default()
            .with_population_size(30)
            .with_replacement_rate(0.6);
        assert_eq!(config.survivor_count(), 12);
        assert_eq!(config.pair_count(), 9);

        let config = config.with_population_size(5).with_replacement_rate(0.5);
        assert_eq!(config.survivor_count(), 2);
        assert_eq!(config.pair_count(), 1);
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rule_counts() {
        assert!(GaConfig::default().with_rule_count(0, 3).validate().is_err());
        assert!(GaConfig::default().with_rule_count(4, 3).validate().is_err());
        assert!(GaConfig::default().with_rule_count(3, 3).validate().is_ok());
    }

    #[test]
    fn test_validate_stop_condition() {
        assert!(GaConfig::generations(0).validate().is_err());
        assert!(GaConfig::default()
            .with_fitness_threshold(10_001.0)
            .validate()
            .is_err());
        assert!(GaConfig::default()
            .with_fitness_threshold(f64::NAN)
            .validate()
            .is_err());
        assert!(GaConfig::default()
            .with_fitness_threshold(10_000.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_raw_fields() {
        let mut config = GaConfig::default();
        config.replacement_rate = 1.2;
        assert!(config.validate().is_err());

        let mut config = GaConfig::default();
        config.selection = Selection::Tournament(-0.1);
        assert!(config.validate().is_err());
    }
}
