//! GA evolutionary loop execution.
//!
//! [`GaRunner`] drives the complete process:
//! initialization → evaluation → (stop | selection → crossover → mutation) → evaluation.
//!
//! [`RuleLearner`] owns everything derived from the schema once per run:
//! the genome layout and the catalog of legal rules that seeds the
//! initial population.

use super::codec::GenomeLayout;
use super::config::{GaConfig, StopCondition};
use super::hypothesis::Hypothesis;
use super::operators::{crossover_pairs, mutate};
use super::population::Population;
use super::rule::Rule;
use super::selection::{select_pairs, SelectionStrategy};
use crate::error::{Result, RuleGaError};
use crate::random::rng_from_seed;
use crate::schema::{Dataset, Schema};
use rand::seq::index;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Schema-derived state shared by every generation of a run.
#[derive(Debug, Clone)]
pub struct RuleLearner {
    schema: Schema,
    layout: GenomeLayout,
    catalog: Vec<Rule>,
}

impl RuleLearner {
    /// Lays out the genome and enumerates the legal-rule catalog.
    ///
    /// # Errors
    /// [`RuleGaError::GenomeTooWide`] if the schema's rule genome exceeds
    /// [`MAX_RULE_BITS`](super::codec::MAX_RULE_BITS), and
    /// [`RuleGaError::NoLegalRules`] if no bit string decodes to a rule.
    pub fn new(schema: Schema) -> Result<Self> {
        let layout = GenomeLayout::new(&schema)?;
        let catalog = layout.legal_rules(&schema);
        if catalog.is_empty() {
            return Err(RuleGaError::NoLegalRules);
        }
        log::info!(
            "rule genome is {} bits wide; {} legal rules",
            layout.rule_width(),
            catalog.len()
        );
        Ok(Self {
            schema,
            layout,
            catalog,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn layout(&self) -> &GenomeLayout {
        &self.layout
    }

    /// Every legal rule, in enumeration order.
    pub fn catalog(&self) -> &[Rule] {
        &self.catalog
    }

    /// A hypothesis of between `min_rules` and `max_rules` distinct
    /// catalog rules (inclusive, uniform), capped at the catalog size.
    pub fn random_hypothesis<R: Rng + ?Sized>(
        &self,
        min_rules: usize,
        max_rules: usize,
        rng: &mut R,
    ) -> Hypothesis {
        let (lo, hi) = (min_rules.min(max_rules), min_rules.max(max_rules));
        let count = rng.random_range(lo..=hi).min(self.catalog.len());
        let rules = index::sample(rng, self.catalog.len(), count)
            .into_iter()
            .map(|i| self.catalog[i].clone())
            .collect();
        Hypothesis::new(rules)
    }

    /// `count` independent random hypotheses.
    pub fn generate_hypotheses<R: Rng + ?Sized>(
        &self,
        count: usize,
        min_rules: usize,
        max_rules: usize,
        rng: &mut R,
    ) -> Vec<Hypothesis> {
        (0..count)
            .map(|_| self.random_hypothesis(min_rules, max_rules, rng))
            .collect()
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// Fittest hypothesis of the last evaluated population.
    ///
    /// Empty if the population died out.
    pub best: Hypothesis,

    /// Fitness of `best`.
    pub best_fitness: f64,

    /// Number of evolve steps executed.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run ended because the population became empty.
    pub extinct: bool,

    /// Maximum population fitness after the initial evaluation and after
    /// each generation.
    pub fitness_history: Vec<f64>,
}

impl GaResult {
    /// Training accuracy of `best` as a percentage.
    pub fn best_accuracy(&self) -> f64 {
        self.best_fitness.sqrt()
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use u_rulega::ga::{GaConfig, GaRunner, RuleLearner};
/// use u_rulega::schema::{Dataset, Schema};
///
/// let schema = Schema::builder()
///     .symbolic("wind", ["weak", "strong"])
///     .symbolic("play", ["yes", "no"])
///     .target("play")
///     .build()
///     .unwrap();
/// let training = Dataset::from_rows(&[["weak", "yes"], ["strong", "no"]]);
/// let learner = RuleLearner::new(schema).unwrap();
///
/// let config = GaConfig::generations(5).with_population_size(20).with_seed(42);
/// let result = GaRunner::run(&learner, &training, &config).unwrap();
/// assert_eq!(result.generations, 5);
/// assert!(result.best_fitness <= 10_000.0);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA until the configured stop condition holds.
    ///
    /// A [`StopCondition::FitnessThreshold`] the data cannot reach never
    /// terminates; use [`run_with_cancel`](Self::run_with_cancel) or a
    /// generation count to bound such runs.
    ///
    /// # Errors
    /// Fails if the configuration is invalid or a training row does not
    /// fit the learner's schema.
    pub fn run(learner: &RuleLearner, training: &Dataset, config: &GaConfig) -> Result<GaResult> {
        Self::run_with_cancel(learner, training, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the current fittest.
    pub fn run_with_cancel(
        learner: &RuleLearner,
        training: &Dataset,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        config.validate()?;
        training.validate(learner.schema())?;

        log::info!(
            "GA: p={} r={} m={} rules={}..={} stop={:?} selection={}",
            config.population_size,
            config.replacement_rate,
            config.mutation_rate,
            config.min_rules,
            config.max_rules,
            config.stop,
            config.selection
        );

        let mut rng = rng_from_seed(config.seed);
        let schema = learner.schema();

        // 1. Initialize population
        let mut population: Population = learner
            .generate_hypotheses(
                config.population_size,
                config.min_rules,
                config.max_rules,
                &mut rng,
            )
            .into_iter()
            .collect();

        // 2. Evaluate initial population
        let mut max_fitness = population.evaluate(training, schema, config.parallel);
        let mut fitness_history = vec![max_fitness];

        let mut generations = 0usize;
        let mut cancelled = false;
        let mut extinct = false;

        // 3. Evolutionary loop
        loop {
            let done = match config.stop {
                StopCondition::FitnessThreshold(threshold) => max_fitness >= threshold,
                StopCondition::Generations(n) => generations >= n,
            };
            if done {
                break;
            }

            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            population = evolve(learner, population, config, &mut rng);
            max_fitness = population.evaluate(training, schema, config.parallel);
            generations += 1;
            fitness_history.push(max_fitness);

            log::debug!(
                "generation {}: size={} max={:.1} mean={:.1}",
                generations,
                population.len(),
                max_fitness,
                population.mean_fitness()
            );

            if population.is_empty() {
                log::warn!("population died out at generation {generations}");
                extinct = true;
                break;
            }
        }

        let best = population.fittest().cloned().unwrap_or_default();
        let best_fitness = population.max_fitness();
        log::info!("GA finished after {generations} generations: best fitness {best_fitness:.1}");

        Ok(GaResult {
            best_fitness,
            best,
            generations,
            cancelled,
            extinct,
            fitness_history,
        })
    }
}

/// Builds the next generation from an evaluated population.
///
/// Keeps `⌊(1 - r)·p⌋` selected members, adds the offspring of
/// `⌊r·p / 2⌋` fitness-proportionately drawn pairs, then mutates the
/// whole result. Draws that miss and crossovers without a matching cut
/// contribute nothing, so the size may drift from `p`.
fn evolve<R: Rng + ?Sized>(
    learner: &RuleLearner,
    population: Population,
    config: &GaConfig,
    rng: &mut R,
) -> Population {
    let mut members = population.into_inner();

    let mut next = config
        .selection
        .select(config.survivor_count(), &mut members, rng);

    let pairs = select_pairs(config.pair_count(), &mut members, rng);
    next.extend(crossover_pairs(&pairs, learner.layout(), learner.schema(), rng));

    mutate(
        config.mutation_rate,
        &mut next,
        learner.layout(),
        learner.schema(),
        rng,
    );

    Population::new(next)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{Individual, Selection};
    use crate::random::create_rng;

    fn schema() -> Schema {
        Schema::builder()
            .symbolic("outlook", ["sunny", "overcast", "rain"])
            .symbolic("wind", ["weak", "strong"])
            .symbolic("play", ["yes", "no"])
            .target("play")
            .build()
            .unwrap()
    }

    fn data() -> Dataset {
        Dataset::from_rows(&[
            ["sunny", "weak", "no"],
            ["sunny", "strong", "no"],
            ["overcast", "weak", "yes"],
            ["overcast", "strong", "yes"],
            ["rain", "weak", "yes"],
            ["rain", "strong", "no"],
        ])
    }

    fn small_config() -> GaConfig {
        GaConfig::generations(10)
            .with_population_size(40)
            .with_parallel(false)
            .with_seed(42)
    }

    // ---- RuleLearner ----

    #[test]
    fn test_learner_catalog() {
        let learner = RuleLearner::new(schema()).unwrap();
        assert_eq!(learner.layout().rule_width(), 6);
        assert!(!learner.catalog().is_empty());
        for rule in learner.catalog() {
            assert!(rule.bits().is_some());
            assert!(!rule.preconditions.is_empty());
        }
    }

    #[test]
    fn test_random_hypothesis_rule_counts() {
        let learner = RuleLearner::new(schema()).unwrap();
        let mut rng = create_rng(7);
        for _ in 0..100 {
            let h = learner.random_hypothesis(2, 5, &mut rng);
            assert!((2..=5).contains(&h.rule_count()));
            assert_eq!(h.bit_string().len(), h.rule_count() * 6);

            let mut seen: Vec<String> = h.rules().iter().map(|r| r.to_string()).collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), h.rule_count(), "rules are drawn without replacement");
        }
    }

    #[test]
    fn test_random_hypothesis_capped_by_catalog() {
        let tiny = Schema::builder()
            .symbolic("a", ["v0", "v1"])
            .symbolic("t", ["t0", "t1"])
            .target("t")
            .build()
            .unwrap();
        let learner = RuleLearner::new(tiny).unwrap();
        let catalog = learner.catalog().len();
        let mut rng = create_rng(1);
        let h = learner.random_hypothesis(catalog + 5, catalog + 10, &mut rng);
        assert_eq!(h.rule_count(), catalog);
    }

    #[test]
    fn test_generate_hypotheses_count() {
        let learner = RuleLearner::new(schema()).unwrap();
        let mut rng = create_rng(3);
        assert_eq!(learner.generate_hypotheses(25, 1, 3, &mut rng).len(), 25);
    }

    // ---- GaRunner ----

    #[test]
    fn test_run_generations() {
        let learner = RuleLearner::new(schema()).unwrap();
        let result = GaRunner::run(&learner, &data(), &small_config()).unwrap();
        assert_eq!(result.generations, 10);
        assert_eq!(result.fitness_history.len(), 11);
        assert!(!result.cancelled);
        assert!((0.0..=10_000.0).contains(&result.best_fitness));
        assert_eq!(result.best.fitness(), result.best_fitness);
        assert!((result.best_accuracy() - result.best_fitness.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_run_is_deterministic_with_seed() {
        let learner = RuleLearner::new(schema()).unwrap();
        let a = GaRunner::run(&learner, &data(), &small_config()).unwrap();
        let b = GaRunner::run(&learner, &data(), &small_config()).unwrap();
        assert_eq!(a.fitness_history, b.fitness_history);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_run_threshold_zero_stops_immediately() {
        let learner = RuleLearner::new(schema()).unwrap();
        let config = small_config().with_fitness_threshold(0.0);
        let result = GaRunner::run(&learner, &data(), &config).unwrap();
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
    }

    #[test]
    fn test_run_reaches_threshold() {
        let learner = RuleLearner::new(schema()).unwrap();
        let config = small_config()
            .with_population_size(100)
            .with_accuracy_threshold(0.5);
        let result = GaRunner::run(&learner, &data(), &config).unwrap();
        assert!(result.best_fitness >= 2500.0);
        assert!(result.best_accuracy() >= 50.0 - 1e-9);
    }

    #[test]
    fn test_run_all_strategies() {
        let learner = RuleLearner::new(schema()).unwrap();
        for selection in Selection::ALL {
            let config = small_config().with_selection(selection);
            let result = GaRunner::run(&learner, &data(), &config).unwrap();
            assert_eq!(result.fitness_history.len(), result.generations + 1);
            assert!(result.fitness_history.iter().all(|f| (0.0..=10_000.0).contains(f)));
        }
    }

    #[test]
    fn test_run_with_cancel() {
        let learner = RuleLearner::new(schema()).unwrap();
        let flag = Arc::new(AtomicBool::new(true));
        let config = small_config().with_fitness_threshold(10_000.0);
        let result = GaRunner::run_with_cancel(&learner, &data(), &config, Some(flag)).unwrap();
        assert!(result.cancelled || result.best_fitness >= 10_000.0);
        assert_eq!(result.generations, 0);
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let learner = RuleLearner::new(schema()).unwrap();
        let config = small_config().with_population_size(1);
        assert!(matches!(
            GaRunner::run(&learner, &data(), &config),
            Err(RuleGaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_rejects_ragged_data() {
        let learner = RuleLearner::new(schema()).unwrap();
        let ragged = Dataset::from_rows(&[vec!["sunny", "weak"]]);
        assert!(matches!(
            GaRunner::run(&learner, &ragged, &small_config()),
            Err(RuleGaError::RowWidth { .. })
        ));
    }

    #[test]
    fn test_evolve_population_size_bound() {
        let learner = RuleLearner::new(schema()).unwrap();
        let config = small_config();
        let mut rng = create_rng(5);
        let mut population: Population = learner
            .generate_hypotheses(40, 2, 5, &mut rng)
            .into_iter()
            .collect();
        population.evaluate(&data(), learner.schema(), false);

        let next = evolve(&learner, population, &config, &mut rng);
        // survivors ⌊0.4·40⌋ = 16, plus at most 2 offspring from each of 12 pairs
        assert!(next.len() <= 16 + 24);
        for h in next.hypotheses() {
            assert_eq!(h.bit_string().len() % learner.layout().rule_width(), 0);
        }
    }
}
