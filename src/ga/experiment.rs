//! Parameter sweeps over the rule learner.
//!
//! Each sweep point is a full GA run, scored on the training and held-out
//! test sets. Sweeps cover every [`Selection`] strategy at each parameter
//! value, so results can be compared strategy by strategy.

use super::config::GaConfig;
use super::hypothesis::Hypothesis;
use super::runner::{GaRunner, RuleLearner};
use super::selection::{Selection, DEFAULT_TOURNAMENT_PROBABILITY};
use crate::error::Result;
use crate::schema::{Dataset, Schema};

/// Accuracy percentages of one hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Accuracy {
    pub train: f64,
    pub test: f64,
}

/// One run of a sweep.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepPoint {
    pub selection: Selection,
    pub generations: usize,
    pub replacement_rate: f64,
    pub accuracy: Accuracy,
    pub best: Hypothesis,
}

/// Generation counts swept by default: 10, 20, ..., 100.
pub fn default_generation_steps() -> impl Iterator<Item = usize> {
    (10..=100).step_by(10)
}

/// Replacement rates swept by default: 0.1, 0.2, ..., 0.9.
pub fn default_replacement_rates() -> impl Iterator<Item = f64> {
    (1..=9).map(|i| f64::from(i) / 10.0)
}

/// Scores `hypothesis` on both data sets.
pub fn evaluate(hypothesis: &Hypothesis, train: &Dataset, test: &Dataset, schema: &Schema) -> Accuracy {
    Accuracy {
        train: hypothesis.correct_percentage(train, schema),
        test: hypothesis.correct_percentage(test, schema),
    }
}

/// Runs every strategy for each generation count.
///
/// All other parameters come from `base`; its stop condition is
/// replaced. A tournament probability set in `base` carries over.
pub fn selection_sweep<I>(
    learner: &RuleLearner,
    train: &Dataset,
    test: &Dataset,
    base: &GaConfig,
    generations: I,
) -> Result<Vec<SweepPoint>>
where
    I: IntoIterator<Item = usize>,
{
    let mut points = Vec::new();
    for n in generations {
        for selection in strategies(base) {
            let config = base.clone().with_generations(n).with_selection(selection);
            points.push(run_point(learner, train, test, &config)?);
        }
    }
    Ok(points)
}

/// Runs every strategy for each replacement rate, keeping the stop
/// condition of `base`.
pub fn replacement_sweep<I>(
    learner: &RuleLearner,
    train: &Dataset,
    test: &Dataset,
    base: &GaConfig,
    rates: I,
) -> Result<Vec<SweepPoint>>
where
    I: IntoIterator<Item = f64>,
{
    let mut points = Vec::new();
    for rate in rates {
        for selection in strategies(base) {
            let config = base
                .clone()
                .with_replacement_rate(rate)
                .with_selection(selection);
            points.push(run_point(learner, train, test, &config)?);
        }
    }
    Ok(points)
}

fn strategies(base: &GaConfig) -> [Selection; 3] {
    let p = match base.selection {
        Selection::Tournament(p) => p,
        _ => DEFAULT_TOURNAMENT_PROBABILITY,
    };
    [
        Selection::FitnessProportionate,
        Selection::Tournament(p),
        Selection::Rank,
    ]
}

fn run_point(
    learner: &RuleLearner,
    train: &Dataset,
    test: &Dataset,
    config: &GaConfig,
) -> Result<SweepPoint> {
    test.validate(learner.schema())?;
    let result = GaRunner::run(learner, train, config)?;
    let accuracy = evaluate(&result.best, train, test, learner.schema());
    log::info!(
        "{} selection, {} generations, r={:.2}: train {:.1}%, test {:.1}%",
        config.selection,
        result.generations,
        config.replacement_rate,
        accuracy.train,
        accuracy.test
    );
    Ok(SweepPoint {
        selection: config.selection,
        generations: result.generations,
        replacement_rate: config.replacement_rate,
        accuracy,
        best: result.best,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::rule::{Precondition, Rule};

    fn schema() -> Schema {
        Schema::builder()
            .symbolic("outlook", ["sunny", "overcast", "rain"])
            .symbolic("wind", ["weak", "strong"])
            .symbolic("play", ["yes", "no"])
            .target("play")
            .build()
            .unwrap()
    }

    fn train() -> Dataset {
        Dataset::from_rows(&[
            ["sunny", "weak", "no"],
            ["sunny", "strong", "no"],
            ["overcast", "weak", "yes"],
            ["rain", "weak", "yes"],
            ["rain", "strong", "no"],
        ])
    }

    fn test() -> Dataset {
        Dataset::from_rows(&[["overcast", "strong", "yes"], ["sunny", "weak", "yes"]])
    }

    fn base() -> GaConfig {
        GaConfig::generations(3)
            .with_population_size(20)
            .with_parallel(false)
            .with_seed(11)
    }

    #[test]
    fn test_evaluate() {
        let h = Hypothesis::new(vec![Rule::new(
            vec![Precondition::any_of("outlook", ["overcast", "rain"])],
            "yes",
        )]);
        let acc = evaluate(&h, &train(), &test(), &schema());
        assert!((acc.train - 40.0).abs() < 1e-9);
        assert!((acc.test - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_steps() {
        let gens: Vec<usize> = default_generation_steps().collect();
        assert_eq!(gens.len(), 10);
        assert_eq!((gens[0], gens[9]), (10, 100));

        let rates: Vec<f64> = default_replacement_rates().collect();
        assert_eq!(rates.len(), 9);
        assert!((rates[0] - 0.1).abs() < 1e-12);
        assert!((rates[8] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_selection_sweep_covers_strategies() {
        let learner = RuleLearner::new(schema()).unwrap();
        let points = selection_sweep(&learner, &train(), &test(), &base(), [1, 2]).unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].selection, Selection::FitnessProportionate);
        assert_eq!(points[1].selection, Selection::Tournament(DEFAULT_TOURNAMENT_PROBABILITY));
        assert_eq!(points[2].selection, Selection::Rank);
        assert!(points[..3].iter().all(|p| p.generations == 1));
        assert!(points[3..].iter().all(|p| p.generations == 2));
        for p in &points {
            assert!((0.0..=100.0).contains(&p.accuracy.train));
            assert!((0.0..=100.0).contains(&p.accuracy.test));
        }
    }

    #[test]
    fn test_replacement_sweep_keeps_tournament_probability() {
        let learner = RuleLearner::new(schema()).unwrap();
        let config = base().with_tournament_probability(0.8);
        let points = replacement_sweep(&learner, &train(), &test(), &config, [0.2, 0.5]).unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(points[1].selection, Selection::Tournament(0.8));
        assert!((points[0].replacement_rate - 0.2).abs() < 1e-12);
        assert!((points[5].replacement_rate - 0.5).abs() < 1e-12);
        assert!(points.iter().all(|p| p.generations == 3));
    }

    #[test]
    fn test_sweep_rejects_ragged_test_set() {
        let learner = RuleLearner::new(schema()).unwrap();
        let ragged = Dataset::from_rows(&[vec!["sunny"]]);
        assert!(selection_sweep(&learner, &train(), &ragged, &base(), [1]).is_err());
    }
}
