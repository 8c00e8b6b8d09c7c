//! Selection strategies for the GA.
//!
//! A strategy draws `count` individuals **with replacement** from the
//! current population. Fitness-proportionate and rank selection assign
//! every individual a probability and then sample with
//! [`probabilistically_select_one`], a cumulative scan over those
//! probabilities. When the probabilities do not cover `[0, 1)` (all-zero
//! fitness, or floating-point rounding) a draw can miss every interval;
//! a missed draw simply yields nothing, so a strategy may return fewer
//! than `count` individuals.
//!
//! All strategies assume **maximization** (higher fitness = better).
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Mitchell (1997), *Machine Learning*, ch. 9 (GABIL-style rule learning)

use super::types::Individual;
use crate::error::RuleGaError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Probability that the fitter of two tournament contestants wins.
pub const DEFAULT_TOURNAMENT_PROBABILITY: f64 = 0.6;

/// Draws one individual by walking cumulative probabilities.
///
/// Draws `r ~ U[0, 1)` and returns the first individual whose interval
/// `[sum_before, sum_before + probability)` contains `r`, or `None` if no
/// interval does.
pub fn probabilistically_select_one<'a, I: Individual, R: Rng + ?Sized>(
    population: &'a [I],
    rng: &mut R,
) -> Option<&'a I> {
    let r: f64 = rng.random();
    let mut upper = 0.0;
    for individual in population {
        let lower = upper;
        upper += individual.probability();
        if r >= lower && r < upper {
            return Some(individual);
        }
    }
    None
}

/// Sets `probability = fitness / total fitness` on every individual
/// (0 everywhere when the total is 0).
pub fn assign_fitness_proportionate<I: Individual>(population: &mut [I]) {
    let total: f64 = population.iter().map(Individual::fitness).sum();
    for individual in population.iter_mut() {
        let fitness = individual.fitness();
        let pr = if total > 0.0 && fitness != 0.0 {
            fitness / total
        } else {
            0.0
        };
        individual.set_probability(pr);
    }
}

/// Draws `count` crossover pairs according to fitness-proportionate
/// probabilities. A pair is kept only when both of its draws hit.
pub fn select_pairs<I: Individual, R: Rng + ?Sized>(
    count: usize,
    population: &mut [I],
    rng: &mut R,
) -> Vec<(I, I)> {
    assign_fitness_proportionate(population);
    let population: &[I] = population;
    (0..count)
        .filter_map(|_| {
            let first = probabilistically_select_one(population, rng);
            let second = probabilistically_select_one(population, rng);
            match (first, second) {
                (Some(a), Some(b)) => Some((a.clone(), b.clone())),
                _ => None,
            }
        })
        .collect()
}

/// A way of choosing members for the next generation.
pub trait SelectionStrategy {
    /// Draws up to `count` individuals with replacement.
    ///
    /// The strategy may update cached probabilities and reorder
    /// `population`.
    fn select<I: Individual, R: Rng + ?Sized>(
        &self,
        count: usize,
        population: &mut [I],
        rng: &mut R,
    ) -> Vec<I>;
}

/// Roulette-wheel selection: `Pr(h) = fitness(h) / Σ fitness`.
///
/// # Complexity
/// O(n) per draw (linear scan)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitnessProportionate;

impl SelectionStrategy for FitnessProportionate {
    fn select<I: Individual, R: Rng + ?Sized>(
        &self,
        count: usize,
        population: &mut [I],
        rng: &mut R,
    ) -> Vec<I> {
        assign_fitness_proportionate(population);
        let population: &[I] = population;
        (0..count)
            .filter_map(|_| probabilistically_select_one(population, rng).cloned())
            .collect()
    }
}

/// Soft binary tournament.
///
/// Each draw picks two distinct individuals uniformly at random. The
/// fitter one wins with probability `win_probability`, otherwise the
/// second drawn is returned whatever its fitness. On equal fitness the
/// second drawn counts as the fitter.
///
/// The fitter contestant is therefore returned with probability
/// `p + (1 - p) / 2` when the two differ in fitness.
///
/// # Complexity
/// O(1) per draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tournament {
    pub win_probability: f64,
}

impl Default for Tournament {
    fn default() -> Self {
        Self {
            win_probability: DEFAULT_TOURNAMENT_PROBABILITY,
        }
    }
}

impl SelectionStrategy for Tournament {
    fn select<I: Individual, R: Rng + ?Sized>(
        &self,
        count: usize,
        population: &mut [I],
        rng: &mut R,
    ) -> Vec<I> {
        let n = population.len();
        match n {
            0 => return Vec::new(),
            1 => return vec![population[0].clone(); count],
            _ => {}
        }

        (0..count)
            .map(|_| {
                let first = rng.random_range(0..n);
                let mut second = rng.random_range(0..n - 1);
                if second >= first {
                    second += 1;
                }
                let (a, b) = (&population[first], &population[second]);
                if rng.random::<f64>() < self.win_probability && a.fitness() > b.fitness() {
                    a.clone()
                } else {
                    b.clone()
                }
            })
            .collect()
    }
}

/// Linear rank selection.
///
/// Sorts the population by fitness, best first, and gives rank `i` of `n`
/// the probability `(n - 1 - i) / Σ_{k<n} k`. The least fit individual
/// gets probability 0 and is never chosen; a lone individual gets 1.
///
/// # Complexity
/// O(n log n) per call (sort), O(n) per draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rank;

impl SelectionStrategy for Rank {
    fn select<I: Individual, R: Rng + ?Sized>(
        &self,
        count: usize,
        population: &mut [I],
        rng: &mut R,
    ) -> Vec<I> {
        population.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let n = population.len();
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            population[0].set_probability(1.0);
        } else {
            let total = (n * (n - 1) / 2) as f64;
            for (rank, individual) in population.iter_mut().enumerate() {
                individual.set_probability((n - 1 - rank) as f64 / total);
            }
        }

        let population: &[I] = population;
        (0..count)
            .filter_map(|_| probabilistically_select_one(population, rng).cloned())
            .collect()
    }
}

/// Configuration-level choice of selection strategy.
///
/// # Examples
///
/// ```
/// use u_rulega::ga::Selection;
///
/// let sel: Selection = "tournament".parse().unwrap();
/// assert_eq!(sel, Selection::Tournament(0.6));
/// assert_eq!(Selection::default(), Selection::Rank);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// See [`FitnessProportionate`].
    FitnessProportionate,

    /// See [`Tournament`]; carries the fitter contestant's win probability.
    Tournament(f64),

    /// See [`Rank`].
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Rank
    }
}

impl Selection {
    /// The three strategies, tournament with its default probability.
    pub const ALL: [Selection; 3] = [
        Selection::FitnessProportionate,
        Selection::Tournament(DEFAULT_TOURNAMENT_PROBABILITY),
        Selection::Rank,
    ];
}

impl SelectionStrategy for Selection {
    fn select<I: Individual, R: Rng + ?Sized>(
        &self,
        count: usize,
        population: &mut [I],
        rng: &mut R,
    ) -> Vec<I> {
        match *self {
            Selection::FitnessProportionate => FitnessProportionate.select(count, population, rng),
            Selection::Tournament(p) => Tournament { win_probability: p }.select(count, population, rng),
            Selection::Rank => Rank.select(count, population, rng),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::FitnessProportionate => f.write_str("fitness-proportionate"),
            Selection::Tournament(_) => f.write_str("tournament"),
            Selection::Rank => f.write_str("rank"),
        }
    }
}

impl FromStr for Selection {
    type Err = RuleGaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fitness-proportionate" | "fitness_proportionate" | "roulette" | "1" => {
                Ok(Selection::FitnessProportionate)
            }
            "tournament" | "2" => Ok(Selection::Tournament(DEFAULT_TOURNAMENT_PROBABILITY)),
            "rank" | "3" => Ok(Selection::Rank),
            _ => Err(RuleGaError::UnknownSelection(s.to_string())),
        }
    }
}
