//! Hypotheses: ordered rule lists used as first-match-wins classifiers.

use super::bits::BitString;
use super::codec::GenomeLayout;
use super::rule::{values_match, Rule};
use super::types::Individual;
use crate::schema::{Dataset, Schema};
use std::fmt;

/// An ordered list of rules plus cached fitness and selection probability.
///
/// Classification is first-match-wins: the first rule whose preconditions
/// all hold decides. The genome is the concatenation of the rules'
/// `N`-bit genomes, so its length is always a multiple of `N`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hypothesis {
    rules: Vec<Rule>,
    fitness: f64,
    probability: f64,
}

impl Hypothesis {
    /// Wraps `rules` as they are.
    ///
    /// Hand-built rules carry no genome until
    /// [`fill_genomes`](Self::fill_genomes) encodes them; until then
    /// crossover and mutation, which work on [`bit_string`](Self::bit_string),
    /// lose them.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            fitness: 0.0,
            probability: 0.0,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Replaces the rule list wholesale and clears the cached scores.
    pub fn set_rules(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
        self.fitness = 0.0;
        self.probability = 0.0;
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Stores the canonical genome on every rule that lacks one.
    ///
    /// Returns how many rules the layout cannot express; those stay
    /// without a genome.
    pub fn fill_genomes(&mut self, layout: &GenomeLayout, schema: &Schema) -> usize {
        let mut inexpressible = 0;
        for rule in self.rules.iter_mut().filter(|r| r.bits.is_none()) {
            match layout.encode_rule(rule, schema) {
                Some(bits) => rule.bits = Some(bits),
                None => inexpressible += 1,
            }
        }
        inexpressible
    }

    /// Concatenated rule genomes. Rules without a stored genome are
    /// skipped.
    pub fn bit_string(&self) -> BitString {
        let mut bits = BitString::default();
        for rule in &self.rules {
            if let Some(rule_bits) = rule.bits() {
                bits.extend_from(rule_bits);
            }
        }
        bits
    }

    /// Target value predicted for `row`, or `None` if no rule fires.
    pub fn classify(&self, row: &[String], schema: &Schema) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(row, schema))
            .map(|rule| rule.postcondition.as_str())
    }

    /// Percentage of rows classified correctly. Unclassified rows count
    /// as wrong; an empty dataset scores 0.
    pub fn correct_percentage(&self, dataset: &Dataset, schema: &Schema) -> f64 {
        if dataset.is_empty() {
            return 0.0;
        }
        let target = schema.target_index();
        let correct = dataset
            .rows()
            .iter()
            .filter(|row| {
                match (self.classify(row, schema), row.get(target)) {
                    (Some(predicted), Some(actual)) => values_match(predicted, actual),
                    _ => false,
                }
            })
            .count();
        correct as f64 / dataset.len() as f64 * 100.0
    }

    /// Squared accuracy percentage, in `[0, 10000]`. Also caches it.
    pub fn compute_fitness(&mut self, dataset: &Dataset, schema: &Schema) -> f64 {
        let accuracy = self.correct_percentage(dataset, schema);
        self.fitness = accuracy * accuracy;
        self.fitness
    }

    /// Reorders rules by their individual accuracy on `dataset`, best
    /// first. Ties keep their current order.
    pub fn sort_rules_by_accuracy(&mut self, dataset: &Dataset, schema: &Schema) {
        let mut scored: Vec<(f64, Rule)> = self
            .rules
            .drain(..)
            .map(|rule| (rule.accuracy(dataset, schema), rule))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        self.rules = scored.into_iter().map(|(_, rule)| rule).collect();
    }
}

impl Individual for Hypothesis {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn set_probability(&mut self, probability: f64) {
        self.probability = probability;
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
