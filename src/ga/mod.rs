//! Genetic-algorithm rule learner.
//!
//! Learns an ordered, first-match-wins rule list (a [`Hypothesis`]) that
//! classifies rows of a symbolic dataset. Each rule is a fixed-width bit
//! string: one bit per value of every non-target attribute (a set bit
//! permits that value) followed by a one-of-n code for the predicted
//! target value. Hypotheses concatenate their rules' genomes, so genome
//! length varies with rule count.
//!
//! # Key Types
//!
//! - [`GenomeLayout`]: field layout, rule codec and legal-rule catalog
//! - [`Rule`] / [`Precondition`] / [`Statement`]: decoded rule structure
//! - [`Hypothesis`] / [`Population`]: candidate classifiers and their fitness
//! - [`Selection`]: fitness-proportionate, tournament or rank selection
//! - [`GaConfig`]: algorithm parameters and stop condition
//! - [`RuleLearner`] / [`GaRunner`]: run driver
//! - [`GaResult`]: fittest hypothesis with run statistics
//!
//! # Submodules
//!
//! - [`operators`]: rule-aligned two-point crossover and mutation
//! - [`experiment`]: selection and replacement-rate sweeps
//!
//! # Example
//!
//! ```
//! use u_rulega::ga::{GaConfig, GaRunner, RuleLearner, Selection};
//! use u_rulega::schema::{Dataset, Schema};
//!
//! let schema = Schema::builder()
//!     .symbolic("outlook", ["sunny", "overcast", "rain"])
//!     .symbolic("wind", ["weak", "strong"])
//!     .symbolic("play", ["yes", "no"])
//!     .target("play")
//!     .build()
//!     .unwrap();
//! let training = Dataset::from_rows(&[
//!     ["sunny", "weak", "no"],
//!     ["overcast", "strong", "yes"],
//!     ["rain", "weak", "yes"],
//! ]);
//!
//! let learner = RuleLearner::new(schema).unwrap();
//! let config = GaConfig::generations(20)
//!     .with_population_size(50)
//!     .with_selection(Selection::Tournament(0.6))
//!     .with_seed(7);
//! let result = GaRunner::run(&learner, &training, &config).unwrap();
//! println!("{}", result.best);
//! ```
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - De Jong, Spears & Gordon (1993), "Using Genetic Algorithms for
//!   Concept Learning"
//! - Mitchell (1997), *Machine Learning*, ch. 9

mod bits;
mod codec;
mod config;
pub mod experiment;
mod hypothesis;
pub mod operators;
mod population;
mod rule;
mod runner;
mod selection;
mod types;

pub use bits::BitString;
pub use codec::{
    encode_one_of_n, enumerate_bit_strings, DecodeReport, Decoded, FieldSpec, GenomeLayout,
    InvalidRule, MAX_RULE_BITS,
};
pub use config::{GaConfig, StopCondition, MAX_FITNESS};
pub use hypothesis::Hypothesis;
pub use population::Population;
pub use rule::{ConditionKind, Precondition, Rule, Statement};
pub use runner::{GaResult, GaRunner, RuleLearner};
pub use selection::{
    assign_fitness_proportionate, probabilistically_select_one, select_pairs,
    FitnessProportionate, Rank, Selection, SelectionStrategy, Tournament,
    DEFAULT_TOURNAMENT_PROBABILITY,
};
pub use types::Individual;
