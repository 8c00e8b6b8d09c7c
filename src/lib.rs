//! Genetic-algorithm concept learning over symbolic datasets.
//!
//! Provides:
//!
//! - **Schema**: attribute definitions and in-memory datasets that the
//!   learner reads.
//! - **GA rule learner**: evolves ordered rule lists (hypotheses) whose
//!   fitness is squared training accuracy, with rule-aligned crossover,
//!   re-decoding mutation and pluggable selection strategies.
//!
//! # Architecture
//!
//! The schema fixes a genome layout once per run; every operator works on
//! bit strings derived from that layout and receives its random number
//! generator explicitly, so seeded runs are reproducible. Logging goes
//! through the `log` facade; no logger is installed here.

pub mod error;
pub mod ga;
pub mod random;
pub mod schema;

pub use error::{Result, RuleGaError};
