//! Error type shared by the crate.
//!
//! Only caller-facing precondition violations are errors. A bit string
//! that does not decode to a rule and a selection draw that misses every
//! probability interval are ordinary outcomes, not errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleGaError {
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("row {row} has {actual} fields, schema expects {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid bit character {0:?} (expected '0' or '1')")]
    InvalidBit(char),

    #[error("rule genome is {bits} bits wide, enumeration supports at most {max}")]
    GenomeTooWide { bits: usize, max: usize },

    #[error("schema admits no legal rules")]
    NoLegalRules,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown selection strategy: {0}")]
    UnknownSelection(String),
}

pub type Result<T> = std::result::Result<T, RuleGaError>;
