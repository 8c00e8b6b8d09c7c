//! Attribute schema and dataset collaborators.
//!
//! The GA consumes a [`Schema`] to lay out its genomes and a [`Dataset`]
//! to evaluate hypotheses. Neither type knows anything about files;
//! loading and discretizing data is the caller's business.
//!
//! # Key Types
//!
//! - [`Attribute`]: a named column with an ordered list of legal values
//! - [`Schema`]: the ordered attributes plus the designated target
//! - [`SchemaBuilder`]: fluent construction with validation
//! - [`Dataset`]: rows of string fields

mod dataset;
mod types;

pub use dataset::Dataset;
pub use types::{Attribute, AttributeKind, Schema, SchemaBuilder};
