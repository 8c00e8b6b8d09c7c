//! Row storage for training and test data.

use super::types::Schema;
use crate::error::{Result, RuleGaError};

/// An ordered collection of rows, each an ordered list of string fields.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dataset {
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Builds a dataset from borrowed string rows.
    pub fn from_rows<S: AsRef<str>, R: AsRef<[S]>>(rows: &[R]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|r| r.as_ref().iter().map(|s| s.as_ref().to_string()).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Checks that every row has one field per schema attribute.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        let expected = schema.len();
        for (row, fields) in self.rows.iter().enumerate() {
            if fields.len() != expected {
                return Err(RuleGaError::RowWidth {
                    row,
                    expected,
                    actual: fields.len(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Vec<String>> for Dataset {
    fn from_iter<T: IntoIterator<Item = Vec<String>>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
