//! Decoded rule model: statements, preconditions, rules.
//!
//! A [`Rule`] reads `P1 ∧ P2 ∧ … => postcondition`, where every
//! [`Precondition`] is a disjunction (or, less commonly, a conjunction)
//! of attribute-equality [`Statement`]s. Value comparisons are
//! case-insensitive everywhere.

use super::bits::BitString;
use crate::schema::{Dataset, Schema};
use std::fmt;

const AND_DELIMITER: &str = " ∧ ";
const OR_DELIMITER: &str = " ∨ ";

/// Case-insensitive equality of two field values.
pub(crate) fn values_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// An equality test `attribute = value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    pub attribute: String,
    pub value: String,
}

impl Statement {
    pub fn new<A: Into<String>, V: Into<String>>(attribute: A, value: V) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// `Some(true/false)` when the attribute exists in the row, `None`
    /// when the schema has no such attribute or the row is too short.
    fn test(&self, row: &[String], schema: &Schema) -> Option<bool> {
        let index = schema.index_of(&self.attribute)?;
        let field = row.get(index)?;
        Some(values_match(field, &self.value))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.attribute, self.value)
    }
}

/// How a precondition combines its statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionKind {
    And,
    Or,
}

/// A set of statements joined by one [`ConditionKind`].
///
/// Statements naming an attribute the schema does not know are skipped:
/// they never satisfy an OR and never falsify an AND.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Precondition {
    pub kind: ConditionKind,
    pub statements: Vec<Statement>,
}

impl Precondition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            statements: Vec::new(),
        }
    }

    /// Disjunction over `values` of one attribute.
    pub fn any_of<A, I, V>(attribute: A, values: I) -> Self
    where
        A: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let attribute = attribute.into();
        Self {
            kind: ConditionKind::Or,
            statements: values
                .into_iter()
                .map(|v| Statement::new(attribute.clone(), v))
                .collect(),
        }
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn matches(&self, row: &[String], schema: &Schema) -> bool {
        match self.kind {
            ConditionKind::Or => self
                .statements
                .iter()
                .any(|s| s.test(row, schema) == Some(true)),
            ConditionKind::And => self
                .statements
                .iter()
                .all(|s| s.test(row, schema) != Some(false)),
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delimiter = match self.kind {
            ConditionKind::And => AND_DELIMITER,
            ConditionKind::Or => OR_DELIMITER,
        };
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str(delimiter)?;
            }
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

/// A classification rule: all preconditions must hold for the rule to
/// fire, and then it predicts `postcondition`.
///
/// Rules decoded from a genome carry their canonical bit string in
/// `bits`; hand-built rules get one from
/// [`GenomeLayout::encode_rule`](super::GenomeLayout::encode_rule).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub preconditions: Vec<Precondition>,
    pub postcondition: String,
    pub bits: Option<BitString>,
}

impl Rule {
    pub fn new<P: Into<String>>(preconditions: Vec<Precondition>, postcondition: P) -> Self {
        Self {
            preconditions,
            postcondition: postcondition.into(),
            bits: None,
        }
    }

    pub fn with_bits(mut self, bits: BitString) -> Self {
        self.bits = Some(bits);
        self
    }

    pub fn bits(&self) -> Option<&BitString> {
        self.bits.as_ref()
    }

    /// True when every precondition holds for `row`.
    pub fn matches(&self, row: &[String], schema: &Schema) -> bool {
        self.preconditions.iter().all(|p| p.matches(row, schema))
    }

    /// True when the rule fires on `row` and predicts its target value.
    pub fn predicts_correctly(&self, row: &[String], schema: &Schema) -> bool {
        self.matches(row, schema)
            && row
                .get(schema.target_index())
                .is_some_and(|actual| values_match(actual, &self.postcondition))
    }

    /// Percentage of `dataset` rows this rule alone classifies correctly.
    pub fn accuracy(&self, dataset: &Dataset, schema: &Schema) -> f64 {
        if dataset.is_empty() {
            return 0.0;
        }
        let correct = dataset
            .rows()
            .iter()
            .filter(|row| self.predicts_correctly(row, schema))
            .count();
        correct as f64 / dataset.len() as f64 * 100.0
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, precondition) in self.preconditions.iter().enumerate() {
            if i > 0 {
                f.write_str(AND_DELIMITER)?;
            }
            write!(f, "{precondition}")?;
        }
        write!(f, " => {}", self.postcondition)
    }
}
