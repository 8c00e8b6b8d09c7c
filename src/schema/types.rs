//! Attribute and schema definitions.

use crate::error::{Result, RuleGaError};
use std::collections::HashSet;

/// Kind of values an attribute carries.
///
/// Numeric attributes are expected to arrive already discretized: their
/// `values` are threshold labels and are encoded exactly like symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeKind {
    Symbolic,
    Numeric,
}

/// One column of a data row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// Attribute name, used by rule statements.
    pub name: String,

    /// Symbolic or numeric-threshold.
    pub kind: AttributeKind,

    /// Ordered legal values. The order fixes the bit position of each
    /// value in the genome.
    pub values: Vec<String>,

    /// Position of this attribute in a data row.
    pub index: usize,
}

impl Attribute {
    pub fn new<S: Into<String>>(
        name: S,
        kind: AttributeKind,
        index: usize,
        values: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
            index,
        }
    }

    /// Number of legal values.
    pub fn arity(&self) -> usize {
        self.values.len()
    }
}

/// Ordered attribute list with one designated target.
///
/// Construction validates the invariants once: indices are unique and
/// contiguous from 0, the target exists, every attribute has at least one
/// value and the target at least two. Nothing downstream re-checks them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    attributes: Vec<Attribute>,
    target: usize,
}

impl Schema {
    /// Builds a schema from attributes and the target's row index.
    ///
    /// Attributes may be given in any order; they are stored sorted by
    /// index.
    pub fn new(mut attributes: Vec<Attribute>, target: usize) -> Result<Self> {
        if attributes.is_empty() {
            return Err(RuleGaError::InvalidSchema("no attributes".into()));
        }
        attributes.sort_by_key(|a| a.index);
        for (expected, attr) in attributes.iter().enumerate() {
            if attr.index != expected {
                return Err(RuleGaError::InvalidSchema(format!(
                    "attribute indices must be unique and contiguous from 0, found {} at position {}",
                    attr.index, expected
                )));
            }
            if attr.values.is_empty() {
                return Err(RuleGaError::InvalidSchema(format!(
                    "attribute {:?} has no values",
                    attr.name
                )));
            }
        }

        let mut names = HashSet::new();
        for attr in &attributes {
            if !names.insert(attr.name.as_str()) {
                return Err(RuleGaError::InvalidSchema(format!(
                    "duplicate attribute name {:?}",
                    attr.name
                )));
            }
        }

        let Some(target_attr) = attributes.get(target) else {
            return Err(RuleGaError::InvalidSchema(format!(
                "target index {target} out of range for {} attributes",
                attributes.len()
            )));
        };
        if target_attr.values.len() < 2 {
            return Err(RuleGaError::InvalidSchema(format!(
                "target {:?} needs at least two values",
                target_attr.name
            )));
        }

        Ok(Self { attributes, target })
    }

    /// Starts a fluent schema definition.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Attributes in row order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The target attribute.
    pub fn target(&self) -> &Attribute {
        &self.attributes[self.target]
    }

    pub fn target_index(&self) -> usize {
        self.target
    }

    /// Row index of the attribute with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Fluent [`Schema`] construction.
///
/// ```
/// use u_rulega::schema::Schema;
///
/// let schema = Schema::builder()
///     .symbolic("outlook", ["sunny", "overcast", "rain"])
///     .symbolic("wind", ["weak", "strong"])
///     .symbolic("play", ["yes", "no"])
///     .target("play")
///     .build()
///     .unwrap();
/// assert_eq!(schema.target().name, "play");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    attributes: Vec<Attribute>,
    target: Option<String>,
}

impl SchemaBuilder {
    /// Appends a symbolic attribute at the next row index.
    pub fn symbolic<N, I, V>(self, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.push(name, AttributeKind::Symbolic, values)
    }

    /// Appends a numeric attribute whose values are threshold labels.
    pub fn numeric<N, I, V>(self, name: N, thresholds: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.push(name, AttributeKind::Numeric, thresholds)
    }

    /// Marks the attribute with this name as the target.
    pub fn target<N: Into<String>>(mut self, name: N) -> Self {
        self.target = Some(name.into());
        self
    }

    pub fn build(self) -> Result<Schema> {
        let target_name = self
            .target
            .ok_or_else(|| RuleGaError::InvalidSchema("no target attribute".into()))?;
        let target = self
            .attributes
            .iter()
            .position(|a| a.name == target_name)
            .ok_or_else(|| {
                RuleGaError::InvalidSchema(format!("target {target_name:?} is not an attribute"))
            })?;
        Schema::new(self.attributes, target)
    }

    fn push<N, I, V>(mut self, name: N, kind: AttributeKind, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let index = self.attributes.len();
        let values = values.into_iter().map(Into::into).collect();
        self.attributes.push(Attribute::new(name, kind, index, values));
        self
    }
}
