//! Genome codec: schema-driven layout of rule bit strings.
//!
//! Every non-target attribute owns a field one bit per legal value; a set
//! bit admits that value into the attribute's disjunction, and an all-zero
//! field means "don't care". The target owns a field of `arity - 1` bits
//! holding the binary index of the predicted value. The rule width `N` is
//! the sum of all field widths.
//!
//! # Example
//!
//! Two attributes with two values each, the second being the target,
//! give fields `[2, 1]` and `N = 3`. `"010"` decodes to
//! `a = v1 => t0`; `"000"` has no precondition and is rejected.

use super::bits::BitString;
use super::rule::{values_match, ConditionKind, Precondition, Rule, Statement};
use crate::error::{Result, RuleGaError};
use crate::schema::Schema;

/// Widest rule genome the codec will lay out.
///
/// The legal-rule catalog enumerates all `2^N` strings.
pub const MAX_RULE_BITS: usize = 20;

/// Placement of one attribute inside a rule genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Row index of the attribute.
    pub attribute: usize,
    /// First bit of the field.
    pub offset: usize,
    /// Number of bits.
    pub width: usize,
    pub is_target: bool,
}

/// Why a bit string did not decode into a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRule {
    /// The chunk is not exactly `N` bits.
    WrongLength { expected: usize, actual: usize },
    /// The target field is not the code of any target value.
    InvalidTarget,
    /// Every non-target field is zero.
    NoPreconditions,
}

/// Outcome of decoding one rule genome.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Rule(Rule),
    Invalid(InvalidRule),
}

impl Decoded {
    pub fn ok(self) -> Option<Rule> {
        match self {
            Decoded::Rule(rule) => Some(rule),
            Decoded::Invalid(_) => None,
        }
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, Decoded::Rule(_))
    }
}

/// Rules recovered from a hypothesis genome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    /// Chunks that decoded, in genome order.
    pub rules: Vec<Rule>,
    /// Chunks that did not.
    pub dropped: usize,
}

/// Binary code of `index`, left-padded with zeros to `width` bits.
///
/// An index that needs more than `width` bits is returned unpadded at its
/// natural length.
pub fn encode_one_of_n(index: usize, width: usize) -> BitString {
    let natural = (usize::BITS - index.leading_zeros()) as usize;
    let len = natural.max(width);
    (0..len).rev().map(|bit| (index >> bit) & 1 == 1).collect()
}

/// All `2^n` bit strings of width `n`, in lexicographic order.
pub fn enumerate_bit_strings(n: usize) -> Vec<BitString> {
    fn recurse(level: usize, bits: &mut BitString, out: &mut Vec<BitString>) {
        if level == bits.len() {
            out.push(bits.clone());
            return;
        }
        bits.set(level, false);
        recurse(level + 1, bits, out);
        bits.set(level, true);
        recurse(level + 1, bits, out);
    }

    let mut out = Vec::with_capacity(1usize << n);
    recurse(0, &mut BitString::zeros(n), &mut out);
    out
}

/// Field layout of a rule genome, derived once per schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeLayout {
    fields: Vec<FieldSpec>,
    rule_width: usize,
}

impl GenomeLayout {
    /// Lays out fields in schema order.
    ///
    /// Fails with [`RuleGaError::GenomeTooWide`] past [`MAX_RULE_BITS`].
    pub fn new(schema: &Schema) -> Result<Self> {
        let mut fields = Vec::with_capacity(schema.len());
        let mut offset = 0;
        for attr in schema.attributes() {
            let is_target = attr.index == schema.target_index();
            let width = if is_target {
                attr.arity() - 1
            } else {
                attr.arity()
            };
            fields.push(FieldSpec {
                attribute: attr.index,
                offset,
                width,
                is_target,
            });
            offset += width;
        }

        if offset > MAX_RULE_BITS {
            return Err(RuleGaError::GenomeTooWide {
                bits: offset,
                max: MAX_RULE_BITS,
            });
        }

        Ok(Self {
            fields,
            rule_width: offset,
        })
    }

    /// Bits per rule (`N`).
    pub fn rule_width(&self) -> usize {
        self.rule_width
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Decodes one `N`-bit rule genome.
    pub fn decode_rule(&self, bits: &BitString, schema: &Schema) -> Decoded {
        if bits.len() != self.rule_width {
            return Decoded::Invalid(InvalidRule::WrongLength {
                expected: self.rule_width,
                actual: bits.len(),
            });
        }

        let mut postcondition = None;
        let mut preconditions = Vec::new();
        for field in &self.fields {
            let attr = &schema.attributes()[field.attribute];
            let chunk = bits.slice(field.offset..field.offset + field.width);
            if field.is_target {
                postcondition = (0..attr.arity())
                    .find(|&i| encode_one_of_n(i, field.width) == chunk)
                    .map(|i| attr.values[i].clone());
            } else {
                let mut precondition = Precondition::new(ConditionKind::Or);
                for (i, set) in chunk.iter().enumerate() {
                    if set {
                        precondition.push(Statement::new(attr.name.clone(), attr.values[i].clone()));
                    }
                }
                if !precondition.is_empty() {
                    preconditions.push(precondition);
                }
            }
        }

        let Some(postcondition) = postcondition else {
            return Decoded::Invalid(InvalidRule::InvalidTarget);
        };
        if preconditions.is_empty() {
            return Decoded::Invalid(InvalidRule::NoPreconditions);
        }
        Decoded::Rule(Rule::new(preconditions, postcondition).with_bits(bits.clone()))
    }

    /// Canonical genome of a rule, or `None` when the rule cannot be
    /// expressed in this layout.
    ///
    /// Each precondition must constrain a single attribute (an AND of one
    /// statement counts), no attribute may be constrained twice, and every
    /// value must be legal for its attribute.
    pub fn encode_rule(&self, rule: &Rule, schema: &Schema) -> Option<BitString> {
        if rule.preconditions.is_empty() {
            return None;
        }

        let mut bits = BitString::zeros(self.rule_width);
        let mut constrained = vec![false; schema.len()];
        for precondition in &rule.preconditions {
            if precondition.kind == ConditionKind::And && precondition.statements.len() > 1 {
                return None;
            }
            let first = precondition.statements.first()?;
            let index = schema.index_of(&first.attribute)?;
            if index == schema.target_index() || constrained[index] {
                return None;
            }
            constrained[index] = true;

            let attr = &schema.attributes()[index];
            let field = &self.fields[index];
            for statement in &precondition.statements {
                if statement.attribute != attr.name {
                    return None;
                }
                let value = attr
                    .values
                    .iter()
                    .position(|v| values_match(v, &statement.value))?;
                bits.set(field.offset + value, true);
            }
        }

        let target = schema.target();
        let field = &self.fields[schema.target_index()];
        let value = target
            .values
            .iter()
            .position(|v| values_match(v, &rule.postcondition))?;
        for (i, bit) in encode_one_of_n(value, field.width).iter().enumerate() {
            bits.set(field.offset + i, bit);
        }
        Some(bits)
    }

    /// Splits a hypothesis genome into `N`-bit chunks and decodes each.
    pub fn decode_hypothesis(&self, bits: &BitString, schema: &Schema) -> DecodeReport {
        let mut report = DecodeReport::default();
        for chunk in bits.chunks(self.rule_width) {
            match self.decode_rule(&chunk, schema) {
                Decoded::Rule(rule) => report.rules.push(rule),
                Decoded::Invalid(_) => report.dropped += 1,
            }
        }
        report
    }

    /// Every rule the layout can express, in enumeration order.
    ///
    /// The first two enumerated strings (all zeros, and all zeros but the
    /// last bit) are skipped without decoding.
    pub fn legal_rules(&self, schema: &Schema) -> Vec<Rule> {
        enumerate_bit_strings(self.rule_width)
            .into_iter()
            .skip(2)
            .filter_map(|bits| self.decode_rule(&bits, schema).ok())
            .collect()
    }
}
