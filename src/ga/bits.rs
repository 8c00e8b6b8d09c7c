//! Bit-string genome representation.

use crate::error::RuleGaError;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// An owned sequence of bits.
///
/// A rule genome is exactly `N` bits; a hypothesis genome is the
/// concatenation of its rules' genomes. Text form is `'0'`/`'1'`
/// characters, most significant position first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString(Vec<bool>);

impl BitString {
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// `n` zero bits.
    pub fn zeros(n: usize) -> Self {
        Self(vec![false; n])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    pub fn set(&mut self, index: usize, bit: bool) {
        self.0[index] = bit;
    }

    /// Inverts the bit at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn flip(&mut self, index: usize) {
        self.0[index] = !self.0[index];
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Copies out the bits in `range`.
    pub fn slice(&self, range: Range<usize>) -> BitString {
        Self(self.0[range].to_vec())
    }

    pub fn extend_from(&mut self, other: &BitString) {
        self.0.extend_from_slice(&other.0);
    }

    /// Splits into consecutive `width`-bit pieces; the last piece may be
    /// shorter when the length is not a multiple of `width`.
    pub fn chunks(&self, width: usize) -> impl Iterator<Item = BitString> + '_ {
        self.0.chunks(width.max(1)).map(|c| BitString(c.to_vec()))
    }

    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for BitString {
    type Err = RuleGaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(RuleGaError::InvalidBit(other)),
            })
            .collect()
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
