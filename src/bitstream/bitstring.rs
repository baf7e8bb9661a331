use std::{fmt::Display, fmt::Formatter, str::FromStr};

use crate::HuffError;

/// A logical sequence of bits, before padding and packing into bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bits: Vec::with_capacity(bits),
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Remove the last bit, if any.
    pub fn pop(&mut self) -> Option<bool> {
        self.bits.pop()
    }

    pub fn extend_from(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn starts_with(&self, prefix: &BitString) -> bool {
        self.bits.starts_with(&prefix.bits)
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromStr for BitString {
    type Err = HuffError;

    /// Parse a string of '0' and '1' characters. Anything else is a consistency error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = BitString::with_capacity(s.len());
        for (pos, ch) in s.chars().enumerate() {
            match ch {
                '0' => bits.push(false),
                '1' => bits.push(true),
                ch => return Err(HuffError::InvalidBit { ch, pos }),
            }
        }
        Ok(bits)
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::BitString;
    use crate::HuffError;

    #[test]
    fn parse_and_display_test() {
        let bits: BitString = "0110".parse().unwrap();
        assert_eq!(bits.len(), 4);
        assert_eq!(bits.as_slice(), &[false, true, true, false]);
        assert_eq!(bits.to_string(), "0110");
    }

    #[test]
    fn invalid_char_test() {
        match "01x1".parse::<BitString>() {
            Err(HuffError::InvalidBit { ch, pos }) => {
                assert_eq!(ch, 'x');
                assert_eq!(pos, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!("0 1".parse::<BitString>().is_err());
    }

    #[test]
    fn prefix_test() {
        let long: BitString = "10110".parse().unwrap();
        let short: BitString = "101".parse().unwrap();
        assert!(long.starts_with(&short));
        assert!(!short.starts_with(&long));
        assert!(long.starts_with(&BitString::new()));
    }
}
