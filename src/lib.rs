//! Huffman coding of text files.
//!
//! Version 0.1.0
//!
//! Builds a prefix-free binary code from the symbol frequencies of a text, packs the
//! encoded text into a byte-aligned bitstream, and restores the original text from that
//! bitstream and the same code tree.
//!
//! The packed format carries no header: the first byte starts with `p-1` zero bits and a
//! one bit (`p` in 1..=8) so the payload start can be found, and the rest is the
//! concatenation of the symbol codes, most significant bit first. The decoder must be
//! given the tree that produced the encoding, typically by rebuilding it from the
//! original text.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffpack -z notes.txt`
//!
//! This will create the file notes.txt.huf. To decompress, the original text is needed
//! to rebuild the tree:
//!
//! `$> huffpack -d notes.txt.huf --source notes.txt`
//!
pub mod bitstream;
pub mod compression;
pub mod huffman_coding;
pub mod tools;

use std::{fmt::Display, fmt::Formatter, io};

/// Everything that can go wrong while coding.
#[derive(Debug)]
pub enum HuffError {
    /// A stream could not be opened, read or written.
    Io(io::Error),
    /// A textual bit sequence contained something other than '0' or '1'.
    InvalidBit { ch: char, pos: usize },
    /// A symbol reached the encoder that the code table has no code for.
    MissingCode(u8),
    /// Two symbols ended up with codes where one is a prefix of the other (or empty).
    PrefixClash(u8, u8),
    /// The first byte of a packed stream holds no padding terminator.
    BadPadding,
    /// The packed payload ended part way down the tree.
    TruncatedCode,
    /// A tree needs at least two frequency entries.
    TooFewEntries(usize),
    /// A frequency list handed to the tree builder held an entry without a symbol.
    UnlabelledEntry(usize),
    /// An input symbol does not fit the configured alphabet.
    SymbolOutOfRange { symbol: u8, alphabet: usize },
    /// Alphabets hold between 2 and 256 symbols.
    InvalidAlphabet(usize),
}

impl Display for HuffError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {}", e),
            Self::InvalidBit { ch, pos } => {
                write!(f, "invalid character {:?} at bit {} of bit string", ch, pos)
            }
            Self::MissingCode(sym) => write!(f, "no code for symbol {}", sym),
            Self::PrefixClash(a, b) => {
                write!(f, "code of symbol {} clashes with code of symbol {}", a, b)
            }
            Self::BadPadding => write!(f, "packed data has no padding terminator"),
            Self::TruncatedCode => write!(f, "packed data ends inside a code"),
            Self::TooFewEntries(n) => {
                write!(f, "need at least 2 frequency entries to build a tree, got {}", n)
            }
            Self::UnlabelledEntry(i) => write!(f, "frequency entry {} has no symbol", i),
            Self::SymbolOutOfRange { symbol, alphabet } => {
                write!(f, "symbol {} is outside the {} symbol alphabet", symbol, alphabet)
            }
            Self::InvalidAlphabet(size) => {
                write!(f, "alphabet size {} is not in 2..=256", size)
            }
        }
    }
}

impl std::error::Error for HuffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl HuffError {
    /// True for errors that point at corrupt packed data (or the wrong tree).
    pub fn is_format(&self) -> bool {
        matches!(self, Self::BadPadding | Self::TruncatedCode)
    }

    /// True for errors that indicate a bug in code generation rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InvalidBit { .. } | Self::MissingCode(_) | Self::PrefixClash(..)
        )
    }
}

impl From<io::Error> for HuffError {
    fn from(e: io::Error) -> Self {
        HuffError::Io(e)
    }
}

impl From<HuffError> for io::Error {
    fn from(e: HuffError) -> Self {
        match e {
            HuffError::Io(e) => e,
            e if e.is_format() => io::Error::new(io::ErrorKind::InvalidData, e),
            e => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}

pub type HuffResult<T> = Result<T, HuffError>;
