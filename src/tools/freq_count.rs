//! Frequency analysis of a symbol stream.
//!
//! Counts how often each symbol of the alphabet occurs and turns the counts into a list of
//! probabilities sorted the way the tree builder expects them.

use std::cmp::Ordering;

use log::debug;

use super::data_in::SymbolSource;
use crate::{HuffError, HuffResult};

/// The range of symbol values a text may use: `0..size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet(usize);

impl Alphabet {
    /// 7-bit text.
    pub const ASCII: Alphabet = Alphabet(128);
    /// Any byte.
    pub const BYTE: Alphabet = Alphabet(256);

    pub fn new(size: usize) -> HuffResult<Self> {
        if (2..=256).contains(&size) {
            Ok(Alphabet(size))
        } else {
            Err(HuffError::InvalidAlphabet(size))
        }
    }

    pub fn size(&self) -> usize {
        self.0
    }

    /// Largest symbol value in the alphabet.
    pub fn max(&self) -> u8 {
        (self.0 - 1) as u8
    }

    pub fn contains(&self, symbol: u8) -> bool {
        (symbol as usize) < self.0
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::ASCII
    }
}

/// A probability, either for a real symbol (a leaf) or for a merged subtree (no symbol).
#[derive(Debug, Clone, Copy)]
pub struct FreqEntry {
    pub symbol: Option<u8>,
    pub prob: f64,
}

impl FreqEntry {
    pub fn leaf(symbol: u8, prob: f64) -> Self {
        FreqEntry {
            symbol: Some(symbol),
            prob,
        }
    }

    pub fn internal(prob: f64) -> Self {
        FreqEntry { symbol: None, prob }
    }

    pub fn is_leaf(&self) -> bool {
        self.symbol.is_some()
    }
}

impl PartialEq for FreqEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FreqEntry {}

impl PartialOrd for FreqEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FreqEntry {
    /// Ascending probability, then ascending symbol. Entries without a symbol sort after
    /// symbol entries of the same probability.
    fn cmp(&self, other: &Self) -> Ordering {
        self.prob
            .total_cmp(&other.prob)
            .then_with(|| match (self.symbol, other.symbol) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

/// Returns the count of every symbol in the alphabet, read from the source to its end.
pub fn freqs<S: SymbolSource>(source: &mut S, alphabet: Alphabet) -> HuffResult<Vec<u64>> {
    let mut counts = vec![0_u64; alphabet.size()];
    while let Some(sym) = source.read_symbol()? {
        if !alphabet.contains(sym) {
            return Err(HuffError::SymbolOutOfRange {
                symbol: sym,
                alphabet: alphabet.size(),
            });
        }
        counts[sym as usize] += 1;
    }
    Ok(counts)
}

/// Turn symbol counts into the sorted frequency list.
///
/// A single distinct symbol gets a zero probability companion so the tree always has an
/// internal root: the next symbol value, or symbol 0 when the symbol is the alphabet's
/// last. All-zero counts give an empty list.
pub fn sorted_entries(counts: &[u64], alphabet: Alphabet) -> Vec<FreqEntry> {
    let total: u64 = counts.iter().sum();
    let mut entries: Vec<FreqEntry> = counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0)
        .map(|(sym, &c)| FreqEntry::leaf(sym as u8, c as f64 / total as f64))
        .collect();

    if entries.len() == 1 {
        if let Some(only) = entries[0].symbol {
            let sentinel = if only == alphabet.max() { 0 } else { only + 1 };
            debug!("Single symbol {} in input, adding sentinel {}", only, sentinel);
            entries.push(FreqEntry::leaf(sentinel, 0.0));
        }
    }

    entries.sort();
    entries
}

/// Scan a symbol stream and return its sorted frequency list.
///
/// The stream must hold at least one symbol. An empty stream yields an empty list, which
/// the tree builder then refuses.
pub fn freq_table<S: SymbolSource>(
    source: &mut S,
    alphabet: Alphabet,
) -> HuffResult<Vec<FreqEntry>> {
    let counts = freqs(source, alphabet)?;
    let entries = sorted_entries(&counts, alphabet);
    debug!(
        "Counted {} symbols, {} table entries",
        counts.iter().sum::<u64>(),
        entries.len()
    );
    Ok(entries)
}
