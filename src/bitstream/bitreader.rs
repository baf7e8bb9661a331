//! BitReader: reads a packed bitstream one bit at a time, most significant bit first.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//!

use log::trace;

use super::bitstring::BitString;
use crate::{HuffError, HuffResult};

const BUFFER_SIZE: usize = 64 * 1024;
const BIT_MASK: u8 = 0xff;

/// Reads a packed bitstream.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    filled: usize,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: std::io::Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            filled: 0,
            cursor: 0,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> std::io::Result<bool> {
        // Only try to read more data when the cursor has used up the buffer
        if self.cursor == self.filled {
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                return Ok(false);
            }
            self.filled = size;
            self.cursor = 0;
            self.bit_index = 0;
        }
        Ok(true)
    }

    /// Return the next bit, *true* for 1, or None if there is no more data to read
    pub fn bit(&mut self) -> std::io::Result<Option<bool>> {
        // If bit_index is == 0, check if we have a byte to read. Return None if we have no data
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit =
            (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Ok(Some(bit == 1))
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

/// Consume the padding prefix: zero bits up to and including the first one bit, which
/// must turn up within the first 8 bits.
pub fn skip_padding<R: std::io::Read>(br: &mut BitReader<R>) -> HuffResult<()> {
    for _ in 0..8 {
        match br.bit()? {
            Some(true) => {
                trace!("Payload starts at {}", br.loc());
                return Ok(());
            }
            Some(false) => continue,
            None => break,
        }
    }
    Err(HuffError::BadPadding)
}

/// Expand packed bytes back into the logical bit sequence, without its padding prefix.
pub fn unpack(bytes: &[u8]) -> HuffResult<BitString> {
    let mut br = BitReader::new(bytes);
    skip_padding(&mut br)?;
    let mut bits = BitString::with_capacity(bytes.len() * 8);
    while let Some(bit) = br.bit()? {
        bits.push(bit);
    }
    Ok(bits)
}
