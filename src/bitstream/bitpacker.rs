use log::{debug, error};

use super::bitstring::BitString;
use crate::HuffResult;

/// Creates a packed bitstream for output, most significant bit first.
pub struct BitPacker {
    pub output: Vec<u8>,
    pub last_bits: u8,
    queue: u64,
    q_bits: u8,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of the size specified (in bytes). Call
    /// flush() to flush the bit queue to the buffer before using the output.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            last_bits: 0,
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /*
    NOTE: out24 takes a u32.  The 8 most significant bits of the word indicate how
    many of the least significant bits will be written. Those bits must be aligned to
    the least signficant bit. (The middle bits are masked out.)

    Eg 0000100_00000000_00000000_00000010 writes out 0010.
    */
    /// Writes 0-24 bits encoded with the number of bits to write in the most
    /// significant byte of a 32 bit word.
    pub fn out24(&mut self, data: u32) {
        let depth = (data >> 24) as u8; //get bit length by shifting out the 24 data bits
        if depth == 0 {
            return;
        }
        self.queue <<= depth; //shift queue by bit length
        self.queue |= (data & (0xffffffff >> (32 - depth))) as u64; //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.write_stream();
    }

    /// Puts a single bit on the stream.
    pub fn out_bit(&mut self, bit: bool) {
        self.queue = (self.queue << 1) | bit as u64;
        self.q_bits += 1;
        self.write_stream();
    }

    /// Puts every bit of a logical bit sequence on the stream.
    pub fn out_bits(&mut self, bits: &BitString) {
        bits.iter().for_each(|bit| self.out_bit(bit));
    }

    /// Flushes the remaining bits (1-7) from the buffer, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        self.last_bits = self.q_bits % 8;
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        let bits = (self.output.len() * 8) + self.q_bits as usize;
        format!("[{}.{}]", bits / 8, bits % 8)
    }
}

/// Number of padding bits placed in front of a payload of `len` bits: always 1..=8.
pub fn padding_len(len: usize) -> u8 {
    8 - (len % 8) as u8
}

/// Pack a logical bit sequence into bytes behind its padding prefix.
///
/// The prefix is `p-1` zero bits and a one bit, with `p` chosen so the total is a whole
/// number of bytes. A payload that is already byte aligned still gets a full prefix byte.
pub fn pack(bits: &BitString) -> Vec<u8> {
    let pad = padding_len(bits.len());
    let mut bp = BitPacker::new((bits.len() + pad as usize) / 8);
    // p bits whose value is 1: p-1 zeros then the terminator
    bp.out24((pad as u32) << 24 | 1);
    bp.out_bits(bits);
    bp.flush();
    if bp.last_bits != 0 {
        error!("Packed stream ended {} bits past a byte boundary", bp.last_bits);
    }
    debug!("Packed {} bits with {} padding bits into {}", bits.len(), pad, bp.loc());
    bp.output
}

/// Parse a textual bit sequence and pack it. Characters other than '0' and '1' are
/// rejected before anything is packed.
pub fn pack_str(text: &str) -> HuffResult<Vec<u8>> {
    let bits: BitString = text.parse()?;
    Ok(pack(&bits))
}
