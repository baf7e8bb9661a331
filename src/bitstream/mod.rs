//! The bitstream module forms the I/O subsystem of the coder.
//!
//! Codes are collected into a logical `BitString`, which `bitpacker` turns into bytes behind
//! a self-describing padding prefix. `bitreader` reads those bytes back bit by bit, finds
//! the end of the padding, and hands out the payload.
//!
pub mod bitpacker;
pub mod bitreader;
pub mod bitstring;
