//! The tools module provides the helper functions around the Huffman coder.
//!
//! The tools are:
//! - cli: Command line interface and run-time options.
//! - data_in: Sequential symbol input from files or any other reader.
//! - data_out: Output files that only appear once completely written.
//! - freq_count: Symbol frequency count and the sorted probability list.
//!
pub mod cli;
pub mod data_in;
pub mod data_out;
pub mod freq_count;
