//! The huffman module turns a sorted frequency list into a code tree, and the tree into a
//! table of codes.
//!
//! The tree is built with two FIFO queues instead of a priority queue. The leaves go in
//! pre-sorted and merged nodes come out in non-decreasing weight, so taking the lighter
//! front (the leaf on a tie) always joins the two lightest nodes. With that tie rule fixed,
//! the same frequency list always gives the same tree, bit for bit.
//!
//! The tree is read only once built. Encoding uses the code table, decoding walks the tree.
//!

pub mod code_table;
pub mod huffman;
