//! The compression module drives the coder over whole texts and files.
//!
//! Compression happens in the following steps:
//! - Frequency count: read the text once and sort its symbols by probability.
//! - Tree build: merge the lightest nodes until one root is left.
//! - Code table: the path from the root to each leaf is that symbol's code.
//! - Encoding: read the text a second time and concatenate the codes.
//! - Packing: put the padding prefix in front and pack the bits into bytes.
//!
//! Decompression unpacks the bytes, drops the padding and walks the tree one bit at a time,
//! emitting a symbol at each leaf and starting again from the root. It needs the same tree
//! that encoded the data; the packed format does not carry it.
//!

pub mod compress;
pub mod decompress;
