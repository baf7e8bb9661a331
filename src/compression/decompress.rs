use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::{error, info, trace};

use super::compress::compress_bytes;
use crate::bitstream::bitreader::{skip_padding, BitReader};
use crate::bitstream::bitstring::BitString;
use crate::huffman_coding::huffman::{build_tree, HuffTree, Node, NodeData};
use crate::tools::cli::HuffOpts;
use crate::tools::data_in::SymbolReader;
use crate::tools::data_out::OutFile;
use crate::tools::freq_count::freq_table;
use crate::{HuffError, HuffResult};

const OUT_CHUNK: usize = 64 * 1024;

/// Walks the tree one bit at a time and emits a symbol at every leaf.
struct Walker<'a> {
    tree: &'a HuffTree,
    node: &'a Node,
    depth: usize,
}

impl<'a> Walker<'a> {
    fn new(tree: &'a HuffTree) -> Self {
        Self {
            tree,
            node: tree.root(),
            depth: 0,
        }
    }

    /// Step down one edge: 0 goes left, 1 goes right.
    fn step(&mut self, bit: bool) -> Option<u8> {
        let node: &'a Node = self.node;
        if let NodeData::Kids(left, right) = &node.node_data {
            self.node = if bit { right.as_ref() } else { left.as_ref() };
            self.depth += 1;
        }
        if let NodeData::Leaf(sym) = self.node.node_data {
            self.node = self.tree.root();
            self.depth = 0;
            return Some(sym);
        }
        None
    }

    /// Every bit must be used up by a complete code.
    fn finish(&self) -> HuffResult<()> {
        if self.depth != 0 {
            error!("Packed data ends {} bits into a code", self.depth);
            return Err(HuffError::TruncatedCode);
        }
        Ok(())
    }
}

/// Decode a logical bit sequence (padding already removed).
pub fn decode_bits(bits: &BitString, tree: &HuffTree) -> HuffResult<Vec<u8>> {
    let mut walker = Walker::new(tree);
    let out = bits.iter().filter_map(|bit| walker.step(bit)).collect();
    walker.finish()?;
    Ok(out)
}

/// Decode a packed stream from any reader into any writer. Returns the number of
/// symbols written.
pub fn decode_stream<R: Read, W: Write>(
    source: R,
    tree: &HuffTree,
    sink: &mut W,
) -> HuffResult<usize> {
    let mut br = BitReader::new(source);
    skip_padding(&mut br)?;

    let mut walker = Walker::new(tree);
    let mut out = Vec::with_capacity(OUT_CHUNK);
    let mut written = 0;
    while let Some(bit) = br.bit()? {
        if let Some(sym) = walker.step(bit) {
            out.push(sym);
            if out.len() == OUT_CHUNK {
                sink.write_all(&out)?;
                written += out.len();
                out.clear();
            }
        }
    }
    walker.finish()?;
    sink.write_all(&out)?;
    written += out.len();
    trace!("Decoded {} symbols ending at {}", written, br.loc());
    Ok(written)
}

/// Decode packed bytes with the tree that encoded them.
pub fn decode(packed: &[u8], tree: &HuffTree) -> HuffResult<Vec<u8>> {
    let mut out = Vec::with_capacity(packed.len() * 2);
    decode_stream(packed, tree, &mut out)?;
    Ok(out)
}

/// Decode a packed file into a text file. The text file only appears once decoding
/// succeeds.
pub fn decode_file(packed: &Path, tree: &HuffTree, text: &Path) -> HuffResult<usize> {
    info!("Decoding {} into {}", packed.display(), text.display());
    let fin = match File::open(packed) {
        Ok(f) => f,
        Err(e) => {
            error!("Cannot read from the file {}", packed.display());
            return Err(e.into());
        }
    };
    let mut out = OutFile::create(text)?;
    let count = decode_stream(fin, tree, &mut out)?;
    out.commit()?;
    info!("Wrote {} symbols", count);
    Ok(count)
}

/// Decompress the file named in opts, rebuilding the tree from the source text.
pub fn decompress(opts: &HuffOpts) -> HuffResult<()> {
    let input = opts.input()?;
    let source = opts.source_path()?;
    let output = opts.output_path()?;
    opts.check_overwrite(&output)?;

    info!("Rebuilding the code tree from {}", source.display());
    let list = freq_table(&mut SymbolReader::open(&source)?, opts.alphabet)?;
    let tree = build_tree(&list)?;
    decode_file(input, &tree, &output)?;
    Ok(())
}

/// Compress the input file in memory, decompress it again and compare.
pub fn verify(opts: &HuffOpts) -> HuffResult<()> {
    let input = opts.input()?;
    let text = std::fs::read(input)?;
    let (tree, packed) = compress_bytes(&text, opts.alphabet)?;
    let restored = decode(&packed, &tree)?;
    if restored != text {
        error!("{}: decoded text differs from the original", input.display());
        return Err(HuffError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "round trip mismatch",
        )));
    }
    info!("{}: ok", input.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bitstream::bitpacker::pack;
    use crate::compression::compress::encode_file;
    use crate::tools::freq_count::Alphabet;

    fn round_trip(text: &[u8], alphabet: Alphabet) {
        let (tree, packed) = compress_bytes(text, alphabet).unwrap();
        assert_eq!(decode(&packed, &tree).unwrap(), text);
    }

    #[test]
    fn aabbbcccc_test() {
        let (tree, packed) = compress_bytes(b"aabbbcccc", Alphabet::ASCII).unwrap();
        assert_eq!(decode(&packed, &tree).unwrap(), b"aabbbcccc");
        assert_eq!(decode(&[0b0110_1011, 0b1111_0000], &tree).unwrap(), b"aabbbcccc");
    }

    #[test]
    fn round_trip_test() {
        round_trip(b"a", Alphabet::ASCII);
        round_trip(b"aaaa", Alphabet::ASCII);
        round_trip(b"\x7f\x7f\x7f", Alphabet::ASCII);
        round_trip(b"\x00\x00", Alphabet::ASCII);
        round_trip(b"ab", Alphabet::ASCII);
        round_trip(b"abracadabra", Alphabet::ASCII);
        round_trip(
            b"It was the best of times, it was the worst of times.\nLine two\ttabbed.\n",
            Alphabet::ASCII,
        );
        let all: Vec<u8> = (0..=255_u8).chain(0..=127).collect();
        round_trip(&all, Alphabet::BYTE);
    }

    #[test]
    fn long_text_round_trip_test() {
        // long enough to flush the decoder's output chunk more than once
        let text: Vec<u8> = (0..200_000_u64)
            .map(|i| b"etaoin shrdlu"[(i * i % 13) as usize])
            .collect();
        round_trip(&text, Alphabet::ASCII);
    }

    #[test]
    fn decode_bits_test() {
        let (tree, _) = compress_bytes(b"aabbbcccc", Alphabet::ASCII).unwrap();
        let bits: BitString = "0101100".parse().unwrap();
        assert_eq!(decode_bits(&bits, &tree).unwrap(), b"cabcc");
        assert!(decode_bits(&BitString::new(), &tree).unwrap().is_empty());
    }

    #[test]
    fn truncated_code_test() {
        let (tree, _) = compress_bytes(b"aabbbcccc", Alphabet::ASCII).unwrap();
        // a 'c' and then half of the code for 'a'
        let packed = pack(&"01".parse().unwrap());
        match decode(&packed, &tree) {
            Err(e @ HuffError::TruncatedCode) => assert!(e.is_format()),
            other => panic!("unexpected {:?}", other),
        }
        let bits: BitString = "1".parse().unwrap();
        assert!(matches!(decode_bits(&bits, &tree), Err(HuffError::TruncatedCode)));
    }

    #[test]
    fn bad_padding_test() {
        let (tree, _) = compress_bytes(b"aabbbcccc", Alphabet::ASCII).unwrap();
        assert!(matches!(decode(&[0, 0xff], &tree), Err(HuffError::BadPadding)));
        assert!(matches!(decode(&[], &tree), Err(HuffError::BadPadding)));
    }

    #[test]
    fn tree_reuse_test() {
        let (tree, packed) = compress_bytes(b"mississippi", Alphabet::ASCII).unwrap();
        let first = decode(&packed, &tree).unwrap();
        let second = decode(&packed, &tree).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn decode_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("poem.txt");
        let packed = dir.path().join("poem.txt.huf");
        let restored = dir.path().join("poem.txt.out");
        let poem = "Tyger Tyger, burning bright,\nIn the forests of the night;\n";
        std::fs::write(&text, poem).unwrap();

        let tree = encode_file(&text, &packed, Alphabet::ASCII).unwrap();
        let count = decode_file(&packed, &tree, &restored).unwrap();
        assert_eq!(count, poem.len());
        assert_eq!(std::fs::read_to_string(&restored).unwrap(), poem);
    }

    #[test]
    fn decode_file_corrupt_leaves_no_output_test() {
        let dir = tempfile::tempdir().unwrap();
        let packed = dir.path().join("bad.huf");
        let restored = dir.path().join("bad.out");
        std::fs::write(&packed, [0_u8, 0, 0]).unwrap();
        let (tree, _) = compress_bytes(b"aabbbcccc", Alphabet::ASCII).unwrap();
        assert!(matches!(
            decode_file(&packed, &tree, &restored),
            Err(HuffError::BadPadding)
        ));
        assert!(!restored.exists());
        assert!(!crate::tools::data_out::part_path(&restored).exists());
    }
}
