use std::io::Write;
use std::path::Path;

use log::{debug, info};

use crate::bitstream::bitpacker::pack;
use crate::bitstream::bitstring::BitString;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::{build_tree, HuffTree};
use crate::tools::cli::HuffOpts;
use crate::tools::data_in::{SymbolReader, SymbolSource};
use crate::tools::data_out::OutFile;
use crate::tools::freq_count::{freq_table, Alphabet};
use crate::{HuffError, HuffResult};

/// Concatenate the code of every symbol in the source, in stream order.
pub fn encode_bits<S: SymbolSource>(table: &CodeTable, source: &mut S) -> HuffResult<BitString> {
    let mut bits = BitString::new();
    while let Some(sym) = source.read_symbol()? {
        let code = table.get(sym).ok_or(HuffError::MissingCode(sym))?;
        bits.extend_from(code);
    }
    Ok(bits)
}

/// Encode a symbol stream with the table and pack the result.
pub fn encode<S: SymbolSource>(table: &CodeTable, source: &mut S) -> HuffResult<Vec<u8>> {
    let bits = encode_bits(table, source)?;
    debug!("Encoded {} bits", bits.len());
    Ok(pack(&bits))
}

/// Build the tree for an in-memory text and encode the text with it.
pub fn compress_bytes(text: &[u8], alphabet: Alphabet) -> HuffResult<(HuffTree, Vec<u8>)> {
    let list = freq_table(&mut SymbolReader::new(text), alphabet)?;
    let tree = build_tree(&list)?;
    let table = CodeTable::from_tree(&tree);
    table.validate()?;
    let packed = encode(&table, &mut SymbolReader::new(text))?;
    Ok((tree, packed))
}

/// Compress a text file into a packed file and return the tree needed to decode it.
///
/// The text is read twice, once to count symbols and once to encode them. The packed file
/// only appears once it has been completely written.
pub fn encode_file(text: &Path, packed: &Path, alphabet: Alphabet) -> HuffResult<HuffTree> {
    info!("Counting symbols in {}", text.display());
    let list = {
        let mut sr = SymbolReader::open(text)?;
        let list = freq_table(&mut sr, alphabet)?;
        info!("Read {} symbols", sr.symbols_read());
        list
    };
    let tree = build_tree(&list)?;
    let table = CodeTable::from_tree(&tree);
    table.validate()?;

    info!("Encoding {} into {}", text.display(), packed.display());
    let bytes = {
        let mut sr = SymbolReader::open(text)?;
        encode(&table, &mut sr)?
    };

    let mut out = OutFile::create(packed)?;
    out.write_all(&bytes)?;
    out.commit()?;
    info!("Wrote {} bytes", bytes.len());
    Ok(tree)
}

/// Compress the input file named in opts.
pub fn compress(opts: &HuffOpts) -> HuffResult<()> {
    let input = opts.input()?;
    let output = opts.output_path()?;
    opts.check_overwrite(&output)?;
    encode_file(input, &output, opts.alphabet)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bitstream::bitreader::unpack;

    fn table_for(text: &str) -> CodeTable {
        let list = freq_table(&mut SymbolReader::new(text.as_bytes()), Alphabet::ASCII).unwrap();
        CodeTable::from_tree(&build_tree(&list).unwrap())
    }

    #[test]
    fn aabbbcccc_test() {
        let (_, packed) = compress_bytes(b"aabbbcccc", Alphabet::ASCII).unwrap();
        // "01" padding, then 10 10 11 11 11 0 0 0 0
        assert_eq!(packed, vec![0b0110_1011, 0b1111_0000]);
        assert_eq!(unpack(&packed).unwrap().to_string(), "10101111110000");
    }

    #[test]
    fn single_symbol_test() {
        let (_, packed) = compress_bytes(b"aaaa", Alphabet::ASCII).unwrap();
        assert_eq!(packed, vec![0b0001_1111]);
    }

    #[test]
    fn encode_bits_test() {
        let table = table_for("aabbbcccc");
        let bits = encode_bits(&table, &mut SymbolReader::new("cab".as_bytes())).unwrap();
        assert_eq!(bits.to_string(), "01011");
    }

    #[test]
    fn missing_code_test() {
        let table = table_for("aabbbcccc");
        match encode(&table, &mut SymbolReader::new("abz".as_bytes())) {
            Err(e @ HuffError::MissingCode(b'z')) => assert!(e.is_internal()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_text_test() {
        assert!(matches!(
            compress_bytes(b"", Alphabet::ASCII),
            Err(HuffError::TooFewEntries(0))
        ));
    }

    #[test]
    fn encode_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("in.txt");
        let packed = dir.path().join("in.txt.huf");
        std::fs::write(&text, "aabbbcccc").unwrap();
        let tree = encode_file(&text, &packed, Alphabet::ASCII).unwrap();
        assert_eq!(std::fs::read(&packed).unwrap(), vec![0b0110_1011, 0b1111_0000]);
        assert_eq!(tree.leaves(), vec![(b'c', 1), (b'a', 2), (b'b', 2)]);
    }

    #[test]
    fn encode_file_missing_input_test() {
        let dir = tempfile::tempdir().unwrap();
        let packed = dir.path().join("nothing.huf");
        let result = encode_file(&dir.path().join("nothing"), &packed, Alphabet::ASCII);
        assert!(matches!(result, Err(HuffError::Io(_))));
        assert!(!packed.exists());
    }

    #[test]
    fn encode_file_bad_symbol_leaves_no_output_test() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("in.bin");
        let packed = dir.path().join("in.bin.huf");
        std::fs::write(&text, [b'a', 0xe9, b'b']).unwrap();
        let result = encode_file(&text, &packed, Alphabet::ASCII);
        assert!(matches!(result, Err(HuffError::SymbolOutOfRange { symbol: 0xe9, .. })));
        assert!(!packed.exists());
        // the same bytes are fine over the full byte alphabet
        assert!(encode_file(&text, &packed, Alphabet::BYTE).is_ok());
    }
}
