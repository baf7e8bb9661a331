use std::{fs::File, io::Read, path::Path};

use log::error;

const BUFFER_SIZE: usize = 64 * 1024;

/// A sequential source of symbols positioned at the start of some input.
pub trait SymbolSource {
    /// True if another symbol can be read.
    fn has_more(&mut self) -> std::io::Result<bool>;
    /// Consume and return the next symbol, or None at the end of the input.
    fn read_symbol(&mut self) -> std::io::Result<Option<u8>>;
}

#[derive(Debug)]
/// Struct used for reading symbols. Reads the underlying source a buffer at a time.
pub struct SymbolReader<R> {
    source: R,
    buf: Vec<u8>,
    cursor: usize,
    filled: usize,
    symbols_read: usize,
}

impl<R: Read> SymbolReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buf: vec![0; BUFFER_SIZE],
            cursor: 0,
            filled: 0,
            symbols_read: 0,
        }
    }

    /// Number of symbols handed out so far.
    pub fn symbols_read(&self) -> usize {
        self.symbols_read
    }

    /// Refill the buffer once it is used up. Returns false when the source is exhausted.
    fn have_data(&mut self) -> std::io::Result<bool> {
        if self.cursor < self.filled {
            return Ok(true);
        }
        loop {
            match self.source.read(&mut self.buf) {
                Ok(n) => {
                    self.cursor = 0;
                    self.filled = n;
                    return Ok(n > 0);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl SymbolReader<File> {
    /// Open a named file for reading symbols. The file is closed when the reader drops.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        match File::open(path) {
            Ok(f) => Ok(Self::new(f)),
            Err(e) => {
                error!("Cannot read from the file {}", path.display());
                Err(e)
            }
        }
    }
}

impl<R: Read> SymbolSource for SymbolReader<R> {
    fn has_more(&mut self) -> std::io::Result<bool> {
        self.have_data()
    }

    fn read_symbol(&mut self) -> std::io::Result<Option<u8>> {
        if !self.have_data()? {
            return Ok(None);
        }
        let sym = self.buf[self.cursor];
        self.cursor += 1;
        self.symbols_read += 1;
        Ok(Some(sym))
    }
}

#[cfg(test)]
mod test {
    use super::{SymbolReader, SymbolSource};

    #[test]
    fn read_all_test() {
        let mut sr = SymbolReader::new("abc".as_bytes());
        assert!(sr.has_more().unwrap());
        assert_eq!(sr.read_symbol().unwrap(), Some(b'a'));
        assert_eq!(sr.read_symbol().unwrap(), Some(b'b'));
        assert_eq!(sr.read_symbol().unwrap(), Some(b'c'));
        assert!(!sr.has_more().unwrap());
        assert_eq!(sr.read_symbol().unwrap(), None);
        assert_eq!(sr.symbols_read(), 3);
    }

    #[test]
    fn empty_source_test() {
        let mut sr = SymbolReader::new([].as_slice());
        assert!(!sr.has_more().unwrap());
        assert_eq!(sr.read_symbol().unwrap(), None);
    }

    #[test]
    fn spans_buffer_refill_test() {
        let data = vec![b'x'; super::BUFFER_SIZE + 10];
        let mut sr = SymbolReader::new(data.as_slice());
        let mut count = 0;
        while let Some(sym) = sr.read_symbol().unwrap() {
            assert_eq!(sym, b'x');
            count += 1;
        }
        assert_eq!(count, data.len());
    }
}
