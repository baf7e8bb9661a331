use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::{debug, error, warn};

/// An output file that only appears under its real name once `commit` succeeds.
///
/// Data goes to a `.part` sibling first. Dropping an uncommitted OutFile removes the
/// partial file, so a failed write never leaves a readable result behind.
#[derive(Debug)]
pub struct OutFile {
    writer: Option<BufWriter<File>>,
    part: PathBuf,
    dest: PathBuf,
}

/// The temporary sibling used while `dest` is being written.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

impl OutFile {
    pub fn create(dest: &Path) -> std::io::Result<Self> {
        let part = part_path(dest);
        let file = match File::create(&part) {
            Ok(f) => f,
            Err(e) => {
                error!("Cannot create the file {}", part.display());
                return Err(e);
            }
        };
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            part,
            dest: dest.to_path_buf(),
        })
    }

    /// Flush everything and move the file to its real name.
    pub fn commit(mut self) -> std::io::Result<()> {
        let writer = match self.writer.take() {
            Some(w) => w,
            None => return Ok(()),
        };
        let result = writer
            .into_inner()
            .map_err(|e| e.into_error())
            .and_then(|file| file.sync_all())
            .and_then(|_| fs::rename(&self.part, &self.dest));
        match result {
            Ok(()) => debug!("Wrote {}", self.dest.display()),
            Err(ref e) => {
                error!("Cannot finish writing {}: {}", self.dest.display(), e);
                let _ = fs::remove_file(&self.part);
            }
        }
        result
    }
}

impl Write for OutFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.writer.as_mut() {
            Some(w) => w.write(buf),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "output already committed",
            )),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for OutFile {
    fn drop(&mut self) {
        // Still holding the writer means commit never ran
        if self.writer.take().is_some() {
            warn!("Discarding incomplete output {}", self.dest.display());
            if let Err(e) = fs::remove_file(&self.part) {
                error!("Cannot remove {}: {}", self.part.display(), e);
            }
        }
    }
}
