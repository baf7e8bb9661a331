use std::{
    ffi::OsString,
    fmt::Display,
    fmt::Formatter,
    path::{Path, PathBuf},
};

use clap::Parser;
use log::{info, warn};

use super::freq_count::Alphabet;
use crate::{HuffError, HuffResult};

/// Extension added to packed files.
pub const PACKED_EXT: &str = "huf";
/// Extension added to decoded files when no output name is given.
pub const DECODED_EXT: &str = "out";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Zip, Unzip, Test
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Huffman coding file compressor",
    long_about = "
    Compresses a text file with a Huffman code built from its own symbol frequencies.
    The packed file holds no code table, so decompressing needs the original text
    (--source) to rebuild the same tree."
)]
pub struct Args {
    /// Filename of file to process
    #[clap()]
    filename: Option<String>,

    /// Perform compression on the input file
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Compress and decompress in memory and compare with the input
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Name of the output file
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Original text used to rebuild the code tree when decompressing
    #[clap(short = 's', long = "source")]
    source: Option<String>,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Number of symbols in the alphabet, 2..=256
    #[clap(short = 'a', long = "alphabet", default_value_t = 128)]
    alphabet: usize,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

#[derive(Debug)]
/// Defines all user settable options to control program behavior
pub struct HuffOpts {
    /// Optional name of file to read for input
    pub file: Option<PathBuf>,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Output file, derived from the input name when not given
    pub output: Option<PathBuf>,
    /// Text to rebuild the tree from when decompressing
    pub source: Option<PathBuf>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Symbol range of the input text
    pub alphabet: Alphabet,
    /// Log level
    pub verbose: log::LevelFilter,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            file: None,
            op_mode: Mode::Zip,
            output: None,
            source: None,
            force_overwrite: false,
            alphabet: Alphabet::ASCII,
            verbose: log::LevelFilter::Info,
        }
    }

    /// Copy parsed command line arguments into the options.
    pub fn from_args(args: Args) -> HuffResult<Self> {
        let mut opts = Self::new();
        opts.file = args.filename.map(PathBuf::from);
        if args.compress {
            opts.op_mode = Mode::Zip
        };
        if args.decompress {
            opts.op_mode = Mode::Unzip
        };
        if args.test {
            opts.op_mode = Mode::Test
        };
        opts.output = args.output.map(PathBuf::from);
        opts.source = args.source.map(PathBuf::from);
        opts.force_overwrite = args.force;
        opts.alphabet = Alphabet::new(args.alphabet)?;
        opts.verbose = match args.v {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Error,
            2 => log::LevelFilter::Warn,
            3 => log::LevelFilter::Info,
            4 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        Ok(opts)
    }

    /// The input file, which every mode needs.
    pub fn input(&self) -> HuffResult<&Path> {
        self.file.as_deref().ok_or_else(|| {
            HuffError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "no input file given",
            ))
        })
    }

    /// Where the result goes: the explicit output, `<file>.huf` when compressing, or the
    /// source text name plus `.out` when decompressing.
    pub fn output_path(&self) -> HuffResult<PathBuf> {
        if let Some(out) = &self.output {
            return Ok(out.clone());
        }
        match self.op_mode {
            Mode::Unzip => Ok(add_ext(&strip_packed_ext(self.input()?)?, DECODED_EXT)),
            Mode::Zip | Mode::Test => Ok(add_ext(self.input()?, PACKED_EXT)),
        }
    }

    /// The text the decoding tree is rebuilt from: the explicit source, or the input name
    /// without its `.huf` extension.
    pub fn source_path(&self) -> HuffResult<PathBuf> {
        match &self.source {
            Some(source) => Ok(source.clone()),
            None => strip_packed_ext(self.input()?),
        }
    }

    /// Refuse to replace an existing file unless forced.
    pub fn check_overwrite(&self, path: &Path) -> HuffResult<()> {
        if path.exists() {
            if !self.force_overwrite {
                return Err(HuffError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("{} already exists, use --force to overwrite", path.display()),
                )));
            }
            warn!("Overwriting {}", path.display());
        }
        Ok(())
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// `name.ext` from `name`, keeping any existing extension.
fn add_ext(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn strip_packed_ext(path: &Path) -> HuffResult<PathBuf> {
    if path.extension().map_or(false, |e| e == PACKED_EXT) {
        Ok(path.with_extension(""))
    } else {
        Err(HuffError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "{} does not end in .{}, name the original text with --source",
                path.display(),
                PACKED_EXT
            ),
        )))
    }
}

/// Parse the command line, set the log level and report the settings.
pub fn huffopts_init() -> HuffResult<HuffOpts> {
    let opts = HuffOpts::from_args(Args::parse())?;
    log::set_max_level(opts.verbose);

    // Below we report initialization status to the user
    info!("---- Huffpack Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    match &opts.file {
        Some(s) => info!("Getting input from the file {}", s.display()),
        None => warn!("No input file given"),
    }
    info!("Alphabet size set to {}", opts.alphabet.size());
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    info!("---- Huffpack Initialization End ----\n");
    Ok(opts)
}

#[cfg(test)]
mod test {
    use super::*;

    fn opts(args: &[&str]) -> HuffOpts {
        let args = Args::try_parse_from(std::iter::once("huffpack").chain(args.iter().copied()))
            .unwrap();
        HuffOpts::from_args(args).unwrap()
    }

    #[test]
    fn defaults_test() {
        let o = opts(&["notes.txt"]);
        assert_eq!(o.op_mode, Mode::Zip);
        assert_eq!(o.alphabet, Alphabet::ASCII);
        assert_eq!(o.verbose, log::LevelFilter::Info);
        assert_eq!(o.output_path().unwrap(), PathBuf::from("notes.txt.huf"));
    }

    #[test]
    fn decompress_paths_test() {
        let o = opts(&["-d", "dir/notes.txt.huf"]);
        assert_eq!(o.op_mode, Mode::Unzip);
        assert_eq!(o.source_path().unwrap(), PathBuf::from("dir/notes.txt"));
        assert_eq!(o.output_path().unwrap(), PathBuf::from("dir/notes.txt.out"));

        let o = opts(&["-d", "packed.bin", "--source", "orig.txt", "-o", "back.txt"]);
        assert_eq!(o.source_path().unwrap(), PathBuf::from("orig.txt"));
        assert_eq!(o.output_path().unwrap(), PathBuf::from("back.txt"));

        assert!(opts(&["-d", "packed.bin"]).source_path().is_err());
    }

    #[test]
    fn flags_test() {
        let o = opts(&["-t", "-f", "-a", "256", "-v", "5", "x"]);
        assert_eq!(o.op_mode, Mode::Test);
        assert!(o.force_overwrite);
        assert_eq!(o.alphabet, Alphabet::BYTE);
        assert_eq!(o.verbose, log::LevelFilter::Trace);
    }

    #[test]
    fn bad_alphabet_test() {
        let args = Args::try_parse_from(["huffpack", "-a", "1", "x"]).unwrap();
        assert!(matches!(
            HuffOpts::from_args(args),
            Err(HuffError::InvalidAlphabet(1))
        ));
    }

    #[test]
    fn missing_input_test() {
        assert!(HuffOpts::new().input().is_err());
    }

    #[test]
    fn check_overwrite_test() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("there.huf");
        std::fs::write(&existing, b"x").unwrap();
        let mut o = HuffOpts::new();
        assert!(o.check_overwrite(&dir.path().join("absent")).is_ok());
        assert!(o.check_overwrite(&existing).is_err());
        o.force_overwrite = true;
        assert!(o.check_overwrite(&existing).is_ok());
    }
}
