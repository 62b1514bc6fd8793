use clap::Parser;
use log::info;
use std::{fmt::Display, fmt::Formatter};

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Off,
            Verbosity::Errors => log::LevelFilter::Error,
            Verbosity::Warnings => log::LevelFilter::Warn,
            Verbosity::Info => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
            Verbosity::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug)]
pub struct HuffOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Don't remove input files after processing
    pub keep_input_files: bool,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force_overwrite: false,
            keep_input_files: false,
            op_mode: Mode::Zip,
            output: Output::File,
            verbose: Verbosity::Errors,
        }
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Static Huffman compressor for data logs",
    long_about = "
    Compresses each file with a single static Huffman table stored at the front of the
    output. Compressing NAME writes NAME.huf; decompressing NAME.huf writes NAME."
)]
pub struct Args {
    /// Files to process
    #[clap()]
    files: Vec<String>,

    /// Compress the input files (default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Test compressed file integrity
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Keep (don't delete) input files
    #[clap(short = 'k', long = "keep")]
    keep: bool,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to standard out
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Suppress all log output
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Be verbose (repeat for more)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u8,
}

impl From<Args> for HuffOpts {
    fn from(args: Args) -> Self {
        let op_mode = if args.test {
            Mode::Test
        } else if args.decompress {
            Mode::Unzip
        } else {
            Mode::Zip
        };
        let verbose = if args.quiet {
            Verbosity::Quiet
        } else {
            match args.verbose {
                0 => Verbosity::Errors,
                1 => Verbosity::Warnings,
                2 => Verbosity::Info,
                3 => Verbosity::Debug,
                _ => Verbosity::Trace,
            }
        };
        HuffOpts {
            files: args.files,
            force_overwrite: args.force,
            keep_input_files: args.keep,
            op_mode,
            output: if args.stdout {
                Output::Stdout
            } else {
                Output::File
            },
            verbose,
        }
    }
}

/// Parse the command line, set the log level and report the options in use.
pub fn huffopts_init() -> HuffOpts {
    let opts = HuffOpts::from(Args::parse());
    log::set_max_level(opts.verbose.level_filter());

    info!("---- Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Output set to {}", opts.output);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if opts.keep_input_files {
        info!("Keeping input files")
    };
    info!("---- Initialization End ----");
    opts
}

#[cfg(test)]
mod test {
    use super::*;

    fn opts(args: &[&str]) -> HuffOpts {
        HuffOpts::from(Args::try_parse_from(args).unwrap())
    }

    #[test]
    fn defaults_test() {
        let o = opts(&["shuff", "trace.log"]);
        assert_eq!(o.files, vec!["trace.log".to_string()]);
        assert_eq!(o.op_mode, Mode::Zip);
        assert_eq!(o.output, Output::File);
        assert_eq!(o.verbose, Verbosity::Errors);
        assert!(!o.keep_input_files);
        assert!(!o.force_overwrite);
    }

    #[test]
    fn combined_flags_test() {
        let o = opts(&["shuff", "-dkfc", "-vvv", "a.huf", "b.huf"]);
        assert_eq!(o.op_mode, Mode::Unzip);
        assert_eq!(o.output, Output::Stdout);
        assert_eq!(o.verbose, Verbosity::Debug);
        assert!(o.keep_input_files);
        assert!(o.force_overwrite);
        assert_eq!(o.files.len(), 2);
    }

    #[test]
    fn test_mode_and_quiet_test() {
        let o = opts(&["shuff", "--test", "-q", "-v", "a.huf"]);
        assert_eq!(o.op_mode, Mode::Test);
        assert_eq!(o.verbose, Verbosity::Quiet);
        assert_eq!(o.verbose.level_filter(), log::LevelFilter::Off);
    }

    // -vvvv must reach trace! in release builds too, so nothing may be compiled out.
    #[test]
    fn trace_level_compiled_in_test() {
        let o = opts(&["shuff", "-vvvv", "a"]);
        assert_eq!(o.verbose, Verbosity::Trace);
        assert!(o.verbose.level_filter() <= log::STATIC_MAX_LEVEL);
    }
}
