//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{error, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use shuff::tools::cli::{huffopts_init, HuffOpts, Mode, Output};
use shuff::{compress, compress_file, decompress_file, decompress_to_file, HuffError, Result};

const SUFFIX: &str = "huf";

fn main() -> ExitCode {
    // Available log levels are Error, Warn, Info, Debug, Trace. The level actually shown is
    // set from the command line. Logs go to stderr so --stdout output stays clean.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Logging unavailable: {}", e);
    }

    let opts = huffopts_init();
    if opts.files.is_empty() {
        error!("No input files given. Try --help.");
        return ExitCode::FAILURE;
    }

    //----- Figure how what we need to do and go do it
    let mut failed = 0;
    for file in &opts.files {
        let src = Path::new(file);
        let result = match opts.op_mode {
            Mode::Zip => zip(&opts, src),
            Mode::Unzip => unzip(&opts, src),
            Mode::Test => test(src),
        };
        if let Err(e) = result {
            error!("{}: {}", file, e);
            failed += 1;
        }
    }

    info!("Done.");
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Compress one file to NAME.huf (or stdout).
fn zip(opts: &HuffOpts, src: &Path) -> Result<()> {
    let input = fs::read(src).map_err(|source| HuffError::SourceUnreadable {
        path: src.to_path_buf(),
        source,
    })?;

    match opts.output {
        Output::Stdout => write_stdout(&compress(&input)?)?,
        Output::File => {
            let dest = zipped_name(src);
            check_overwrite(opts, &dest)?;
            let report = compress_file(&input, &dest)?;
            info!(
                "{}: {} symbols, longest code {} bits, {:.3}:1.",
                src.display(),
                report.symbols,
                report.longest_code,
                report.original_len as f64 / report.compressed_len as f64
            );
            remove_input(opts, src);
        }
    }
    Ok(())
}

/// Decompress one file to NAME without .huf (or stdout).
fn unzip(opts: &HuffOpts, src: &Path) -> Result<()> {
    match opts.output {
        Output::Stdout => write_stdout(&decompress_file(src)?)?,
        Output::File => {
            let dest = unzipped_name(src);
            check_overwrite(opts, &dest)?;
            decompress_to_file(src, &dest)?;
            remove_input(opts, src);
        }
    }
    Ok(())
}

/// Decode one file and discard the result.
fn test(src: &Path) -> Result<()> {
    let output = decompress_file(src)?;
    info!("{}: ok, {} bytes.", src.display(), output.len());
    Ok(())
}

fn write_stdout(data: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(data)
        .and_then(|_| stdout.flush())
        .map_err(|source| HuffError::DestinationUnwritable {
            path: PathBuf::from("-"),
            source,
        })
}

fn check_overwrite(opts: &HuffOpts, dest: &Path) -> Result<()> {
    if dest.exists() && !opts.force_overwrite {
        return Err(HuffError::DestinationUnwritable {
            path: dest.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "output file exists, use --force to overwrite",
            ),
        });
    }
    Ok(())
}

fn remove_input(opts: &HuffOpts, src: &Path) {
    if !opts.keep_input_files {
        if let Err(e) = fs::remove_file(src) {
            warn!("Could not remove {}: {}", src.display(), e);
        }
    }
}

/// NAME -> NAME.huf
fn zipped_name(src: &Path) -> PathBuf {
    let mut name = OsString::from(src.as_os_str());
    name.push(".");
    name.push(SUFFIX);
    PathBuf::from(name)
}

/// NAME.huf -> NAME, anything else -> NAME.out
fn unzipped_name(src: &Path) -> PathBuf {
    if src.extension().map_or(false, |ext| ext == SUFFIX) {
        src.with_extension("")
    } else {
        let mut name = OsString::from(src.as_os_str());
        name.push(".out");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_test() {
        assert_eq!(zipped_name(Path::new("logs/gps.txt")), Path::new("logs/gps.txt.huf"));
        assert_eq!(unzipped_name(Path::new("logs/gps.txt.huf")), Path::new("logs/gps.txt"));
        assert_eq!(unzipped_name(Path::new("gps.bin")), Path::new("gps.bin.out"));
    }

    #[test]
    fn check_overwrite_test() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("x.huf");
        fs::write(&dest, b"old").unwrap();
        let mut opts = HuffOpts::new();
        assert!(check_overwrite(&opts, &dest).is_err());
        opts.force_overwrite = true;
        assert!(check_overwrite(&opts, &dest).is_ok());
    }
}
