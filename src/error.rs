//! Error types for the static Huffman codec.
//!
//! Every public operation returns a [`HuffError`]. Each variant maps to one
//! failure kind a caller may want to react to differently: the source could not
//! be read, the destination could not be written, the header is malformed, the
//! payload ran out before the declared symbol count, or the alphabet cannot be
//! expressed in the file format.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for compress/decompress calls.
#[derive(Debug, Error)]
pub enum HuffError {
    /// The input file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be created or written.
    #[error("cannot write {path}: {source}")]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dictionary header is inconsistent or corrupt.
    #[error("malformed header: {0}")]
    MalformedHeader(#[from] HeaderError),

    /// Fewer payload bits than the declared symbol count requires.
    #[error("truncated payload: expected {expected} symbols, decoded {decoded}")]
    TruncatedPayload { expected: u64, decoded: u64 },

    /// More distinct symbols, or a longer code, than the header can describe.
    #[error("unrepresentable alphabet: {symbols} symbols, longest code {longest_code} bits")]
    UnrepresentableAlphabet { symbols: usize, longest_code: usize },

    /// A payload bit led off the reconstructed tree.
    #[error("invalid huffman code at bit position {position}")]
    InvalidCode { position: u64 },
}

/// Reasons a header is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("bad magic {0:?}")]
    BadMagic([u8; 3]),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),

    #[error("header ends at byte {at}, {needed} more byte(s) needed")]
    Truncated { at: usize, needed: usize },

    #[error("declared {0} symbols, at most 256 are possible")]
    TooManySymbols(u16),

    #[error("symbol {0:#04x} has a zero-length code")]
    ZeroLengthCode(u8),

    #[error("symbol {0:#04x} appears more than once")]
    DuplicateSymbol(u8),

    #[error("code for symbol {0:#04x} conflicts with an earlier code")]
    PrefixConflict(u8),

    #[error("code for symbol {0:#04x} has nonzero padding bits")]
    CodePadding(u8),

    #[error("empty dictionary but {0} symbols declared")]
    MissingDictionary(u64),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, HuffError>;
