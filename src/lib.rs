//! Static Huffman compression for small, memory-resident data logs.
//!
//! Provides deterministic, single-pass compression and decompression of byte buffers using
//! one order-0 Huffman model per file. The model travels in the file as a dictionary of
//! (symbol, code) pairs, followed by the number of encoded symbols and the packed payload.
//!
//! Basic usage:
//!
//! ```
//! let log = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47";
//! let packed = shuff::compress(log).unwrap();
//! assert_eq!(shuff::decompress(&packed).unwrap(), log);
//! ```
//!
//! From the command line:
//!
//! `$> shuff -z trace.log`
//!
//! This will compress the file and create the file trace.log.huf.
//! The original file will be deleted unless `-k` is given.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, compress_file, CompressionReport};
pub use compression::decompress::{decompress, decompress_file, decompress_to_file};
pub use error::{HeaderError, HuffError, Result};
pub use huffman_coding::huffman::HuffmanCodec;
