//! The compression module holds the two operations callers use.
//!
//! Compression happens in the following steps:
//! - Frequency count: one histogram over the whole input.
//! - Tree build: greedy merge of the two lightest nodes, with a fixed tie-break.
//! - Code generation: one prefix-free code per byte value present.
//! - Packing: header and dictionary, the symbol count, then every input byte's code, MSB-first.
//!
//! Decompression reads the header, rebuilds the decode tree from the dictionary and walks the
//! payload bit by bit until the declared number of symbols has been produced. Padding bits are
//! never walked.
//!
//! Both directions hold the whole input in memory and run on the calling thread. The file
//! variants write through a temporary file so a failed call never leaves a partial destination.
//!

pub mod compress;
pub mod decompress;
