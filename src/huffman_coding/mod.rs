//! The huffman module holds the static order-0 model and the dictionary that carries it
//! inside the file.
//!
//! One frequency table is counted over the whole input, one tree is built from it with a
//! deterministic greedy merge, and every byte value present gets one prefix-free code.
//! The dictionary of (symbol, code) pairs is written ahead of the payload; the decoder
//! rebuilds an equivalent tree from it and checks it for conflicts.
//!

pub mod dictionary;
pub mod huffman;
