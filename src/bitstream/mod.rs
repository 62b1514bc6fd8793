//! The bitstream module forms the I/O subsystem of the codec.
//!
//! Both directions are MSB-first: the first bit of the stream is the most significant bit of
//! the first byte. BitPacker assembles the header, dictionary and payload into one buffer and
//! zero-pads the final byte. BitReader walks a loaded file bit by bit; it never interprets the
//! padding itself, the caller stops once the declared symbol count has been decoded.
//!
pub mod bitpacker;
pub mod bitreader;
