use log::{debug, info, warn};

use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, Result};
use crate::huffman_coding::dictionary::{read_header, DecodeTree};

use super::compress::write_atomic;

use std::fs;
use std::path::Path;

/// Decode a complete encoded file held in memory.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut br = BitReader::new(input);
    let header = read_header(&mut br)?;
    debug!(
        "Header: {} entries, {} symbols, payload starts at {}.",
        header.entries,
        header.symbols,
        br.loc()
    );

    // Each symbol costs at least one bit, so a corrupt count cannot force a huge allocation.
    let mut output = Vec::with_capacity((header.symbols as usize).min(br.remaining_bits()));
    let tree = &header.tree;
    let mut at = DecodeTree::ROOT;
    let mut position = 0_u64;

    while (output.len() as u64) < header.symbols {
        let bit = br.bit().ok_or(HuffError::TruncatedPayload {
            expected: header.symbols,
            decoded: output.len() as u64,
        })?;
        at = tree
            .child(at, bit)
            .ok_or(HuffError::InvalidCode { position })?;
        if let Some(sym) = tree.symbol(at) {
            output.push(sym);
            at = DecodeTree::ROOT;
        }
        position += 1;
    }

    // Only the zero padding of the last byte may follow the payload.
    let trailing = br.remaining_bits() / 8;
    if trailing > 0 {
        warn!("Ignoring {} trailing byte(s) after the payload.", trailing);
    }
    Ok(output)
}

/// Read and decode the file at `src`.
pub fn decompress_file(src: &Path) -> Result<Vec<u8>> {
    let input = fs::read(src).map_err(|source| HuffError::SourceUnreadable {
        path: src.to_path_buf(),
        source,
    })?;
    decompress(&input)
}

/// Decode `src` and write the recovered bytes to `dest`. Nothing is written unless the
/// whole file decodes. Returns the number of bytes written.
pub fn decompress_to_file(src: &Path, dest: &Path) -> Result<usize> {
    let output = decompress_file(src)?;
    write_atomic(dest, &output)?;
    info!(
        "Wrote {}: {} bytes from {}.",
        dest.display(),
        output.len(),
        src.display()
    );
    Ok(output.len())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::compress::compress;
    use crate::error::HeaderError;

    #[test]
    fn empty_test() {
        let encoded = compress(&[]).unwrap();
        assert_eq!(decompress(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn padding_is_not_decoded_test() {
        // 4 one-bit codes leave 4 padding bits that would also decode as `a`.
        let encoded = compress(b"aaaa").unwrap();
        assert_eq!(decompress(&encoded).unwrap(), b"aaaa");
    }

    #[test]
    fn truncated_payload_test() {
        let mut encoded = compress(b"abracadabra").unwrap();
        encoded.pop();
        match decompress(&encoded) {
            Err(HuffError::TruncatedPayload { expected, decoded }) => {
                assert_eq!(expected, 11);
                assert!(decoded < 11);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn invalid_code_test() {
        // A one symbol tree only has a `0` branch; a 1 bit leads nowhere.
        let mut encoded = compress(b"aaaa").unwrap();
        let last = encoded.len() - 1;
        encoded[last] = 0b0010_0000;
        match decompress(&encoded) {
            Err(HuffError::InvalidCode { position }) => assert_eq!(position, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn malformed_header_test() {
        let bytes = [b'H', b'U', b'F', 1, 0, 2, b'a', 1, 0b0000_0000];
        assert!(matches!(
            decompress(&bytes),
            Err(HuffError::MalformedHeader(HeaderError::Truncated { .. }))
        ));
    }

    #[test]
    fn missing_source_test() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("nothing.huf");
        assert!(matches!(
            decompress_file(&src),
            Err(HuffError::SourceUnreadable { .. })
        ));
    }
}
