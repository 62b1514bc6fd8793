use std::fs;
use std::io::Write;
use std::path::Path;

use log::{debug, info};
use tempfile::{Builder, NamedTempFile};

use crate::bitstream::bitpacker::BitPacker;
use crate::error::{HuffError, Result};
use crate::huffman_coding::dictionary::{write_header, FIXED_HEADER_BYTES};
use crate::huffman_coding::huffman::HuffmanCodec;

/// What one compression call produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionReport {
    /// Input length in bytes.
    pub original_len: usize,
    /// Length of the whole encoded file, header included.
    pub compressed_len: usize,
    /// Distinct symbols in the dictionary.
    pub symbols: usize,
    /// Meaningful payload bits, padding excluded.
    pub payload_bits: u64,
    /// Longest code in bits (0 for empty input, 1 for a one symbol input).
    pub longest_code: usize,
}

/// Compress the input into a complete encoded file held in memory.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    encode(input).map(|(output, _)| output)
}

/// Compress the input and write the encoded file to `dest`, replacing any existing file.
/// The file appears complete or not at all.
pub fn compress_file(input: &[u8], dest: &Path) -> Result<CompressionReport> {
    let (output, report) = encode(input)?;
    write_atomic(dest, &output)?;
    info!(
        "Wrote {}: {} -> {} bytes, {} symbols.",
        dest.display(),
        report.original_len,
        report.compressed_len,
        report.symbols
    );
    Ok(report)
}

/// Build the model, then pack header, dictionary and payload into one buffer.
pub(crate) fn encode(input: &[u8]) -> Result<(Vec<u8>, CompressionReport)> {
    let codec = HuffmanCodec::from_bytes(input)?;
    let payload_bits = codec.encoded_bits();
    if let Some(tree) = codec.tree() {
        debug!(
            "Built tree with {} leaves, height {}, root weight {}.",
            tree.leaf_count(),
            tree.height(),
            tree.root().weight
        );
    }

    let dictionary_bytes: usize = codec
        .codes()
        .iter()
        .flatten()
        .map(|c| 2 + c.as_bytes().len())
        .sum();
    let capacity = FIXED_HEADER_BYTES + dictionary_bytes + (payload_bits as usize + 7) / 8;
    let mut bp = BitPacker::new(capacity);

    write_header(&mut bp, codec.codes(), input.len() as u64);
    debug!("Header ends at {}, payload is {} bits.", bp.loc(), payload_bits);

    for &byte in input {
        // Every byte of the input was counted, so every byte has a code.
        if let Some(code) = codec.code(byte) {
            bp.out_code(code);
        }
    }
    bp.flush();

    let report = CompressionReport {
        original_len: input.len(),
        compressed_len: bp.output.len(),
        symbols: codec.symbols(),
        payload_bits,
        longest_code: codec
            .codes()
            .iter()
            .flatten()
            .map(|c| c.len())
            .max()
            .unwrap_or(0),
    };
    Ok((bp.output, report))
}

/// Write `data` to a temporary file beside `dest` and rename it into place. On any
/// failure the temporary file is removed and `dest` is left as it was.
///
/// A replaced `dest` keeps its permissions. A new one gets the same mode `fs::write` would
/// give it (0666 less the umask), not the owner-only mode of a bare temporary file.
pub(crate) fn write_atomic(dest: &Path, data: &[u8]) -> Result<()> {
    let unwritable = |source: std::io::Error| HuffError::DestinationUnwritable {
        path: dest.to_path_buf(),
        source,
    };
    let dir = match dest.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = temp_beside(dir, dest).map_err(unwritable)?;
    tmp.write_all(data).map_err(unwritable)?;
    tmp.as_file().sync_all().map_err(unwritable)?;
    tmp.persist(dest).map_err(|e| unwritable(e.error))?;
    Ok(())
}

fn temp_beside(dir: &Path, dest: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // open(2) applies the umask to this, as it does for File::create.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;
    if let Ok(meta) = fs::metadata(dest) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    Ok(tmp)
}
