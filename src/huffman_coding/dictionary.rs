//! Reads and writes the file header: magic, version, the code dictionary and the
//! count of encoded symbols. Reading also rebuilds the decode tree.
//!
//! Layout, multi-byte values big-endian:
//!
//! | bytes       | field                                           |
//! |-------------|-------------------------------------------------|
//! | 3           | magic `HUF`                                     |
//! | 1           | format version (1)                              |
//! | 2           | entries k, 0..=256                              |
//! | k * (2 + n) | symbol, code length in bits, code packed MSB-first |
//! | 8           | symbols encoded in the payload                  |
//!
//! Entries are written in ascending symbol order. An empty input is a header with
//! k = 0 and a symbol count of 0 and no payload.
//!

use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::error::HeaderError;

use super::huffman::{Code, CodeTable};

pub const MAGIC: [u8; 3] = *b"HUF";
pub const VERSION: u8 = 1;
/// Magic, version, entry count and symbol count: the size of an empty file.
pub const FIXED_HEADER_BYTES: usize = 3 + 1 + 2 + 8;

/// Put the header for `codes` on the stream, followed by the count of symbols the
/// payload holds.
pub fn write_header(bp: &mut BitPacker, codes: &CodeTable, symbols: u64) {
    MAGIC.iter().for_each(|&x| bp.out8(x));
    bp.out8(VERSION);

    let entries = codes.iter().flatten().count();
    bp.out16(entries as u16);
    trace!("Dictionary of {} entries written at {}.", entries, bp.loc());

    for (sym, code) in codes.iter().enumerate() {
        if let Some(code) = code {
            bp.out8(sym as u8);
            bp.out8(code.len() as u8);
            code.as_bytes().iter().for_each(|&x| bp.out8(x));
        }
    }

    bp.out64(symbols);
}

/// Everything the header tells the decoder.
#[derive(Debug)]
pub struct Header {
    pub tree: DecodeTree,
    pub entries: usize,
    pub symbols: u64,
}

/// Parse the header at the start of `br` and leave the reader on the first payload bit.
pub fn read_header(br: &mut BitReader<'_>) -> Result<Header, HeaderError> {
    let magic = take(br, 3)?;
    if magic != MAGIC {
        return Err(HeaderError::BadMagic([magic[0], magic[1], magic[2]]));
    }
    let version = take(br, 1)?[0];
    if version != VERSION {
        return Err(HeaderError::UnsupportedVersion(version));
    }

    let count = take(br, 2)?;
    let entries = u16::from_be_bytes([count[0], count[1]]);
    if entries > 256 {
        return Err(HeaderError::TooManySymbols(entries));
    }
    debug!("Found {} dictionary entries.", entries);

    let mut tree = DecodeTree::new();
    let mut seen: FxHashSet<u8> = FxHashSet::default();
    for _ in 0..entries {
        let entry = take(br, 2)?;
        let (sym, len) = (entry[0], entry[1]);
        if len == 0 {
            return Err(HeaderError::ZeroLengthCode(sym));
        }
        if !seen.insert(sym) {
            return Err(HeaderError::DuplicateSymbol(sym));
        }
        let packed = take(br, (len as usize + 7) / 8)?;
        let code = Code::from_packed(len, &packed).ok_or(HeaderError::CodePadding(sym))?;
        trace!("{:>3}: {}", sym, code);
        tree.insert(sym, &code)?;
    }

    let count = take(br, 8)?;
    let symbols = u64::from_be_bytes([
        count[0], count[1], count[2], count[3], count[4], count[5], count[6], count[7],
    ]);
    if entries == 0 && symbols > 0 {
        return Err(HeaderError::MissingDictionary(symbols));
    }

    Ok(Header {
        tree,
        entries: entries as usize,
        symbols,
    })
}

/// Read n whole bytes or report how far short the header fell.
fn take(br: &mut BitReader<'_>, n: usize) -> Result<Vec<u8>, HeaderError> {
    let at = br.position();
    br.bytes(n).ok_or_else(|| HeaderError::Truncated {
        at,
        needed: n - br.remaining_bits() / 8,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Placeholder or internal node; children are filled in as codes arrive.
    Branch([Option<usize>; 2]),
    Leaf(u8),
}

/// Decode tree rebuilt from the dictionary. Slot 0 is the root and is always a branch.
/// A tree rebuilt from a valid dictionary may still have missing children (a one
/// symbol file only has the `0` branch); the decoder treats those as invalid codes.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    slots: Vec<Slot>,
}

impl DecodeTree {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            slots: vec![Slot::Branch([None; 2])],
        }
    }

    /// Add one symbol at the end of the path spelled by its code. Fails if the path runs
    /// through an existing leaf, or ends on a node that is already in use.
    pub fn insert(&mut self, sym: u8, code: &Code) -> Result<(), HeaderError> {
        let mut at = Self::ROOT;
        for i in 0..code.len() {
            let bit = code.bit(i) as usize;
            let last = i + 1 == code.len();
            let next = match self.slots[at] {
                Slot::Leaf(_) => return Err(HeaderError::PrefixConflict(sym)),
                Slot::Branch(kids) => kids[bit],
            };
            at = match next {
                Some(_) if last => return Err(HeaderError::PrefixConflict(sym)),
                Some(child) => child,
                None => {
                    let child = self.slots.len();
                    self.slots.push(if last {
                        Slot::Leaf(sym)
                    } else {
                        Slot::Branch([None; 2])
                    });
                    if let Slot::Branch(kids) = &mut self.slots[at] {
                        kids[bit] = Some(child);
                    }
                    child
                }
            };
        }
        Ok(())
    }

    /// Follow one bit from `at`. None if there is no such child.
    pub fn child(&self, at: usize, bit: usize) -> Option<usize> {
        match self.slots[at] {
            Slot::Branch(kids) => kids[bit & 1],
            Slot::Leaf(_) => None,
        }
    }

    /// The symbol held at `at`, if it is a leaf.
    pub fn symbol(&self, at: usize) -> Option<u8> {
        match self.slots[at] {
            Slot::Leaf(sym) => Some(sym),
            Slot::Branch(_) => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Leaf(_)))
            .count()
    }
}

impl Default for DecodeTree {
    fn default() -> Self {
        Self::new()
    }
}
