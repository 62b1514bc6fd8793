//! BitReader: reads a packed, MSB-first bitstream held in memory.
//!
//! The whole compressed file is loaded before decoding starts, so the reader
//! borrows a byte slice instead of owning an I/O source. Every read returns
//! None once the slice is exhausted; the caller decides whether that is an error.
//!

/// Reads a packed bitstream from a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader positioned on the first bit of the slice.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
        }
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        let byte = *self.buffer.get(self.cursor)?;
        let bit = (byte >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<u64> of the next n (0-64) bits, or None if there are fewer than n left.
    /// Nothing is consumed when None is returned.
    pub fn bint(&mut self, mut n: usize) -> Option<u64> {
        if n > 64 || n > self.remaining_bits() {
            return None;
        }
        let mut result = 0_u64;

        // Finish a partial byte first, then whole bytes, then a partial byte again.
        while n > 0 {
            let available = 8 - self.bit_index;
            let take = n.min(available);
            let byte = self.buffer[self.cursor] as u64;
            let bits = (byte >> (available - take)) & (0xff >> (8 - take));
            result = result << take | bits;
            self.bit_index += take;
            if self.bit_index == 8 {
                self.bit_index = 0;
                self.cursor += 1;
            }
            n -= take;
        }
        Some(result)
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns an Option<Vec<u8>> of n bytes, or None if fewer than n bytes remain.
    pub fn bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        if n * 8 > self.remaining_bits() {
            return None;
        }
        (0..n).map(|_| self.byte()).collect()
    }

    /// Bits not yet consumed, padding included.
    pub fn remaining_bits(&self) -> usize {
        (self.buffer.len() - self.cursor) * 8 - self.bit_index
    }

    /// Index of the byte holding the next bit.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn basic_test() {
        let x = [0b10000001_u8];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(0));
        assert_eq!(br.bit(), Some(1));
        assert_eq!(br.bit(), None);
    }

    #[test]
    fn bint_test() {
        let x = [0b00011011];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bint(5), Some(3));
        assert_eq!(br.bint(1), Some(0));
        assert_eq!(br.bint(2), Some(3));
        assert_eq!(br.bint(1), None);
    }

    #[test]
    fn bint_across_bytes_test() {
        let x = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0, 0xff];
        let mut br = BitReader::new(&x);
        assert_eq!(br.bint(4), Some(0x1));
        assert_eq!(br.bint(12), Some(0x234));
        let mut br = BitReader::new(&x);
        assert_eq!(br.bint(64), Some(0x1234_5678_9abc_def0));
        assert_eq!(br.remaining_bits(), 8);
    }

    #[test]
    fn short_bint_consumes_nothing_test() {
        let x = [0xff, 0x00];
        let mut br = BitReader::new(&x);
        br.bit();
        assert_eq!(br.bint(16), None);
        assert_eq!(br.loc(), "[0.1]");
    }

    #[test]
    fn byte_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.byte(), Some(b'H'));
        assert_eq!(br.byte(), Some(b'e'));
        assert_eq!(br.byte(), Some(b'l'));
        assert_eq!(br.byte(), Some(b'l'));
    }

    #[test]
    fn bytes_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        assert_eq!(br.bytes(5), Some("Hello".as_bytes().to_vec()));
        assert_eq!(br.position(), 5);
        assert_eq!(br.bytes(20), None);
    }

    #[test]
    fn loc_test() {
        let x = "Hello, world!".as_bytes();
        let mut br = BitReader::new(x);
        br.bytes(5);
        br.bit();
        assert_eq!(br.loc(), "[5.1]");
    }
}
