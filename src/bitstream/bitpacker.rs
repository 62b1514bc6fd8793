use log::error;

use crate::huffman_coding::huffman::Code;

/// Creates a packed, MSB-first bitstream in memory.
pub struct BitPacker {
    pub output: Vec<u8>,
    queue: u64,
    q_bits: u8,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of size specified. Call flush()
    /// to flush the bit queue to the buffer before using the output.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Writes the low `depth` bits (0-32) of data, most significant first.
    pub fn out_bits(&mut self, data: u32, depth: u8) {
        if depth == 0 {
            return;
        }
        debug_assert!(depth <= 32);
        self.queue <<= depth; //shift queue by bit length
        self.queue |= (data as u64) & (u64::MAX >> (64 - depth)); //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.write_stream();
    }

    /// Puts a byte on the stream.
    pub fn out8(&mut self, data: u8) {
        self.out_bits(data as u32, 8);
    }

    /// Puts a 16 bit word on the stream, big-endian.
    pub fn out16(&mut self, data: u16) {
        self.out_bits(data as u32, 16);
    }

    /// Puts a 32 bit word on the stream, big-endian.
    pub fn out32(&mut self, data: u32) {
        self.out_bits(data, 32);
    }

    /// Puts a 64 bit word on the stream, big-endian.
    pub fn out64(&mut self, data: u64) {
        self.out32((data >> 32) as u32);
        self.out32(data as u32);
    }

    /// Appends the bits of a Huffman code, first bit of the code first.
    pub fn out_code(&mut self, code: &Code) {
        let mut remaining = code.len();
        for &byte in code.as_bytes() {
            let n = remaining.min(8) as u8;
            self.out_bits((byte >> (8 - n)) as u32, n);
            remaining -= n as usize;
        }
    }

    /// Count of bits put on the stream so far, padding excluded.
    pub fn bit_len(&self) -> u64 {
        self.output.len() as u64 * 8 + self.q_bits as u64
    }

    /// Flushes the remaining bits (1-7) from the buffer, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format! {"[{}.{}]", self.bit_len() / 8, self.bit_len() % 8}
    }
}
