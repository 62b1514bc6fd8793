/// Per-symbol occurrence counts for one compression call.
pub type FreqTable = [u64; 256];

/// Returns a frequency count of the input data.
pub fn freqs(data: &[u8]) -> FreqTable {
    let mut freqs = [0_u64; 256];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}

/// How many symbols occur at least once.
pub fn distinct(freqs: &FreqTable) -> usize {
    freqs.iter().filter(|&&f| f > 0).count()
}
