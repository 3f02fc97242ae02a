//! Frequency analysis for byte streams.
//!
//! Counts the occurrence of each byte value (0-255) and computes Shannon
//! entropy. Counts are 32-bit because that is the width of each field in
//! the compressed header; exceeding it is an error, never a wrap.

use std::io::Read;

use crate::codec::{read_chunk, CodecResult};
use crate::{HuffError, HuffResult, ALPHABET_SIZE};

/// A frequency table that tracks byte occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    /// Count of each byte value (index = byte value, value = count).
    pub byte: [u32; ALPHABET_SIZE],
    /// Sum of all counts.
    pub total: u64,
    /// Number of distinct byte values with nonzero count.
    pub used: u32,
}

impl FrequencyTable {
    /// Create a new, zeroed frequency table.
    pub fn new() -> Self {
        Self {
            byte: [0u32; ALPHABET_SIZE],
            total: 0,
            used: 0,
        }
    }

    /// Build a table from raw per-byte counts, e.g. a decoded header.
    pub fn from_counts(counts: [u32; ALPHABET_SIZE]) -> Self {
        let mut table = Self {
            byte: counts,
            total: 0,
            used: 0,
        };
        table.refresh_totals();
        table
    }

    /// Add the bytes of `input` to the running counts.
    ///
    /// Can be called repeatedly to count a stream chunk by chunk. Fails
    /// with [`HuffError::FrequencyOverflow`] if any byte value would exceed
    /// `u32::MAX` occurrences; the table is left unchanged in that case.
    pub fn count(&mut self, input: &[u8]) -> HuffResult<()> {
        let mut chunk = [0u64; ALPHABET_SIZE];
        for &b in input {
            chunk[b as usize] += 1;
        }

        let mut updated = self.byte;
        for (value, (slot, &add)) in updated.iter_mut().zip(chunk.iter()).enumerate() {
            if add == 0 {
                continue;
            }
            *slot = u32::try_from(*slot as u64 + add).map_err(|_| HuffError::FrequencyOverflow {
                byte: value as u8,
            })?;
        }

        self.byte = updated;
        self.refresh_totals();
        Ok(())
    }

    /// Count everything `reader` yields until end of input, `buf.len()`
    /// bytes at a time. Returns the number of bytes read.
    ///
    /// On overflow the counts from earlier chunks are kept; the failing
    /// chunk is not applied.
    pub fn count_reader<R: Read>(&mut self, mut reader: R, buf: &mut [u8]) -> CodecResult<u64> {
        let mut read = 0u64;
        loop {
            let n = read_chunk(&mut reader, buf)?;
            if n == 0 {
                return Ok(read);
            }
            self.count(&buf[..n])?;
            read += n as u64;
        }
    }

    /// Compute the Shannon entropy of the distribution (in bits per symbol).
    ///
    /// Returns 0.0 if the table is empty.
    pub fn entropy(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f32;
        self.byte
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let prob = c as f32 / total;
                -prob * prob.log2()
            })
            .sum()
    }

    /// Get the count for a specific byte value.
    pub fn get(&self, byte: u8) -> u32 {
        self.byte[byte as usize]
    }

    fn refresh_totals(&mut self) {
        let mut total = 0u64;
        let mut used = 0u32;
        for &c in &self.byte {
            total += c as u64;
            used += (c > 0) as u32;
        }
        self.total = total;
        self.used = used;
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function: compute a frequency table from input.
pub fn get_frequency(input: &[u8]) -> HuffResult<FrequencyTable> {
    let mut table = FrequencyTable::new();
    table.count(input)?;
    Ok(table)
}
