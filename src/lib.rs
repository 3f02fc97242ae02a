//! # huffz
//!
//! Byte-oriented Huffman compression with a self-describing file format.
//!
//! A compressed file is a fixed 1024-byte header (256 big-endian `u32`
//! counts, one per byte value) followed by the Huffman-coded payload,
//! packed MSB-first and zero-padded to a whole byte. The decoder rebuilds
//! the tree from the counts and stops after `sum(counts)` symbols.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let (original, compressed) = huffz::compress(Path::new("notes.txt"), Path::new("notes.txt.huf"))?;
//! let (_, restored) = huffz::decompress(Path::new("notes.txt.huf"), Path::new("notes.out"))?;
//! assert_eq!(original, restored);
//! # let _ = compressed;
//! # Ok::<(), huffz::codec::CodecError>(())
//! ```

pub mod bitio;
pub mod codec;
pub mod frequency;
pub mod huffman;
pub mod pqueue;

#[cfg(test)]
mod validation;

pub use codec::{compress, decompress, CodecError, CodecOptions, CodecResult};

/// Number of symbols in the alphabet (one per byte value).
pub const ALPHABET_SIZE: usize = 256;

/// Width of each header count, in bits.
pub const COUNT_BITS: u32 = 32;

/// Size of the frequency header at the start of every compressed file.
pub const HEADER_SIZE: usize = ALPHABET_SIZE * (COUNT_BITS as usize / 8);

/// Error types for format-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HuffError {
    /// Fewer than [`HEADER_SIZE`] bytes were available.
    #[error("header truncated: fewer than {size} bytes", size = HEADER_SIZE)]
    HeaderTruncated,
    /// The payload ended before the declared number of symbols was decoded.
    #[error("unexpected end of stream after {decoded} of {expected} symbols")]
    PayloadTruncated { decoded: u64, expected: u64 },
    /// A byte value occurs more often than a header count can express.
    #[error("byte {byte:#04x} occurs more than {max} times", max = u32::MAX)]
    FrequencyOverflow { byte: u8 },
    /// A symbol that has to be emitted has a codeword wider than the code register.
    #[error("codeword for byte {byte:#04x} is {bits} bits long")]
    CodeTooLong { byte: u8, bits: u8 },
    /// A symbol that has to be emitted has no leaf in the tree.
    #[error("no codeword for byte {byte:#04x}")]
    MissingCode { byte: u8 },
    /// The input did not hold the same bytes on the encoding pass as on the counting pass.
    #[error("input changed during compression: counted {expected} bytes, encoded {found}")]
    InputChanged { expected: u64, found: u64 },
}

pub type HuffResult<T> = Result<T, HuffError>;
