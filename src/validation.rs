/// Validation tests across modules.
///
/// These tests verify:
/// 1. **Round-trip correctness** over a spread of distributions
/// 2. **Format properties** - header size, header contents, padding
/// 3. **Code properties** - every codeword decodes alone to its own symbol
/// 4. **Determinism** - identical input gives identical output
/// 5. **Failure modes** - truncated headers and payloads are rejected
/// 6. **Size accounting** - returned sizes match the files on disk
#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;

    use crate::codec::{self, CodecError, CodecOptions};
    use crate::frequency::{self, FrequencyTable};
    use crate::huffman::{CodeTable, HuffmanTree};
    use crate::{HuffError, HEADER_SIZE};

    // ---------------------------------------------------------------
    // Helper: generate diverse test vectors
    // ---------------------------------------------------------------

    /// Highly compressible: single byte repeated.
    fn data_repeated(byte: u8, n: usize) -> Vec<u8> {
        vec![byte; n]
    }

    /// Incompressible: every byte value once.
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// Skewed distribution: 90% one byte, 10% another.
    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }

    /// Repetitive text with structure.
    fn data_repeating_text() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".repeat(100)
    }

    /// Binary data with some structure (sawtooth).
    fn data_sawtooth(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 256) as u8).collect()
    }

    /// Pseudo-random bytes from a fixed LCG.
    fn data_noise(n: usize) -> Vec<u8> {
        let mut state = 0x2545_F491u32;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) as u8
            })
            .collect()
    }

    /// Fibonacci counts: the shape that makes Huffman trees as deep as possible.
    fn data_fibonacci(symbols: usize) -> Vec<u8> {
        let (mut a, mut b) = (1usize, 1usize);
        let mut out = Vec::new();
        for sym in 0..symbols {
            out.extend(std::iter::repeat(sym as u8).take(a));
            (a, b) = (b, a + b);
        }
        out
    }

    fn all_vectors() -> Vec<(&'static str, Vec<u8>)> {
        vec![
            ("empty", Vec::new()),
            ("single", vec![7]),
            ("repeated", data_repeated(0x41, 10_000)),
            ("uniform", data_uniform()),
            ("skewed", data_skewed(5000)),
            ("text", data_repeating_text()),
            ("sawtooth", data_sawtooth(4099)),
            ("noise", data_noise(8192)),
            ("fibonacci", data_fibonacci(24)),
        ]
    }

    fn compress_bytes(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        codec::compress_stream(Cursor::new(data), &mut out, &CodecOptions::default()).unwrap();
        out
    }

    fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        codec::decompress_stream(Cursor::new(data), &mut out, &CodecOptions::default())?;
        Ok(out)
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("huffz-validation-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    // ---------------------------------------------------------------
    // Round trips
    // ---------------------------------------------------------------

    #[test]
    fn test_round_trip_all_vectors() {
        for (name, data) in all_vectors() {
            let compressed = compress_bytes(&data);
            let restored = decompress_bytes(&compressed).unwrap();
            assert_eq!(restored, data, "round trip failed for {}", name);
        }
    }

    #[test]
    fn test_round_trip_every_single_byte() {
        for byte in 0..=255u8 {
            let data = [byte];
            assert_eq!(decompress_bytes(&compress_bytes(&data)).unwrap(), data);
        }
    }

    #[test]
    fn test_skewed_data_shrinks() {
        let data = data_skewed(50_000);
        let compressed = compress_bytes(&data);
        assert!(
            compressed.len() < data.len() / 4,
            "compressed {} bytes from {}",
            compressed.len(),
            data.len()
        );
    }

    // ---------------------------------------------------------------
    // Format
    // ---------------------------------------------------------------

    #[test]
    fn test_header_counts_sum_to_length() {
        for (name, data) in all_vectors() {
            let compressed = compress_bytes(&data);
            assert!(compressed.len() >= HEADER_SIZE, "{}", name);
            let sum: u64 = compressed[..HEADER_SIZE]
                .chunks_exact(4)
                .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]) as u64)
                .sum();
            assert_eq!(sum, data.len() as u64, "header sum for {}", name);
        }
    }

    #[test]
    fn test_empty_input_is_bare_header() {
        let compressed = compress_bytes(&[]);
        assert_eq!(compressed, vec![0u8; HEADER_SIZE]);
        assert!(decompress_bytes(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_byte_uses_one_bit_per_symbol() {
        let data = data_repeated(0x41, 10_000);
        let compressed = compress_bytes(&data);
        assert_eq!(compressed.len(), HEADER_SIZE + 10_000 / 8);
        assert_eq!(decompress_bytes(&compressed).unwrap(), data);
    }

    // ---------------------------------------------------------------
    // Codes
    // ---------------------------------------------------------------

    #[test]
    fn test_codes_decode_in_isolation() {
        for (name, data) in all_vectors() {
            let freq = frequency::get_frequency(&data).unwrap();
            let tree = HuffmanTree::build(&freq);
            let table = CodeTable::derive(&tree);
            for byte in 0..=255u8 {
                let code = table.get(byte).unwrap();
                if !code.fits() {
                    assert_eq!(freq.get(byte), 0, "{}: used byte {} has a wide code", name, byte);
                    continue;
                }
                let mut bits = code.iter_bits();
                let decoded = tree.walk(|| bits.next().ok_or(())).unwrap();
                assert_eq!(decoded, byte, "{}: code for {} decodes elsewhere", name, byte);
                assert!(bits.next().is_none(), "{}: code for {} has a proper prefix", name, byte);
            }
        }
    }

    #[test]
    fn test_fibonacci_codes_are_deep_but_fit() {
        let data = data_fibonacci(24);
        let freq = frequency::get_frequency(&data).unwrap();
        let table = CodeTable::derive(&HuffmanTree::build(&freq));
        let deepest = (0..24u8).map(|b| table.get(b).unwrap().len).max().unwrap();
        assert!(deepest >= 20, "deepest used code only {} bits", deepest);
        assert!(deepest <= 64);
    }

    #[test]
    fn test_rebuilt_tree_matches_encoder_tree() {
        let data = data_repeating_text();
        let freq = frequency::get_frequency(&data).unwrap();
        let compressed = compress_bytes(&data);
        let mut counts = [0u32; 256];
        for (count, c) in counts.iter_mut().zip(compressed[..HEADER_SIZE].chunks_exact(4)) {
            *count = u32::from_be_bytes([c[0], c[1], c[2], c[3]]);
        }
        let rebuilt = FrequencyTable::from_counts(counts);
        assert_eq!(rebuilt, freq);
        assert_eq!(HuffmanTree::build(&rebuilt), HuffmanTree::build(&freq));
    }

    // ---------------------------------------------------------------
    // Determinism
    // ---------------------------------------------------------------

    #[test]
    fn test_compression_is_deterministic() {
        for (name, data) in all_vectors() {
            assert_eq!(compress_bytes(&data), compress_bytes(&data), "{}", name);
        }
    }

    // ---------------------------------------------------------------
    // Failure modes
    // ---------------------------------------------------------------

    #[test]
    fn test_truncation_detection() {
        let data = data_repeating_text();
        let compressed = compress_bytes(&data);

        let err = decompress_bytes(&compressed[..HEADER_SIZE - 1]).unwrap_err();
        assert!(matches!(err, CodecError::Huff(HuffError::HeaderTruncated)));

        let err = decompress_bytes(&compressed[..HEADER_SIZE]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Huff(HuffError::PayloadTruncated { decoded: 0, .. })
        ));

        let half = HEADER_SIZE + (compressed.len() - HEADER_SIZE) / 2;
        let err = decompress_bytes(&compressed[..half]).unwrap_err();
        match err {
            CodecError::Huff(HuffError::PayloadTruncated { decoded, expected }) => {
                assert!(decoded > 0 && decoded < expected);
            }
            other => panic!("expected payload truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_with_zero_counts_is_valid() {
        let restored = decompress_bytes(&[0u8; HEADER_SIZE]).unwrap();
        assert!(restored.is_empty());
    }

    // ---------------------------------------------------------------
    // Files
    // ---------------------------------------------------------------

    #[test]
    fn test_size_accounting_known_distribution() {
        // 4096 'a', 2048 'b', 1024 'c', 1024 'd' interleaved. Code lengths
        // are 1, 2, and {3, 4} for c/d, so the payload is
        // 4096 + 4096 + 3072 + 4096 = 15360 bits = 1920 bytes.
        let mut data = Vec::with_capacity(8192);
        for i in 0..1024 {
            data.extend_from_slice(b"aaaabb");
            data.push(if i % 2 == 0 { b'c' } else { b'd' });
            data.push(if i % 2 == 0 { b'd' } else { b'c' });
        }
        assert_eq!(data.len(), 8192);

        let dir = scratch_dir("accounting");
        let src = dir.join("sample.txt");
        let packed = dir.join("sample.txt.huf");
        let restored = dir.join("sample.out");
        fs::write(&src, &data).unwrap();

        let (read, written) = codec::compress(&src, &packed).unwrap();
        assert_eq!(read, 8192);
        assert_eq!(written, (HEADER_SIZE + 1920) as u64);
        assert_eq!(fs::metadata(&packed).unwrap().len(), written);

        let (compressed_size, original_size) = codec::decompress(&packed, &restored).unwrap();
        assert_eq!(compressed_size, written);
        assert_eq!(original_size, 8192);
        assert_eq!(fs::metadata(&restored).unwrap().len(), 8192);
        assert_eq!(fs::read(&restored).unwrap(), data);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_truncated_file_reports_and_cleans_up() {
        let dir = scratch_dir("truncated");
        let src = dir.join("a.txt");
        let packed = dir.join("a.huf");
        let short = dir.join("short.huf");
        let out = dir.join("a.out");
        fs::write(&src, data_repeating_text()).unwrap();
        codec::compress(&src, &packed).unwrap();

        fs::write(&short, &fs::read(&packed).unwrap()[..100]).unwrap();
        let err = codec::decompress(&short, &out).unwrap_err();
        assert!(matches!(err, CodecError::Huff(HuffError::HeaderTruncated)));
        assert!(!out.exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
