/// File-level compression and decompression.
///
/// Format: a [`HEADER_SIZE`]-byte header of 256 big-endian `u32` counts,
/// then the codewords of the input bytes packed MSB-first, zero-padded to
/// a whole byte. There is no terminator; the decoder stops after
/// `sum(counts)` symbols.
///
/// The stream functions work on any `Read`/`Write` pair. Compression needs
/// `Seek` as well since the input is read twice: once to count, once to
/// encode. The path functions add file handling on top: missing inputs and
/// unwritable outputs are reported as such, and an output left behind by a
/// failed run is removed.
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::bitio::{BitReader, BitWriter};
use crate::frequency::FrequencyTable;
use crate::huffman::{Code, CodeTable, HuffmanTree};
use crate::{HuffError, ALPHABET_SIZE, HEADER_SIZE};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Error type for codec operations.
///
/// Wraps format errors (`HuffError`) and I/O errors, and names the two
/// path-level conditions callers usually want to report differently.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The input file does not exist.
    #[error("{}: file not found", .0.display())]
    SourceNotFound(PathBuf),
    /// The output file could not be created.
    #[error("{}: cannot create output: {source}", .path.display())]
    SinkUnwritable { path: PathBuf, source: io::Error },
    /// Input and output name the same file.
    #[error("{}: input and output are the same file", .0.display())]
    SameFile(PathBuf),
    /// Malformed or unencodable data.
    #[error(transparent)]
    Huff(#[from] HuffError),
    /// I/O error from `Read` or `Write` operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Default size of the read/write buffers, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Operational settings. None of these affect the bytes produced.
#[derive(Debug, Clone)]
pub struct CodecOptions {
    /// Capacity of the input/output buffers.
    pub buffer_size: usize,
    /// Delete the output file if the operation fails after creating it.
    pub remove_partial_output: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
            remove_partial_output: true,
        }
    }
}

impl CodecOptions {
    fn chunk_size(&self) -> usize {
        self.buffer_size.max(1)
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Write the 256 counts as big-endian 32-bit fields.
pub fn write_header<W: Write>(writer: &mut BitWriter<W>, freq: &FrequencyTable) -> io::Result<()> {
    for &count in &freq.byte {
        writer.write_u32(count)?;
    }
    Ok(())
}

/// Read the 256 counts back; any shortfall is [`HuffError::HeaderTruncated`].
pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> CodecResult<FrequencyTable> {
    let mut counts = [0u32; ALPHABET_SIZE];
    for count in counts.iter_mut() {
        *count = reader.read_u32()?;
        if !reader.read_succeeded() {
            return Err(HuffError::HeaderTruncated.into());
        }
    }
    Ok(FrequencyTable::from_counts(counts))
}

/// Summary of a compressed file, read from its header alone.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub frequencies: FrequencyTable,
    /// Size of the compressed file on disk.
    pub compressed_size: u64,
}

impl HeaderInfo {
    /// Size of the original data.
    pub fn original_size(&self) -> u64 {
        self.frequencies.total
    }
}

/// Read only the header of a compressed file.
pub fn inspect(path: &Path) -> CodecResult<HeaderInfo> {
    let file = open_source(path)?;
    let compressed_size = file.metadata()?.len();
    let mut reader = BitReader::new(BufReader::with_capacity(HEADER_SIZE, file));
    let frequencies = read_header(&mut reader)?;
    Ok(HeaderInfo {
        frequencies,
        compressed_size,
    })
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

/// Compress from a seekable reader to a writer.
///
/// The input is consumed from its current position to the end, then
/// rewound to that position for the encoding pass.
///
/// Returns `(bytes_read, bytes_written)`, where `bytes_written` counts the
/// header and the padded payload.
pub fn compress_stream<R: Read + Seek, W: Write>(
    mut input: R,
    output: W,
    options: &CodecOptions,
) -> CodecResult<(u64, u64)> {
    let start = input.stream_position()?;
    let mut buf = vec![0u8; options.chunk_size()];

    let mut freq = FrequencyTable::new();
    freq.count_reader(&mut input, &mut buf)?;

    let tree = HuffmanTree::build(&freq);
    let table = CodeTable::derive(&tree);
    let emit = emit_codes(&freq, &table)?;
    let payload_bits = table.encoded_bits(&freq);
    log::debug!(
        "compress: {} bytes, {} distinct, tree depth {}, payload {} bits",
        freq.total,
        freq.used,
        tree.depth(),
        payload_bits
    );

    let mut writer = BitWriter::new(output);
    write_header(&mut writer, &freq)?;

    input.seek(SeekFrom::Start(start))?;
    let mut seen = FrequencyTable::new();
    loop {
        let n = read_chunk(&mut input, &mut buf)?;
        if n == 0 {
            break;
        }
        for (i, &b) in buf[..n].iter().enumerate() {
            match emit[b as usize] {
                Some(code) => writer.write_code(code)?,
                None => {
                    return Err(HuffError::InputChanged {
                        expected: freq.total,
                        found: seen.total + i as u64,
                    }
                    .into())
                }
            }
        }
        seen.count(&buf[..n])?;
    }
    if seen != freq {
        return Err(HuffError::InputChanged {
            expected: freq.total,
            found: seen.total,
        }
        .into());
    }
    debug_assert_eq!(writer.bits_written(), HEADER_SIZE as u64 * 8 + payload_bits);

    let (_, written) = writer.finish()?;
    Ok((freq.total, written))
}

/// Decompress from a reader to a writer.
///
/// Returns `(bytes_consumed, bytes_written)`. Reading stops as soon as the
/// declared number of symbols has been decoded, so trailing padding is
/// never interpreted.
pub fn decompress_stream<R: Read, W: Write>(
    input: R,
    mut output: W,
    options: &CodecOptions,
) -> CodecResult<(u64, u64)> {
    let mut reader = BitReader::new(input);
    let freq = read_header(&mut reader)?;
    let expected = freq.total;
    let tree = HuffmanTree::build(&freq);
    log::debug!(
        "decompress: {} symbols, {} distinct, tree depth {}",
        expected,
        freq.used,
        tree.depth()
    );

    let chunk = options.chunk_size();
    let mut pending = Vec::with_capacity(chunk);
    for decoded in 0..expected {
        let byte = tree.walk(|| {
            let bit = reader.read_bit()?;
            if reader.read_succeeded() {
                Ok(bit)
            } else {
                Err(CodecError::Huff(HuffError::PayloadTruncated { decoded, expected }))
            }
        })?;
        pending.push(byte);
        if pending.len() >= chunk {
            output.write_all(&pending)?;
            pending.clear();
        }
    }
    output.write_all(&pending)?;
    output.flush()?;

    Ok((reader.bytes_read(), expected))
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Compress the file at `input` into `output` with default options.
///
/// Returns `(original_size, compressed_size)`.
pub fn compress(input: &Path, output: &Path) -> CodecResult<(u64, u64)> {
    compress_with(input, output, &CodecOptions::default())
}

pub fn compress_with(input: &Path, output: &Path, options: &CodecOptions) -> CodecResult<(u64, u64)> {
    let source = open_source(input)?;
    reject_same_file(input, output)?;
    let sink = create_sink(output)?;

    let reader = BufReader::with_capacity(options.chunk_size(), source);
    let writer = BufWriter::with_capacity(options.chunk_size(), sink);
    let result = compress_stream(reader, writer, options);
    settle_output(result, output, options)
}

/// Decompress the file at `input` into `output` with default options.
///
/// Returns `(compressed_size, original_size)`; the first value is the
/// size of `input` on disk.
pub fn decompress(input: &Path, output: &Path) -> CodecResult<(u64, u64)> {
    decompress_with(input, output, &CodecOptions::default())
}

pub fn decompress_with(input: &Path, output: &Path, options: &CodecOptions) -> CodecResult<(u64, u64)> {
    let source = open_source(input)?;
    let compressed_size = source.metadata()?.len();
    reject_same_file(input, output)?;
    let sink = create_sink(output)?;

    let reader = BufReader::with_capacity(options.chunk_size(), source);
    let writer = BufWriter::with_capacity(options.chunk_size(), sink);
    let result = decompress_stream(reader, writer, options)
        .map(|(_, written)| (compressed_size, written));
    settle_output(result, output, options)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Codewords for the bytes that actually occur; everything else is `None`.
fn emit_codes(freq: &FrequencyTable, table: &CodeTable) -> CodecResult<[Option<Code>; ALPHABET_SIZE]> {
    let mut emit = [None; ALPHABET_SIZE];
    for (value, slot) in emit.iter_mut().enumerate() {
        if freq.byte[value] == 0 {
            continue;
        }
        let byte = value as u8;
        let code = table.get(byte).ok_or(HuffError::MissingCode { byte })?;
        if !code.fits() {
            return Err(HuffError::CodeTooLong {
                byte,
                bits: code.len,
            }
            .into());
        }
        *slot = Some(code);
    }
    Ok(emit)
}

/// Read whatever the reader has next; 0 means end of input.
pub(crate) fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

fn open_source(path: &Path) -> CodecResult<File> {
    File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CodecError::SourceNotFound(path.to_path_buf())
        } else {
            CodecError::Io(e)
        }
    })
}

fn create_sink(path: &Path) -> CodecResult<File> {
    File::create(path).map_err(|source| CodecError::SinkUnwritable {
        path: path.to_path_buf(),
        source,
    })
}

/// Creating the output would truncate the input if both are one file.
fn reject_same_file(input: &Path, output: &Path) -> CodecResult<()> {
    if !output.exists() {
        return Ok(());
    }
    if fs::canonicalize(input)? == fs::canonicalize(output)? {
        return Err(CodecError::SameFile(input.to_path_buf()));
    }
    Ok(())
}

/// By the time this runs the output handle has been dropped, so a failed
/// run's file can be removed.
fn settle_output<T>(result: CodecResult<T>, output: &Path, options: &CodecOptions) -> CodecResult<T> {
    if result.is_err() && options.remove_partial_output {
        match fs::remove_file(output) {
            Ok(()) => log::warn!("{}: removed incomplete output", output.display()),
            Err(e) => log::warn!("{}: cannot remove incomplete output: {}", output.display(), e),
        }
    }
    result
}
