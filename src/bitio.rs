/// Bit-level I/O over byte streams (MSB-first).
///
/// `BitWriter` packs bits into bytes most significant bit first and pads
/// the trailing partial byte with zeros. `BitReader` mirrors it and keeps a
/// "last read succeeded" flag so a read past the end of the source can be
/// told apart from a genuine 0 bit.
use std::io::{self, Read, Write};

use crate::huffman::Code;

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Bitstream writer that packs bits MSB-first into an underlying sink.
///
/// The pending partial byte is zero-padded and written out by
/// [`BitWriter::finish`], or on drop if `finish` was never reached.
pub struct BitWriter<W: Write> {
    inner: Option<W>,
    pending: u8,
    filled: u8,
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner: Some(inner),
            pending: 0,
            filled: 0,
            bytes_written: 0,
        }
    }

    /// Append one bit; a full byte goes to the sink immediately.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.pending |= (bit as u8) << (7 - self.filled);
        self.filled += 1;
        if self.filled == 8 {
            self.emit_pending()?;
        }
        Ok(())
    }

    /// Write a 32-bit value, most significant bit first.
    pub fn write_u32(&mut self, value: u32) -> io::Result<()> {
        for shift in (0..32).rev() {
            self.write_bit((value >> shift) & 1 == 1)?;
        }
        Ok(())
    }

    /// Write exactly `code.len` bits of a codeword. An empty code writes nothing.
    pub fn write_code(&mut self, code: Code) -> io::Result<()> {
        for bit in code.iter_bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Total bits accepted so far, padding excluded.
    pub fn bits_written(&self) -> u64 {
        self.bytes_written * 8 + self.filled as u64
    }

    /// Bytes the stream occupies once padded: whole bytes plus any partial one.
    pub fn padded_len(&self) -> u64 {
        self.bytes_written + (self.filled > 0) as u64
    }

    /// Pad and emit the trailing partial byte, flush the sink and hand it back
    /// together with the number of bytes written.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        if self.filled > 0 {
            self.emit_pending()?;
        }
        let mut inner = self.take_inner()?;
        inner.flush()?;
        Ok((inner, self.bytes_written))
    }

    fn emit_pending(&mut self) -> io::Result<()> {
        let byte = self.pending;
        match self.inner.as_mut() {
            Some(inner) => inner.write_all(&[byte])?,
            None => return Err(finished_error()),
        }
        self.pending = 0;
        self.filled = 0;
        self.bytes_written += 1;
        Ok(())
    }

    fn take_inner(&mut self) -> io::Result<W> {
        self.inner.take().ok_or_else(finished_error)
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        // Errors cannot be reported from here; `finish` is the checked path.
        if let Some(inner) = self.inner.as_mut() {
            if self.filled > 0 {
                let _ = inner.write_all(&[self.pending]);
            }
            let _ = inner.flush();
        }
    }
}

fn finished_error() -> io::Error {
    io::Error::other("bit writer already finished")
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Bitstream reader that reads bits MSB-first from an underlying source.
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    remaining: u8,
    last_ok: bool,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            current: 0,
            remaining: 0,
            last_ok: true,
            bytes_read: 0,
        }
    }

    /// Read the next bit.
    ///
    /// At end of input this returns `Ok(false)` and clears the success
    /// flag; check [`BitReader::read_succeeded`] before trusting the value.
    /// `Err` is reserved for real I/O failures.
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.remaining == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.current = byte;
                    self.remaining = 8;
                }
                None => {
                    self.last_ok = false;
                    return Ok(false);
                }
            }
        }
        self.remaining -= 1;
        self.last_ok = true;
        Ok((self.current >> self.remaining) & 1 == 1)
    }

    /// Read a 32-bit value, most significant bit first.
    ///
    /// If the input runs out partway, returns 0 with the success flag cleared.
    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut value = 0u32;
        for _ in 0..32 {
            let bit = self.read_bit()?;
            if !self.last_ok {
                return Ok(0);
            }
            value = (value << 1) | bit as u32;
        }
        Ok(value)
    }

    /// Whether the most recent read had enough input behind it.
    pub fn read_succeeded(&self) -> bool {
        self.last_ok
    }

    /// Bytes pulled from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Give back the source. Bits left in a partly consumed byte are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
