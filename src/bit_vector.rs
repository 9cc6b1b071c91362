//! Addressable bit storage with stream append and positional binary I/O.
//!
//! A `BitVector` is a byte array viewed as a sequence of bits, little-endian
//! within each byte (bit `k` lives at `1 << (k & 7)` of byte `k / 8`). It
//! supports two styles of use at once: random access by absolute bit index
//! (`set`/`clear`/`check`), and sequential append with an internal cursor
//! (`append`/`append_vector`), which doubles its backing capacity whenever
//! the cursor catches up to it.

use std::io::{Read, Seek, SeekFrom, Write};
use crate::Error;

/// Selects whether an operation is concerned with the full allocated
/// capacity or only the bits written so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Full,
    Stream,
}

#[derive(Clone, Debug)]
pub struct BitVector {
    bits: Vec<u8>,
    capacity_bits: u64,
    cursor: u64,
}

fn byte_len(capacity_bits: u64) -> usize {
    ((capacity_bits + 7) / 8 + 1) as usize
}

impl BitVector {
    /// Creates a zero-initialized vector with `capacity_bits = n`, `cursor = 0`.
    pub fn create(n: u64) -> Result<Self, Error> {
        if n == 0 {
            return Err(Error::InvalidArgument("bit vector capacity must be positive"));
        }
        Ok(Self {
            bits: vec![0; byte_len(n)],
            capacity_bits: n,
            cursor: 0,
        })
    }

    pub fn capacity_bits(&self) -> u64 {
        self.capacity_bits
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    fn check_index(&self, i: u64) -> Result<(), Error> {
        if i >= self.capacity_bits {
            return Err(Error::InvalidArgument("bit index out of range"));
        }
        Ok(())
    }

    pub fn set(&mut self, i: u64) -> Result<(), Error> {
        self.check_index(i)?;
        self.bits[(i / 8) as usize] |= 1 << (i & 7);
        Ok(())
    }

    pub fn clear(&mut self, i: u64) -> Result<(), Error> {
        self.check_index(i)?;
        self.bits[(i / 8) as usize] &= !(1 << (i & 7));
        Ok(())
    }

    pub fn check(&self, i: u64) -> Result<u8, Error> {
        self.check_index(i)?;
        Ok((self.bits[(i / 8) as usize] >> (i & 7)) & 1)
    }

    /// Reallocates backing storage for a new capacity, preserving existing
    /// bit values at positions `< min(old, new)`. `cursor` is left
    /// unchanged; the caller is responsible for `cursor <= n`.
    pub fn resize(&mut self, n: u64) -> Result<(), Error> {
        if n == 0 {
            return Err(Error::InvalidArgument("bit vector capacity must be positive"));
        }
        let mut grown = vec![0u8; byte_len(n)];
        let keep = grown.len().min(self.bits.len());
        grown[..keep].copy_from_slice(&self.bits[..keep]);
        self.bits = grown;
        self.capacity_bits = n;
        Ok(())
    }

    /// Appends a single bit at the cursor, doubling capacity first if full.
    pub fn append(&mut self, b: u8) -> Result<(), Error> {
        if b > 1 {
            return Err(Error::InvalidArgument("bit value must be 0 or 1"));
        }
        if self.cursor == self.capacity_bits {
            self.resize(self.capacity_bits * 2)?;
        }
        let i = self.cursor;
        if b == 1 {
            self.set(i)?;
        } else {
            self.clear(i)?;
        }
        self.cursor += 1;
        Ok(())
    }

    /// Appends bits `[0, size(v, mode))` of `v`, one at a time.
    pub fn append_vector(&mut self, v: &BitVector, mode: Mode) -> Result<(), Error> {
        for i in 0..v.size(mode) {
            self.append(v.check(i)?)?;
        }
        Ok(())
    }

    pub fn size(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Full => self.capacity_bits,
            Mode::Stream => self.cursor,
        }
    }

    /// Writes a little-endian 64-bit length `L = size(mode)` followed by
    /// `ceil(L/8)+1` raw bytes of storage at `offset`. Returns the offset
    /// immediately past what was written.
    pub fn serialize<W: Write + Seek>(&self, sink: &mut W, offset: u64, mode: Mode) -> Result<u64, Error> {
        let l = self.size(mode);
        sink.seek(SeekFrom::Start(offset))?;
        sink.write_all(&l.to_le_bytes())?;
        let raw = byte_len(l);
        sink.write_all(&self.bits[..raw])?;
        Ok(offset + 8 + raw as u64)
    }

    /// Reads a length-prefixed bit vector starting at `offset`. `cursor` is
    /// set to the recovered length; capacity is exactly that length.
    pub fn deserialize<R: Read + Seek>(source: &mut R, offset: u64) -> Result<Self, Error> {
        source.seek(SeekFrom::Start(offset))?;
        let mut len_buf = [0u8; 8];
        read_exact_short(source, &mut len_buf)?;
        let l = u64::from_le_bytes(len_buf);
        let raw = byte_len(l);
        let mut bits = vec![0u8; raw];
        read_exact_short(source, &mut bits)?;
        Ok(Self {
            bits,
            capacity_bits: l,
            cursor: l,
        })
    }

    /// Builds a vector from a string of `'0'`/`'1'` characters (all others
    /// skipped), trimmed to exactly the bits that were appended.
    pub fn from_bit_string(s: &str) -> Result<Self, Error> {
        let mut v = Self::create(1)?;
        for c in s.chars() {
            match c {
                '0' => v.append(0)?,
                '1' => v.append(1)?,
                _ => continue,
            }
        }
        if v.cursor == 0 {
            v.resize(1)?;
        } else {
            v.resize(v.cursor)?;
        }
        Ok(v)
    }
}

/// `Read::read_exact` that reports short reads as `Error::IoShort` rather
/// than the generic I/O error, so truncated containers are distinguishable.
pub(crate) fn read_exact_short<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<(), Error> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(Error::IoShort {
                expected: buf.len(),
                actual: filled,
            });
        }
        filled += n;
    }
    Ok(())
}
