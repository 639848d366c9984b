//! Named bit ranges within a register
//!
//! A [`BitSegment`] owns the current values of a contiguous bit range and
//! converts between bit, unsigned and two's-complement integer views. Bit
//! index 0 is the least significant bit of the register; byte 0 of the
//! register holds bits 0–7, byte 1 bits 8–15, and so on.

use alloc::string::String;
use alloc::vec::Vec;
use core::convert::Infallible;

use crate::Error;

/// Maximum segment width in bits
///
/// Capped so that [`BitSegment::to_int`] and
/// [`BitSegment::to_twos_complement_int`] are total over `u64`/`i64`.
pub const MAX_SEGMENT_WIDTH: usize = 64;

/// A named, contiguous bit range within one register
///
/// Storing values as `bool` makes the "bits are 0 or 1" invariant structural,
/// and the width invariant is preserved by only ever handing out slices
/// (a `&mut [bool]` cannot change length).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSegment {
    name: String,
    lsb: u16,
    msb: u16,
    bits: Vec<bool>,
}

impl BitSegment {
    /// Create a segment spanning register bits `lsb..=msb`
    ///
    /// `default_bits` provides the initial values, index 0 = least
    /// significant.
    ///
    /// # Errors
    ///
    /// - `InvalidRange` if `msb < lsb` or the range is wider than
    ///   [`MAX_SEGMENT_WIDTH`] bits
    /// - `LengthMismatch` if `default_bits` is not exactly `msb - lsb + 1`
    ///   bits long
    pub fn new(
        name: &str,
        lsb: u16,
        msb: u16,
        default_bits: &[bool],
    ) -> Result<Self, Error<Infallible>> {
        if msb < lsb {
            return Err(Error::InvalidRange);
        }

        let width = usize::from(msb - lsb) + 1;
        if width > MAX_SEGMENT_WIDTH {
            return Err(Error::InvalidRange);
        }
        if default_bits.len() != width {
            return Err(Error::LengthMismatch {
                expected: width,
                actual: default_bits.len(),
            });
        }

        Ok(Self {
            name: String::from(name),
            lsb,
            msb,
            bits: default_bits.to_vec(),
        })
    }

    /// Segment name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the least significant bit within the register
    pub fn lsb(&self) -> u16 {
        self.lsb
    }

    /// Index of the most significant bit within the register
    pub fn msb(&self) -> u16 {
        self.msb
    }

    /// Width of the segment in bits
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Current bit values, index 0 = least significant
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Mutable access to the bit values for advanced callers
    ///
    /// The slice length is fixed, so the width invariant cannot be broken
    /// through it.
    pub fn bits_mut(&mut self) -> &mut [bool] {
        &mut self.bits
    }

    /// Replace the stored bit values
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if `bits` does not match the segment width.
    /// The stored values are untouched on failure.
    pub fn set(&mut self, bits: &[bool]) -> Result<(), Error<Infallible>> {
        if bits.len() != self.bits.len() {
            return Err(Error::LengthMismatch {
                expected: self.bits.len(),
                actual: bits.len(),
            });
        }

        self.bits.copy_from_slice(bits);
        Ok(())
    }

    /// Store `value` as bits, least significant first
    ///
    /// Values at or above `2^width` are truncated to `value mod 2^width`
    /// without error.
    pub fn set_from_int(&mut self, value: u64) {
        for (i, bit) in self.bits.iter_mut().enumerate() {
            *bit = (value >> i) & 1 == 1;
        }
    }

    /// Reassemble the stored bits as an unsigned integer
    pub fn to_int(&self) -> u64 {
        let mut out = 0u64;
        for &bit in self.bits.iter().rev() {
            out = (out << 1) | u64::from(bit);
        }
        out
    }

    /// Interpret the stored bits as a two's-complement signed integer
    ///
    /// If the most significant stored bit is set the result is
    /// `to_int() - 2^width`, otherwise `to_int()`.
    pub fn to_twos_complement_int(&self) -> i64 {
        let raw = self.to_int();
        let width = self.bits.len();

        if width == MAX_SEGMENT_WIDTH {
            // The raw word already is the two's-complement representation.
            return raw as i64;
        }

        if self.bits[width - 1] {
            raw.wrapping_sub(1u64 << width) as i64
        } else {
            raw as i64
        }
    }

    /// Pull this segment's bits out of a full register byte array
    ///
    /// `bytes` must cover the segment's bit range; `Register::read` sizes the
    /// buffer from the widest segment, which guarantees that.
    pub(crate) fn load_bytes(&mut self, bytes: &[u8]) {
        let lsb = usize::from(self.lsb);
        for (i, bit) in self.bits.iter_mut().enumerate() {
            let pos = lsb + i;
            *bit = (bytes[pos / 8] >> (pos % 8)) & 1 == 1;
        }
    }

    /// Place this segment's bits into a full register byte array
    ///
    /// Inverse of [`load_bytes`](Self::load_bytes). Bits outside the segment
    /// range are left untouched, so later segments overwrite earlier ones
    /// where ranges overlap.
    pub(crate) fn store_bytes(&self, bytes: &mut [u8]) {
        let lsb = usize::from(self.lsb);
        for (i, &bit) in self.bits.iter().enumerate() {
            let pos = lsb + i;
            let mask = 1 << (pos % 8);
            if bit {
                bytes[pos / 8] |= mask;
            } else {
                bytes[pos / 8] &= !mask;
            }
        }
    }
}
