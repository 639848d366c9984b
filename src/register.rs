//! Registers: named, addressed collections of bit segments
//!
//! A [`Register`] owns its segments and performs the byte-to-bit
//! decomposition against the transport. Its byte width is inferred from the
//! highest `msb` of any segment.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use core::convert::Infallible;

use crate::segment::BitSegment;
use crate::transport::{Transport, WRITE_FAILURE};
use crate::Error;

/// Data operations a register supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Register can only be read
    ReadOnly,
    /// Register can only be written
    WriteOnly,
    /// Register can be read and written
    ReadWrite,
}

impl Access {
    /// Whether reads are allowed
    pub const fn readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    /// Whether writes are allowed
    pub const fn writable(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

/// A byte-addressed device register holding named bit segments
#[derive(Debug, Clone)]
pub struct Register {
    name: String,
    dev_addr: u8,
    addr: u8,
    access: Access,
    segments: BTreeMap<String, BitSegment>,
}

impl Register {
    pub(crate) fn new(name: &str, dev_addr: u8, addr: u8, access: Access) -> Self {
        Self {
            name: String::from(name),
            dev_addr,
            addr,
            access,
            segments: BTreeMap::new(),
        }
    }

    /// Register name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register address on the device
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Permission flags
    pub fn access(&self) -> Access {
        self.access
    }

    /// Add a segment spanning register bits `lsb..=msb`
    ///
    /// Returns `&mut self` so several segments can be chained off one
    /// `add_register` call:
    ///
    /// ```ignore
    /// table
    ///     .add_register("STATUS", 0x01, Access::ReadOnly)?
    ///     .add_segment("BUSY_FLAG", 0, 0, &[false])?
    ///     .add_segment("HEALTH", 5, 5, &[false])?;
    /// ```
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if a segment with this name already exists
    /// - `InvalidRange` / `LengthMismatch` from segment construction
    pub fn add_segment(
        &mut self,
        name: &str,
        lsb: u16,
        msb: u16,
        default_bits: &[bool],
    ) -> Result<&mut Self, Error<Infallible>> {
        if self.segments.contains_key(name) {
            return Err(Error::DuplicateName);
        }

        let segment = BitSegment::new(name, lsb, msb, default_bits)?;
        self.segments.insert(String::from(name), segment);
        Ok(self)
    }

    /// Look up a segment by name
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no segment with this name exists.
    pub fn segment(&self, name: &str) -> Result<&BitSegment, Error<Infallible>> {
        self.segments.get(name).ok_or(Error::NotFound)
    }

    /// Look up a segment by name for mutation
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no segment with this name exists.
    pub fn segment_mut(&mut self, name: &str) -> Result<&mut BitSegment, Error<Infallible>> {
        self.segments.get_mut(name).ok_or(Error::NotFound)
    }

    /// Iterate over the segments in name order
    pub fn segments(&self) -> impl Iterator<Item = &BitSegment> {
        self.segments.values()
    }

    /// Register width in bytes, inferred from the highest segment `msb`
    ///
    /// A register without segments still occupies one byte.
    pub fn byte_len(&self) -> usize {
        let max_msb = self.segments.values().map(BitSegment::msb).max().unwrap_or(0);
        usize::from(max_msb) / 8 + 1
    }

    /// Read the register and redistribute the bytes into every segment
    ///
    /// All segments are updated in place. A failed transfer leaves them at
    /// their previous values.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the register is not readable; the transport is
    ///   not called in that case
    /// - `TransportRead` wrapping the transport's error
    pub fn read<T: Transport>(&mut self, transport: &mut T) -> Result<(), Error<T::Error>> {
        if !self.access.readable() {
            return Err(Error::PermissionDenied);
        }

        let mut buf = vec![0u8; self.byte_len()];
        transport.read_bytes(self.dev_addr, self.addr, &mut buf)?;

        for segment in self.segments.values_mut() {
            segment.load_bytes(&buf);
        }
        Ok(())
    }

    /// Reassemble all segments into bytes and write them to the device
    ///
    /// Bits not covered by any segment are written as 0. Where segments
    /// overlap, the segment later in name order wins (overlap is the
    /// caller's responsibility). Segment state is not modified.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if the register is not writable; the transport is
    ///   not called in that case
    /// - `TransportWrite` if the transport returns the failure status value
    pub fn write<T: Transport>(&self, transport: &mut T) -> Result<(), Error<T::Error>> {
        if !self.access.writable() {
            return Err(Error::PermissionDenied);
        }

        let mut buf = vec![0u8; self.byte_len()];
        for segment in self.segments.values() {
            segment.store_bytes(&mut buf);
        }

        if transport.write_bytes(self.dev_addr, self.addr, &buf) == WRITE_FAILURE {
            return Err(Error::TransportWrite);
        }
        Ok(())
    }
}
