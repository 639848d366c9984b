//! Device-level register tables
//!
//! A [`RegisterTable`] collects every register of one I2C device, owns the
//! transport handle they share, and offers name-based convenience operations
//! that compose register and segment primitives.
//!
//! The table is synchronous and single-owner: every operation takes
//! `&mut self` and blocks until the transport returns. Callers needing
//! concurrent access must serialize it themselves.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::register::{Access, Register};
use crate::segment::BitSegment;
use crate::transport::Transport;
use crate::Error;

/// All registers of one I2C device
pub struct RegisterTable<T> {
    dev_addr: u8,
    transport: T,
    registers: BTreeMap<String, Register>,
}

impl<T: Transport> RegisterTable<T> {
    /// Create an empty table for the device at `dev_addr`
    pub fn new(dev_addr: u8, transport: T) -> Self {
        Self {
            dev_addr,
            transport,
            registers: BTreeMap::new(),
        }
    }

    /// I2C address of the device
    pub fn dev_addr(&self) -> u8 {
        self.dev_addr
    }

    /// Consume the table and return the transport
    pub fn free(self) -> T {
        self.transport
    }

    /// Add a register at device address `addr`
    ///
    /// Returns the created register so segment definitions chain directly:
    ///
    /// ```ignore
    /// table
    ///     .add_register("ACQ_COMMAND", 0x00, Access::WriteOnly)?
    ///     .add_segment("COMMAND", 0, 7, &[false; 8])?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if a register with this name already exists;
    /// the table is unchanged in that case.
    pub fn add_register(
        &mut self,
        name: &str,
        addr: u8,
        access: Access,
    ) -> Result<&mut Register, Error<T::Error>> {
        if self.registers.contains_key(name) {
            return Err(Error::DuplicateName);
        }

        let register = Register::new(name, self.dev_addr, addr, access);
        Ok(self.registers.entry(String::from(name)).or_insert(register))
    }

    /// Look up a register by name
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no register with this name exists.
    pub fn register(&self, name: &str) -> Result<&Register, Error<T::Error>> {
        self.registers.get(name).ok_or(Error::NotFound)
    }

    /// Look up a register by name for mutation
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no register with this name exists.
    pub fn register_mut(&mut self, name: &str) -> Result<&mut Register, Error<T::Error>> {
        self.registers.get_mut(name).ok_or(Error::NotFound)
    }

    /// Look up a segment by register and segment name
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if either name is unknown.
    pub fn segment(&self, reg_name: &str, seg_name: &str) -> Result<&BitSegment, Error<T::Error>> {
        self.register(reg_name)?.segment(seg_name).map_err(Error::widen)
    }

    /// Read a register from the device, updating all its segments
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied`, or `TransportRead`.
    pub fn read(&mut self, name: &str) -> Result<(), Error<T::Error>> {
        let register = self.registers.get_mut(name).ok_or(Error::NotFound)?;
        register.read(&mut self.transport)
    }

    /// Write a register's current segment values to the device
    ///
    /// # Errors
    ///
    /// `NotFound`, `PermissionDenied`, or `TransportWrite`.
    pub fn write(&mut self, name: &str) -> Result<(), Error<T::Error>> {
        let register = self.registers.get(name).ok_or(Error::NotFound)?;
        register.write(&mut self.transport)
    }

    /// Set a segment's bits, optionally writing the register afterwards
    ///
    /// # Errors
    ///
    /// `NotFound`, `LengthMismatch` (segment untouched, no write issued), or
    /// the errors of [`write`](Self::write) when `write_after` is set.
    pub fn set_bits(
        &mut self,
        reg_name: &str,
        seg_name: &str,
        bits: &[bool],
        write_after: bool,
    ) -> Result<(), Error<T::Error>> {
        let register = self.registers.get_mut(reg_name).ok_or(Error::NotFound)?;
        register
            .segment_mut(seg_name)
            .map_err(Error::widen)?
            .set(bits)
            .map_err(Error::widen)?;

        if write_after {
            register.write(&mut self.transport)?;
        }
        Ok(())
    }

    /// Set a segment from an integer, optionally writing the register
    ///
    /// Values at or above `2^width` truncate to `value mod 2^width`, as
    /// [`BitSegment::set_from_int`] does.
    ///
    /// # Errors
    ///
    /// `NotFound`, or the errors of [`write`](Self::write) when `write_after`
    /// is set.
    pub fn set_bits_from_int(
        &mut self,
        reg_name: &str,
        seg_name: &str,
        value: u64,
        write_after: bool,
    ) -> Result<(), Error<T::Error>> {
        let register = self.registers.get_mut(reg_name).ok_or(Error::NotFound)?;
        register
            .segment_mut(seg_name)
            .map_err(Error::widen)?
            .set_from_int(value);

        if write_after {
            register.write(&mut self.transport)?;
        }
        Ok(())
    }

    /// Read a segment as an unsigned integer
    ///
    /// With `read_first` the register is fetched from the device before the
    /// conversion; otherwise the cached bit values are used.
    ///
    /// # Errors
    ///
    /// `NotFound`, or the errors of [`read`](Self::read) when `read_first` is
    /// set.
    pub fn to_int(
        &mut self,
        reg_name: &str,
        seg_name: &str,
        read_first: bool,
    ) -> Result<u64, Error<T::Error>> {
        let register = self.registers.get_mut(reg_name).ok_or(Error::NotFound)?;
        if read_first {
            register.read(&mut self.transport)?;
        }
        Ok(register.segment(seg_name).map_err(Error::widen)?.to_int())
    }

    /// Read a segment as a two's-complement signed integer
    ///
    /// # Errors
    ///
    /// Same as [`to_int`](Self::to_int).
    pub fn to_twos_complement_int(
        &mut self,
        reg_name: &str,
        seg_name: &str,
        read_first: bool,
    ) -> Result<i64, Error<T::Error>> {
        let register = self.registers.get_mut(reg_name).ok_or(Error::NotFound)?;
        if read_first {
            register.read(&mut self.transport)?;
        }
        Ok(register
            .segment(seg_name)
            .map_err(Error::widen)?
            .to_twos_complement_int())
    }
}
