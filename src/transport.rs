//! Byte-level transport contract and the embedded-hal adapter
//!
//! The register layers call into a [`Transport`] for all bus I/O. Any
//! concrete transport works: a hardware driver, a simulator, or a test mock.
//! [`I2cTransport`] adapts any [`embedded_hal::i2c::I2c`] bus.

/// Status value a transport returns from a failed write
///
/// Any other return value counts as success. This value-based failure channel
/// is part of the transport contract; do not convert transports to signal
/// write failure any other way.
pub const WRITE_FAILURE: u8 = 1;

/// Conventional status value for a successful write
pub const WRITE_OK: u8 = 0;

/// Byte-level read/write contract supplied by the embedding application
///
/// Both operations address a device by its I2C address and a register by its
/// byte address. Calls block until the transfer completes; this crate never
/// retries a failed transfer.
pub trait Transport {
    /// Error reported by failed reads
    type Error;

    /// Read `buf.len()` bytes starting at `reg_addr` into `buf`
    ///
    /// # Errors
    ///
    /// Any error aborts the enclosing register read, surfacing as
    /// [`Error::TransportRead`](crate::Error::TransportRead).
    fn read_bytes(&mut self, dev_addr: u8, reg_addr: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `bytes` starting at `reg_addr`
    ///
    /// Returns [`WRITE_FAILURE`] on failure; any other value is success.
    fn write_bytes(&mut self, dev_addr: u8, reg_addr: u8, bytes: &[u8]) -> u8;
}

/// [`Transport`] over any `embedded-hal` I2C bus
///
/// Reads use a `write_read` transaction (register address, then data);
/// writes prefix the data with the register address. Payloads are capped at
/// 32 data bytes per transfer.
pub struct I2cTransport<I2C> {
    i2c: I2C,
}

impl<I2C> I2cTransport<I2C> {
    /// Wrap an I2C peripheral
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consume the transport and return the I2C peripheral
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Transport for I2cTransport<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;

    fn read_bytes(&mut self, dev_addr: u8, reg_addr: u8, buf: &mut [u8]) -> Result<(), E> {
        self.i2c.write_read(dev_addr, &[reg_addr], buf)
    }

    fn write_bytes(&mut self, dev_addr: u8, reg_addr: u8, bytes: &[u8]) -> u8 {
        // Buffer holds 1 address byte + up to 32 data bytes
        let mut buffer = [0u8; 33];
        buffer[0] = reg_addr;
        let len = bytes.len().min(32);
        buffer[1..=len].copy_from_slice(&bytes[..len]);

        match self.i2c.write(dev_addr, &buffer[..=len]) {
            Ok(()) => WRITE_OK,
            Err(_) => WRITE_FAILURE,
        }
    }
}
