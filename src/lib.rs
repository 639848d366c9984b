#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

extern crate alloc;

pub mod register;
pub mod segment;
pub mod table;
pub mod transport;

// Re-export main types
pub use register::{Access, Register};
pub use segment::BitSegment;
pub use table::RegisterTable;
pub use transport::{I2cTransport, Transport, WRITE_FAILURE, WRITE_OK};

use core::convert::Infallible;

/// Errors returned by register map operations
///
/// `E` is the transport's error type. Operations that never touch the bus
/// return `Error<Infallible>`; [`Error::widen`] recasts those for any
/// transport error type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A register or segment with this name already exists
    DuplicateName,
    /// No register or segment with the requested name
    NotFound,
    /// Segment bit range is invalid (`msb < lsb`, or wider than 64 bits)
    InvalidRange,
    /// Bit slice length does not match the segment width
    LengthMismatch {
        /// Segment width in bits
        expected: usize,
        /// Length of the provided bit slice
        actual: usize,
    },
    /// Register is not configured for the attempted read or write
    PermissionDenied,
    /// Transport read failed (contains the transport's error)
    TransportRead(E),
    /// Transport write reported the failure status value
    TransportWrite,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::TransportRead(error)
    }
}

impl Error<Infallible> {
    /// Recast an error from a bus-free operation for any transport error type
    pub fn widen<E>(self) -> Error<E> {
        match self {
            Self::DuplicateName => Error::DuplicateName,
            Self::NotFound => Error::NotFound,
            Self::InvalidRange => Error::InvalidRange,
            Self::LengthMismatch { expected, actual } => Error::LengthMismatch { expected, actual },
            Self::PermissionDenied => Error::PermissionDenied,
            Self::TransportRead(error) => match error {},
            Self::TransportWrite => Error::TransportWrite,
        }
    }
}
