//! Store error types
//!
//! Provides error types for record layout operations.

use crate::platform::DeviceError;
use core::fmt;

/// Result type for store operations
pub type Result<T> = core::result::Result<T, StoreError>;

/// Errors from store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Block size outside `(0, platform_max]`; gates all field I/O
    InvalidSize,
    /// Configured magic is zero, or the stored magic does not match
    InvalidMagic,
    /// Stored checksum does not match the data region
    InvalidCrc,
    /// Boolean payload byte is neither 0 nor 1
    InvalidBooleanEncoding(u8),
    /// Text payload is not valid UTF-8
    InvalidTextEncoding,
    /// Destination buffer cannot hold the stored payload
    BufferTooSmall,
    /// Payload does not fit the 16-bit length prefix or the field's maximum length
    FieldTooLong,
    /// Value does not match the field kind
    KindMismatch,
    /// Underlying device failed
    Device(DeviceError),
}

impl From<DeviceError> for StoreError {
    fn from(err: DeviceError) -> Self {
        StoreError::Device(err)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidSize => write!(f, "invalid block size"),
            StoreError::InvalidMagic => write!(f, "invalid magic byte"),
            StoreError::InvalidCrc => write!(f, "checksum mismatch"),
            StoreError::InvalidBooleanEncoding(byte) => {
                write!(f, "invalid boolean encoding: {:#04x}", byte)
            }
            StoreError::InvalidTextEncoding => write!(f, "stored text is not valid UTF-8"),
            StoreError::BufferTooSmall => write!(f, "buffer too small for stored payload"),
            StoreError::FieldTooLong => write!(f, "payload exceeds field length"),
            StoreError::KindMismatch => write!(f, "value does not match field kind"),
            StoreError::Device(e) => write!(f, "device error: {}", e),
        }
    }
}
