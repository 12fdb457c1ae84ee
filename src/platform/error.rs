//! Platform error types
//!
//! This module defines error types for EEPROM device operations.

use core::fmt;

/// Result type for device operations
pub type Result<T> = core::result::Result<T, DeviceError>;

/// EEPROM device errors
///
/// All device implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Offset lies outside the configured capacity
    OutOfBounds,
    /// Device has not been configured with `begin`
    NotInitialized,
    /// Requested size exceeds the physical capacity
    CapacityExceeded,
    /// Write operation failed
    WriteFailed,
    /// Commit to persistent media failed
    CommitFailed,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::OutOfBounds => write!(f, "offset out of bounds"),
            DeviceError::NotInitialized => write!(f, "device not initialized"),
            DeviceError::CapacityExceeded => write!(f, "requested size exceeds capacity"),
            DeviceError::WriteFailed => write!(f, "write failed"),
            DeviceError::CommitFailed => write!(f, "commit failed"),
        }
    }
}
