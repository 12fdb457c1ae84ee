//! EEPROM interface trait
//!
//! This module defines the byte-addressable storage interface that platform
//! implementations must provide. The record layout engine only ever talks to
//! storage through this trait.

use crate::platform::Result;

/// EEPROM interface trait
///
/// Models the on-chip EEPROM of AVR parts and the flash-backed EEPROM
/// emulation of the ESP8266.
///
/// # Characteristics
///
/// - Byte addressable, offsets start at 0
/// - `begin` configures how many bytes are mapped (required on ESP8266,
///   a no-op on AVR)
/// - Writes may be buffered until `commit` (ESP8266); AVR writes are
///   persistent immediately and `commit` is a no-op
///
/// # Safety Invariants
///
/// - Only one owner per device (no concurrent access)
/// - Reads and writes beyond the configured size must fail, not wrap
pub trait EepromInterface {
    /// Read one byte at `offset`
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::OutOfBounds` if `offset` is beyond the configured size.
    fn read(&mut self, offset: usize) -> Result<u8>;

    /// Write one byte at `offset`
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::OutOfBounds` if `offset` is beyond the configured size.
    /// Returns `DeviceError::WriteFailed` if the write operation fails.
    fn write(&mut self, offset: usize, value: u8) -> Result<()>;

    /// Configure the number of bytes mapped by the device
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::CapacityExceeded` if `size` exceeds [`capacity`](Self::capacity).
    fn begin(&mut self, size: usize) -> Result<()>;

    /// Flush buffered writes to persistent media
    fn commit(&mut self) -> Result<()>;

    /// Physical capacity in bytes
    fn capacity(&self) -> usize;
}

impl<T: EepromInterface + ?Sized> EepromInterface for &mut T {
    fn read(&mut self, offset: usize) -> Result<u8> {
        (**self).read(offset)
    }

    fn write(&mut self, offset: usize, value: u8) -> Result<()> {
        (**self).write(offset, value)
    }

    fn begin(&mut self, size: usize) -> Result<()> {
        (**self).begin(size)
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}
