//! Platform abstraction layer
//!
//! This module provides the storage abstraction the record layout engine runs
//! on. Board support code implements [`EepromInterface`] for its EEPROM
//! driver; host tests use [`mock::MockEeprom`].

pub mod error;
pub mod mock;
pub mod traits;

// Re-export commonly used types
pub use error::{DeviceError, Result};
pub use traits::EepromInterface;
