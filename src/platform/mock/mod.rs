//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for testing without requiring actual hardware. Mocks are always compiled so
//! integration tests and downstream crates can use them on the host.
//!
//! # Example
//!
//! ```
//! use eeprom_layout::platform::mock::MockEeprom;
//! use eeprom_layout::platform::traits::EepromInterface;
//!
//! let mut eeprom = MockEeprom::<512>::new();
//! eeprom.begin(256).unwrap();
//! assert_eq!(eeprom.capacity(), 512);
//! ```

mod eeprom;

pub use eeprom::MockEeprom;
