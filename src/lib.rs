#![cfg_attr(not(test), no_std)]

//! eeprom_layout - Record layout engine for on-chip EEPROM
//!
//! Gives a raw, fixed-size EEPROM a self-describing layout:
//!
//! ```text
//! [Magic 1][CRC32 4][field][field]...
//! ```
//!
//! - a non-zero magic byte marks deliberately initialized content
//! - a CRC-32 over the data region detects corruption
//! - fields are booleans, raw buffers, or length-prefixed bytes/text at
//!   fixed offsets
//!
//! # Modules
//!
//! - [`platform`]: EEPROM device trait, device errors and the in-memory mock
//! - [`checksum`]: nibble-table CRC-32 and standard CRC-32-ISO-HDLC
//! - [`logging`]: injected leveled logger
//! - [`store`]: [`StoreManager`](store::StoreManager), field codec and layouts

pub mod checksum;
pub mod logging;
pub mod platform;
pub mod store;

pub use store::{StoreConfig, StoreError, StoreManager, StoreStatus};
