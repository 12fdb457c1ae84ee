//! Record layout engine
//!
//! This module provides the [`StoreManager`] and everything it needs to lay
//! out typed fields over a raw EEPROM:
//!
//! - [`config`]: header offsets, platform limits, [`StoreConfig`]
//! - [`status`]: cumulative [`StoreStatus`] flags
//! - [`error`]: [`StoreError`] and the [`Result`] alias
//! - [`layout`]: named field tables, including the standard layout
//!
//! Field encoding (booleans, raw buffers, length-prefixed bytes and text) is
//! implemented directly on [`StoreManager`].

mod codec;
pub mod config;
pub mod error;
pub mod layout;
mod manager;
pub mod status;

pub use config::{
    PlatformProfile, StoreConfig, CRC_LEN, CRC_OFFSET, DATA_REGION_START, DEFAULT_MAGIC,
    LENGTH_PREFIX_LEN, MAGIC_LEN, MAGIC_OFFSET,
};
pub use error::{Result, StoreError};
pub use layout::{FieldData, FieldKind, FieldSpec, FieldValue, Layout, LayoutBuilder, LayoutError};
pub use manager::StoreManager;
pub use status::StoreStatus;
