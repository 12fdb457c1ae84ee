//! Field layout tables
//!
//! The engine itself never hard-codes where a field lives. A [`Layout`] maps
//! field names to `(offset, max_len, kind)` descriptors, laid out one after
//! another from the start of the data region.
//!
//! # Standard Layout
//!
//! [`Layout::standard`] reproduces the fields reserved by existing images:
//!
//! ```text
//! [Magic]            0    (1)
//! [CRC32]            1    (4)
//! [WLAN_SSID]        5    (2 + 32)
//! [WLAN_PASSPHRASE]  39   (2 + 64)
//! [SERVER_IP]        105  (2 + 19)
//! [SERVER_PORT]      126  (2 + 4)
//! [NODENAME]         132  (2 + 32)
//! [ADMIN_PASSWORD]   166  (2 + 32)
//! [extension data]   200  ...
//! ```

use core::fmt;

use super::config::{DATA_REGION_START, LENGTH_PREFIX_LEN};
use super::error::{Result, StoreError};
use super::manager::StoreManager;
use crate::logging::Logger;
use crate::platform::EepromInterface;

/// Maximum number of fields per layout
pub const MAX_FIELDS: usize = 32;

/// WLAN SSID (IEEE 802.11 maximum)
pub const WLAN_SSID: &str = "WLAN_SSID";
/// WLAN passphrase
pub const WLAN_PASSPHRASE: &str = "WLAN_PASSPHRASE";
/// Server address as dotted text
pub const SERVER_IP: &str = "SERVER_IP";
/// Server port as text
pub const SERVER_PORT: &str = "SERVER_PORT";
/// Generated node name
pub const NODENAME: &str = "NODENAME";
/// Admin password
pub const ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";

/// Maximum SSID length
pub const MAX_SSID_LEN: usize = 32;
/// Maximum passphrase length
pub const MAX_PASSPHRASE_LEN: usize = 64;
/// Maximum server IP length
pub const MAX_SERVER_IP_LEN: usize = 19;
/// Maximum server port length
pub const MAX_SERVER_PORT_LEN: usize = 4;
/// Maximum node name length
pub const MAX_NODENAME_LEN: usize = 32;
/// Maximum admin password length
pub const MAX_ADMIN_PASSWORD_LEN: usize = 32;

/// Payload kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Prefixed single byte, 0 or 1
    Boolean,
    /// Fixed-length bytes without prefix
    RawFixed,
    /// Prefixed bytes
    LengthPrefixedBytes,
    /// Prefixed UTF-8 text
    LengthPrefixedText,
}

impl FieldKind {
    /// Bytes reserved for the length prefix
    pub const fn prefix_len(self) -> usize {
        match self {
            FieldKind::RawFixed => 0,
            _ => LENGTH_PREFIX_LEN,
        }
    }

    /// Payload bytes reserved for a field of `max_len`
    pub const fn payload_len(self, max_len: usize) -> usize {
        match self {
            FieldKind::Boolean => 1,
            _ => max_len,
        }
    }

    /// Total bytes reserved for a field of `max_len`
    pub const fn reserved_len(self, max_len: usize) -> usize {
        self.prefix_len() + self.payload_len(max_len)
    }
}

/// Field descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name
    pub name: &'static str,
    /// Start of the field (prefix included)
    pub offset: usize,
    /// Maximum payload length
    pub max_len: usize,
    /// Payload kind
    pub kind: FieldKind,
}

impl FieldSpec {
    /// First byte after the field
    pub const fn end(&self) -> usize {
        self.offset + self.kind.reserved_len(self.max_len)
    }
}

/// Layout construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// Field would end beyond the block size
    Overflow,
    /// Field name already used
    DuplicateName,
    /// More than [`MAX_FIELDS`] fields
    TooManyFields,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Overflow => write!(f, "field exceeds block size"),
            LayoutError::DuplicateName => write!(f, "duplicate field name"),
            LayoutError::TooManyFields => write!(f, "too many fields"),
        }
    }
}

/// Ordered set of field descriptors
#[derive(Debug, Clone)]
pub struct Layout {
    fields: heapless::Vec<FieldSpec, MAX_FIELDS>,
    block_size: usize,
}

impl Layout {
    /// Start a layout for a device of `block_size` bytes
    pub fn builder(block_size: usize) -> LayoutBuilder {
        LayoutBuilder {
            fields: heapless::Vec::new(),
            next_offset: DATA_REGION_START,
            block_size,
        }
    }

    /// The standard field set
    pub fn standard(block_size: usize) -> core::result::Result<Self, LayoutError> {
        Ok(Self::builder(block_size)
            .field(WLAN_SSID, FieldKind::LengthPrefixedText, MAX_SSID_LEN)?
            .field(WLAN_PASSPHRASE, FieldKind::LengthPrefixedText, MAX_PASSPHRASE_LEN)?
            .field(SERVER_IP, FieldKind::LengthPrefixedText, MAX_SERVER_IP_LEN)?
            .field(SERVER_PORT, FieldKind::LengthPrefixedText, MAX_SERVER_PORT_LEN)?
            .field(NODENAME, FieldKind::LengthPrefixedText, MAX_NODENAME_LEN)?
            .field(ADMIN_PASSWORD, FieldKind::LengthPrefixedText, MAX_ADMIN_PASSWORD_LEN)?
            .build())
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields in offset order
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the layout has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First byte not claimed by any field
    pub fn end(&self) -> usize {
        self.fields
            .last()
            .map(FieldSpec::end)
            .unwrap_or(DATA_REGION_START)
    }

    /// Block size the layout was built for
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}

/// Builder appending fields back to back
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    fields: heapless::Vec<FieldSpec, MAX_FIELDS>,
    next_offset: usize,
    block_size: usize,
}

impl LayoutBuilder {
    /// Append a field after the previous one
    pub fn field(
        mut self,
        name: &'static str,
        kind: FieldKind,
        max_len: usize,
    ) -> core::result::Result<Self, LayoutError> {
        if self.fields.iter().any(|field| field.name == name) {
            return Err(LayoutError::DuplicateName);
        }

        let spec = FieldSpec {
            name,
            offset: self.next_offset,
            max_len,
            kind,
        };
        if spec.end() > self.block_size {
            return Err(LayoutError::Overflow);
        }

        self.fields
            .push(spec)
            .map_err(|_| LayoutError::TooManyFields)?;
        self.next_offset = spec.end();
        Ok(self)
    }

    /// Finish the layout
    pub fn build(self) -> Layout {
        Layout {
            fields: self.fields,
            block_size: self.block_size,
        }
    }
}

/// Value to write into a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldData<'a> {
    Bool(bool),
    Bytes(&'a [u8]),
    Text(&'a str),
}

/// Value read from a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<const N: usize> {
    Bool(bool),
    Bytes(heapless::Vec<u8, N>),
    Text(heapless::String<N>),
}

impl<D: EepromInterface, L: Logger> StoreManager<D, L> {
    /// Write a field described by `spec`
    ///
    /// Booleans take [`FieldData::Bool`], raw and prefixed byte fields take
    /// [`FieldData::Bytes`] and text fields take [`FieldData::Text`] (which is
    /// trimmed and truncated to `max_len`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::KindMismatch` for a value of the wrong kind and
    /// `StoreError::FieldTooLong` for bytes longer than `max_len`.
    pub fn write_field(&mut self, spec: &FieldSpec, data: FieldData<'_>) -> Result<()> {
        match (spec.kind, data) {
            (FieldKind::Boolean, FieldData::Bool(value)) => self.write_boolean(spec.offset, value),
            (FieldKind::RawFixed, FieldData::Bytes(bytes)) => {
                if bytes.len() > spec.max_len {
                    return Err(StoreError::FieldTooLong);
                }
                self.write_raw(bytes, spec.offset)
            }
            (FieldKind::LengthPrefixedBytes, FieldData::Bytes(bytes)) => {
                if bytes.len() > spec.max_len {
                    return Err(StoreError::FieldTooLong);
                }
                self.write_length_prefixed_bytes(bytes, spec.offset)
            }
            (FieldKind::LengthPrefixedText, FieldData::Text(text)) => {
                self.write_text(text, spec.max_len, spec.offset)
            }
            _ => Err(StoreError::KindMismatch),
        }
    }

    /// Read a field described by `spec`
    ///
    /// Raw fields always yield `max_len` bytes; prefixed fields yield
    /// `min(stored length, max_len)` bytes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::BufferTooSmall` if the payload exceeds `N` bytes.
    pub fn read_field<const N: usize>(&mut self, spec: &FieldSpec) -> Result<FieldValue<N>> {
        match spec.kind {
            FieldKind::Boolean => self.read_boolean(spec.offset).map(FieldValue::Bool),
            FieldKind::RawFixed => {
                let mut bytes = zeroed::<N>(spec.max_len)?;
                self.read_raw(spec.offset, spec.max_len, &mut bytes)?;
                Ok(FieldValue::Bytes(bytes))
            }
            FieldKind::LengthPrefixedBytes => {
                let len = (self.read_length_prefix(spec.offset)? as usize).min(spec.max_len);
                let mut bytes = zeroed::<N>(len)?;
                self.read_length_prefixed_bytes(spec.offset, len, &mut bytes)?;
                Ok(FieldValue::Bytes(bytes))
            }
            FieldKind::LengthPrefixedText => self
                .read_text::<N>(spec.offset, spec.max_len)
                .map(FieldValue::Text),
        }
    }
}

fn zeroed<const N: usize>(len: usize) -> Result<heapless::Vec<u8, N>> {
    let mut bytes = heapless::Vec::new();
    bytes
        .resize(len, 0)
        .map_err(|_| StoreError::BufferTooSmall)?;
    Ok(bytes)
}
