//! Store configuration
//!
//! Fixed header layout constants, per-MCU size limits and the
//! [`StoreConfig`] handed to [`StoreManager`](super::StoreManager).
//!
//! Defaults for the magic byte and the maximum block size are taken at build
//! time from `EEPROM_MAGIC` and `EEPROM_MAX_SIZE` (see `build.rs`).

use crate::checksum::ChecksumKind;
use crate::logging::LogLevel;

/// Offset of the magic byte
pub const MAGIC_OFFSET: usize = 0;

/// Size of the magic byte
pub const MAGIC_LEN: usize = 1;

/// Offset of the stored checksum
pub const CRC_OFFSET: usize = MAGIC_OFFSET + MAGIC_LEN;

/// Size of the stored checksum (raw, no length prefix)
pub const CRC_LEN: usize = 4;

/// First byte of the data region
pub const DATA_REGION_START: usize = CRC_OFFSET + CRC_LEN;

/// Size of the little-endian length prefix in front of prefixed fields
pub const LENGTH_PREFIX_LEN: usize = 2;

/// Magic byte used when no build-time override is given
pub const DEFAULT_MAGIC: u8 = 0x7e;

/// Largest EEPROM supported when no build-time override is given
pub const DEFAULT_MAX_SIZE: usize = 4096;

/// EEPROM size limits of supported MCUs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformProfile {
    Atmega8,
    Atmega168,
    Atmega328P,
    Atmega32U4,
    Atmega1280,
    Atmega2560,
    /// Flash-backed EEPROM emulation, up to one sector
    Esp8266,
}

impl PlatformProfile {
    /// Maximum EEPROM size in bytes
    pub const fn max_size(self) -> usize {
        match self {
            PlatformProfile::Atmega8 | PlatformProfile::Atmega168 => 512,
            PlatformProfile::Atmega328P | PlatformProfile::Atmega32U4 => 1024,
            PlatformProfile::Atmega1280
            | PlatformProfile::Atmega2560
            | PlatformProfile::Esp8266 => 4096,
        }
    }

    /// Whether writes must be committed explicitly
    pub const fn needs_commit(self) -> bool {
        matches!(self, PlatformProfile::Esp8266)
    }
}

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of bytes managed, `0 < block_size <= platform_max`
    pub block_size: usize,
    /// Non-zero identity/version byte
    pub magic: u8,
    /// Log verbosity
    pub log_level: LogLevel,
    /// Upper bound for `block_size`
    pub platform_max: usize,
    /// Checksum algorithm for the data region
    pub checksum: ChecksumKind,
    /// Require a matching checksum in `is_valid`
    pub strict_crc: bool,
}

impl StoreConfig {
    /// Configuration sized for a platform profile
    pub fn for_platform(profile: PlatformProfile) -> Self {
        let max = profile.max_size();
        Self {
            block_size: max,
            platform_max: max,
            ..Self::default()
        }
    }

    /// Set the block size
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the magic byte
    pub fn with_magic(mut self, magic: u8) -> Self {
        self.magic = magic;
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Set the checksum algorithm
    pub fn with_checksum(mut self, checksum: ChecksumKind) -> Self {
        self.checksum = checksum;
        self
    }

    /// Enable or disable checksum verification in `is_valid`
    pub fn with_strict_crc(mut self, strict_crc: bool) -> Self {
        self.strict_crc = strict_crc;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let platform_max = build_max_size();
        Self {
            block_size: platform_max,
            magic: build_magic(),
            log_level: LogLevel::Quiet,
            platform_max,
            checksum: ChecksumKind::Nibble,
            strict_crc: false,
        }
    }
}

/// Magic byte from the build environment
pub fn build_magic() -> u8 {
    parse_number(env!("EEPROM_MAGIC"))
        .and_then(|value| u8::try_from(value).ok())
        .filter(|&magic| magic != 0)
        .unwrap_or(DEFAULT_MAGIC)
}

/// Maximum block size from the build environment
pub fn build_max_size() -> usize {
    parse_number(env!("EEPROM_MAX_SIZE"))
        .filter(|&size| size > 0)
        .unwrap_or(DEFAULT_MAX_SIZE)
}

/// Parse a decimal or `0x`-prefixed hexadecimal number
fn parse_number(text: &str) -> Option<usize> {
    let text = text.trim();
    match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(MAGIC_OFFSET, 0);
        assert_eq!(CRC_OFFSET, 1);
        assert_eq!(DATA_REGION_START, 5);
    }

    #[test]
    fn test_platform_max_sizes() {
        assert_eq!(PlatformProfile::Atmega168.max_size(), 512);
        assert_eq!(PlatformProfile::Atmega328P.max_size(), 1024);
        assert_eq!(PlatformProfile::Atmega2560.max_size(), 4096);
        assert_eq!(PlatformProfile::Esp8266.max_size(), 4096);
        assert!(PlatformProfile::Esp8266.needs_commit());
        assert!(!PlatformProfile::Atmega328P.needs_commit());
    }

    #[test]
    fn test_for_platform() {
        let config = StoreConfig::for_platform(PlatformProfile::Atmega328P).with_block_size(256);
        assert_eq!(config.platform_max, 1024);
        assert_eq!(config.block_size, 256);
        assert_eq!(config.log_level, LogLevel::Quiet);
        assert!(!config.strict_crc);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0x7e"), Some(0x7e));
        assert_eq!(parse_number("0X7E"), Some(0x7e));
        assert_eq!(parse_number(" 4096 "), Some(4096));
        assert_eq!(parse_number("nope"), None);
    }

    #[test]
    fn test_build_defaults_are_usable() {
        assert_ne!(build_magic(), 0);
        assert!(build_max_size() > DATA_REGION_START);
    }
}
