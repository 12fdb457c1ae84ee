//! CRC32 calculation for EEPROM content validation
//!
//! Two algorithms are available:
//!
//! - [`ChecksumKind::Nibble`] (default): the nibble-table CRC used by
//!   existing EEPROM images. Each byte goes through two 16-entry table
//!   lookups followed by an inversion of the accumulator. The inversion
//!   inside the loop makes the result differ from textbook CRC-32, so
//!   this variant must be reproduced bit for bit to read old images.
//! - [`ChecksumKind::IsoHdlc`]: standard CRC-32-ISO-HDLC (Ethernet, ZIP,
//!   PNG) for images that do not need compatibility.

use crc::{Crc, Digest, CRC_32_ISO_HDLC};

/// Reflected CRC-32 polynomial taps for each nibble value
const NIBBLE_TABLE: [u32; 16] = [
    0x0000_0000,
    0x1db7_1064,
    0x3b6e_20c8,
    0x26d9_30ac,
    0x76dc_4190,
    0x6b6b_51f4,
    0x4db2_6158,
    0x5005_713c,
    0xedb8_8320,
    0xf00f_9344,
    0xd6d6_a3e8,
    0xcb61_b38c,
    0x9b64_c2b0,
    0x86d3_d2d4,
    0xa00a_e278,
    0xbdbd_f21c,
];

/// CRC32 algorithm (ISO HDLC / Ethernet / ZIP)
static CRC32_ISO_HDLC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Checksum algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumKind {
    /// Nibble-table CRC with per-byte inversion (stored image format)
    #[default]
    Nibble,
    /// Standard CRC-32-ISO-HDLC
    IsoHdlc,
}

impl ChecksumKind {
    /// Start an incremental computation
    pub fn digest(self) -> Crc32Digest {
        match self {
            ChecksumKind::Nibble => Crc32Digest::Nibble(Crc32Nibble::new()),
            ChecksumKind::IsoHdlc => Crc32Digest::IsoHdlc(CRC32_ISO_HDLC.digest()),
        }
    }

    /// Checksum of a complete slice
    pub fn checksum(self, data: &[u8]) -> u32 {
        match self {
            ChecksumKind::Nibble => {
                let mut crc = Crc32Nibble::new();
                crc.update(data);
                crc.value()
            }
            ChecksumKind::IsoHdlc => CRC32_ISO_HDLC.checksum(data),
        }
    }
}

/// Incremental nibble-table CRC accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32Nibble {
    acc: u32,
}

impl Crc32Nibble {
    /// Accumulator starting at all ones
    pub const fn new() -> Self {
        Self { acc: !0 }
    }

    /// Feed one byte
    pub fn update_byte(&mut self, byte: u8) {
        let byte = byte as u32;
        let mut acc = self.acc;
        acc = NIBBLE_TABLE[((acc ^ byte) & 0x0f) as usize] ^ (acc >> 4);
        acc = NIBBLE_TABLE[(((acc ^ byte) >> 4) & 0x0f) as usize] ^ (acc >> 4);
        self.acc = !acc;
    }

    /// Feed a slice
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.update_byte(byte);
        }
    }

    /// Current value (no finalization step)
    pub fn value(&self) -> u32 {
        self.acc
    }
}

impl Default for Crc32Nibble {
    fn default() -> Self {
        Self::new()
    }
}

/// Running checksum for either algorithm
pub enum Crc32Digest {
    Nibble(Crc32Nibble),
    IsoHdlc(Digest<'static, u32>),
}

impl Crc32Digest {
    /// Feed one byte
    pub fn update_byte(&mut self, byte: u8) {
        match self {
            Crc32Digest::Nibble(crc) => crc.update_byte(byte),
            Crc32Digest::IsoHdlc(digest) => digest.update(&[byte]),
        }
    }

    /// Final checksum value
    pub fn finalize(self) -> u32 {
        match self {
            Crc32Digest::Nibble(crc) => crc.value(),
            Crc32Digest::IsoHdlc(digest) => digest.finalize(),
        }
    }
}

/// Calculate the nibble-table CRC of `data`
///
/// # Example
///
/// ```
/// use eeprom_layout::checksum::calculate_crc32;
///
/// assert_eq!(calculate_crc32(b"123456789"), 0x4b88_27cf);
/// assert_eq!(calculate_crc32(b""), 0xffff_ffff);
/// ```
pub fn calculate_crc32(data: &[u8]) -> u32 {
    ChecksumKind::Nibble.checksum(data)
}

/// Validate data against a nibble-table CRC
///
/// Returns `true` if the checksum matches.
pub fn validate_crc32(data: &[u8], expected_crc: u32) -> bool {
    calculate_crc32(data) == expected_crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_known_values() {
        let test_cases = [
            (b"" as &[u8], 0xffff_ffffu32),
            (b"a", 0x550a_4c5f),
            (b"123456789", 0x4b88_27cf),
            (&[0u8; 59], 0x7b20_34b6),
        ];

        for (data, expected) in test_cases {
            assert_eq!(
                calculate_crc32(data),
                expected,
                "CRC mismatch for {:02x?}",
                data
            );
        }
    }

    #[test]
    fn test_iso_hdlc_check_value() {
        assert_eq!(ChecksumKind::IsoHdlc.checksum(b"123456789"), 0xCBF4_3926);
        assert_eq!(ChecksumKind::IsoHdlc.checksum(b""), 0);
    }

    #[test]
    fn test_digest_matches_slice_checksum() {
        let data = b"incremental checksum over a byte range";

        for kind in [ChecksumKind::Nibble, ChecksumKind::IsoHdlc] {
            let mut digest = kind.digest();
            for &byte in data {
                digest.update_byte(byte);
            }
            assert_eq!(digest.finalize(), kind.checksum(data));
        }
    }

    #[test]
    fn test_validate_crc32() {
        let data = b"Test data for CRC validation";
        let crc = calculate_crc32(data);

        assert!(validate_crc32(data, crc));
        assert!(!validate_crc32(data, crc ^ 1));
    }

    #[test]
    fn test_crc32_detects_every_single_bit_flip() {
        let data = *b"Original EEPROM data";
        let crc = calculate_crc32(&data);

        for index in 0..data.len() {
            for bit in 0..8 {
                let mut corrupted = data;
                corrupted[index] ^= 1 << bit;
                assert!(
                    !validate_crc32(&corrupted, crc),
                    "flip of bit {} in byte {} went undetected",
                    bit,
                    index
                );
            }
        }
    }

    #[test]
    fn test_crc32_same_data_same_result() {
        let data = b"Consistent data";
        assert_eq!(calculate_crc32(data), calculate_crc32(data));
    }
}
