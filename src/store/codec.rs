//! Field encoding and decoding
//!
//! Every field lives at a caller-supplied offset. Prefixed kinds reserve two
//! bytes for a little-endian `u16` payload length directly in front of the
//! payload:
//!
//! ```text
//! offset      offset+2
//! [len lo][len hi][payload ...]      boolean, bytes, text
//! [payload ...]                      raw
//! ```
//!
//! All operations return `StoreError::InvalidSize` without touching the
//! device while the store has `INVALID_SIZE` set. That is the only gate:
//! offsets are not checked against the block size, so a layout that
//! overruns the device fails with `StoreError::Device` instead.

use super::config::LENGTH_PREFIX_LEN;
use super::error::{Result, StoreError};
use super::manager::StoreManager;
use crate::logging::{log_debug, Logger};
use crate::platform::EepromInterface;

impl<D: EepromInterface, L: Logger> StoreManager<D, L> {
    /// Write a 2-byte little-endian length at `offset`
    pub fn write_length_prefix(&mut self, offset: usize, len: u16) -> Result<()> {
        self.ensure_size()?;

        let [lo, hi] = len.to_le_bytes();
        self.put(offset, lo)?;
        self.put(offset + 1, hi)
    }

    /// Read the 2-byte little-endian length at `offset`
    pub fn read_length_prefix(&mut self, offset: usize) -> Result<u16> {
        self.ensure_size()?;

        let lo = self.get(offset)?;
        let hi = self.get(offset + 1)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Store a boolean: prefix `1`, then `0` or `1` at `offset + 2`
    pub fn write_boolean(&mut self, offset: usize, value: bool) -> Result<()> {
        self.ensure_size()?;
        log_debug!(self, "eeprom: store boolean at {}", offset);

        self.write_length_prefix(offset, 1)?;
        self.put(offset + LENGTH_PREFIX_LEN, value as u8)
    }

    /// Restore a boolean
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidBooleanEncoding` if the stored byte is
    /// neither 0 nor 1.
    pub fn read_boolean(&mut self, offset: usize) -> Result<bool> {
        self.ensure_size()?;
        log_debug!(self, "eeprom: restore boolean from {}", offset);

        match self.get(offset + LENGTH_PREFIX_LEN)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StoreError::InvalidBooleanEncoding(other)),
        }
    }

    /// Store `data` verbatim at `offset`, without length prefix
    pub fn write_raw(&mut self, data: &[u8], offset: usize) -> Result<()> {
        self.ensure_size()?;
        log_debug!(self, "eeprom: store raw at {} len={}", offset, data.len());

        for (i, &byte) in data.iter().enumerate() {
            self.put(offset + i, byte)?;
        }
        Ok(())
    }

    /// Restore up to `len` raw bytes from `offset` into `buf`
    ///
    /// Reads `min(len, buf.len())` bytes; `buf.len()` is the field's
    /// maximum length. Returns the number of bytes read.
    pub fn read_raw(&mut self, offset: usize, len: usize, buf: &mut [u8]) -> Result<usize> {
        self.ensure_size()?;
        log_debug!(
            self,
            "eeprom: restore raw from {} len={} max={}",
            offset,
            len,
            buf.len()
        );

        let count = len.min(buf.len());
        for (i, slot) in buf[..count].iter_mut().enumerate() {
            *slot = self.get(offset + i)?;
        }
        Ok(count)
    }

    /// Store `data` with a length prefix at `offset`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::FieldTooLong` if `data` does not fit a `u16` length.
    pub fn write_length_prefixed_bytes(&mut self, data: &[u8], offset: usize) -> Result<()> {
        self.ensure_size()?;
        let len = u16::try_from(data.len()).map_err(|_| StoreError::FieldTooLong)?;

        self.write_length_prefix(offset, len)?;
        for (i, &byte) in data.iter().enumerate() {
            self.put(offset + LENGTH_PREFIX_LEN + i, byte)?;
        }
        Ok(())
    }

    /// Restore the payload of a prefixed field into `buf`
    ///
    /// `len` is supplied by the caller, usually from
    /// [`read_length_prefix`](Self::read_length_prefix). Reads
    /// `min(len, buf.len())` bytes starting at `offset + 2`.
    pub fn read_length_prefixed_bytes(
        &mut self,
        offset: usize,
        len: usize,
        buf: &mut [u8],
    ) -> Result<usize> {
        self.read_raw(offset + LENGTH_PREFIX_LEN, len, buf)
    }

    /// Store text with a length prefix
    ///
    /// Leading and trailing whitespace is trimmed, then the text is cut to
    /// at most `max_len` bytes. The cut never splits a UTF-8 sequence, so
    /// ASCII text is stored with exactly `max_len` bytes.
    pub fn write_text(&mut self, text: &str, max_len: usize, offset: usize) -> Result<()> {
        self.ensure_size()?;

        let trimmed = text.trim();
        let end = floor_char_boundary(trimmed, max_len);
        self.write_length_prefixed_bytes(&trimmed.as_bytes()[..end], offset)
    }

    /// Restore text stored with [`write_text`](Self::write_text)
    ///
    /// Reads the prefix at `offset`, then `min(len, max_len)` payload bytes.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::BufferTooSmall` if the payload exceeds `N` bytes
    /// and `StoreError::InvalidTextEncoding` if it is not valid UTF-8.
    pub fn read_text<const N: usize>(
        &mut self,
        offset: usize,
        max_len: usize,
    ) -> Result<heapless::String<N>> {
        self.ensure_size()?;

        let len = self.read_length_prefix(offset)? as usize;
        let count = len.min(max_len);
        if count > N {
            return Err(StoreError::BufferTooSmall);
        }

        let mut bytes = heapless::Vec::<u8, N>::new();
        for i in 0..count {
            let byte = self.get(offset + LENGTH_PREFIX_LEN + i)?;
            bytes.push(byte).map_err(|_| StoreError::BufferTooSmall)?;
        }

        let text = core::str::from_utf8(&bytes).map_err(|_| StoreError::InvalidTextEncoding)?;
        let mut out = heapless::String::<N>::new();
        out.push_str(text).map_err(|_| StoreError::BufferTooSmall)?;
        Ok(out)
    }
}

/// Largest index `<= max` that lies on a char boundary of `text`
fn floor_char_boundary(text: &str, max: usize) -> usize {
    if max >= text.len() {
        return text.len();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockEeprom;
    use crate::store::{StoreConfig, StoreStatus};

    fn store() -> StoreManager<MockEeprom<128>> {
        let config = StoreConfig::default().with_block_size(128).with_magic(0x7e);
        StoreManager::new(MockEeprom::new(), config)
    }

    #[test]
    fn test_length_prefix_is_little_endian() {
        let mut store = store();

        store.write_length_prefix(10, 0x0102).unwrap();

        assert_eq!(store.device().get_contents(10, 2), &[0x02, 0x01]);
        assert_eq!(store.read_length_prefix(10).unwrap(), 0x0102);
    }

    #[test]
    fn test_boolean_round_trip() {
        let mut store = store();

        store.write_boolean(5, true).unwrap();
        assert!(store.read_boolean(5).unwrap());
        assert_eq!(store.device().get_contents(5, 3), &[1, 0, 1]);

        store.write_boolean(5, false).unwrap();
        assert!(!store.read_boolean(5).unwrap());
        assert_eq!(store.read_length_prefix(5).unwrap(), 1);
    }

    #[test]
    fn test_boolean_rejects_corrupt_byte() {
        let mut store = store();

        store.write_boolean(5, true).unwrap();
        store.write_raw(&[2], 7).unwrap();

        assert_eq!(
            store.read_boolean(5),
            Err(StoreError::InvalidBooleanEncoding(2))
        );
    }

    #[test]
    fn test_raw_has_no_prefix() {
        let mut store = store();

        store.write_raw(&[0xde, 0xad, 0xbe, 0xef], 20).unwrap();
        assert_eq!(store.device().get_contents(20, 4), &[0xde, 0xad, 0xbe, 0xef]);

        let mut buf = [0u8; 4];
        assert_eq!(store.read_raw(20, 4, &mut buf).unwrap(), 4);
        assert_eq!(buf, [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_raw_read_clamps_to_buffer() {
        let mut store = store();
        store.write_raw(b"abcdef", 20).unwrap();

        let mut buf = [0u8; 3];
        assert_eq!(store.read_raw(20, 6, &mut buf).unwrap(), 3);
        assert_eq!(&buf, b"abc");
    }

    #[test]
    fn test_raw_read_zero_length_is_empty() {
        let mut store = store();

        let mut buf = [0xffu8; 4];
        assert_eq!(store.read_raw(20, 0, &mut buf).unwrap(), 0);
        assert_eq!(buf, [0xff; 4]);
    }

    #[test]
    fn test_length_prefixed_bytes_round_trip() {
        let mut store = store();
        let data = [0x00, 0x7f, 0x80, 0xff, 0x0a];

        store.write_length_prefixed_bytes(&data, 30).unwrap();

        let len = store.read_length_prefix(30).unwrap() as usize;
        assert_eq!(len, data.len());

        let mut buf = [0u8; 16];
        let count = store.read_length_prefixed_bytes(30, len, &mut buf).unwrap();
        assert_eq!(&buf[..count], &data);
    }

    #[test]
    fn test_length_prefixed_bytes_too_long() {
        let mut store = store();
        let data = [0u8; u16::MAX as usize + 1];

        assert_eq!(
            store.write_length_prefixed_bytes(&data, 30),
            Err(StoreError::FieldTooLong)
        );
        assert_eq!(store.device().write_count(), 0);
    }

    #[test]
    fn test_text_trimmed() {
        let mut store = store();

        store.write_text("  my-node \t\n", 32, 40).unwrap();

        assert_eq!(store.read_length_prefix(40).unwrap(), 7);
        let text = store.read_text::<32>(40, 32).unwrap();
        assert_eq!(text.as_str(), "my-node");
    }

    #[test]
    fn test_text_truncated_to_max_len() {
        let mut store = store();

        store.write_text("abcdefghijklmnop", 8, 40).unwrap();

        assert_eq!(store.read_length_prefix(40).unwrap(), 8);
        assert_eq!(store.read_text::<32>(40, 32).unwrap().as_str(), "abcdefgh");
        // Byte after the payload untouched
        assert_eq!(store.device().get_contents(50, 1), &[0]);
    }

    #[test]
    fn test_text_truncation_keeps_utf8_intact() {
        let mut store = store();

        // "é" is two bytes; a 4-byte cut would split the second one
        store.write_text("aéé", 4, 40).unwrap();

        assert_eq!(store.read_length_prefix(40).unwrap(), 3);
        assert_eq!(store.read_text::<8>(40, 8).unwrap().as_str(), "aé");
    }

    #[test]
    fn test_text_read_respects_max_len() {
        let mut store = store();
        store.write_text("abcdef", 32, 40).unwrap();

        assert_eq!(store.read_text::<32>(40, 3).unwrap().as_str(), "abc");
    }

    #[test]
    fn test_text_read_buffer_too_small() {
        let mut store = store();
        store.write_text("abcdef", 32, 40).unwrap();

        assert_eq!(store.read_text::<4>(40, 32), Err(StoreError::BufferTooSmall));
    }

    #[test]
    fn test_text_read_invalid_utf8() {
        let mut store = store();
        store.write_length_prefixed_bytes(&[0x66, 0xff, 0x66], 40).unwrap();

        assert_eq!(
            store.read_text::<8>(40, 8),
            Err(StoreError::InvalidTextEncoding)
        );
    }

    #[test]
    fn test_empty_text() {
        let mut store = store();
        store.write_text("   ", 32, 40).unwrap();

        assert_eq!(store.read_length_prefix(40).unwrap(), 0);
        assert!(store.read_text::<8>(40, 32).unwrap().is_empty());
    }

    #[test]
    fn test_writes_mark_modified() {
        let mut store = store();
        assert!(!store.status().contains(StoreStatus::MODIFIED));

        store.write_boolean(5, true).unwrap();
        assert!(store.status().contains(StoreStatus::MODIFIED));
    }

    #[test]
    fn test_no_offset_bounds_check() {
        let mut store = store();

        // Field overruns the 128-byte device: the device reports it
        let result = store.write_raw(&[1, 2, 3, 4], 126);
        assert!(matches!(result, Err(StoreError::Device(_))));
        // Bytes before the overrun were written
        assert_eq!(store.device().get_contents(126, 2), &[1, 2]);
    }

    #[test]
    fn test_size_gate_blocks_all_field_access() {
        let config = StoreConfig::default().with_block_size(0).with_magic(0x7e);
        let mut store = StoreManager::new(MockEeprom::<64>::new(), config);
        let mut buf = [0u8; 4];

        assert_eq!(store.write_length_prefix(5, 1), Err(StoreError::InvalidSize));
        assert_eq!(store.read_length_prefix(5), Err(StoreError::InvalidSize));
        assert_eq!(store.write_boolean(5, true), Err(StoreError::InvalidSize));
        assert_eq!(store.read_boolean(5), Err(StoreError::InvalidSize));
        assert_eq!(store.write_raw(b"ab", 5), Err(StoreError::InvalidSize));
        assert_eq!(store.read_raw(5, 2, &mut buf), Err(StoreError::InvalidSize));
        assert_eq!(
            store.write_length_prefixed_bytes(b"ab", 5),
            Err(StoreError::InvalidSize)
        );
        assert_eq!(
            store.read_length_prefixed_bytes(5, 2, &mut buf),
            Err(StoreError::InvalidSize)
        );
        assert_eq!(store.write_text("ab", 8, 5), Err(StoreError::InvalidSize));
        assert_eq!(store.read_text::<8>(5, 8), Err(StoreError::InvalidSize));

        assert_eq!(store.device().write_count(), 0);
        assert!(store.device().contents().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_floor_char_boundary() {
        assert_eq!(floor_char_boundary("abc", 10), 3);
        assert_eq!(floor_char_boundary("abc", 2), 2);
        assert_eq!(floor_char_boundary("aé", 2), 1);
        assert_eq!(floor_char_boundary("", 0), 0);
    }
}
