//! Mock EEPROM implementation for testing
//!
//! Provides in-memory EEPROM simulation for unit and integration tests.

use crate::platform::{error::DeviceError, traits::EepromInterface, Result};

/// Mock EEPROM implementation
///
/// Simulates a byte-addressable EEPROM of `N` bytes in memory. Supports:
/// - Read/write/begin/commit operations
/// - Fresh-media fill pattern (0x00 for AVR EEPROM, 0xFF for erased flash)
/// - Corruption injection for testing error handling
/// - Write and commit counting
/// - Power-loss simulation (writes silently dropped after a threshold)
///
/// # Example
///
/// ```
/// use eeprom_layout::platform::mock::MockEeprom;
/// use eeprom_layout::platform::traits::EepromInterface;
///
/// let mut eeprom = MockEeprom::<64>::new();
/// eeprom.begin(64).unwrap();
///
/// eeprom.write(0, 0x7e).unwrap();
/// assert_eq!(eeprom.read(0).unwrap(), 0x7e);
/// assert_eq!(eeprom.write_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockEeprom<const N: usize> {
    /// Backing storage
    storage: [u8; N],
    /// Size configured by `begin` (defaults to the full capacity)
    size: usize,
    /// Number of accepted single-byte writes
    writes: usize,
    /// Number of commits
    commits: usize,
    /// Number of begin calls
    begins: usize,
    /// Writes remaining before simulated power loss
    power_budget: Option<usize>,
}

impl<const N: usize> MockEeprom<N> {
    /// Create a mock with every byte cleared to zero (fresh AVR EEPROM)
    pub fn new() -> Self {
        Self::with_fill(0x00)
    }

    /// Create a mock with every byte set to `fill`
    pub fn with_fill(fill: u8) -> Self {
        Self {
            storage: [fill; N],
            size: N,
            writes: 0,
            commits: 0,
            begins: 0,
            power_budget: None,
        }
    }

    /// Get contents of the configured region (for test verification)
    pub fn contents(&self) -> &[u8] {
        &self.storage[..self.size]
    }

    /// Get a slice of the contents (for test verification)
    pub fn get_contents(&self, offset: usize, len: usize) -> &[u8] {
        &self.storage[offset..offset + len]
    }

    /// Overwrite a byte directly, bypassing counters and power-loss simulation
    pub fn poke(&mut self, offset: usize, value: u8) {
        self.storage[offset] = value;
    }

    /// Inject corruption at offset (for testing error recovery)
    ///
    /// XORs each byte with 0xAA so the region always changes.
    pub fn inject_corruption(&mut self, offset: usize, len: usize) {
        for byte in &mut self.storage[offset..offset + len] {
            *byte ^= 0xAA;
        }
    }

    /// Flip a single bit
    pub fn flip_bit(&mut self, offset: usize, bit: u8) {
        self.storage[offset] ^= 1 << (bit & 7);
    }

    /// Number of single-byte writes accepted so far
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Number of commits so far
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Number of begin calls so far
    pub fn begin_count(&self) -> usize {
        self.begins
    }

    /// Size configured by the last `begin`
    pub fn configured_size(&self) -> usize {
        self.size
    }

    /// Simulate power loss after `writes` further writes
    ///
    /// Every write after the budget is used up reports success but leaves
    /// the storage untouched, like a supply dropping mid-update.
    pub fn simulate_power_loss_after(&mut self, writes: usize) {
        self.power_budget = Some(writes);
    }

    /// Restore power
    pub fn restore_power(&mut self) {
        self.power_budget = None;
    }
}

impl<const N: usize> Default for MockEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EepromInterface for MockEeprom<N> {
    fn read(&mut self, offset: usize) -> Result<u8> {
        if offset >= self.size {
            return Err(DeviceError::OutOfBounds);
        }

        Ok(self.storage[offset])
    }

    fn write(&mut self, offset: usize, value: u8) -> Result<()> {
        if offset >= self.size {
            return Err(DeviceError::OutOfBounds);
        }

        match self.power_budget {
            Some(0) => return Ok(()),
            Some(ref mut remaining) => *remaining -= 1,
            None => {}
        }

        self.storage[offset] = value;
        self.writes += 1;

        Ok(())
    }

    fn begin(&mut self, size: usize) -> Result<()> {
        if size > N {
            return Err(DeviceError::CapacityExceeded);
        }

        self.size = size;
        self.begins += 1;

        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_eeprom_read_write() {
        let mut eeprom = MockEeprom::<64>::new();

        eeprom.write(10, 0x55).unwrap();

        assert_eq!(eeprom.read(10).unwrap(), 0x55);
        assert_eq!(eeprom.read(11).unwrap(), 0x00);
        assert_eq!(eeprom.write_count(), 1);
    }

    #[test]
    fn test_mock_eeprom_fill_pattern() {
        let eeprom = MockEeprom::<16>::with_fill(0xFF);
        assert!(eeprom.contents().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_mock_eeprom_begin_limits_access() {
        let mut eeprom = MockEeprom::<64>::new();
        eeprom.begin(32).unwrap();

        assert_eq!(eeprom.read(32), Err(DeviceError::OutOfBounds));
        assert_eq!(eeprom.write(40, 1), Err(DeviceError::OutOfBounds));
        assert_eq!(eeprom.contents().len(), 32);
        assert_eq!(eeprom.begin_count(), 1);
    }

    #[test]
    fn test_mock_eeprom_begin_beyond_capacity() {
        let mut eeprom = MockEeprom::<64>::new();

        assert_eq!(eeprom.begin(65), Err(DeviceError::CapacityExceeded));
        assert_eq!(eeprom.configured_size(), 64);
    }

    #[test]
    fn test_mock_eeprom_commit_count() {
        let mut eeprom = MockEeprom::<8>::new();

        eeprom.commit().unwrap();
        eeprom.commit().unwrap();

        assert_eq!(eeprom.commit_count(), 2);
    }

    #[test]
    fn test_mock_eeprom_power_loss() {
        let mut eeprom = MockEeprom::<16>::new();

        eeprom.simulate_power_loss_after(2);
        for offset in 0..4 {
            eeprom.write(offset, 0x55).unwrap();
        }

        // Only the first two writes landed
        assert_eq!(eeprom.get_contents(0, 4), &[0x55, 0x55, 0x00, 0x00]);
        assert_eq!(eeprom.write_count(), 2);

        eeprom.restore_power();
        eeprom.write(3, 0x55).unwrap();
        assert_eq!(eeprom.read(3).unwrap(), 0x55);
    }

    #[test]
    fn test_mock_eeprom_corruption() {
        let mut eeprom = MockEeprom::<8>::with_fill(0xAA);

        eeprom.inject_corruption(0, 2);
        eeprom.flip_bit(4, 0);

        assert_eq!(eeprom.get_contents(0, 2), &[0x00, 0x00]);
        assert_eq!(eeprom.read(4).unwrap(), 0xAB);
    }
}
