//! Store lifecycle management
//!
//! [`StoreManager`] owns the EEPROM device together with the configured
//! block size, magic byte, checksum state and status flags. Field encoding
//! lives in [`codec`](super::codec); this module covers initialization,
//! the magic-byte validity check, checksum (re)computation and wipe.

use core::fmt;

use super::config::{
    build_magic, StoreConfig, CRC_LEN, CRC_OFFSET, DATA_REGION_START, MAGIC_OFFSET,
};
use super::error::{Result, StoreError};
use super::status::StoreStatus;
use crate::checksum::ChecksumKind;
use crate::logging::{log_debug, log_info, log_warn, LogLevel, Logger, NoopLogger};
use crate::platform::EepromInterface;

/// Record layout manager for one EEPROM device
///
/// # Lifecycle
///
/// Construction runs [`init`](Self::init) with the given configuration.
/// `init` may be called again to reconfigure. Afterwards the store is
/// "ready"; status flags describe degraded sub-states:
///
/// - `INVALID_SIZE` turns every field read/write into an error that leaves
///   the device untouched
/// - `INVALID_MAGIC` means the configured magic is zero, so
///   [`is_valid`](Self::is_valid) can never succeed
///
/// # Example
///
/// ```
/// use eeprom_layout::platform::mock::MockEeprom;
/// use eeprom_layout::store::{StoreConfig, StoreManager, StoreStatus};
///
/// let config = StoreConfig::default().with_block_size(64).with_magic(0x7e);
/// let mut store = StoreManager::new(MockEeprom::<64>::new(), config);
/// assert_eq!(store.status(), StoreStatus::OK_AND_READY);
///
/// store.write_text("node-1", 32, 5).unwrap();
/// store.validate().unwrap();
/// assert!(store.is_valid().unwrap());
/// ```
pub struct StoreManager<D: EepromInterface, L: Logger = NoopLogger> {
    /// EEPROM device
    device: D,
    /// Log sink
    logger: L,
    /// Log verbosity gate
    log_level: LogLevel,
    /// Cumulative status flags
    status: StoreStatus,
    /// Expected magic byte (0 = not configured)
    magic: u8,
    /// Managed size in bytes
    block_size: usize,
    /// Upper bound for `block_size`
    platform_max: usize,
    /// Checksum algorithm
    checksum: ChecksumKind,
    /// Verify checksum in `is_valid`
    strict_crc: bool,
    /// Checksum stored by the last validate
    crc_old: u32,
    /// Most recently computed checksum
    crc_new: u32,
}

impl<D: EepromInterface> StoreManager<D> {
    /// Create a store without log output
    pub fn new(device: D, config: StoreConfig) -> Self {
        Self::with_logger(device, config, NoopLogger)
    }
}

impl<D: EepromInterface, L: Logger> StoreManager<D, L> {
    /// Create a store that logs through `logger`
    pub fn with_logger(device: D, config: StoreConfig, logger: L) -> Self {
        let mut store = Self {
            device,
            logger,
            log_level: config.log_level,
            status: StoreStatus::OK_AND_READY,
            magic: 0,
            block_size: 0,
            platform_max: config.platform_max,
            checksum: config.checksum,
            strict_crc: config.strict_crc,
            crc_old: 0,
            crc_new: 0,
        };
        store.init(config.block_size, config.magic, config.log_level);
        store
    }

    /// (Re)initialize size, magic and log level
    ///
    /// Resets the status to `OK_AND_READY`, then checks the size
    /// (`0 < block_size <= platform_max`, otherwise `INVALID_SIZE` and the
    /// device is not configured) and the magic (non-zero, otherwise
    /// `INVALID_MAGIC` and the previous magic is kept) independently.
    ///
    /// Returns the resulting status.
    pub fn init(&mut self, block_size: usize, magic: u8, log_level: LogLevel) -> StoreStatus {
        self.status = StoreStatus::OK_AND_READY;
        self.log_level = log_level;

        if !self.size_in_bounds(block_size) {
            self.status.insert(StoreStatus::INVALID_SIZE);
            log_warn!(
                self,
                "eeprom: invalid block size {} (max {})",
                block_size,
                self.platform_max
            );
        } else if let Err(e) = self.device.begin(block_size) {
            self.status.insert(StoreStatus::INVALID_SIZE);
            log_warn!(self, "eeprom: begin({}) failed: {}", block_size, e);
        } else {
            self.block_size = block_size;
        }

        if magic == 0 {
            self.status.insert(StoreStatus::INVALID_MAGIC);
            log_warn!(self, "eeprom: magic byte must not be zero");
        } else {
            self.magic = magic;
        }

        log_info!(
            self,
            "eeprom: init size={} magic={:#04x} status={:#04x}",
            self.block_size,
            self.magic,
            self.status.bits()
        );

        self.status
    }

    /// Check the magic byte at the start of the device
    ///
    /// Returns `true` iff the configured magic is non-zero and equals the
    /// stored byte. With `strict_crc` enabled the stored checksum must also
    /// match the data region.
    pub fn is_valid(&mut self) -> Result<bool> {
        if self.magic == 0 {
            log_debug!(self, "eeprom: no magic configured");
            return Ok(false);
        }

        let stored = self.device.read(MAGIC_OFFSET)?;
        if stored != self.magic {
            log_debug!(
                self,
                "eeprom: wrong magic: {:#04x} should be {:#04x}",
                stored,
                self.magic
            );
            return Ok(false);
        }
        self.magic = stored;

        if self.strict_crc {
            return self.verify_checksum();
        }

        Ok(true)
    }

    /// Mark the device content as valid
    ///
    /// Writes the magic byte, computes the checksum over the data region
    /// `[DATA_REGION_START, block_size)`, records it as both `crc_old` and
    /// `crc_new`, stores it little-endian at `[1, 5)` and commits.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidSize` (and sets `INVALID_SIZE`) if the
    /// block size is out of bounds.
    pub fn validate(&mut self) -> Result<bool> {
        if !self.size_in_bounds(self.block_size) {
            self.status.insert(StoreStatus::INVALID_SIZE);
            return Err(StoreError::InvalidSize);
        }

        self.device.write(MAGIC_OFFSET, self.magic)?;

        let crc = self.data_region_crc()?;
        self.crc_old = crc;
        self.crc_new = crc;

        for (i, byte) in crc.to_le_bytes().into_iter().enumerate() {
            self.device.write(CRC_OFFSET + i, byte)?;
        }

        self.device.commit()?;
        self.status.remove(StoreStatus::MODIFIED | StoreStatus::INVALID_CRC);
        self.status.insert(StoreStatus::COMMITTED);

        log_info!(
            self,
            "eeprom: validated magic={:#04x} crc={:#010x}",
            self.magic,
            crc
        );

        Ok(true)
    }

    /// Zero every byte in `[0, block_size)` and commit
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidSize` (and sets `INVALID_SIZE`) if the
    /// block size is out of bounds.
    pub fn wipe(&mut self) -> Result<()> {
        if !self.size_in_bounds(self.block_size) {
            self.status.insert(StoreStatus::INVALID_SIZE);
            return Err(StoreError::InvalidSize);
        }

        for offset in 0..self.block_size {
            self.device.write(offset, 0)?;
        }

        self.device.commit()?;
        self.status.remove(StoreStatus::MODIFIED);
        self.status.insert(StoreStatus::COMMITTED);

        log_info!(self, "eeprom: wiped {} bytes", self.block_size);

        Ok(())
    }

    /// Checksum of `len` bytes starting at `start`
    ///
    /// The range is not checked against the block size; reads beyond the
    /// device surface as `StoreError::Device`.
    pub fn crc32(&mut self, start: usize, len: usize) -> Result<u32> {
        let mut digest = self.checksum.digest();
        for offset in start..start + len {
            digest.update_byte(self.device.read(offset)?);
        }
        let crc = digest.finalize();

        log_debug!(self, "eeprom: crc over [{}, {}) = {:#010x}", start, start + len, crc);

        Ok(crc)
    }

    /// Checksum stored in the header
    pub fn stored_checksum(&mut self) -> Result<u32> {
        let mut bytes = [0u8; CRC_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.device.read(CRC_OFFSET + i)?;
        }
        Ok(u32::from_le_bytes(bytes))
    }

    /// Recompute the data region checksum and compare it with the header
    ///
    /// Updates `crc_new` and sets or clears `INVALID_CRC`.
    pub fn verify_checksum(&mut self) -> Result<bool> {
        let computed = self.data_region_crc()?;
        self.crc_new = computed;

        let stored = self.stored_checksum()?;
        if computed == stored {
            self.status.remove(StoreStatus::INVALID_CRC);
            Ok(true)
        } else {
            self.status.insert(StoreStatus::INVALID_CRC);
            log_warn!(
                self,
                "eeprom: bad crc: stored {:#010x} computed {:#010x}",
                stored,
                computed
            );
            Ok(false)
        }
    }

    /// Current status flags
    pub fn status(&self) -> StoreStatus {
        self.status
    }

    /// Managed size in bytes
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Change the managed size
    ///
    /// An out-of-range size sets `INVALID_SIZE` and keeps the old size.
    /// A valid size does not clear a previously set `INVALID_SIZE`;
    /// call [`init`](Self::init) for a fresh status.
    pub fn set_block_size(&mut self, block_size: usize) -> Result<()> {
        if !self.size_in_bounds(block_size) {
            self.status.insert(StoreStatus::INVALID_SIZE);
            return Err(StoreError::InvalidSize);
        }

        self.device.begin(block_size)?;
        self.block_size = block_size;
        Ok(())
    }

    /// Configured magic byte
    pub fn magic(&self) -> u8 {
        self.magic
    }

    /// Change the magic byte; zero is ignored
    pub fn set_magic(&mut self, magic: u8) {
        if magic != 0 {
            self.magic = magic;
            self.status.remove(StoreStatus::INVALID_MAGIC);
        }
    }

    /// Log verbosity
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Change log verbosity
    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    /// Magic byte for the current image version
    pub fn version_to_magic(&self) -> u8 {
        build_magic()
    }

    /// Checksum recorded by the last validate
    pub fn crc_old(&self) -> u32 {
        self.crc_old
    }

    /// Most recently computed checksum
    pub fn crc_new(&self) -> u32 {
        self.crc_new
    }

    /// Checksum algorithm in use
    pub fn checksum_kind(&self) -> ChecksumKind {
        self.checksum
    }

    /// Borrow the device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutably borrow the device
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Release the device
    pub fn into_device(self) -> D {
        self.device
    }

    /// Fail with `InvalidSize` while the size gate is closed
    pub(super) fn ensure_size(&self) -> Result<()> {
        if self.status.contains(StoreStatus::INVALID_SIZE) {
            log_debug!(self, "eeprom: store has status INVALID_SIZE");
            return Err(StoreError::InvalidSize);
        }
        Ok(())
    }

    /// Write one byte and trace it
    pub(super) fn put(&mut self, offset: usize, value: u8) -> Result<()> {
        log_debug!(self, "eeprom: wr[{}] -> {:#04x}", offset, value);
        self.device.write(offset, value)?;
        self.status.insert(StoreStatus::MODIFIED);
        Ok(())
    }

    /// Read one byte and trace it
    pub(super) fn get(&mut self, offset: usize) -> Result<u8> {
        let value = self.device.read(offset)?;
        log_debug!(self, "eeprom: rd[{}] <- {:#04x}", offset, value);
        Ok(value)
    }

    /// Emit a message if the level gate allows it
    pub(crate) fn emit(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.log_level.enables(level) {
            self.logger.log(level, args);
        }
    }

    fn size_in_bounds(&self, block_size: usize) -> bool {
        block_size > 0 && block_size <= self.platform_max
    }

    fn data_region_crc(&mut self) -> Result<u32> {
        let len = self.block_size.saturating_sub(DATA_REGION_START);
        self.crc32(DATA_REGION_START, len)
    }
}
