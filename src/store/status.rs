//! Store status flags

use bitflags::bitflags;

bitflags! {
    /// Cumulative store status
    ///
    /// Flags are advisory: they describe degraded sub-states that individual
    /// operations check, they never lock the store. The empty set means
    /// "ok and ready". Bit values match the status byte of existing images.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StoreStatus: u8 {
        /// Field data written since the last validate
        const MODIFIED = 0b0000_0001;
        /// Last validate or wipe was committed to the device
        const COMMITTED = 0b0000_0010;
        /// Stored checksum does not match the data region
        const INVALID_CRC = 0b0000_0100;
        /// Configured magic is zero
        const INVALID_MAGIC = 0b0000_1000;
        /// Block size outside `(0, platform_max]`
        const INVALID_SIZE = 0b0001_0000;
    }
}

impl StoreStatus {
    /// No flags set
    pub const OK_AND_READY: Self = Self::empty();

    /// Whether any failure flag is set
    pub fn is_degraded(&self) -> bool {
        self.intersects(Self::INVALID_CRC | Self::INVALID_MAGIC | Self::INVALID_SIZE)
    }
}
