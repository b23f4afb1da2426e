use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, PaLevel};

/// The CONFIG register.
///
/// The default value has all IRQ events enabled, an 8 bit CRC,
/// and describes a powered down radio in TX mode.
#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    /// The IRQ mask bits. All events stay enabled on the IRQ pin.
    #[bits(3, access = None)]
    irq_mask: u8,

    #[bits(2, access = None, default = 2)]
    crc_length: u8,

    pub power: bool,

    pub is_rx: bool,
}

impl Config {
    pub(crate) const CRC_MASK: u8 = 0b1100;

    pub const fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits() & Self::CRC_MASK)
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_val = self.into_bits() & !Self::CRC_MASK | length.into_bits();
        Self::from_bits(new_val)
    }

    pub fn as_rx(self) -> Self {
        Self::from_bits(self.into_bits() | 1)
    }

    pub fn as_tx(self) -> Self {
        Self::from_bits(self.into_bits() & !1)
    }
}

/// The SETUP_RETR register.
///
/// Auto-ACK is always disabled, so these values are never acted on by the radio.
/// They are still written to keep the register in a known state.
#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry feature's `delay`.
    #[bits(4, default = 15)]
    pub ard: u8,

    /// The auto-retry feature's `count`.
    #[bits(4, default = 15)]
    pub arc: u8,
}

/// The RF_SETUP register.
///
/// The default value describes 250 Kbps at max PA level with the LNA enabled.
#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRf {
    #[bits(2)]
    _padding: u8,

    /// RF_DR_LOW, PLL_LOCK and RF_DR_HIGH bits
    #[bits(3, access = None, default = 4)]
    data_rate: u8,

    #[bits(2, access = None, default = 3)]
    pa_level: u8,

    #[bits(1, default = true)]
    pub lna_enable: bool,
}

impl SetupRf {
    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits() & DataRate::MASK)
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_val = self.into_bits() & !DataRate::MASK;
        Self::from_bits(new_val | data_rate.into_bits())
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits() & PaLevel::MASK)
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_val = self.into_bits() & !PaLevel::MASK;
        Self::from_bits(new_val | level.into_bits())
    }
}

// unit tests found in crate::radio::config::test
