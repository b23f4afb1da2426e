use core::fmt::{Debug, Display, Formatter, Result as FmtResult};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
pub(crate) mod bit_fields;
mod carrier;
mod channel;
mod init;
use bit_fields::Config;
mod constants;
mod fifo;
mod mode;
mod pipe;
mod power;
mod radio;
mod registers_io;
pub use constants::{commands, mnemonics, registers};
mod details;
mod status;
use crate::{poll::Sleep, ConfigError, Mode, StatusFlags};

/// An collection of error types to describe hardware malfunctions
/// and invalid configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
    /// Represents a corruption of binary data (as it was transferred over the SPI bus' MISO)
    BinaryCorruption,
    /// The radio reported the MAX_RT event for a transmission.
    TxFailed,
    /// The radio reported neither the TX_DS nor the MAX_RT event within 500 milliseconds.
    TxTimeout,
    /// An invalid parameter was passed to a configuration function.
    Config(ConfigError),
}

impl<SPI, DO> Nrf24Error<SPI, DO> {
    /// Is this error caused by the hardware (as opposed to invalid configuration)?
    ///
    /// Only hardware faults are worth retrying.
    pub const fn is_hardware_fault(&self) -> bool {
        !matches!(self, Nrf24Error::Config(_))
    }
}

impl<SPI, DO> From<ConfigError> for Nrf24Error<SPI, DO> {
    fn from(value: ConfigError) -> Self {
        Nrf24Error::Config(value)
    }
}

impl<SPI: Debug, DO: Debug> Display for Nrf24Error<SPI, DO> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Nrf24Error::Spi(e) => write!(f, "SPI bus error: {e:?}"),
            Nrf24Error::Gpo(e) => write!(f, "CE pin error: {e:?}"),
            Nrf24Error::BinaryCorruption => write!(f, "binary corruption on the SPI bus"),
            Nrf24Error::TxFailed => write!(f, "transmission failed"),
            Nrf24Error::TxTimeout => write!(f, "transmission timed out"),
            Nrf24Error::Config(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<SPI, DO> defmt::Format for Nrf24Error<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Nrf24Error::Spi(_) => defmt::write!(fmt, "SPI bus error"),
            Nrf24Error::Gpo(_) => defmt::write!(fmt, "CE pin error"),
            Nrf24Error::BinaryCorruption => defmt::write!(fmt, "binary corruption on the SPI bus"),
            Nrf24Error::TxFailed => defmt::write!(fmt, "transmission failed"),
            Nrf24Error::TxTimeout => defmt::write!(fmt, "transmission timed out"),
            Nrf24Error::Config(e) => defmt::write!(fmt, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl<SPI: Debug, DO: Debug> std::error::Error for Nrf24Error<SPI, DO> {}

/// This struct implements the [`Esb*` traits](mod@crate::radio::prelude)
/// for the nRF24L01 transceiver.
///
/// Every payload is a fixed 32 byte [`Frame`](struct@crate::frame::Frame),
/// the address width is fixed to 5 bytes, and the auto-ACK feature is disabled.
pub struct RF24<SPI, DO, DELAY> {
    _spi: SPI,
    /// The CE pin for the radio.
    ///
    /// This really only exposed for advanced manipulation of active TX mode.
    /// It is strongly recommended to use [`EsbMode`](trait@crate::radio::prelude::EsbMode)
    /// and [`EsbRadio`](trait@crate::radio::prelude::EsbRadio) because those methods
    /// guarantee proper radio usage.
    pub ce_pin: DO,
    _delay_impl: DELAY,
    _buf: [u8; 33],
    _status: StatusFlags,
    _config_reg: Config,
    _mode: Mode,
    _pipe0_rx_addr: Option<[u8; 5]>,
}

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Instantiate an [`RF24`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded-hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    ///
    /// Nothing is sent to the radio until
    /// [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init) is called.
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> RF24<SPI, DO, DELAY> {
        RF24 {
            ce_pin,
            _spi: spi,
            _delay_impl: delay_impl,
            _status: StatusFlags::from_bits(0),
            _buf: [0u8; 33],
            _pipe0_rx_addr: None,
            // 8 bit CRC, enable all IRQ, and power down as TX
            _config_reg: Config::default(),
            _mode: Mode::PowerDown,
        }
    }

    fn spi_transfer(&mut self, len: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._spi
            .transfer_in_place(&mut self._buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        Ok(())
    }

    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::NOP)?;
    /// // STATUS register is now stored in self._status
    /// ```
    ///
    /// The bytes clocked out after the `command` are always zeros.
    fn spi_read(&mut self, len: u8, command: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        self._buf[1..=len as usize].fill(0);
        self.spi_transfer(len + 1)
    }

    fn spi_write_byte(
        &mut self,
        command: u8,
        byte: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        self._buf[1] = byte;
        self.spi_transfer(2)
    }

    fn spi_write_buf(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        let buf_len = buf.len().min(32);
        self._buf[1..(buf_len + 1)].copy_from_slice(&buf[..buf_len]);
        self.spi_transfer(buf_len as u8 + 1)
    }
}

impl<SPI, DO, DELAY: DelayNs> Sleep for RF24<SPI, DO, DELAY> {
    fn sleep_us(&mut self, us: u32) {
        self._delay_impl.delay_us(us);
    }
}
