use super::{mnemonics, registers, Nrf24Error, RF24};
use crate::{
    radio::{
        prelude::{EsbChannel, EsbFifo, EsbInit, EsbPower, EsbRegisters, EsbStatus},
        RadioConfig,
    },
    Mode, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

/// The time (in microseconds) for the radio to finish its power on reset.
const POR_DELAY: u32 = 5000;

/// The time (in microseconds) for the crystal oscillator to start.
const OSCILLATOR_DELAY: u32 = 150_000;

impl<SPI, DO, DELAY> EsbInit for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ConfigErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Initialize the radio's hardware using the [`SpiDevice`] and [`OutputPin`] given
    /// to [`RF24::new()`].
    fn init(&mut self) -> Result<(), Self::ConfigErrorType> {
        // Must allow the radio time to settle else configuration bits will not necessarily stick.
        // Technically we require 4.5ms + 14us as a worst case. We'll just call it 5ms.
        self._delay_impl.delay_us(POR_DELAY);

        self.power_down()?;
        let config = self.read_register(registers::CONFIG)?;
        if config != self._config_reg.into_bits() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "CONFIG read back {=u8:#04X}, expected {=u8:#04X}",
                config,
                self._config_reg.into_bits()
            );
            return Err(Nrf24Error::BinaryCorruption);
        }

        self.with_config(&RadioConfig::default())
    }

    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType> {
        self.clear_status_flags(StatusFlags::new())?;
        self.power_down()?;

        // Flush buffers
        self.flush_rx()?;
        self.flush_tx()?;

        self.write_register(registers::SETUP_AW, mnemonics::AW_5_BYTES)?;
        // no effect while auto-ACK is disabled, but keep the register in a known state
        self.write_register(registers::SETUP_RETR, config.auto_retries.into_bits())?;
        self.write_register(registers::EN_AA, 0)?;
        self.write_register(registers::RF_SETUP, config.setup_rf.into_bits())?;

        // all pipes closed until opened explicitly
        self.write_register(registers::EN_RXADDR, 0)?;
        self._pipe0_rx_addr = None;

        self.set_channel(config.channel())?;

        // Set CONFIG register:
        //      Set all IRQ events on IRQ pin
        //      Set CRC length
        //      Power up
        //      Enable PRX
        // Do not write CE high so radio will remain in standby-I mode.
        self._config_reg = config.config_reg.with_power(true).as_rx();
        self.write_register(registers::CONFIG, self._config_reg.into_bits())?;
        self._delay_impl.delay_us(OSCILLATOR_DELAY);
        self._mode = Mode::Standby;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "radio configured on channel {=u8} at {}",
            config.channel(),
            config.data_rate()
        );
        Ok(())
    }
}
