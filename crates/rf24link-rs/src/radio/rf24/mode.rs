use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbMode, EsbPower, EsbRegisters},
        Nrf24Error, RF24,
    },
    Mode,
};

use super::registers;

/// The RX settling time (in microseconds) after the CE pin goes active.
const RX_SETTLING: u32 = 130;

impl<SPI, DO, DELAY> EsbMode for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ModeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Powers up the radio if needed, asserts the `PRIM_RX` bit, restores the
    /// address cached for pipe 0, then activates the CE pin.
    fn start_listening(&mut self) -> Result<(), Self::ModeErrorType> {
        if !self.is_powered() {
            self.power_up(None)?;
        }
        if !self._config_reg.is_rx() {
            self._config_reg = self._config_reg.as_rx();
            self.write_register(registers::CONFIG, self._config_reg.into_bits())?;
        }

        // Restore the pipe0 address, if exists
        if let Some(addr) = self._pipe0_rx_addr {
            self.spi_write_buf(registers::RX_ADDR_P0, &addr)?;
        }

        self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_us(RX_SETTLING);
        self._mode = Mode::Listening;
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<(), Self::ModeErrorType> {
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        self._mode = if self.is_powered() {
            Mode::Standby
        } else {
            Mode::PowerDown
        };
        Ok(())
    }

    fn mode(&self) -> Mode {
        self._mode
    }
}
