use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{
    prelude::{EsbCarrier, EsbRegisters},
    Nrf24Error, RF24,
};

use super::{mnemonics, registers};

impl<SPI, DO, DELAY> EsbCarrier for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type CarrierErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Reads bit 0 of the RPD register.
    ///
    /// The radio latches this bit when it has been listening for at least
    /// 130 microseconds and received power is above -64 dBm.
    fn rpd(&mut self) -> Result<bool, Self::CarrierErrorType> {
        let rpd = self.read_register(registers::RPD)?;
        Ok(rpd & mnemonics::RPD_BIT == mnemonics::RPD_BIT)
    }
}
