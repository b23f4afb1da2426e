use super::registers;
use crate::{
    radio::{
        prelude::{EsbChannel, EsbRegisters},
        Nrf24Error, MAX_CHANNEL, RF24,
    },
    ConfigError,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> EsbChannel for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ChannelErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// The nRF24L01 support 126 channels. A `channel` outside the range [0, 125]
    /// is rejected with [`ConfigError::Channel`].
    ///
    /// The RF_CH register is written regardless of the current [`Mode`](enum@crate::Mode).
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType> {
        if channel > MAX_CHANNEL {
            return Err(ConfigError::Channel(channel).into());
        }
        self.write_register(registers::RF_CH, channel)
    }

    /// See also [`RF24::set_channel()`].
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType> {
        self.read_register(registers::RF_CH)
    }
}
