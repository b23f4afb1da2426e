use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{
    prelude::{EsbFifo, EsbRegisters},
    Nrf24Error, RF24,
};
use crate::FifoState;

use super::{commands, mnemonics, registers};

impl<SPI, DO, DELAY> EsbFifo for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type FifoErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Reads the RX_EMPTY bit of the FIFO_STATUS register.
    fn available(&mut self) -> Result<bool, Self::FifoErrorType> {
        let fifo_status = self.read_register(registers::FIFO_STATUS)?;
        Ok(fifo_status & mnemonics::RX_EMPTY == 0)
    }

    /// Use this to discard all 3 layers in the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_RX)
    }

    /// Use this to discard all 3 layers in the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_TX)
    }

    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType> {
        let fifo_status = self.read_register(registers::FIFO_STATUS)?;
        let offset = about_tx as u8 * 4;
        let status = (fifo_status & (3 << offset)) >> offset;
        match status {
            1 => Ok(FifoState::Empty),
            2 => Ok(FifoState::Full),
            _ => Ok(FifoState::Occupied),
        }
    }
}
