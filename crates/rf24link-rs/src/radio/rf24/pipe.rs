use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    frame::FRAME_SIZE,
    radio::{
        prelude::{EsbPipe, EsbRegisters},
        Nrf24Error, ADDRESS_WIDTH, RF24,
    },
    ConfigError,
};

use super::registers;

/// The highest pipe number.
const MAX_PIPE: u8 = 5;

fn check_pipe(pipe: u8) -> Result<(), ConfigError> {
    if pipe > MAX_PIPE {
        return Err(ConfigError::Pipe(pipe));
    }
    Ok(())
}

fn check_address(address: &[u8]) -> Result<(), ConfigError> {
    if address.len() != ADDRESS_WIDTH {
        return Err(ConfigError::AddressLength(address.len()));
    }
    Ok(())
}

impl<SPI, DO, DELAY> EsbPipe for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PipeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// The pipe's static payload length is also set to 32 bytes.
    fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        check_pipe(pipe)?;
        check_address(address)?;

        if pipe < 2 {
            // If this is pipe 0, cache the address.  This is needed because
            // open_tx_pipe() will overwrite the pipe 0 address, so
            // start_listening() will have to restore it.
            if pipe == 0 {
                let mut cached_addr = [0u8; ADDRESS_WIDTH];
                cached_addr.copy_from_slice(address);
                self._pipe0_rx_addr = Some(cached_addr);
            }
            self.spi_write_buf(registers::RX_ADDR_P0 + pipe, address)?;
        }
        // For pipes 2-5, only write the MSB
        else {
            self.write_register(registers::RX_ADDR_P0 + pipe, address[0])?;
        }
        self.write_register(registers::RX_PW_P0 + pipe, FRAME_SIZE as u8)?;

        let out = self.read_register(registers::EN_RXADDR)? | (1 << pipe);
        self.write_register(registers::EN_RXADDR, out)
    }

    fn open_tx_pipe(&mut self, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        check_address(address)?;
        self.spi_write_buf(registers::TX_ADDR, address)?;
        self.spi_write_buf(registers::RX_ADDR_P0, address)
    }

    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeErrorType> {
        check_pipe(pipe)?;
        let out = self.read_register(registers::EN_RXADDR)? & !(1 << pipe);
        self.write_register(registers::EN_RXADDR, out)?;
        if pipe == 0 {
            self._pipe0_rx_addr = None;
        }
        Ok(())
    }

    fn get_address_length(&mut self) -> Result<u8, Self::PipeErrorType> {
        Ok(self.read_register(registers::SETUP_AW)?.min(0xFD) + 2)
    }
}
