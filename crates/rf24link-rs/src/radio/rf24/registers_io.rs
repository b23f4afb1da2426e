use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::EsbRegisters, Nrf24Error, RF24};

use super::commands;

/// Register addresses only span 5 bits of the command byte.
const ADDRESS_MASK: u8 = 0x1F;

impl<SPI, DO, DELAY> EsbRegisters for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type RegisterErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn read_register(&mut self, address: u8) -> Result<u8, Self::RegisterErrorType> {
        self.spi_read(1, commands::R_REGISTER | (address & ADDRESS_MASK))?;
        Ok(self._buf[1])
    }

    fn write_register(&mut self, address: u8, value: u8) -> Result<(), Self::RegisterErrorType> {
        self.spi_write_byte(address & ADDRESS_MASK, value)
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::EsbRegisters;
    use crate::radio::rf24::{commands, registers};
    use crate::{spi_test_expects, test::mk_radio};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    pub fn read_register() {
        let spi_expectations = spi_test_expects![
            (vec![registers::SETUP_AW, 0u8], vec![0xEu8, 3u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.read_register(registers::SETUP_AW).unwrap(), 3u8);
        spi.done();
        ce_pin.done();
    }

    #[test]
    pub fn read_register_command_byte() {
        let spi_expectations = spi_test_expects![
            (vec![0x05u8, 0u8], vec![0xEu8, 76u8]),
            (vec![0x09u8, 0u8], vec![0xEu8, 1u8]),
            (vec![0x17u8, 0u8], vec![0xEu8, 0x11u8]),
            // out of range addresses are masked to 5 bits
            (vec![registers::RF_SETUP, 0u8], vec![0xEu8, 0x27u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.read_register(registers::RF_CH), Ok(76));
        assert_eq!(radio.read_register(registers::RPD), Ok(1));
        assert_eq!(radio.read_register(registers::FIFO_STATUS), Ok(0x11));
        assert_eq!(radio.read_register(0xE6), Ok(0x27));
        spi.done();
        ce_pin.done();
    }

    #[test]
    pub fn write_register() {
        let spi_expectations = spi_test_expects![
            (
                vec![0x25u8, 0x2Au8],
                vec![0xEu8, 0u8],
            ),
            (vec![0x22u8, 3u8], vec![0xEu8, 0u8]),
            (vec![0x20u8, 0x0Bu8], vec![0xEu8, 0u8]),
            // out of range addresses are masked to 5 bits
            (
                vec![registers::RF_CH | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.write_register(registers::RF_CH, 42).unwrap();
        radio.write_register(registers::EN_RXADDR, 3).unwrap();
        radio.write_register(registers::CONFIG, 0x0B).unwrap();
        radio.write_register(0xE5, 1).unwrap();
        spi.done();
        ce_pin.done();
    }
}
