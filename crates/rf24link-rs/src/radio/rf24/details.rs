use super::{Nrf24Error, RF24};
use crate::radio::prelude::EsbDetails;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

#[cfg(any(feature = "defmt", feature = "std"))]
use super::{
    bit_fields::{Config, SetupRetry, SetupRf},
    registers,
};
#[cfg(any(feature = "defmt", feature = "std"))]
use crate::{
    radio::prelude::{EsbChannel, EsbFifo, EsbMode, EsbPipe, EsbPower, EsbRegisters},
    FifoState,
};

#[cfg(feature = "std")]
extern crate std;

/// Everything [`EsbDetails::print_details()`] shows, read from the radio in one pass.
#[cfg(any(feature = "defmt", feature = "std"))]
struct Snapshot {
    channel: u8,
    setup_rf: SetupRf,
    config: Config,
    address_length: u8,
    retries: SetupRetry,
    observe_tx: u8,
    tx_fifo: FifoState,
    rx_fifo: FifoState,
    tx_address: [u8; 5],
    open_pipes: u8,
    /// Full addresses of pipes 0 and 1.
    addresses: [[u8; 5]; 2],
    /// The first byte of pipes 2-5.
    lsb: [u8; 4],
}

#[cfg(any(feature = "defmt", feature = "std"))]
impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    fn read_address(&mut self, register: u8) -> Result<[u8; 5], Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(5, register)?;
        let mut address = [0u8; 5];
        address.copy_from_slice(&self._buf[1..6]);
        Ok(address)
    }

    fn snapshot(&mut self) -> Result<Snapshot, Nrf24Error<SPI::Error, DO::Error>> {
        let channel = self.get_channel()?;
        let setup_rf = SetupRf::from_bits(self.read_register(registers::RF_SETUP)?);
        let config = Config::from_bits(self.read_register(registers::CONFIG)?);
        let address_length = self.get_address_length()?;
        let retries = SetupRetry::from_bits(self.read_register(registers::SETUP_RETR)?);
        let observe_tx = self.read_register(registers::OBSERVE_TX)?;
        let tx_fifo = self.get_fifo_state(true)?;
        let rx_fifo = self.get_fifo_state(false)?;
        let tx_address = self.read_address(registers::TX_ADDR)?;
        let open_pipes = self.read_register(registers::EN_RXADDR)?;
        let addresses = [
            self.read_address(registers::RX_ADDR_P0)?,
            self.read_address(registers::RX_ADDR_P0 + 1)?,
        ];
        let mut lsb = [0u8; 4];
        for (i, byte) in lsb.iter_mut().enumerate() {
            *byte = self.read_register(registers::RX_ADDR_P0 + 2 + i as u8)?;
        }
        Ok(Snapshot {
            channel,
            setup_rf,
            config,
            address_length,
            retries,
            observe_tx,
            tx_fifo,
            rx_fifo,
            tx_address,
            open_pipes,
            addresses,
            lsb,
        })
    }
}

impl<SPI, DO, DELAY> EsbDetails for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type DetailsErrorType = Nrf24Error<SPI::Error, DO::Error>;

    #[cfg(all(feature = "defmt", not(feature = "std")))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let s = self.snapshot()?;
        defmt::println!(
            "Channel___________________{=u8} ~ {=u16} MHz",
            s.channel,
            s.channel as u16 + 2400u16
        );
        defmt::println!("RF Data Rate______________{}", s.setup_rf.data_rate());
        defmt::println!("RF Power Amplifier________{}", s.setup_rf.pa_level());
        defmt::println!("RF LNA enabled____________{=bool}", s.setup_rf.lna_enable());
        defmt::println!("CRC Length________________{}", s.config.crc_length());
        defmt::println!("Address length____________{=u8} bytes", s.address_length);
        defmt::println!(
            "Auto retry delay__________{=u16} microseconds",
            s.retries.ard() as u16 * 250 + 250
        );
        defmt::println!("Auto retry attempts_______{=u8} maximum", s.retries.arc());
        defmt::println!(
            "Packets lost\n    on current channel____{=u8}",
            s.observe_tx >> 4
        );
        defmt::println!(
            "Retry attempts made\n    for last transmission_{=u8}",
            s.observe_tx & 0xF
        );
        defmt::println!("TX FIFO___________________{}", s.tx_fifo);
        defmt::println!("RX FIFO___________________{}", s.rx_fifo);
        let rx = defmt::intern!("R");
        let tx = defmt::intern!("T");
        defmt::println!(
            "Primary Mode______________{=istr}X",
            if s.config.is_rx() { rx } else { tx }
        );
        defmt::println!("Powered Up________________{=bool}", self.is_powered());
        defmt::println!("Operating Mode____________{}", self.mode());
        defmt::println!("TX address________________{=[u8]:02X}", &s.tx_address[..]);
        let opened = defmt::intern!(" open ");
        let closed = defmt::intern!("closed");
        for pipe in 0..6u8 {
            let state = if s.open_pipes & (1 << pipe) > 0 {
                opened
            } else {
                closed
            };
            if pipe < 2 {
                defmt::println!(
                    "Pipe {=u8} ({=istr}) bound to {=[u8]:02X}",
                    pipe,
                    state,
                    &s.addresses[pipe as usize][..]
                );
            } else {
                defmt::println!(
                    "Pipe {=u8} ({=istr}) bound to {=u8:02X} + pipe 1",
                    pipe,
                    state,
                    s.lsb[pipe as usize - 2]
                );
            }
        }
        Ok(())
    }

    #[cfg(feature = "std")]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let s = self.snapshot()?;
        std::println!(
            "Channel___________________{} ~ {} MHz",
            s.channel,
            s.channel as u16 + 2400u16
        );
        std::println!("RF Data Rate______________{}", s.setup_rf.data_rate());
        std::println!("RF Power Amplifier________{}", s.setup_rf.pa_level());
        std::println!("RF LNA enabled____________{}", s.setup_rf.lna_enable());
        std::println!("CRC Length________________{}", s.config.crc_length());
        std::println!("Address length____________{} bytes", s.address_length);
        std::println!(
            "Auto retry delay__________{} microseconds",
            s.retries.ard() as u16 * 250 + 250
        );
        std::println!("Auto retry attempts_______{} maximum", s.retries.arc());
        std::println!("Packets lost\n    on current channel____{}", s.observe_tx >> 4);
        std::println!(
            "Retry attempts made\n    for last transmission_{}",
            s.observe_tx & 0xF
        );
        std::println!("TX FIFO___________________{}", s.tx_fifo);
        std::println!("RX FIFO___________________{}", s.rx_fifo);
        std::println!(
            "Primary Mode______________{}X",
            if s.config.is_rx() { "R" } else { "T" }
        );
        std::println!("Powered Up________________{}", self.is_powered());
        std::println!("Operating Mode____________{}", self.mode());
        std::println!("TX address________________{:02X?}", s.tx_address);
        for pipe in 0..6u8 {
            let state = if s.open_pipes & (1 << pipe) > 0 {
                " open "
            } else {
                "closed"
            };
            if pipe < 2 {
                std::println!(
                    "Pipe {pipe} ({state}) bound to {:02X?}",
                    s.addresses[pipe as usize]
                );
            } else {
                std::println!(
                    "Pipe {pipe} ({state}) bound to {:02X} + pipe 1",
                    s.lsb[pipe as usize - 2]
                );
            }
        }
        Ok(())
    }

    #[cfg(not(any(feature = "defmt", feature = "std")))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        Ok(())
    }
}
