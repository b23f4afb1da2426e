use core::ops::ControlFlow;

use super::{commands, mnemonics, registers, Nrf24Error, RF24};
use crate::{
    frame::{Frame, FRAME_SIZE},
    poll::{poll_until, PollSchedule},
    radio::prelude::{EsbFifo, EsbPower, EsbRadio, EsbRegisters, EsbStatus},
    Mode, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

/// How long (in microseconds) the CE pin is held active to start a transmission.
const CE_PULSE: u32 = 15;

/// Poll the STATUS byte every 10 microseconds for up to 500 milliseconds.
const TX_COMPLETION: PollSchedule = PollSchedule::new(10, 500_000);

impl<SPI, DO, DELAY> EsbRadio for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type RadioErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// See [`EsbRadio::transmit()`] for implementation-agnostic detail.
    ///
    /// This function calls [`RF24::flush_tx()`] before uploading the `frame`,
    /// so only 1 payload is ever in the TX FIFO.
    ///
    /// Returns [`Nrf24Error::TxFailed`] if the radio reports the MAX_RT event, or
    /// [`Nrf24Error::TxTimeout`] if neither TX event occurs within 500 milliseconds.
    fn transmit(&mut self, frame: &Frame) -> Result<(), Self::RadioErrorType> {
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        if self.is_powered() {
            self._mode = Mode::Standby;
        } else {
            self.power_up(None)?;
        }
        if self._config_reg.is_rx() {
            self._config_reg = self._config_reg.as_tx();
            self.write_register(registers::CONFIG, self._config_reg.into_bits())?;
        }

        // this function only handles 1 payload at a time
        self.flush_tx()?;
        let tx_flags = StatusFlags::from_bits(mnemonics::MASK_MAX_RT | mnemonics::MASK_TX_DS);
        self.clear_status_flags(tx_flags)?;
        self.spi_write_buf(commands::W_TX_PAYLOAD, frame.as_bytes())?;

        // now block until we get a tx_ds or tx_df event
        let result = match self.pulse_ce() {
            Ok(()) => poll_until(self, TX_COMPLETION, |radio| {
                radio.spi_read(0, commands::NOP)?;
                if radio._status.tx_event() {
                    Ok(ControlFlow::Break(radio._status.tx_ds()))
                } else {
                    Ok(ControlFlow::Continue(()))
                }
            }),
            Err(e) => Err(e),
        };
        self._mode = Mode::Standby;
        let sent = result?;
        self.clear_status_flags(tx_flags)?;
        match sent {
            Some(true) => Ok(()),
            Some(false) => Err(Nrf24Error::TxFailed),
            None => Err(Nrf24Error::TxTimeout),
        }
    }

    /// See [`EsbRadio::read_frame()`] for implementation-agnostic detail.
    ///
    /// The RX_DR event is cleared after the payload is fetched.
    fn read_frame(&mut self) -> Result<Frame, Self::RadioErrorType> {
        self.spi_read(FRAME_SIZE as u8, commands::R_RX_PAYLOAD)?;
        let frame = Frame::from_slice(&self._buf[1..=FRAME_SIZE]);
        self.clear_status_flags(StatusFlags::from_bits(mnemonics::MASK_RX_DR))?;
        Ok(frame)
    }
}

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Start transmitting the payload in the TX FIFO.
    fn pulse_ce(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._mode = Mode::Transmitting;
        self.ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        self._delay_impl.delay_us(CE_PULSE);
        self.ce_pin.set_low().map_err(Nrf24Error::Gpo)
    }
}
