//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use rf24link::radio::prelude::*;
//! ```

use crate::frame::Frame;
use crate::types::{FifoState, Mode, StatusFlags};

use super::RadioConfig;

/// A trait to represent raw register access on a transceiver
/// that uses a command-byte protocol.
///
/// Each call is exactly one bus transaction. Nothing is retried at this level.
pub trait EsbRegisters {
    type RegisterErrorType;

    /// Read the 1-byte value of the register at `address`.
    ///
    /// The command byte sent is `0x00 | address`.
    fn read_register(&mut self, address: u8) -> Result<u8, Self::RegisterErrorType>;

    /// Write a 1-byte `value` to the register at `address`.
    ///
    /// The command byte sent is `0x20 | address`.
    fn write_register(&mut self, address: u8, value: u8) -> Result<(), Self::RegisterErrorType>;
}

/// A trait to represent manipulation of data pipes
/// for an ESB capable transceiver.
pub trait EsbPipe {
    type PipeErrorType;

    /// Open a specified `pipe` for receiving data when radio is listening.
    ///
    /// The `address` must be exactly 5 bytes long.
    ///
    /// ### About pipe addresses
    /// Pipes 0 and 1 will store a full 5-byte address. Pipes 2-5 will technically
    /// only store a single byte, borrowing the 4 additional bytes from pipe 1.
    /// Pipes 1-5 should share the same address, except the first byte.
    ///
    /// <div class="warning">
    ///
    /// If the pipe 0 is opened for receiving by this function, the `address`
    /// passed to this function (for pipe 0) will be restored at every call to
    /// [`EsbMode::start_listening()`].
    /// This address restoration is implemented because [`EsbPipe::open_tx_pipe()`]
    /// also writes to pipe 0's address register.
    ///
    /// </div>
    fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Set the address used for transmitting.
    ///
    /// The `address` must be exactly 5 bytes long.
    fn open_tx_pipe(&mut self, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Close a specified pipe from receiving data when radio is listening.
    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeErrorType>;

    /// Get the currently configured address length (applied to all pipes).
    fn get_address_length(&mut self) -> Result<u8, Self::PipeErrorType>;
}

/// A trait to represent manipulation of a channel (aka frequency)
/// for an ESB capable transceiver.
pub trait EsbChannel {
    type ChannelErrorType;

    /// Set the radio's currently selected channel.
    ///
    /// These channels translate to the RF frequency as an offset of MHz from 2400 MHz.
    /// The default channel is 76 (2400 + 76 = 2.476 GHz).
    ///
    /// The channel must not be changed while transmitting.
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType>;

    /// Get the radio's currently selected channel.
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType>;
}

/// A trait to represent manipulation of [`StatusFlags`]
/// for an ESB capable transceiver.
pub trait EsbStatus {
    type StatusErrorType;

    /// Clear the radio's IRQ status flags
    ///
    /// Set any member of [`StatusFlags`] to `true` to clear the corresponding
    /// interrupt event. Setting any member of [`StatusFlags`] to `false` will leave
    /// the corresponding status flag untouched.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType>;
}

/// A trait to represent manipulation of RX and TX FIFOs
/// for an ESB capable transceiver.
pub trait EsbFifo {
    type FifoErrorType;

    /// Flush the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Get the state of the specified FIFO.
    ///
    /// - Pass `true` to `about_tx` parameter to get the state of the TX FIFO.
    /// - Pass `false` to `about_tx` parameter to get the state of the RX FIFO.
    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType>;

    /// Is there a payload available in the radio's RX FIFO?
    ///
    /// This function simply returns true if there is data to
    /// [`EsbRadio::read_frame()`] from the RX FIFO.
    fn available(&mut self) -> Result<bool, Self::FifoErrorType>;
}

/// A trait to represent the state of power for an ESB capable transceiver.
pub trait EsbPower {
    type PowerErrorType;

    /// Power down the radio.
    ///
    /// The CE pin is deactivated first, so any RX or TX activity is aborted.
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Power up the radio.
    ///
    /// If the radio is already powered, then this does nothing.
    /// Otherwise, this blocks for the given `delay` (in microseconds) to let
    /// the radio reach standby mode. `None` uses 5 milliseconds.
    fn power_up(&mut self, delay: Option<u32>) -> Result<(), Self::PowerErrorType>;

    /// Is the radio powered up?
    fn is_powered(&self) -> bool;
}

/// A trait to represent the operating mode state machine of a transceiver.
///
/// ```text
/// PowerDown --power_up()--> Standby --start_listening()--> Listening
///                              ^    <--stop_listening()---
///                              |
///                              +--- transmit() passes through Transmitting
/// ```
pub trait EsbMode {
    type ModeErrorType;

    /// Enter [`Mode::Listening`].
    ///
    /// This blocks for the 130 microseconds RX settling time, so carrier detection
    /// and received data are valid once this returns.
    fn start_listening(&mut self) -> Result<(), Self::ModeErrorType>;

    /// Leave [`Mode::Listening`]. No settling time is required.
    fn stop_listening(&mut self) -> Result<(), Self::ModeErrorType>;

    /// The currently active [`Mode`].
    fn mode(&self) -> Mode;

    /// Is the radio currently in [`Mode::Listening`]?
    fn is_listening(&self) -> bool {
        self.mode() == Mode::Listening
    }
}

/// A trait to represent the carrier detection feature of a transceiver.
pub trait EsbCarrier {
    type CarrierErrorType;

    /// Is a carrier (received power above the chip's threshold) present on the
    /// current channel?
    ///
    /// The result is only valid while listening.
    fn rpd(&mut self) -> Result<bool, Self::CarrierErrorType>;
}

/// A trait to represent debug output
/// for an ESB capable transceiver.
pub trait EsbDetails {
    type DetailsErrorType;

    /// Print details about radio's current configuration.
    ///
    /// This should only be used for debugging development.
    /// Using this in production should be limited due to a significant increase in
    /// compile size.
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType>;
}

pub trait EsbInit {
    type ConfigErrorType;

    /// Initialize the radio's hardware.
    ///
    /// This is similar to [`EsbInit::with_config()`] (with [`RadioConfig::default()`]),
    /// but this function also
    ///
    /// - waits 5 milliseconds for radio to finish powering up
    /// - checks for data corruption on the SPI lines
    fn init(&mut self) -> Result<(), Self::ConfigErrorType>;

    /// Reconfigure the radio using the given `config` object.
    ///
    /// This leaves the radio powered up in [`Mode::Standby`] as a receiver
    /// after blocking 150 milliseconds for the oscillator to start.
    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType>;
}

/// A trait to represent the transmission and reception of
/// fixed length [`Frame`]s.
pub trait EsbRadio {
    type RadioErrorType;

    /// Transmit a single [`Frame`].
    ///
    /// The radio leaves [`Mode::Listening`] (if needed) before uploading the frame.
    /// This blocks until the radio reports the frame was sent.
    /// There is no retry; see [`Messenger::send()`](fn@crate::messaging::Messenger::send).
    fn transmit(&mut self, frame: &Frame) -> Result<(), Self::RadioErrorType>;

    /// Read the first available [`Frame`] from the RX FIFO.
    ///
    /// Use [`EsbFifo::available()`] to check if there is a payload to read.
    fn read_frame(&mut self) -> Result<Frame, Self::RadioErrorType>;
}
