//! Reliable delivery of [`Frame`]s between two nodes.
//!
//! The radio's auto-ACK feature is disabled, so delivery is made reliable by
//! retrying at this layer: [`Messenger::send()`] makes a bounded number of
//! attempts and reports how it went as a [`SendOutcome`].
//!
//! ```ignore
//! let mut radio = RF24::new(ce_pin, spi_device, delay);
//! radio.init()?;
//! configure_link(&mut radio, Role::Sender, &DEFAULT_ADDRESSES)?;
//! let mut messenger = Messenger::new(&mut radio, delay);
//! if messenger.send_text("Hello World!", DEFAULT_RETRIES).is_sent() {
//!     // ...
//! }
//! ```
use core::ops::ControlFlow;

use embedded_hal::delay::DelayNs;

use crate::{
    frame::{Frame, Message, SensorReading},
    poll::{poll_until, PollSchedule, Sleep},
    radio::prelude::{EsbFifo, EsbMode, EsbPipe, EsbRadio},
};

/// The number of attempts used by [`Messenger::send()`] when the caller has no preference.
pub const DEFAULT_RETRIES: u8 = 3;

/// The pause (in microseconds) after a failed attempt.
const RETRY_BACKOFF: u32 = 50_000;

/// How often (in milliseconds) [`Messenger::receive()`] checks the RX FIFO.
const RECEIVE_POLL_INTERVAL: u32 = 1;

/// The addresses used by both ends of a link.
///
/// A [`Role::Sender`] transmits to the first address and listens on the second.
/// A [`Role::Receiver`] does the opposite.
pub const DEFAULT_ADDRESSES: [[u8; 5]; 2] = [
    [0xE1, 0xF0, 0xF0, 0xF0, 0xF0],
    [0xD2, 0xF0, 0xF0, 0xF0, 0xF0],
];

/// The result of [`Messenger::send()`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SendOutcome<E> {
    /// The frame was sent on the given attempt.
    Sent { attempts: u8 },
    /// Every attempt failed. `last_error` is the reason the final attempt failed.
    Failed { attempts: u8, last_error: E },
    /// No attempt was allowed (`max_retries` was `0`).
    NotAttempted,
}

impl<E> SendOutcome<E> {
    /// Was the frame sent?
    pub const fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }

    /// The number of attempts made.
    pub const fn attempts(&self) -> u8 {
        match self {
            SendOutcome::Sent { attempts } | SendOutcome::Failed { attempts, .. } => *attempts,
            SendOutcome::NotAttempted => 0,
        }
    }
}

/// Which end of a link a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Sender,
    Receiver,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Role {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Role::Sender => defmt::write!(fmt, "Sender"),
            Role::Receiver => defmt::write!(fmt, "Receiver"),
        }
    }
}

/// Set up the pipes of an initialized `radio` for one end of a link.
///
/// - [`Role::Sender`] transmits to `addresses[0]` and opens pipe 1 on `addresses[1]`.
/// - [`Role::Receiver`] transmits to `addresses[1]`, opens pipe 1 on `addresses[0]`,
///   then starts listening.
pub fn configure_link<R, E>(radio: &mut R, role: Role, addresses: &[[u8; 5]; 2]) -> Result<(), E>
where
    R: EsbPipe<PipeErrorType = E> + EsbMode<ModeErrorType = E>,
{
    let (tx, rx) = match role {
        Role::Sender => (&addresses[0], &addresses[1]),
        Role::Receiver => (&addresses[1], &addresses[0]),
    };
    radio.open_tx_pipe(tx)?;
    radio.open_rx_pipe(1, rx)?;
    if role == Role::Receiver {
        radio.start_listening()?;
    }
    Ok(())
}

/// Sends and receives [`Frame`]s through an exclusively borrowed radio.
///
/// The `delay` is used for the pause between failed attempts and while waiting
/// for data to arrive.
pub struct Messenger<'r, R, D> {
    radio: &'r mut R,
    delay: D,
}

impl<R, D: DelayNs> Sleep for Messenger<'_, R, D> {
    fn sleep_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

impl<'r, R, D, E> Messenger<'r, R, D>
where
    R: EsbMode<ModeErrorType = E> + EsbRadio<RadioErrorType = E> + EsbFifo<FifoErrorType = E>,
    D: DelayNs,
{
    pub fn new(radio: &'r mut R, delay: D) -> Self {
        Self { radio, delay }
    }

    /// Access the borrowed radio.
    pub fn radio(&mut self) -> &mut R {
        self.radio
    }

    fn attempt(&mut self, frame: &Frame) -> Result<(), E> {
        if self.radio.is_listening() {
            self.radio.stop_listening()?;
        }
        self.radio.transmit(frame)
    }

    /// Transmit a `frame`, making up to `max_retries` attempts.
    ///
    /// Each failed attempt is followed by a 50 millisecond pause.
    /// If `max_retries` is `0`, nothing is transmitted and
    /// [`SendOutcome::NotAttempted`] is returned.
    ///
    /// This never returns an error. The reason for failure is carried
    /// by [`SendOutcome::Failed`].
    pub fn send(&mut self, frame: &Frame, max_retries: u8) -> SendOutcome<E> {
        if max_retries == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("send called with 0 retries; nothing sent");
            return SendOutcome::NotAttempted;
        }
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.attempt(frame) {
                Ok(()) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("sent frame (attempt {=u8})", attempts);
                    return SendOutcome::Sent { attempts };
                }
                Err(last_error) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("send attempt {=u8} failed", attempts);
                    self.sleep_us(RETRY_BACKOFF);
                    if attempts >= max_retries {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("failed to send after {=u8} attempts", attempts);
                        return SendOutcome::Failed {
                            attempts,
                            last_error,
                        };
                    }
                }
            }
        }
    }

    /// Send UTF-8 `text` (see [`Frame::from_text()`]).
    pub fn send_text(&mut self, text: &str, max_retries: u8) -> SendOutcome<E> {
        self.send(&Frame::from_text(text), max_retries)
    }

    /// Send up to 8 integers (see [`Frame::from_integers()`]).
    pub fn send_integers(&mut self, values: &[i32], max_retries: u8) -> SendOutcome<E> {
        self.send(&Frame::from_integers(values), max_retries)
    }

    /// Send a [`SensorReading`] (see [`Frame::from_sensor()`]).
    pub fn send_sensor(&mut self, reading: &SensorReading, max_retries: u8) -> SendOutcome<E> {
        self.send(&Frame::from_sensor(reading), max_retries)
    }

    /// Send a tagged [`Message`].
    pub fn send_message(&mut self, message: &Message, max_retries: u8) -> SendOutcome<E> {
        self.send(&message.encode(), max_retries)
    }

    /// Wait up to `timeout_ms` milliseconds for a [`Frame`] to arrive.
    ///
    /// The radio starts listening if it isn't already, and is left listening.
    /// Returns `Ok(None)` if nothing arrived in time.
    pub fn receive(&mut self, timeout_ms: u32) -> Result<Option<Frame>, E> {
        if !self.radio.is_listening() {
            self.radio.start_listening()?;
        }
        let schedule = PollSchedule::from_millis(RECEIVE_POLL_INTERVAL, timeout_ms);
        poll_until(self, schedule, |m| {
            if m.radio.available()? {
                Ok(ControlFlow::Break(m.radio.read_frame()?))
            } else {
                Ok(ControlFlow::Continue(()))
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod test {
    extern crate std;
    use super::{configure_link, Messenger, Role, SendOutcome, DEFAULT_ADDRESSES};
    use crate::{
        frame::{Frame, Message, SensorReading},
        radio::prelude::{EsbFifo, EsbMode, EsbPipe, EsbRadio},
        FifoState, Mode,
    };
    use embedded_hal::delay::DelayNs;
    use std::{collections::VecDeque, vec::Vec};

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum FakeError {
        Bus,
        TxFailed,
    }

    #[derive(Debug, PartialEq)]
    pub enum Call {
        StartListening,
        StopListening,
        Transmit(Frame),
        OpenTx([u8; 5]),
        OpenRx(u8, [u8; 5]),
    }

    /// A radio that fails its first `failures` transmissions.
    pub struct FakeRadio {
        pub mode: Mode,
        pub failures: usize,
        pub inbox: VecDeque<Frame>,
        /// The number of `available()` checks before the inbox is visible.
        pub latency: usize,
        pub calls: Vec<Call>,
    }

    impl Default for FakeRadio {
        fn default() -> Self {
            Self {
                mode: Mode::Standby,
                failures: 0,
                inbox: VecDeque::new(),
                latency: 0,
                calls: Vec::new(),
            }
        }
    }

    impl EsbMode for FakeRadio {
        type ModeErrorType = FakeError;

        fn start_listening(&mut self) -> Result<(), FakeError> {
            self.calls.push(Call::StartListening);
            self.mode = Mode::Listening;
            Ok(())
        }

        fn stop_listening(&mut self) -> Result<(), FakeError> {
            self.calls.push(Call::StopListening);
            self.mode = Mode::Standby;
            Ok(())
        }

        fn mode(&self) -> Mode {
            self.mode
        }
    }

    impl EsbRadio for FakeRadio {
        type RadioErrorType = FakeError;

        fn transmit(&mut self, frame: &Frame) -> Result<(), FakeError> {
            self.calls.push(Call::Transmit(*frame));
            if self.failures > 0 {
                self.failures -= 1;
                return Err(FakeError::TxFailed);
            }
            Ok(())
        }

        fn read_frame(&mut self) -> Result<Frame, FakeError> {
            self.inbox.pop_front().ok_or(FakeError::Bus)
        }
    }

    impl EsbFifo for FakeRadio {
        type FifoErrorType = FakeError;

        fn flush_rx(&mut self) -> Result<(), FakeError> {
            self.inbox.clear();
            Ok(())
        }

        fn flush_tx(&mut self) -> Result<(), FakeError> {
            Ok(())
        }

        fn get_fifo_state(&mut self, _about_tx: bool) -> Result<FifoState, FakeError> {
            Ok(if self.inbox.is_empty() {
                FifoState::Empty
            } else {
                FifoState::Occupied
            })
        }

        fn available(&mut self) -> Result<bool, FakeError> {
            if self.latency > 0 {
                self.latency -= 1;
                return Ok(false);
            }
            Ok(!self.inbox.is_empty())
        }
    }

    impl EsbPipe for FakeRadio {
        type PipeErrorType = FakeError;

        fn open_rx_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), FakeError> {
            let mut addr = [0u8; 5];
            addr.copy_from_slice(address);
            self.calls.push(Call::OpenRx(pipe, addr));
            Ok(())
        }

        fn open_tx_pipe(&mut self, address: &[u8]) -> Result<(), FakeError> {
            let mut addr = [0u8; 5];
            addr.copy_from_slice(address);
            self.calls.push(Call::OpenTx(addr));
            Ok(())
        }

        fn close_rx_pipe(&mut self, _pipe: u8) -> Result<(), FakeError> {
            Ok(())
        }

        fn get_address_length(&mut self) -> Result<u8, FakeError> {
            Ok(5)
        }
    }

    /// A delay that only records how long it was asked to block.
    #[derive(Default)]
    pub struct FakeDelay {
        pub elapsed_ns: u64,
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ns += ns as u64;
        }
    }

    fn transmissions(radio: &FakeRadio) -> usize {
        radio
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Transmit(_)))
            .count()
    }

    #[test]
    fn send_first_try() {
        let mut radio = FakeRadio::default();
        let mut delay = FakeDelay::default();
        let outcome = Messenger::new(&mut radio, &mut delay).send_text("Hello World!", 3);
        assert_eq!(outcome, SendOutcome::Sent { attempts: 1 });
        assert_eq!(radio.calls, [Call::Transmit(Frame::from_text("Hello World!"))]);
        assert_eq!(delay.elapsed_ns, 0);
    }

    #[test]
    fn send_succeeds_on_attempt_k() {
        for k in 1..=5u8 {
            let mut radio = FakeRadio {
                failures: k as usize - 1,
                ..Default::default()
            };
            let mut delay = FakeDelay::default();
            let outcome = Messenger::new(&mut radio, &mut delay).send_integers(&[42, 123, 456], 5);
            assert_eq!(outcome, SendOutcome::Sent { attempts: k });
            assert_eq!(transmissions(&radio), k as usize);
            assert_eq!(delay.elapsed_ns, (k as u64 - 1) * 50_000_000);
        }
    }

    #[test]
    fn send_exhausts_retries() {
        let mut radio = FakeRadio {
            failures: usize::MAX,
            ..Default::default()
        };
        let mut delay = FakeDelay::default();
        let reading = SensorReading::new(Some(23.5), Some(65.2), Some(1013.25));
        let outcome = Messenger::new(&mut radio, &mut delay).send_sensor(&reading, 3);
        assert_eq!(
            outcome,
            SendOutcome::Failed {
                attempts: 3,
                last_error: FakeError::TxFailed
            }
        );
        assert!(!outcome.is_sent());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(transmissions(&radio), 3);
        // a pause follows every failed attempt
        assert_eq!(delay.elapsed_ns, 150_000_000);
    }

    #[test]
    fn send_zero_retries_transmits_nothing() {
        let mut radio = FakeRadio {
            mode: Mode::Listening,
            failures: usize::MAX,
            ..Default::default()
        };
        let mut delay = FakeDelay::default();
        let outcome = Messenger::new(&mut radio, &mut delay).send_text("x", 0);
        assert_eq!(outcome, SendOutcome::NotAttempted);
        assert!(!outcome.is_sent());
        assert_eq!(outcome.attempts(), 0);
        assert_eq!(transmissions(&radio), 0);
        assert!(radio.calls.is_empty());
        assert_eq!(delay.elapsed_ns, 0);
    }

    #[test]
    fn send_stops_listening_first() {
        let mut radio = FakeRadio {
            mode: Mode::Listening,
            failures: 1,
            ..Default::default()
        };
        let mut delay = FakeDelay::default();
        let msg = Message::text("tagged");
        let outcome = Messenger::new(&mut radio, &mut delay).send_message(&msg, 2);
        assert!(outcome.is_sent());
        assert_eq!(
            radio.calls,
            [
                Call::StopListening,
                Call::Transmit(msg.encode()),
                Call::Transmit(msg.encode()),
            ]
        );
    }

    #[test]
    fn receive_waits_for_data() {
        let frame = Frame::from_text("ping");
        let mut radio = FakeRadio {
            latency: 3,
            ..Default::default()
        };
        radio.inbox.push_back(frame);
        let mut delay = FakeDelay::default();
        let received = Messenger::new(&mut radio, &mut delay).receive(100);
        assert_eq!(received, Ok(Some(frame)));
        assert_eq!(radio.calls, [Call::StartListening]);
        assert_eq!(radio.mode, Mode::Listening);
        assert_eq!(delay.elapsed_ns, 3_000_000);
    }

    #[test]
    fn receive_times_out() {
        let mut radio = FakeRadio {
            mode: Mode::Listening,
            ..Default::default()
        };
        let mut delay = FakeDelay::default();
        let received = Messenger::new(&mut radio, &mut delay).receive(20);
        assert_eq!(received, Ok(None));
        assert!(radio.calls.is_empty());
        assert_eq!(delay.elapsed_ns, 20_000_000);
    }

    #[test]
    fn link_roles() {
        let mut radio = FakeRadio::default();
        configure_link(&mut radio, Role::Sender, &DEFAULT_ADDRESSES).unwrap();
        assert_eq!(
            radio.calls,
            [
                Call::OpenTx(DEFAULT_ADDRESSES[0]),
                Call::OpenRx(1, DEFAULT_ADDRESSES[1]),
            ]
        );

        let mut radio = FakeRadio::default();
        configure_link(&mut radio, Role::Receiver, &DEFAULT_ADDRESSES).unwrap();
        assert_eq!(
            radio.calls,
            [
                Call::OpenTx(DEFAULT_ADDRESSES[1]),
                Call::OpenRx(1, DEFAULT_ADDRESSES[0]),
                Call::StartListening,
            ]
        );
    }
}
