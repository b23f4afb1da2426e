#![doc = include_str!("../README.md")]
//!
//! ## Radio API
//!
//! - [`RF24::new()`](fn@crate::radio::RF24::new)
//! - [`RF24::init()`](radio/struct.RF24.html#method.init)
//! - [`RF24::with_config()`](radio/struct.RF24.html#method.with_config)
//! - [`RF24::start_listening()`](radio/struct.RF24.html#method.start_listening)
//! - [`RF24::stop_listening()`](radio/struct.RF24.html#method.stop_listening)
//! - [`RF24::mode()`](radio/struct.RF24.html#method.mode)
//! - [`RF24::power_up()`](radio/struct.RF24.html#method.power_up)
//! - [`RF24::power_down()`](radio/struct.RF24.html#method.power_down)
//! - [`RF24::open_tx_pipe()`](radio/struct.RF24.html#method.open_tx_pipe)
//! - [`RF24::open_rx_pipe()`](radio/struct.RF24.html#method.open_rx_pipe)
//! - [`RF24::close_rx_pipe()`](radio/struct.RF24.html#method.close_rx_pipe)
//! - [`RF24::set_channel()`](radio/struct.RF24.html#method.set_channel)
//! - [`RF24::get_channel()`](radio/struct.RF24.html#method.get_channel)
//! - [`RF24::available()`](radio/struct.RF24.html#method.available)
//! - [`RF24::transmit()`](radio/struct.RF24.html#method.transmit)
//! - [`RF24::read_frame()`](radio/struct.RF24.html#method.read_frame)
//! - [`RF24::rpd()`](radio/struct.RF24.html#method.rpd)
//!
//! ## Register API
//!
//! - [`RF24::read_register()`](radio/struct.RF24.html#method.read_register)
//! - [`RF24::write_register()`](radio/struct.RF24.html#method.write_register)
//! - [`RF24::clear_status_flags()`](radio/struct.RF24.html#method.clear_status_flags)
//! - [`RF24::flush_rx()`](radio/struct.RF24.html#method.flush_rx)
//! - [`RF24::flush_tx()`](radio/struct.RF24.html#method.flush_tx)
//! - [`RF24::get_fifo_state()`](radio/struct.RF24.html#method.get_fifo_state)
//! - [`RF24::get_address_length()`](radio/struct.RF24.html#method.get_address_length)
//! - [`RF24::print_details()`](radio/struct.RF24.html#method.print_details)
//!
//! ## Messaging API
//!
//! - [`Frame`](struct@crate::frame::Frame)
//! - [`Message`](enum@crate::frame::Message)
//! - [`configure_link()`](fn@crate::messaging::configure_link)
//! - [`Messenger::send()`](fn@crate::messaging::Messenger::send)
//! - [`Messenger::send_text()`](fn@crate::messaging::Messenger::send_text)
//! - [`Messenger::send_integers()`](fn@crate::messaging::Messenger::send_integers)
//! - [`Messenger::send_sensor()`](fn@crate::messaging::Messenger::send_sensor)
//! - [`Messenger::send_message()`](fn@crate::messaging::Messenger::send_message)
//! - [`Messenger::receive()`](fn@crate::messaging::Messenger::receive)
//!
//! ## Scanner API
//!
//! - [`Scanner::scan_channel()`](fn@crate::scanner::Scanner::scan_channel)
//! - [`Scanner::sample_channel()`](fn@crate::scanner::Scanner::sample_channel)
//! - [`Scanner::scan_all_channels()`](fn@crate::scanner::Scanner::scan_all_channels)
//! - [`Scanner::continuous_scan()`](fn@crate::scanner::Scanner::continuous_scan)
//! - [`Scanner::rank_channels()`](fn@crate::scanner::Scanner::rank_channels)
//! - [`Scanner::find_quietest_channel()`](fn@crate::scanner::Scanner::find_quietest_channel)
//!
#![no_std]

mod types;
pub use types::{ConfigError, CrcLength, DataRate, FifoState, Mode, PaLevel, StatusFlags};
pub mod frame;
pub mod messaging;
pub mod poll;
pub mod radio;
pub mod scanner;
