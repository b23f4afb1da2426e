//! Fixed length payloads and their encodings.
//!
//! Every payload exchanged over the air is exactly [`FRAME_SIZE`] bytes.
//! Unused bytes are always zero.
//!
//! There are two families of encodings:
//!
//! - The untagged encodings ([`Frame::from_text()`], [`Frame::from_integers()`],
//!   [`Frame::from_sensor()`]) carry no type information. The receiver must know
//!   which decoder to use.
//! - The tagged [`Message`] encoding spends the first byte on a discriminant so
//!   the receiver can decode any frame without prior agreement.
use core::fmt::{Display, Formatter, Result as FmtResult};

use heapless::{String, Vec};

/// The length (in bytes) of every payload.
pub const FRAME_SIZE: usize = 32;

/// The maximum number of integers held by an untagged frame.
pub const MAX_INTEGERS: usize = FRAME_SIZE / 4;

/// The maximum number of integers held by a tagged [`Message::Integers`].
pub const MAX_TAGGED_INTEGERS: usize = (FRAME_SIZE - 2) / 4;

/// The maximum length (in bytes) of the text in a tagged [`Message::Text`].
pub const MAX_TAGGED_TEXT: usize = FRAME_SIZE - 1;

const SENSOR_SIZE: usize = 12;

const TAG_TEXT: u8 = 0x01;
const TAG_INTEGERS: u8 = 0x02;
const TAG_SENSOR: u8 = 0x03;

/// Reasons a [`Frame`] could not be decoded.
///
/// These are never fatal; the frame can still be inspected with [`Frame::as_bytes()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The text was not valid UTF-8.
    InvalidUtf8,
    /// The buffer was shorter than the requested layout.
    Truncated {
        /// The number of bytes the layout requires.
        expected: usize,
        /// The number of bytes available.
        actual: usize,
    },
    /// The first byte of a tagged frame is not a known discriminant.
    UnknownTag(u8),
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodeError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DecodeError::InvalidUtf8 => defmt::write!(fmt, "invalid UTF-8"),
            DecodeError::Truncated { expected, actual } => defmt::write!(
                fmt,
                "expected {=usize} bytes, got {=usize}",
                expected,
                actual
            ),
            DecodeError::UnknownTag(tag) => defmt::write!(fmt, "unknown tag {=u8:#04X}", tag),
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DecodeError::InvalidUtf8 => write!(f, "invalid UTF-8"),
            DecodeError::Truncated { expected, actual } => {
                write!(f, "expected {expected} bytes, got {actual}")
            }
            DecodeError::UnknownTag(tag) => write!(f, "unknown tag {tag:#04X}"),
        }
    }
}

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// A record of three environmental readings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorReading {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "T={=f32} H={=f32} P={=f32}",
            self.temperature,
            self.humidity,
            self.pressure
        )
    }
}

impl SensorReading {
    /// Create a reading where absent values are recorded as `0.0`.
    pub fn new(temperature: Option<f32>, humidity: Option<f32>, pressure: Option<f32>) -> Self {
        Self {
            temperature: temperature.unwrap_or(0.0),
            humidity: humidity.unwrap_or(0.0),
            pressure: pressure.unwrap_or(0.0),
        }
    }

    fn write_to(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.temperature.to_le_bytes());
        buf[4..8].copy_from_slice(&self.humidity.to_le_bytes());
        buf[8..12].copy_from_slice(&self.pressure.to_le_bytes());
    }
}

/// A single payload of exactly [`FRAME_SIZE`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame([u8; FRAME_SIZE]);

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Frame({=[u8]:02X})", &self.0[..])
    }
}

impl From<[u8; FRAME_SIZE]> for Frame {
    fn from(value: [u8; FRAME_SIZE]) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Truncate `text` to at most `max` bytes without splitting a character.
fn truncate_text(text: &str, max: usize) -> &str {
    let mut end = text.len().min(max);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// The given bytes without any trailing zeros.
fn trim_zeros(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

impl Frame {
    /// Create a frame from raw bytes.
    ///
    /// Bytes beyond [`FRAME_SIZE`] are ignored, and a shorter `bytes` is zero-padded.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = [0u8; FRAME_SIZE];
        let len = bytes.len().min(FRAME_SIZE);
        buf[..len].copy_from_slice(&bytes[..len]);
        Self(buf)
    }

    /// The raw bytes of this frame.
    pub const fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }

    /// Encode UTF-8 `text`.
    ///
    /// Text longer than 32 bytes is truncated on the last character boundary
    /// that fits.
    ///
    /// ```
    /// use rf24link::frame::Frame;
    /// let frame = Frame::from_text("Hello");
    /// assert_eq!(&frame.as_bytes()[..6], b"Hello\0");
    /// assert_eq!(frame.decode_text(), Ok("Hello"));
    /// ```
    pub fn from_text(text: &str) -> Self {
        Self::from_slice(truncate_text(text, FRAME_SIZE).as_bytes())
    }

    /// Encode a batch of integers as packed little-endian `i32`s.
    ///
    /// Only the first [`MAX_INTEGERS`] values are used.
    ///
    /// ```
    /// use rf24link::frame::Frame;
    /// let frame = Frame::from_integers(&[42, 123, 456]);
    /// assert_eq!(&frame.as_bytes()[..4], &[42, 0, 0, 0]);
    /// assert!(frame.as_bytes()[12..].iter().all(|b| *b == 0));
    /// ```
    pub fn from_integers(values: &[i32]) -> Self {
        let mut buf = [0u8; FRAME_SIZE];
        for (chunk, value) in buf.chunks_exact_mut(4).zip(values.iter()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Self(buf)
    }

    /// Encode a [`SensorReading`] as three little-endian `f32`s in bytes 0-11.
    pub fn from_sensor(reading: &SensorReading) -> Self {
        let mut buf = [0u8; FRAME_SIZE];
        reading.write_to(&mut buf[..SENSOR_SIZE]);
        Self(buf)
    }

    /// Decode the text of a frame made by [`Frame::from_text()`].
    pub fn decode_text(&self) -> Result<&str, DecodeError> {
        decode_text(&self.0)
    }

    /// Decode the first `count` integers of a frame made by [`Frame::from_integers()`].
    pub fn decode_integers(&self, count: usize) -> Result<Vec<i32, MAX_INTEGERS>, DecodeError> {
        decode_integers(&self.0, count)
    }

    /// Decode a frame made by [`Frame::from_sensor()`].
    pub fn decode_sensor(&self) -> Result<SensorReading, DecodeError> {
        decode_sensor(&self.0)
    }
}

/// Decode zero-padded UTF-8 text.
///
/// Trailing zeros are stripped before decoding.
pub fn decode_text(bytes: &[u8]) -> Result<&str, DecodeError> {
    core::str::from_utf8(trim_zeros(bytes)).map_err(|_| DecodeError::InvalidUtf8)
}

/// Decode `count` packed little-endian `i32`s from the start of `bytes`.
///
/// At most [`MAX_INTEGERS`] values fit in a frame.
pub fn decode_integers(bytes: &[u8], count: usize) -> Result<Vec<i32, MAX_INTEGERS>, DecodeError> {
    let expected = count.saturating_mul(4);
    let available = bytes.len().min(FRAME_SIZE);
    if expected > available {
        return Err(DecodeError::Truncated {
            expected,
            actual: available,
        });
    }
    Ok(bytes[..expected]
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Decode three little-endian `f32`s from the start of `bytes`.
pub fn decode_sensor(bytes: &[u8]) -> Result<SensorReading, DecodeError> {
    if bytes.len() < SENSOR_SIZE {
        return Err(DecodeError::Truncated {
            expected: SENSOR_SIZE,
            actual: bytes.len(),
        });
    }
    let f = |i: usize| f32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    Ok(SensorReading {
        temperature: f(0),
        humidity: f(4),
        pressure: f(8),
    })
}

/// A self-describing payload.
///
/// | byte 0 | bytes 1.. |
/// |:------:|:----------|
/// | `0x01` | UTF-8 text (up to 31 bytes) |
/// | `0x02` | a count byte, then up to 7 little-endian `i32`s |
/// | `0x03` | three little-endian `f32`s |
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String<MAX_TAGGED_TEXT>),
    Integers(Vec<i32, MAX_TAGGED_INTEGERS>),
    Sensor(SensorReading),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Message {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Message::Text(text) => defmt::write!(fmt, "Text({=str})", text.as_str()),
            Message::Integers(values) => defmt::write!(fmt, "Integers({=[?]})", &values[..]),
            Message::Sensor(reading) => defmt::write!(fmt, "Sensor({})", reading),
        }
    }
}

impl Message {
    /// Create a [`Message::Text`], truncating `text` on a character boundary.
    pub fn text(text: &str) -> Self {
        let text = truncate_text(text, MAX_TAGGED_TEXT);
        Message::Text(String::try_from(text).unwrap_or_default())
    }

    /// Create a [`Message::Integers`] from the first 7 `values`.
    pub fn integers(values: &[i32]) -> Self {
        Message::Integers(values.iter().take(MAX_TAGGED_INTEGERS).copied().collect())
    }

    /// Encode this message into a [`Frame`].
    ///
    /// ```
    /// use rf24link::frame::Message;
    /// let msg = Message::integers(&[-1, 2]);
    /// let frame = msg.encode();
    /// assert_eq!(&frame.as_bytes()[..3], &[0x02, 2, 0xFF]);
    /// assert_eq!(Message::decode(&frame), Ok(msg));
    /// ```
    pub fn encode(&self) -> Frame {
        let mut buf = [0u8; FRAME_SIZE];
        match self {
            Message::Text(text) => {
                buf[0] = TAG_TEXT;
                buf[1..=text.len()].copy_from_slice(text.as_bytes());
            }
            Message::Integers(values) => {
                buf[0] = TAG_INTEGERS;
                buf[1] = values.len() as u8;
                for (chunk, value) in buf[2..].chunks_exact_mut(4).zip(values.iter()) {
                    chunk.copy_from_slice(&value.to_le_bytes());
                }
            }
            Message::Sensor(reading) => {
                buf[0] = TAG_SENSOR;
                reading.write_to(&mut buf[1..=SENSOR_SIZE]);
            }
        }
        Frame(buf)
    }

    /// Decode a [`Frame`] made by [`Message::encode()`].
    pub fn decode(frame: &Frame) -> Result<Self, DecodeError> {
        let (tag, body) = (frame.0[0], &frame.0[1..]);
        match tag {
            TAG_TEXT => Ok(Message::text(decode_text(body)?)),
            TAG_INTEGERS => {
                let count = body[0] as usize;
                if count > MAX_TAGGED_INTEGERS {
                    return Err(DecodeError::Truncated {
                        expected: 1 + count * 4,
                        actual: body.len(),
                    });
                }
                let values = decode_integers(&body[1..], count)?;
                Ok(Message::integers(&values))
            }
            TAG_SENSOR => Ok(Message::Sensor(decode_sensor(body)?)),
            _ => Err(DecodeError::UnknownTag(tag)),
        }
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{
        decode_integers, decode_sensor, DecodeError, Frame, Message, SensorReading, FRAME_SIZE,
    };
    use std::format;

    #[test]
    fn text() {
        let frame = Frame::from_text("Hello nRF24!");
        assert_eq!(&frame.as_bytes()[..12], b"Hello nRF24!");
        assert!(frame.as_bytes()[12..].iter().all(|b| *b == 0));
        assert_eq!(frame.decode_text(), Ok("Hello nRF24!"));
    }

    #[test]
    fn text_truncated() {
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        let frame = Frame::from_text(long);
        assert_eq!(frame.decode_text(), Ok(&long[..FRAME_SIZE]));

        // a 2 byte character straddling the 32nd byte is dropped entirely
        let accented = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\u{e9}";
        assert_eq!(accented.len(), 33);
        let frame = Frame::from_text(accented);
        assert_eq!(frame.decode_text(), Ok(&accented[..31]));
        assert_eq!(frame.as_bytes()[31], 0);
    }

    #[test]
    fn invalid_text() {
        let frame = Frame::from_slice(&[0x48, 0xFF, 0xFE]);
        assert_eq!(frame.decode_text(), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn integers() {
        let frame = Frame::from_integers(&[42, 123, 456]);
        let mut expected = [0u8; FRAME_SIZE];
        expected[0] = 42;
        expected[4] = 123;
        expected[8..10].copy_from_slice(&[0xC8, 0x01]);
        assert_eq!(frame.as_bytes(), &expected);
        assert_eq!(&frame.decode_integers(3).unwrap()[..], &[42, 123, 456]);
    }

    #[test]
    fn integers_truncated_to_eight() {
        let values = [1, -2, 3, -4, 5, -6, 7, -8, 9, 10];
        let frame = Frame::from_integers(&values);
        assert_eq!(&frame.decode_integers(8).unwrap()[..], &values[..8]);
        assert_eq!(
            frame.decode_integers(9),
            Err(DecodeError::Truncated {
                expected: 36,
                actual: 32
            })
        );
    }

    #[test]
    fn short_buffers() {
        assert_eq!(
            decode_integers(&[1, 0, 0, 0, 2], 2),
            Err(DecodeError::Truncated {
                expected: 8,
                actual: 5
            })
        );
        assert_eq!(
            decode_sensor(&[0u8; 11]),
            Err(DecodeError::Truncated {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn sensor() {
        let reading = SensorReading::new(Some(23.5), None, Some(1013.25));
        assert_eq!(reading.humidity, 0.0);
        let frame = Frame::from_sensor(&reading);
        assert_eq!(&frame.as_bytes()[..4], &23.5f32.to_le_bytes());
        assert_eq!(&frame.as_bytes()[4..8], &[0u8; 4]);
        assert!(frame.as_bytes()[12..].iter().all(|b| *b == 0));
        assert_eq!(frame.decode_sensor(), Ok(reading));
    }

    #[test]
    fn tagged_text() {
        let msg = Message::text("a tagged message that is far too long to fit");
        let frame = msg.encode();
        assert_eq!(frame.as_bytes()[0], 0x01);
        match Message::decode(&frame).unwrap() {
            Message::Text(text) => {
                assert_eq!(text.as_str(), "a tagged message that is far to");
                assert_eq!(text.len(), 31);
            }
            other => panic!("decoded {other:?}"),
        }
    }

    #[test]
    fn tagged_integers_and_sensor() {
        let msg = Message::integers(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let frame = msg.encode();
        assert_eq!(frame.as_bytes()[1], 7);
        assert_eq!(Message::decode(&frame), Ok(Message::integers(&[1, 2, 3, 4, 5, 6, 7])));

        let msg = Message::Sensor(SensorReading::new(Some(-4.0), Some(55.5), None));
        assert_eq!(Message::decode(&msg.encode()), Ok(msg));
    }

    #[test]
    fn tagged_errors() {
        assert_eq!(
            Message::decode(&Frame::from_text("Hello")),
            Err(DecodeError::UnknownTag(b'H'))
        );
        assert_eq!(
            Message::decode(&Frame::default()),
            Err(DecodeError::UnknownTag(0))
        );
        let frame = Frame::from_slice(&[0x02, 9]);
        assert!(matches!(
            Message::decode(&frame),
            Err(DecodeError::Truncated { .. })
        ));
        assert_eq!(
            format!("{}", DecodeError::UnknownTag(0x48)),
            "unknown tag 0x48"
        );
    }
}
