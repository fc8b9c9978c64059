//! Alnitak generic serial command set
//!
//! # Protocol Overview
//!
//! Every exchange is one fixed-width command followed by one fixed-width reply.
//! Commands are a `>` marker, a command letter, three data characters and a
//! carriage return. Unused data is sent as `OOO`, numeric data as three
//! zero-padded decimal digits:
//!
//! ```text
//! >POOO\r      ping
//! >B128\r      set brightness to 128
//! ```
//!
//! Replies start with `*`, echo the command letter, carry the two digit
//! product id of the device and end with three data characters and a newline:
//!
//! ```text
//! *P99OOO\n    Flip-Flat answering a ping
//! *J19128\n    Flat-Man reporting brightness 128
//! ```
//!
//! The serial link runs at 9600 baud, 8 data bits, no parity, one stop bit.

use strum::{Display, FromRepr};
use thiserror::Error;

/// Serial baud rate used by every Alnitak device.
pub const BAUD_RATE: u32 = 9600;

/// Data field sent with commands that take no argument.
const NO_DATA: &str = "OOO";

/// Length of a reply line without its terminator: `*`, letter, id, data.
const REPLY_LEN: usize = 7;

/// Errors that can occur while talking to an Alnitak device.
#[derive(Error, Debug)]
pub enum AlnitakError {
    /// Low-level I/O error on the serial link.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The port could not be opened or the device did not answer a ping.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// No complete reply received within the timeout period.
    #[error("Timeout waiting for response")]
    Timeout,

    /// Reply line doesn't match the `*Cii ddd` framing.
    #[error("Invalid response: {0:?}")]
    InvalidResponse(String),

    /// Well-formed reply to a different command than the one sent.
    #[error("Expected reply to '{expected}', got '{actual}'")]
    UnexpectedReply {
        /// Command letter that was sent
        expected: char,
        /// Command letter the device echoed
        actual: char,
    },
}

/// Result type for Alnitak operations.
pub type AlnitakResult<T> = Result<T, AlnitakError>;

/// Alnitak product identifiers reported in every reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
pub enum Product {
    #[strum(to_string = "Flat-Man XL")]
    FlatManXl = 10,
    #[strum(to_string = "Flat-Man L")]
    FlatManL = 15,
    #[strum(to_string = "Flat-Man")]
    FlatMan = 19,
    #[strum(to_string = "Flip-Mask/Remote Dust Cover")]
    FlipMask = 98,
    #[strum(to_string = "Flip-Flat")]
    FlipFlat = 99,
}

/// Commands understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Identify the device; the reply carries the product id
    Ping,
    /// Turn the light on
    LightOn,
    /// Turn the light off
    LightOff,
    /// Set brightness; the reply echoes the applied level
    SetBrightness(u8),
    /// Read the current brightness level
    GetBrightness,
    /// Read the firmware version
    FirmwareVersion,
}

impl Command {
    /// Letter identifying this command on the wire, echoed in the reply.
    pub fn letter(&self) -> char {
        match self {
            Command::Ping => 'P',
            Command::LightOn => 'L',
            Command::LightOff => 'D',
            Command::SetBrightness(_) => 'B',
            Command::GetBrightness => 'J',
            Command::FirmwareVersion => 'V',
        }
    }

    /// Encode the command as a complete wire message including terminator.
    pub fn encode(&self) -> String {
        match self {
            Command::SetBrightness(level) => format!(">{}{level:03}\r", self.letter()),
            _ => format!(">{}{NO_DATA}\r", self.letter()),
        }
    }
}

/// A parsed reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Command letter being answered
    pub command: char,
    /// Two digit product id of the responding device
    pub product_id: u8,
    /// Three character data field
    pub data: String,
}

impl Reply {
    /// Interpret the data field as a three digit decimal number.
    pub fn value(&self) -> AlnitakResult<u16> {
        if !self.data.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AlnitakError::InvalidResponse(format!(
                "non-numeric data field {:?}",
                self.data
            )));
        }
        self.data
            .parse()
            .map_err(|_| AlnitakError::InvalidResponse(self.data.clone()))
    }

    /// Known product matching the reply's product id, if any.
    pub fn product(&self) -> Option<Product> {
        Product::from_repr(self.product_id)
    }
}

/// Parse a single reply line.
///
/// Trailing `\r` and `\n` are ignored.
///
/// # Example
///
/// ```
/// use hardware::alnitak::{parse_reply, Product};
///
/// let reply = parse_reply("*J99128\n").unwrap();
/// assert_eq!(reply.command, 'J');
/// assert_eq!(reply.product(), Some(Product::FlipFlat));
/// assert_eq!(reply.value().unwrap(), 128);
/// ```
pub fn parse_reply(line: &str) -> AlnitakResult<Reply> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let bytes = line.as_bytes();

    if !line.is_ascii() || bytes.len() != REPLY_LEN || bytes[0] != b'*' {
        return Err(AlnitakError::InvalidResponse(line.to_string()));
    }

    let command = bytes[1] as char;
    if !command.is_ascii_alphabetic() {
        return Err(AlnitakError::InvalidResponse(line.to_string()));
    }

    let id = &line[2..4];
    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AlnitakError::InvalidResponse(line.to_string()));
    }
    let product_id = id
        .parse()
        .map_err(|_| AlnitakError::InvalidResponse(line.to_string()))?;

    Ok(Reply {
        command,
        product_id,
        data: line[4..].to_string(),
    })
}
