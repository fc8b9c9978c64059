//! Serial driver for Alnitak flat panels
//!
//! [`FlatMan`] owns the serial link to a single panel and implements
//! [`FlatPanel`] on top of the generic command set. The same driver serves
//! every Alnitak light source since they share the command set; the model is
//! identified from the product id in the ping reply.
//!
//! # Example
//!
//! ```no_run
//! use hardware::alnitak::FlatMan;
//! use hardware::FlatPanel;
//!
//! let mut panel = FlatMan::connect("/dev/ttyUSB0")?;
//! panel.set_light(true)?;
//! panel.set_brightness(128)?;
//! println!("Brightness: {}", panel.brightness()?);
//! # Ok::<(), hardware::alnitak::AlnitakError>(())
//! ```

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info, trace};

use super::protocol::{
    parse_reply, AlnitakError, AlnitakResult, Command, Product, Reply, BAUD_RATE,
};
use crate::flat_panel::FlatPanel;

/// Default timeout for a single command/reply exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound on bytes read while waiting for a reply terminator.
const MAX_REPLY_BYTES: usize = 64;

/// Resolve a caller-supplied port identifier to a serial port name.
///
/// Automation packages pass a bare COM port number. On Windows a purely
/// numeric identifier becomes `COM<n>`; anything else is used verbatim.
///
/// # Example
///
/// ```
/// use hardware::alnitak::port_name;
///
/// assert_eq!(port_name("/dev/ttyACM0"), "/dev/ttyACM0");
/// ```
pub fn port_name(port: &str) -> String {
    let numeric = !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit());
    if cfg!(windows) && numeric {
        format!("COM{port}")
    } else {
        port.to_string()
    }
}

/// Driver for an Alnitak flat panel on a serial link.
///
/// The transport defaults to an open [`SerialPort`], but any byte stream can
/// be used, which is how the driver is exercised without hardware.
pub struct FlatMan<T = Box<dyn SerialPort>> {
    port: T,
    product_id: u8,
}

impl FlatMan {
    /// Open the serial port and verify an Alnitak device answers.
    ///
    /// # Arguments
    ///
    /// * `port` - Port identifier, resolved with [`port_name`]
    ///
    /// # Errors
    ///
    /// Returns [`AlnitakError::ConnectionFailed`] if the port cannot be opened
    /// or the device does not answer the ping.
    pub fn connect(port: &str) -> AlnitakResult<Self> {
        let name = port_name(port);
        let serial = serialport::new(&name, BAUD_RATE)
            .timeout(DEFAULT_TIMEOUT)
            .open()
            .map_err(|e| AlnitakError::ConnectionFailed(format!("{name}: {e}")))?;

        debug!("Opened {} at {} baud", name, BAUD_RATE);

        Self::init(serial)
            .map_err(|e| AlnitakError::ConnectionFailed(format!("{name}: no reply to ping ({e})")))
    }
}

impl<T: Read + Write> FlatMan<T> {
    /// Initialize the driver on an already open transport.
    ///
    /// Pings the device to learn its product id and logs what answered.
    pub fn init(port: T) -> AlnitakResult<Self> {
        let mut panel = Self {
            port,
            product_id: 0,
        };

        let reply = panel.transact(Command::Ping)?;
        panel.product_id = reply.product_id;

        match reply.product() {
            Some(product) => info!("Connected to {}", product),
            None => info!("Connected to unknown Alnitak product {}", reply.product_id),
        }

        match panel.firmware_version() {
            Ok(version) => debug!("Firmware version {}", version),
            Err(e) => debug!("Firmware version unavailable: {}", e),
        }

        Ok(panel)
    }

    /// Product id reported by the device at connection time.
    pub fn product_id(&self) -> u8 {
        self.product_id
    }

    /// Known product model, if the id is recognized.
    pub fn product(&self) -> Option<Product> {
        Product::from_repr(self.product_id)
    }

    /// Query the firmware version number.
    pub fn firmware_version(&mut self) -> AlnitakResult<u16> {
        self.transact(Command::FirmwareVersion)?.value()
    }

    /// Send a command and read its reply, checking the echoed letter.
    fn transact(&mut self, command: Command) -> AlnitakResult<Reply> {
        let msg = command.encode();
        debug!("Alnitak send: {:?}", msg.trim_end());
        self.port.write_all(msg.as_bytes())?;
        self.port.flush()?;

        let line = self.read_line()?;
        let reply = parse_reply(&line)?;
        if reply.command != command.letter() {
            return Err(AlnitakError::UnexpectedReply {
                expected: command.letter(),
                actual: reply.command,
            });
        }
        Ok(reply)
    }

    /// Read bytes up to and including the next `\n`.
    ///
    /// Leading line terminators left over from a previous exchange are skipped.
    fn read_line(&mut self) -> AlnitakResult<String> {
        let mut buf = [0u8; 1];
        let mut bytes = Vec::new();

        loop {
            match self.port.read(&mut buf) {
                Ok(0) => return Err(AlnitakError::Timeout),
                Ok(_) => {
                    if bytes.is_empty() && (buf[0] == b'\r' || buf[0] == b'\n') {
                        continue;
                    }
                    bytes.push(buf[0]);
                    if buf[0] == b'\n' {
                        break;
                    }
                    if bytes.len() > MAX_REPLY_BYTES {
                        return Err(AlnitakError::InvalidResponse(
                            String::from_utf8_lossy(&bytes).into_owned(),
                        ));
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                    return Err(AlnitakError::Timeout);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let line = String::from_utf8_lossy(&bytes).into_owned();
        trace!("Alnitak recv: {:?}", line);
        Ok(line)
    }
}

impl<T: Read + Write> FlatPanel for FlatMan<T> {
    type Error = AlnitakError;

    fn set_light(&mut self, on: bool) -> AlnitakResult<()> {
        let command = if on {
            Command::LightOn
        } else {
            Command::LightOff
        };
        self.transact(command)?;
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> AlnitakResult<()> {
        let applied = self.transact(Command::SetBrightness(level))?.value()?;
        if applied != u16::from(level) {
            debug!("Requested brightness {}, device applied {}", level, applied);
        }
        Ok(())
    }

    fn brightness(&mut self) -> AlnitakResult<u8> {
        let reply = self.transact(Command::GetBrightness)?;
        let value = reply.value()?;
        u8::try_from(value)
            .map_err(|_| AlnitakError::InvalidResponse(format!("brightness {value} out of range")))
    }
}
