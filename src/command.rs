//! Hardware instruction set shared by every display protocol
//!
//! A protocol never touches the bus. It emits a list of [`Command`]s which an
//! executor (see [`CommandExecutor`](crate::traits::CommandExecutor)) plays
//! back against the real pins. Every command has a one line text form:
//!
//! ```text
//! SetGpio Reset, 1
//! Sleep 200
//! SendCommand 0x12
//! SendData 0xAA, 0xBB
//! ReadData 0x1B, 7
//! WaitForIdle
//! DebugMessage Refresh screen
//! ```
//!
//! [`parse`] turns that text back into commands, which keeps protocol tests
//! down to comparing literal listings.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use crate::error::Error;

/// Output pins a protocol may toggle directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GpioPin {
    /// Panel reset, active low
    Reset,
    /// Data/Command select (high for data, low for command)
    Dc,
    /// SPI chip select
    Cs,
}

impl GpioPin {
    fn name(self) -> &'static str {
        match self {
            GpioPin::Reset => "Reset",
            GpioPin::Dc => "DC",
            GpioPin::Cs => "CS",
        }
    }
}

impl Display for GpioPin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GpioPin {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [GpioPin::Reset, GpioPin::Dc, GpioPin::Cs]
            .into_iter()
            .find(|pin| pin.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// One hardware operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Drive an output pin, `true` is high
    SetGpio {
        /// Pin to drive
        pin: GpioPin,
        /// Level to set
        level: bool,
    },
    /// Block for a number of milliseconds
    Sleep {
        /// Delay in ms
        milliseconds: u32,
    },
    /// Write one byte with DC low
    SendCommand {
        /// Controller opcode
        byte: u8,
    },
    /// Write bytes with DC high, in one chip select window
    SendData {
        /// Payload
        bytes: Vec<u8>,
    },
    /// Write `command`, then read one byte back
    ///
    /// `value` stays `None` until an executor ran the command.
    ReadData {
        /// Opcode to issue before reading
        command: u8,
        /// Caller chosen tag to find the result again
        correlation_id: u32,
        /// Byte read from the controller
        value: Option<u8>,
    },
    /// Poll the busy pin until the controller is idle
    WaitForIdle,
    /// Log line for the executor, no bus traffic
    DebugMessage {
        /// Message
        text: String,
    },
}

impl Command {
    /// `SendData` with a single byte
    pub fn data_byte(byte: u8) -> Self {
        Command::SendData { bytes: alloc::vec![byte] }
    }

    /// `DebugMessage` with the given text
    pub fn debug(text: &str) -> Self {
        Command::DebugMessage {
            text: text.to_string(),
        }
    }

    /// Opcode as used in the text form
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetGpio { .. } => "SetGpio",
            Command::Sleep { .. } => "Sleep",
            Command::SendCommand { .. } => "SendCommand",
            Command::SendData { .. } => "SendData",
            Command::ReadData { .. } => "ReadData",
            Command::WaitForIdle => "WaitForIdle",
            Command::DebugMessage { .. } => "DebugMessage",
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match self {
            Command::SetGpio { pin, level } => {
                write!(f, "{name} {pin}, {}", if *level { 1 } else { 0 })
            }
            Command::Sleep { milliseconds } => write!(f, "{name} {milliseconds}"),
            Command::SendCommand { byte } => write!(f, "{name} 0x{byte:02X}"),
            Command::SendData { bytes } => {
                f.write_str(name)?;
                for (i, byte) in bytes.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}0x{byte:02X}")?;
                }
                Ok(())
            }
            Command::ReadData {
                command,
                correlation_id,
                value,
            } => {
                write!(f, "{name} 0x{command:02X}, {correlation_id}")?;
                if let Some(value) = value {
                    write!(f, ", 0x{value:02X}")?;
                }
                Ok(())
            }
            Command::WaitForIdle => f.write_str(name),
            Command::DebugMessage { text } if text.is_empty() => f.write_str(name),
            Command::DebugMessage { text } => write!(f, "{name} {text}"),
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    /// Parses a single line, reporting failures as line 1
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s)
            .and_then(|command| command)
            .ok_or(Error::MalformedCommand { line: 1 })
    }
}

/// Parse the text form of a command listing
///
/// Blank lines are skipped. The first line that fails to parse is reported
/// by its 1-based number.
pub fn parse<I, S>(lines: I) -> Result<Vec<Command>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut commands = Vec::new();
    for (index, line) in lines.into_iter().enumerate() {
        match parse_line(line.as_ref()) {
            Some(Some(command)) => commands.push(command),
            Some(None) => {}
            None => return Err(Error::MalformedCommand { line: index + 1 }),
        }
    }
    Ok(commands)
}

/// Render a listing, one command per element
pub fn render(commands: &[Command]) -> Vec<String> {
    commands.iter().map(ToString::to_string).collect()
}

// Some(None) for a blank line, None on error
fn parse_line(line: &str) -> Option<Option<Command>> {
    let line = line.trim_start();
    if line.trim_end().is_empty() {
        return Some(None);
    }

    if let Some(rest) = line.strip_prefix("DebugMessage") {
        let rest = rest.trim_end_matches(['\r', '\n']);
        let text = match rest.strip_prefix(' ') {
            Some(text) => text,
            None if rest.is_empty() => "",
            None => return None,
        };
        return Some(Some(Command::debug(text)));
    }

    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let name = parts.next()?;
    let args: Vec<&str> = parts.collect();

    let command = match (name, args.as_slice()) {
        ("SetGpio", [pin, level]) => Command::SetGpio {
            pin: pin.parse().ok()?,
            level: parse_level(level)?,
        },
        ("Sleep", [ms]) => Command::Sleep {
            milliseconds: ms.parse().ok()?,
        },
        ("SendCommand", [byte]) => Command::SendCommand {
            byte: parse_byte(byte)?,
        },
        ("SendData", bytes) => Command::SendData {
            bytes: bytes
                .iter()
                .map(|b| parse_byte(b))
                .collect::<Option<Vec<u8>>>()?,
        },
        ("ReadData", [command, correlation_id]) => Command::ReadData {
            command: parse_byte(command)?,
            correlation_id: correlation_id.parse().ok()?,
            value: None,
        },
        ("ReadData", [command, correlation_id, value]) => Command::ReadData {
            command: parse_byte(command)?,
            correlation_id: correlation_id.parse().ok()?,
            value: Some(parse_byte(value)?),
        },
        ("WaitForIdle", []) => Command::WaitForIdle,
        _ => return None,
    };
    Some(Some(command))
}

fn parse_byte(s: &str) -> Option<u8> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn parse_level(s: &str) -> Option<bool> {
    if s == "1" || s.eq_ignore_ascii_case("high") || s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s == "0" || s.eq_ignore_ascii_case("low") || s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
