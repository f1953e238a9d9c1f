use core::fmt::{Debug, Display, Formatter};

use crate::color::{DisplayColorStyle, PixelColor, RefreshMode};
use crate::command::GpioPin;

/// Failures raised while building command sequences
///
/// These are all local precondition violations. A call that returns one of
/// them did not produce any commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The device cannot be driven in this color style
    UnsupportedStyle {
        /// Requested style
        style: DisplayColorStyle,
    },

    /// The device cannot refresh this way in this color style
    UnsupportedRefreshMode {
        /// Requested style
        style: DisplayColorStyle,
        /// Requested refresh mode
        mode: RefreshMode,
    },

    /// The device has no partial refresh support at all
    PartialRefreshUnsupported,

    /// The byte aligned partial window leaves the panel or is empty
    InvalidWindow {
        /// Aligned left edge
        x: u32,
        /// Top edge
        y: u32,
        /// Aligned width
        width: u32,
        /// Height
        height: u32,
    },

    /// Image size does not match the panel, as `(width, height)`
    ImageDimensionMismatch {
        /// Size of the panel
        expected: (usize, usize),
        /// Size of the given image
        actual: (usize, usize),
    },

    /// A pixel uses a color the style cannot encode
    UnsupportedColorForStyle {
        /// Offending color
        color: PixelColor,
        /// Style used for encoding
        style: DisplayColorStyle,
    },

    /// No style can show every color of an image
    NoMatchingStyle,

    /// Row index outside of the image
    RowOutOfRange {
        /// Requested row
        row: usize,
    },

    /// A command line could not be parsed (1-based line number)
    MalformedCommand {
        /// Line of the input that failed
        line: usize,
    },

    /// A color style has no registered color set
    UndefinedStyle {
        /// Style without colors
        style: DisplayColorStyle,
    },

    /// `end_batch` without a matching `begin_batch`
    UnbalancedBatch,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedStyle { style } => {
                write!(f, "color style {style:?} is not supported by this display")
            }
            Self::UnsupportedRefreshMode { style, mode } => {
                write!(f, "refresh mode {mode:?} is not supported for {style:?}")
            }
            Self::PartialRefreshUnsupported => {
                write!(f, "partial refresh is not supported by this display")
            }
            Self::InvalidWindow {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "window {width}x{height} at ({x}, {y}) does not fit the display"
            ),
            Self::ImageDimensionMismatch { expected, actual } => write!(
                f,
                "image is {}x{}, display needs {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::UnsupportedColorForStyle { color, style } => {
                write!(f, "color {color:?} cannot be encoded in {style:?}")
            }
            Self::NoMatchingStyle => write!(f, "no color style contains every color of the image"),
            Self::RowOutOfRange { row } => write!(f, "row {row} is outside of the image"),
            Self::MalformedCommand { line } => write!(f, "malformed command on line {line}"),
            Self::UndefinedStyle { style } => {
                write!(f, "color style {style:?} has no registered colors")
            }
            Self::UnbalancedBatch => write!(f, "end_batch called without begin_batch"),
        }
    }
}

impl core::error::Error for Error {}

/// Errors of the embedded-hal command executor
///
/// One variant per bus or pin, carrying the HAL error.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy)]
pub enum TransportError<SPI, BUSY, DC, RST> {
    /// Encountered an SPI error
    SpiError(SPI),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY),

    /// Encountered an error on DC GPIO
    DcError(DC),

    /// Encountered an error on RST GPIO
    RstError(RST),

    /// Busy pin stayed asserted longer than the configured timeout
    DeviceNotResponding {
        /// Milliseconds spent polling
        waited_ms: u32,
    },

    /// The executor does not drive this pin
    UnsupportedPin {
        /// Pin named by the command
        pin: GpioPin,
    },
}

impl<SPI, BUSY, DC, RST> Display for TransportError<SPI, BUSY, DC, RST>
where
    SPI: Debug,
    BUSY: Debug,
    DC: Debug,
    RST: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => write!(f, "spi: {err:?}"),
            Self::BusyError(err) => write!(f, "busy pin: {err:?}"),
            Self::DcError(err) => write!(f, "dc pin: {err:?}"),
            Self::RstError(err) => write!(f, "reset pin: {err:?}"),
            Self::DeviceNotResponding { waited_ms } => {
                write!(f, "device still busy after {waited_ms} ms")
            }
            Self::UnsupportedPin { pin } => write!(f, "pin {pin} is not driven by this executor"),
        }
    }
}

impl<SPI, BUSY, DC, RST> Debug for TransportError<SPI, BUSY, DC, RST>
where
    SPI: Debug,
    BUSY: Debug,
    DC: Debug,
    RST: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SpiError(err) => f.debug_tuple("SpiError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
            Self::DeviceNotResponding { waited_ms } => f
                .debug_struct("DeviceNotResponding")
                .field("waited_ms", waited_ms)
                .finish(),
            Self::UnsupportedPin { pin } => {
                f.debug_struct("UnsupportedPin").field("pin", pin).finish()
            }
        }
    }
}

impl<SPI, BUSY, DC, RST> core::error::Error for TransportError<SPI, BUSY, DC, RST>
where
    SPI: Debug,
    BUSY: Debug,
    DC: Debug,
    RST: Debug,
{
}

/// Errors of [`DisplayManager`](crate::manager::DisplayManager)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerError<E> {
    /// Building the command sequence failed, nothing was sent
    Protocol(Error),
    /// The executor failed while sending
    Transport(E),
}

impl<E> From<Error> for ManagerError<E> {
    fn from(err: Error) -> Self {
        ManagerError::Protocol(err)
    }
}

impl<E: Debug> Display for ManagerError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Protocol(err) => Display::fmt(err, f),
            Self::Transport(err) => write!(f, "transport failure: {err:?}"),
        }
    }
}

impl<E: Debug> core::error::Error for ManagerError<E> {}
