//! Command sequence generators for Waveshare E-Ink Displays
//!
//! Every panel operation (initialize, upload a frame, refresh, sleep) is
//! built as a plain list of [`Command`](command::Command)s by a
//! [`DeviceProtocol`](traits::DeviceProtocol). Nothing in that layer touches
//! hardware. The lists are played back by a
//! [`CommandExecutor`](traits::CommandExecutor), for example the
//! [`embedded-hal`] based [`DisplayInterface`](interface::DisplayInterface).
//!
//! [`DisplayManager`](manager::DisplayManager) sits on top and batches draws,
//! re-initializing the panel only when the color style or refresh mode
//! changes.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1.0
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is only needed for [`ReadData`](command::Command::ReadData)
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - Chip select is handled by the [`SpiDevice`](embedded_hal::spi::SpiDevice)
//!
//! # Examples
//!
//! ```rust
//! use epd_waveshare_protocol::{command::render, prelude::*};
//!
//! let kind = DisplayKind::from_alias("2.7v2").unwrap();
//! let epd = kind.protocol();
//! let style = DisplayColorStyle::BlackAndWhite;
//!
//! let image = Image::filled(
//!     epd.descriptor().width as usize,
//!     epd.descriptor().height as usize,
//!     PixelColor::White,
//! );
//! let mut commands = epd.initialize(style)?;
//! commands.extend(epd.send_display_data(style, &image)?);
//! commands.extend(epd.refresh(style, RefreshMode::Full)?);
//! commands.extend(epd.turn_off());
//!
//! for line in render(&commands).iter().take(3) {
//!     println!("{line}");
//! }
//! # Ok::<(), Error>(())
//! ```
//!
#![no_std]

extern crate alloc;

#[cfg(feature = "graphics")]
pub mod graphics;

pub mod color;
pub mod command;
pub mod epds;
pub mod error;
pub mod image;
pub mod interface;
pub mod manager;
mod sequence;
pub mod traits;

pub mod epd2in13bc;
pub mod epd2in7_v2;
pub mod epd7in5_v2;

pub use crate::sequence::Commands;

pub mod prelude {
    pub use crate::color::{DisplayColorStyle, PixelColor, RefreshMode, Rgb};
    pub use crate::command::{Command, GpioPin};
    pub use crate::epds::{DeviceDescriptor, DisplayKind};
    pub use crate::error::{Error, ManagerError, TransportError};
    pub use crate::image::Image;
    pub use crate::interface::{DisplayInterface, InterfaceConfig};
    pub use crate::manager::DisplayManager;
    pub use crate::traits::{CommandExecutor, DeviceProtocol};
    pub use crate::Commands;
    pub use crate::SPI_MODE;

    #[cfg(feature = "graphics")]
    pub use crate::graphics::DisplayRotation;
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};
