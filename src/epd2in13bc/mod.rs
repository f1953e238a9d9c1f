//! Command sequences for the Waveshare 2.13" (B/C) E-Ink Display
//! More information on this display can be found at the [Waveshare Wiki](https://www.waveshare.com/wiki/2.13inch_e-Paper_HAT_(B))
//! Built for the 212x104, 2.13inch E-Ink display HAT for Raspberry Pi, three-color, SPI interface
//!
//! The panel has two planes: one for black pixels and one for red pixels.
//! No partial refresh.
//!
//! # Example
//!
//!```rust
//!use epd_waveshare_protocol::{epd2in13bc::*, prelude::*};
//!
//!let epd = Epd2in13bc;
//!let mut image = Image::filled(WIDTH as usize, HEIGHT as usize, PixelColor::White);
//!image.set(10, 20, PixelColor::Red);
//!
//!let style = DisplayColorStyle::BlackAndWhiteAndRed;
//!let mut commands = epd.initialize(style)?;
//!commands.extend(epd.send_display_data(style, &image)?);
//!commands.extend(epd.refresh(style, RefreshMode::Full)?);
//!commands.extend(epd.turn_off());
//!# Ok::<(), epd_waveshare_protocol::error::Error>(())
//!```

use crate::color::{DisplayColorStyle, PixelColor, RefreshMode};
use crate::epds::DeviceDescriptor;
use crate::error::Error;
use crate::image::{pack_bits, Image};
use crate::sequence::{Commands, Sequence};
use crate::traits::DeviceProtocol;

pub(crate) mod command;
use self::command::Command;

/// Width of epd2in13bc in pixels
pub const WIDTH: u32 = 104;
/// Height of epd2in13bc in pixels
pub const HEIGHT: u32 = 212;

const IS_BUSY_LOW: bool = true;
const SINGLE_BYTE_WRITE: bool = true;

const WHITE_BORDER: u8 = 0x70;
const BLACK_BORDER: u8 = 0x30;
const CHROMATIC_BORDER: u8 = 0xB0;

static DESCRIPTOR: DeviceDescriptor = DeviceDescriptor {
    name: "Waveshare 2.13bc",
    width: WIDTH,
    height: HEIGHT,
    busy_asserted_level: !IS_BUSY_LOW,
    partial_refresh: false,
    button_pins: None,
    color_styles: &[
        DisplayColorStyle::BlackAndWhite,
        DisplayColorStyle::BlackAndWhiteAndRed,
    ],
};

/// Epd2in13bc protocol
#[derive(Debug, Clone, Copy, Default)]
pub struct Epd2in13bc;

impl Epd2in13bc {
    fn hardware_reset(seq: &mut Sequence) {
        seq.reset(200, 2, 200).wait_until_idle();
    }

    fn send_resolution(seq: &mut Sequence) {
        seq.cmd_with_data(
            Command::ResolutionSetting,
            &[WIDTH as u8, (HEIGHT >> 8) as u8, HEIGHT as u8],
        );
    }

    /// Set the outer border of the display to the chosen color.
    ///
    /// Only needed after [`initialize`](DeviceProtocol::initialize), which
    /// sets a white border.
    pub fn set_border_color(&self, color: PixelColor) -> Result<Commands, Error> {
        let border = match color {
            PixelColor::Black => BLACK_BORDER,
            PixelColor::White => WHITE_BORDER,
            PixelColor::Red => CHROMATIC_BORDER,
            _ => {
                return Err(Error::UnsupportedColorForStyle {
                    color,
                    style: DisplayColorStyle::BlackAndWhiteAndRed,
                })
            }
        };
        Ok(Sequence::new()
            .cmd_with_data(Command::VcomAndDataIntervalSetting, &[border])
            .build())
    }
}

impl DeviceProtocol for Epd2in13bc {
    fn descriptor(&self) -> &'static DeviceDescriptor {
        &DESCRIPTOR
    }

    fn initialize(&self, style: DisplayColorStyle) -> Result<Commands, Error> {
        DESCRIPTOR.check_style(style)?;

        let mut seq = Sequence::new();
        seq.debug("Initialize screen");
        Self::hardware_reset(&mut seq);

        // start the booster
        seq.cmd_with_data(Command::BoosterSoftStart, &[0x17, 0x17, 0x17]);

        // power on
        seq.cmd(Command::PowerOn).sleep_then_wait(10);

        seq.cmd_with_data(Command::PanelSetting, &[0x8F]);
        seq.cmd_with_data(Command::VcomAndDataIntervalSetting, &[WHITE_BORDER]);
        Self::send_resolution(&mut seq);

        Ok(seq.build())
    }

    fn send_display_data(&self, style: DisplayColorStyle, image: &Image) -> Result<Commands, Error> {
        DESCRIPTOR.check_style(style)?;
        DESCRIPTOR.check_image(image)?;

        // black plane: bit set for black, red plane: bit cleared for red
        let mut black = Commands::new();
        let mut red = Commands::new();
        let mut plane = Sequence::new();
        for y in 0..image.height() {
            let row = image.row(y)?;
            let bits = pack_bits(row, style, |color| match color {
                PixelColor::Black => Some(true),
                PixelColor::White => Some(false),
                PixelColor::Red if style.supports(PixelColor::Red) => Some(false),
                _ => None,
            })?;
            black.extend(plane.data_block(&bits, SINGLE_BYTE_WRITE).build());

            let bits = pack_bits(row, style, |color| Some(color != PixelColor::Red))?;
            red.extend(plane.data_block(&bits, SINGLE_BYTE_WRITE).build());
        }

        Ok(Sequence::new()
            .debug("Send display data")
            .cmd(Command::DataStartTransmission1)
            .append(black)
            .cmd(Command::PartialOut)
            .cmd(Command::DataStartTransmission2)
            .append(red)
            .cmd(Command::PartialOut)
            .build())
    }

    fn refresh(&self, style: DisplayColorStyle, mode: RefreshMode) -> Result<Commands, Error> {
        if mode != RefreshMode::Full {
            return Err(Error::UnsupportedRefreshMode { style, mode });
        }
        DESCRIPTOR.check_style(style)?;

        Ok(Sequence::new()
            .debug("Refresh screen")
            .cmd(Command::DisplayRefresh)
            .sleep_then_wait(10)
            .build())
    }

    fn turn_off(&self) -> Commands {
        Sequence::new()
            .debug("Deep sleep")
            .cmd(Command::PowerOff)
            .wait_until_idle()
            .cmd_with_data(Command::DeepSleep, &[0xA5])
            .build()
    }
}
