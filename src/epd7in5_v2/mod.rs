//! Command sequences for the Waveshare 7.5" E-Ink Display (V2)
//!
//! # References
//!
//! - [Datasheet](https://www.waveshare.com/wiki/7.5inch_e-Paper_HAT)
//! - [Waveshare C driver](https://github.com/waveshare/e-Paper/blob/702def0/RaspberryPi%26JetsonNano/c/lib/e-Paper/EPD_7in5_V2.c)
//!
//! Important note for V2:
//! Revision V2 has been released on 2019.11, the resolution is upgraded to 800×480, from 640×384 of V1.
//!
//! Frames are uploaded twice: an all white "old data" plane followed by the
//! image, in which black is 1. Each row goes out in one data transfer.

use crate::color::{DisplayColorStyle, PixelColor, RefreshMode};
use crate::epds::DeviceDescriptor;
use crate::error::Error;
use crate::image::{line_bytes, pack_bits, Image};
use crate::sequence::{Commands, Sequence};
use crate::traits::DeviceProtocol;

pub(crate) mod command;
use self::command::Command;

/// Width of the display
pub const WIDTH: u32 = 800;
/// Height of the display
pub const HEIGHT: u32 = 480;
const IS_BUSY_LOW: bool = true;
const SINGLE_BYTE_WRITE: bool = false;

static DESCRIPTOR: DeviceDescriptor = DeviceDescriptor {
    name: "Waveshare 7.5 inch v2",
    width: WIDTH,
    height: HEIGHT,
    busy_asserted_level: !IS_BUSY_LOW,
    partial_refresh: false,
    button_pins: None,
    color_styles: &[DisplayColorStyle::BlackAndWhite],
};

/// Epd7in5 (V2) protocol
#[derive(Debug, Clone, Copy, Default)]
pub struct Epd7in5;

impl DeviceProtocol for Epd7in5 {
    fn descriptor(&self) -> &'static DeviceDescriptor {
        &DESCRIPTOR
    }

    fn initialize(&self, style: DisplayColorStyle) -> Result<Commands, Error> {
        DESCRIPTOR.check_style(style)?;

        let mut seq = Sequence::new();
        seq.debug("Initialize screen");
        // no busy wait after the reset pulse on this controller
        seq.reset(20, 2, 20);

        // VGH=20V, VGL=-20V, VDH=15V, VDL=-15V
        seq.cmd_with_data(Command::POWER_SETTING, &[0x07, 0x07, 0x3F, 0x3F]);
        // enhanced display drive
        seq.cmd_with_data(Command::BOOSTER_SOFT_START, &[0x17, 0x17, 0x28, 0x17]);
        seq.cmd(Command::POWER_ON).sleep_then_wait(100);

        // KW mode, OTP LUT
        seq.cmd_with_data(Command::PANEL_SETTING, &[0x1F]);
        seq.cmd_with_data(
            Command::TCON_RESOLUTION,
            &[
                (WIDTH >> 8) as u8,
                WIDTH as u8,
                (HEIGHT >> 8) as u8,
                HEIGHT as u8,
            ],
        );
        seq.cmd_with_data(Command::DUAL_SPI, &[0x00]);
        seq.cmd_with_data(Command::VCOM_AND_DATA_INTERVAL_SETTING, &[0x10, 0x07]);
        seq.cmd_with_data(Command::TCON_SETTING, &[0x22]);

        Ok(seq.build())
    }

    fn send_display_data(&self, style: DisplayColorStyle, image: &Image) -> Result<Commands, Error> {
        DESCRIPTOR.check_style(style)?;
        DESCRIPTOR.check_image(image)?;

        let mut seq = Sequence::new();
        let old_row = [0u8; line_bytes(WIDTH as usize)];
        seq.cmd(Command::DATA_START_TRANSMISSION_1);
        for _ in 0..HEIGHT {
            seq.data_block(&old_row, SINGLE_BYTE_WRITE);
        }

        seq.cmd(Command::DATA_START_TRANSMISSION_2);
        for y in 0..image.height() {
            let row = pack_bits(image.row(y)?, style, |color| match color {
                PixelColor::Black => Some(true),
                PixelColor::White => Some(false),
                _ => None,
            })?;
            seq.data_block(&row, SINGLE_BYTE_WRITE);
        }
        Ok(seq.build())
    }

    fn refresh(&self, style: DisplayColorStyle, mode: RefreshMode) -> Result<Commands, Error> {
        if mode != RefreshMode::Full {
            return Err(Error::UnsupportedRefreshMode { style, mode });
        }
        DESCRIPTOR.check_style(style)?;

        // the delay is necessary, 200uS at least
        Ok(Sequence::new()
            .cmd(Command::DISPLAY_REFRESH)
            .sleep_then_wait(100)
            .build())
    }

    fn turn_off(&self) -> Commands {
        Sequence::new()
            .cmd(Command::POWER_OFF)
            .wait_until_idle()
            .cmd_with_data(Command::DEEP_SLEEP, &[0xA5])
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{parse, render, Command as Cmd};
    use alloc::vec;

    #[test]
    fn epd_size() {
        assert_eq!(WIDTH, 800);
        assert_eq!(HEIGHT, 480);
        assert!(!Epd7in5.descriptor().busy_asserted_level);
        assert!(!Epd7in5.descriptor().partial_refresh);
    }

    #[test]
    fn initialize_sequence() {
        let expected = parse([
            "DebugMessage Initialize screen",
            "SetGpio Reset, 1",
            "Sleep 20",
            "SetGpio Reset, 0",
            "Sleep 2",
            "SetGpio Reset, 1",
            "Sleep 20",
            "SendCommand 0x01",
            "SendData 0x07",
            "SendData 0x07",
            "SendData 0x3F",
            "SendData 0x3F",
            "SendCommand 0x06",
            "SendData 0x17",
            "SendData 0x17",
            "SendData 0x28",
            "SendData 0x17",
            "SendCommand 0x04",
            "Sleep 100",
            "WaitForIdle",
            "SendCommand 0x00",
            "SendData 0x1F",
            "SendCommand 0x61",
            "SendData 0x03",
            "SendData 0x20",
            "SendData 0x01",
            "SendData 0xE0",
            "SendCommand 0x15",
            "SendData 0x00",
            "SendCommand 0x50",
            "SendData 0x10",
            "SendData 0x07",
            "SendCommand 0x60",
            "SendData 0x22",
        ])
        .unwrap();
        assert_eq!(
            Epd7in5.initialize(DisplayColorStyle::BlackAndWhite).unwrap(),
            expected
        );
    }

    #[test]
    fn only_black_and_white() {
        for style in [
            DisplayColorStyle::BlackAndWhiteAndRed,
            DisplayColorStyle::FourGray,
        ] {
            assert_eq!(Epd7in5.initialize(style), Err(Error::UnsupportedStyle { style }));
        }
        assert_eq!(
            Epd7in5.initialize_partial(DisplayColorStyle::BlackAndWhite, 0, 0, 8, 8),
            Err(Error::PartialRefreshUnsupported)
        );
    }

    #[test]
    fn display_data_two_planes() {
        let mut image = Image::filled(WIDTH as usize, HEIGHT as usize, PixelColor::White);
        image.set(0, 0, PixelColor::Black);
        image.set(799, 479, PixelColor::Black);

        let commands = Epd7in5
            .send_display_data(DisplayColorStyle::BlackAndWhite, &image)
            .unwrap();
        assert_eq!(commands.len(), 2 + 2 * 480);
        assert_eq!(commands[0], Cmd::SendCommand { byte: 0x10 });
        assert_eq!(commands[1], Cmd::SendData { bytes: vec![0; 100] });
        assert_eq!(commands[481], Cmd::SendCommand { byte: 0x13 });

        let mut first = vec![0u8; 100];
        first[0] = 0x80;
        assert_eq!(commands[482], Cmd::SendData { bytes: first });
        assert_eq!(commands[483], Cmd::SendData { bytes: vec![0; 100] });

        let mut last = vec![0u8; 100];
        last[99] = 0x01;
        assert_eq!(commands[961], Cmd::SendData { bytes: last });
    }

    #[test]
    fn display_data_rejects_gray() {
        let image = Image::filled(WIDTH as usize, HEIGHT as usize, PixelColor::LightGray);
        assert_eq!(
            Epd7in5.send_display_data(DisplayColorStyle::BlackAndWhite, &image),
            Err(Error::UnsupportedColorForStyle {
                color: PixelColor::LightGray,
                style: DisplayColorStyle::BlackAndWhite
            })
        );
    }

    #[test]
    fn refresh_and_turn_off() {
        assert_eq!(
            render(
                &Epd7in5
                    .refresh(DisplayColorStyle::BlackAndWhite, RefreshMode::Full)
                    .unwrap()
            ),
            ["SendCommand 0x12", "Sleep 100", "WaitForIdle"]
        );
        assert!(Epd7in5
            .refresh(DisplayColorStyle::BlackAndWhite, RefreshMode::Partial)
            .is_err());
        assert_eq!(
            render(&Epd7in5.turn_off()),
            [
                "SendCommand 0x02",
                "WaitForIdle",
                "SendCommand 0x07",
                "SendData 0xA5"
            ]
        );
    }
}
