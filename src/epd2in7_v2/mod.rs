//! Command sequences for the Waveshare 2.7inch v2 e-Paper HAT Display
//!
//! Black/white with partial refresh, or 4 levels of gray with a custom LUT.
//! The HAT has four buttons wired to BCM 5, 6, 13 and 19.
//!
//! # References
//!
//! - [Datasheet](https://www.waveshare.com/wiki/2.7inch_e-Paper_HAT_Manual)
//! - [Waveshare C driver](https://github.com/waveshareteam/e-Paper/blob/master/RaspberryPi_JetsonNano/c/lib/e-Paper/EPD_2in7_V2.c)
//! - [Waveshare Python driver](https://github.com/waveshareteam/e-Paper/blob/master/RaspberryPi_JetsonNano/python/lib/waveshare_epd/epd2in7_V2.py)

use crate::color::{DisplayColorStyle, RefreshMode};
use crate::epds::DeviceDescriptor;
use crate::error::Error;
use crate::image::{pack_row_4gray, pack_row_monochrome, Image};
use crate::sequence::{Commands, Sequence};
use crate::traits::DeviceProtocol;

pub(crate) mod command;
pub use self::command::DataEntryMode;
use self::command::{
    BorderWaveForm, BorderWaveFormFixLevel, BorderWaveFormGs, BorderWaveFormVbd, Command,
    DeepSleepMode, DisplayUpdateControl2, DriverOutput,
};

/// Width of the display
pub const WIDTH: u32 = 176;
/// Height of the display
pub const HEIGHT: u32 = 264;

const IS_BUSY_LOW: bool = false;
const SINGLE_BYTE_WRITE: bool = true;

/// BCM pins of KEY1..KEY4
pub const BUTTON_PINS: [u8; 4] = [5, 6, 13, 19];

const VCOM: u8 = 0x1C;
const END_OPTION_NORMAL: u8 = 0x22;
const GATE_VOLTAGE_20V: u8 = 0x17;
const SOURCE_VOLTAGE: [u8; 3] = [0x41, 0x00, 0x32];

/// Waveform for 4 gray refresh (LUT_DATA_4Gray)
#[rustfmt::skip]
const LUT_4GRAY: [u8; 153] = [
    0x40, 0x48, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x08, 0x48, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x02, 0x48, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x20, 0x48, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x0A, 0x19, 0x00, 0x03, 0x08, 0x00, 0x00,
    0x14, 0x01, 0x00, 0x14, 0x01, 0x00, 0x03,
    0x0A, 0x03, 0x00, 0x08, 0x19, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00, 0x00,
];

static DESCRIPTOR: DeviceDescriptor = DeviceDescriptor {
    name: "Waveshare 2.7 inch HAT v2",
    width: WIDTH,
    height: HEIGHT,
    busy_asserted_level: !IS_BUSY_LOW,
    partial_refresh: true,
    button_pins: Some(&BUTTON_PINS),
    color_styles: &[DisplayColorStyle::BlackAndWhite, DisplayColorStyle::FourGray],
};

/// Epd2in7 v2 protocol
#[derive(Debug, Clone, Copy, Default)]
pub struct Epd2in7;

impl Epd2in7 {
    fn hardware_reset(seq: &mut Sequence) {
        seq.reset(20, 2, 20).wait_until_idle();
    }

    /// `SwReset`, needed after every hardware reset
    pub fn software_reset(&self) -> Commands {
        Sequence::new()
            .cmd(Command::SwReset)
            .sleep_then_wait(10)
            .build()
    }

    /// RAM X window in pixels, `end` exclusive
    ///
    /// Sent as byte columns `start / 8 ..= ceil(end / 8) - 1`.
    pub fn set_ram_x_address(&self, start: u32, end: u32) -> Result<Commands, Error> {
        if end > WIDTH || start > end {
            return Err(Error::InvalidWindow {
                x: start,
                y: 0,
                width: end.saturating_sub(start),
                height: HEIGHT,
            });
        }
        let first = start / 8;
        let last = ((end + 7) / 8).saturating_sub(1);
        Ok(Sequence::new()
            .cmd_with_data(
                Command::SetRamXAddressStartEndPosition,
                &[first as u8, last as u8],
            )
            .build())
    }

    /// RAM Y window in lines, `end` exclusive
    pub fn set_ram_y_address(&self, start: u32, end: u32) -> Result<Commands, Error> {
        if end > HEIGHT || start > end {
            return Err(Error::InvalidWindow {
                x: 0,
                y: start,
                width: WIDTH,
                height: end.saturating_sub(start),
            });
        }
        let last = end.saturating_sub(1);
        Ok(Sequence::new()
            .cmd_with_data(
                Command::SetRamYAddressStartEndPosition,
                &[
                    start as u8,
                    (start >> 8 & 0x01) as u8,
                    last as u8,
                    (last >> 8 & 0x01) as u8,
                ],
            )
            .build())
    }

    /// RAM X counter, `x` in pixels
    pub fn set_ram_x_counter(&self, x: u32) -> Result<Commands, Error> {
        if x > WIDTH {
            return Err(Error::InvalidWindow {
                x,
                y: 0,
                width: 0,
                height: 0,
            });
        }
        Ok(Sequence::new()
            .cmd_with_data(Command::SetRamXAddressCounter, &[(x / 8) as u8])
            .build())
    }

    /// RAM Y counter, 9 bit line number
    pub fn set_ram_y_counter(&self, y: u32) -> Result<Commands, Error> {
        if y > HEIGHT {
            return Err(Error::InvalidWindow {
                x: 0,
                y,
                width: 0,
                height: 0,
            });
        }
        Ok(Sequence::new()
            .cmd_with_data(
                Command::SetRamYAddressCounter,
                &[y as u8, (y >> 8 & 0x01) as u8],
            )
            .build())
    }

    /// How the address counters move while writing RAM
    pub fn set_data_entry_mode(&self, mode: DataEntryMode) -> Commands {
        Sequence::new()
            .cmd_with_data(Command::DataEntryModeSetting, &[mode.to_u8()])
            .build()
    }

    /// Pick the internal (`false`) or an external temperature sensor
    pub fn select_temperature_sensor(&self, external: bool) -> Commands {
        let sensor = if external { 0x48 } else { 0x80 };
        Sequence::new()
            .cmd_with_data(Command::TemperatureSensorSelection, &[sensor])
            .build()
    }

    /// Read the temperature register, the result comes back in the `ReadData` value
    pub fn read_temperature(&self, correlation_id: u32) -> Commands {
        Sequence::new()
            .read(Command::TemperatureSensorControlRead, correlation_id)
            .build()
    }

    fn full_frame(&self, seq: &mut Sequence) -> Result<(), Error> {
        seq.append(self.set_ram_x_address(0, WIDTH)?)
            .append(self.set_ram_y_address(0, HEIGHT)?);
        Ok(())
    }

    fn home_counters(&self, seq: &mut Sequence, x: u32, y: u32) -> Result<(), Error> {
        seq.append(self.set_ram_x_counter(x)?)
            .append(self.set_ram_y_counter(y)?);
        Ok(())
    }

    fn border(seq: &mut Sequence, vbd: BorderWaveFormVbd) {
        let border = BorderWaveForm {
            vbd,
            fix_level: BorderWaveFormFixLevel::Vss,
            gs_trans: BorderWaveFormGs::Lut0,
        };
        seq.cmd_with_data(Command::BorderWaveformControl, &[border.to_u8()]);
    }

    fn reset_all(&self, seq: &mut Sequence) {
        seq.debug("Resetting device");
        Self::hardware_reset(seq);
        seq.append(self.software_reset());
    }

    fn init_black_and_white(&self) -> Result<Commands, Error> {
        let mut seq = Sequence::new();
        self.reset_all(&mut seq);

        seq.debug("Initializing device for black and white");
        self.full_frame(&mut seq)?;
        seq.append(self.set_data_entry_mode(DataEntryMode::default()));
        self.home_counters(&mut seq, 0, 0)?;
        Ok(seq.build())
    }

    fn init_4gray(&self) -> Result<Commands, Error> {
        let mut seq = Sequence::new();
        self.reset_all(&mut seq);

        seq.debug("Initializing device for 4gray");
        let driver = DriverOutput {
            scan_is_linear: true,
            scan_g0_is_first: true,
            scan_dir_incr: true,
            gate_lines: (HEIGHT - 1) as u16,
        };
        seq.cmd_with_data(Command::DriverOutputControl, &driver.to_bytes());
        seq.append(self.set_data_entry_mode(DataEntryMode::default()));

        self.full_frame(&mut seq)?;
        seq.append(self.set_data_entry_mode(DataEntryMode::default()));

        Self::border(&mut seq, BorderWaveFormVbd::Gs);
        seq.cmd_with_data(Command::WriteVcomRegister, &[VCOM])
            .cmd_with_data(Command::EndOption, &[END_OPTION_NORMAL])
            .cmd_with_data(Command::GateDrivingVoltageCtrl, &[GATE_VOLTAGE_20V])
            .cmd_with_data(Command::SourceDrivingVoltageCtrl, &SOURCE_VOLTAGE)
            .cmd(Command::WriteLutRegister)
            .data_block(&LUT_4GRAY, SINGLE_BYTE_WRITE);

        self.home_counters(&mut seq, 0, 0)?;
        Ok(seq.build())
    }

    fn activate(seq: &mut Sequence, control: DisplayUpdateControl2) {
        seq.cmd_with_data(Command::DisplayUpdateControl2, &[control.0])
            .cmd(Command::MasterActivation)
            .wait_until_idle();
    }
}

fn update_control_full() -> DisplayUpdateControl2 {
    DisplayUpdateControl2::new()
        .enable_analog()
        .enable_clock()
        .load_temp()
        .load_lut()
        .display()
        .disable_analog()
        .disable_clock()
}

fn update_control_4gray() -> DisplayUpdateControl2 {
    DisplayUpdateControl2::new()
        .enable_analog()
        .enable_clock()
        .display()
        .disable_analog()
        .disable_clock()
}

impl DeviceProtocol for Epd2in7 {
    fn descriptor(&self) -> &'static DeviceDescriptor {
        &DESCRIPTOR
    }

    fn initialize(&self, style: DisplayColorStyle) -> Result<Commands, Error> {
        match style {
            DisplayColorStyle::BlackAndWhite => self.init_black_and_white(),
            DisplayColorStyle::FourGray => self.init_4gray(),
            _ => Err(Error::UnsupportedStyle { style }),
        }
    }

    fn initialize_partial(
        &self,
        style: DisplayColorStyle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Commands, Error> {
        DESCRIPTOR.check_style(style)?;
        if style != DisplayColorStyle::BlackAndWhite {
            return Err(Error::UnsupportedRefreshMode {
                style,
                mode: RefreshMode::Partial,
            });
        }

        // widen to whole bytes
        let width = width.saturating_add(x % 8);
        let x = x - x % 8;
        let width = width.saturating_add(7) / 8 * 8;

        let fits = x.checked_add(width).map_or(false, |end| end <= WIDTH)
            && y.checked_add(height).map_or(false, |end| end <= HEIGHT);
        if !fits || width == 0 || height == 0 {
            return Err(Error::InvalidWindow {
                x,
                y,
                width,
                height,
            });
        }

        let mut seq = Sequence::new();
        self.reset_all(&mut seq);
        seq.debug("Initializing device for black and white partial refresh");
        Self::border(&mut seq, BorderWaveFormVbd::Vcom);
        seq.append(self.set_ram_x_address(x, x + width)?)
            .append(self.set_ram_y_address(y, y + height)?);
        self.home_counters(&mut seq, x, y)?;
        Ok(seq.build())
    }

    fn send_display_data(&self, style: DisplayColorStyle, image: &Image) -> Result<Commands, Error> {
        DESCRIPTOR.check_style(style)?;
        DESCRIPTOR.check_image(image)?;

        let mut seq = Sequence::new();
        match style {
            DisplayColorStyle::FourGray => {
                let mut high = Sequence::new();
                seq.cmd(Command::WriteRam).debug("Uploading low bits");
                high.cmd(Command::WriteRamRed).debug("Uploading high bits");
                for y in 0..image.height() {
                    let (low_bits, high_bits) = pack_row_4gray(image, y)?;
                    seq.data_block(&low_bits, SINGLE_BYTE_WRITE);
                    high.data_block(&high_bits, SINGLE_BYTE_WRITE);
                }
                seq.append(high.build());
            }
            _ => {
                seq.cmd(Command::WriteRam).debug("Uploading image data");
                for y in 0..image.height() {
                    seq.data_block(&pack_row_monochrome(image, y)?, SINGLE_BYTE_WRITE);
                }
            }
        }
        Ok(seq.build())
    }

    fn refresh(&self, style: DisplayColorStyle, mode: RefreshMode) -> Result<Commands, Error> {
        DESCRIPTOR.check_style(style)?;

        let mut seq = Sequence::new();
        match (style, mode) {
            (DisplayColorStyle::FourGray, RefreshMode::Full) => {
                seq.debug("Refreshing screen for 4gray");
                Self::activate(&mut seq, update_control_4gray());
            }
            (DisplayColorStyle::BlackAndWhite, RefreshMode::Full) => {
                seq.debug("Fully refreshing screen for black and white");
                Self::activate(&mut seq, update_control_full());
            }
            (DisplayColorStyle::BlackAndWhite, RefreshMode::Partial) => {
                seq.debug("Partial refreshing screen for black and white");
                Self::activate(&mut seq, update_control_full().display_mode_2());
            }
            _ => return Err(Error::UnsupportedRefreshMode { style, mode }),
        }
        Ok(seq.build())
    }

    fn turn_off(&self) -> Commands {
        Sequence::new()
            .debug("Deep sleep")
            .cmd_with_data(Command::DeepSleepMode, &[DeepSleepMode::Mode1 as u8])
            .build()
    }
}
