//! SPI Commands for the Waveshare 7.5" V2 E-Ink Display

use crate::traits;

/// EPD7in5 v2 commands
///
/// For more infos about the addresses and what they are doing look into the PDFs.
#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone)]
pub(crate) enum Command {
    /// Set Resolution, LUT selection, BWR pixels, gate scan direction, source shift
    /// direction, booster switch, soft reset.
    PANEL_SETTING = 0x00,

    /// Selecting internal and external power
    POWER_SETTING = 0x01,

    /// After the Power Off command, the driver will power off following the Power Off
    /// Sequence; BUSY signal will become "0".
    POWER_OFF = 0x02,

    /// Turning On the Power
    ///
    /// After the Power ON command, the driver will power on following the Power ON
    /// sequence. Once complete, the BUSY signal will become "1".
    POWER_ON = 0x04,

    /// Starting data transmission
    BOOSTER_SOFT_START = 0x06,

    /// This command makes the chip enter the deep-sleep mode to save power.
    ///
    /// The only one parameter is a check code, the command would be excuted if check code = 0xA5.
    DEEP_SLEEP = 0x07,

    /// OLD_DATA plane
    DATA_START_TRANSMISSION_1 = 0x10,

    /// After this command is issued, driver will refresh display (data/VCOM) according to
    /// SRAM data and LUT.
    DISPLAY_REFRESH = 0x12,

    /// NEW_DATA plane
    DATA_START_TRANSMISSION_2 = 0x13,

    /// Dual SPI mode, 0x00 disables it
    DUAL_SPI = 0x15,

    /// This command indicates the interval of Vcom and data output.
    VCOM_AND_DATA_INTERVAL_SETTING = 0x50,

    /// This command defines non-overlap period of Gate and Source.
    TCON_SETTING = 0x60,
    /// This command defines alternative resolution and this setting is of higher priority
    /// than the RES\[1:0\] in R00H (PSR).
    TCON_RESOLUTION = 0x61,

    /// This command reads the IC status.
    GET_STATUS = 0x71,
}

impl traits::Opcode for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Opcode;

    #[test]
    fn command_addr() {
        assert_eq!(Command::PANEL_SETTING.address(), 0x00);
        assert_eq!(Command::DISPLAY_REFRESH.address(), 0x12);
        assert_eq!(Command::TCON_RESOLUTION.address(), 0x61);
    }
}
