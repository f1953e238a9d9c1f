//! SPI Commands for the Waveshare 2.13" (B/C) E-Ink Display
use crate::traits;

#[allow(dead_code)]
#[derive(Copy, Clone)]
pub(crate) enum Command {
    PanelSetting = 0x00,

    PowerSetting = 0x01,
    PowerOff = 0x02,
    PowerOn = 0x04,
    BoosterSoftStart = 0x06,
    DeepSleep = 0x07,
    DataStartTransmission1 = 0x10,
    DisplayRefresh = 0x12,
    DataStartTransmission2 = 0x13,

    VcomAndDataIntervalSetting = 0x50,
    ResolutionSetting = 0x61,
    VcmDcSetting = 0x82,
    PartialOut = 0x92,
}

impl traits::Opcode for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }
}
