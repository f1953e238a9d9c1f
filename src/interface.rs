use crate::command::{Command, GpioPin};
use crate::error::TransportError;
use crate::traits::CommandExecutor;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Busy pin polling settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceConfig {
    /// Pause between two reads of the busy pin, in µs
    pub busy_poll_interval_us: u32,
    /// Give up waiting for the panel after this many ms, `None` waits forever
    pub busy_timeout_ms: Option<u32>,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        InterfaceConfig {
            busy_poll_interval_us: 10_000,
            busy_timeout_ms: Some(30_000),
        }
    }
}

/// Result type of the embedded-hal executor
pub type InterfaceResult<SPI, BUSY, DC, RST> = Result<
    (),
    TransportError<
        <SPI as embedded_hal::spi::ErrorType>::Error,
        <BUSY as embedded_hal::digital::ErrorType>::Error,
        <DC as embedded_hal::digital::ErrorType>::Error,
        <RST as embedded_hal::digital::ErrorType>::Error,
    >,
>;

/// The Connection Interface of all (?) Waveshare EPD-Devices
///
/// Runs command lists against an SPI device and three GPIOs. Chip select
/// belongs to the [`SpiDevice`], so `SetGpio CS` is refused.
pub struct DisplayInterface<SPI, BUSY, DC, RST, DELAY> {
    /// SPI device, owns chip select
    spi: SPI,
    /// Busy signal of the controller
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    delay: DELAY,
    config: InterfaceConfig,
    /// Level of `busy` while the panel works
    busy_level: bool,
}

impl<SPI, BUSY, DC, RST, DELAY> DisplayInterface<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    ///
    /// The busy level defaults to high and is normally set by the
    /// [`DisplayManager`](crate::manager::DisplayManager) from the panel's descriptor.
    pub fn new(spi: SPI, busy: BUSY, dc: DC, rst: RST, delay: DELAY, config: InterfaceConfig) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
            config,
            busy_level: true,
        }
    }

    /// Hands the peripherals back
    pub fn release(self) -> (SPI, BUSY, DC, RST, DELAY) {
        (self.spi, self.busy, self.dc, self.rst, self.delay)
    }

    /// Polling settings in use
    pub fn config(&self) -> InterfaceConfig {
        self.config
    }

    /// Checks if device is still busy
    pub fn is_busy(&mut self) -> Result<bool, BUSY::Error> {
        Ok(self.busy.is_high()? == self.busy_level)
    }

    fn run(&mut self, command: &mut Command) -> InterfaceResult<SPI, BUSY, DC, RST> {
        log::trace!("{command}");
        match command {
            Command::SetGpio { pin, level } => self.set_gpio(*pin, *level),
            Command::Sleep { milliseconds } => {
                self.delay.delay_ms(*milliseconds);
                Ok(())
            }
            Command::SendCommand { byte } => {
                // low for commands
                self.dc.set_low().map_err(TransportError::DcError)?;
                self.write(&[*byte])
            }
            Command::SendData { bytes } => {
                // high for data
                self.dc.set_high().map_err(TransportError::DcError)?;
                if bytes.is_empty() {
                    return Ok(());
                }
                self.write(bytes)
            }
            Command::ReadData {
                command, value, ..
            } => {
                self.dc.set_low().map_err(TransportError::DcError)?;
                self.write(&[*command])?;
                self.dc.set_high().map_err(TransportError::DcError)?;
                let mut buf = [0u8];
                self.spi.read(&mut buf).map_err(TransportError::SpiError)?;
                *value = Some(buf[0]);
                Ok(())
            }
            Command::WaitForIdle => self.wait_until_idle(),
            Command::DebugMessage { text } => {
                log::debug!("{text}");
                Ok(())
            }
        }
    }

    fn set_gpio(&mut self, pin: GpioPin, level: bool) -> InterfaceResult<SPI, BUSY, DC, RST> {
        match (pin, level) {
            (GpioPin::Reset, true) => self.rst.set_high().map_err(TransportError::RstError),
            (GpioPin::Reset, false) => self.rst.set_low().map_err(TransportError::RstError),
            (GpioPin::Dc, true) => self.dc.set_high().map_err(TransportError::DcError),
            (GpioPin::Dc, false) => self.dc.set_low().map_err(TransportError::DcError),
            (GpioPin::Cs, _) => Err(TransportError::UnsupportedPin { pin }),
        }
    }

    // spi write helper/abstraction function
    fn write(&mut self, data: &[u8]) -> InterfaceResult<SPI, BUSY, DC, RST> {
        // transfer spi data
        // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
        // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
        if cfg!(target_os = "linux") {
            for data_chunk in data.chunks(4096) {
                self.spi.write(data_chunk).map_err(TransportError::SpiError)?;
            }
            Ok(())
        } else {
            self.spi.write(data).map_err(TransportError::SpiError)
        }
    }

    /// Waits until the busy pin leaves the asserted level
    ///
    /// Gives up with [`TransportError::DeviceNotResponding`] once the
    /// configured timeout has passed.
    fn wait_until_idle(&mut self) -> InterfaceResult<SPI, BUSY, DC, RST> {
        // a zero interval would never reach the timeout
        let interval_us = self.config.busy_poll_interval_us.max(1);
        let mut waited_us: u64 = 0;
        loop {
            let busy = self.busy.is_high().map_err(TransportError::BusyError)? == self.busy_level;
            if !busy {
                return Ok(());
            }

            let waited_ms = (waited_us / 1000) as u32;
            if let Some(timeout_ms) = self.config.busy_timeout_ms {
                if waited_ms >= timeout_ms {
                    log::warn!("panel still busy after {waited_ms} ms");
                    return Err(TransportError::DeviceNotResponding { waited_ms });
                }
            }

            self.delay.delay_us(interval_us);
            waited_us += u64::from(interval_us);
        }
    }
}

impl<SPI, BUSY, DC, RST, DELAY> CommandExecutor for DisplayInterface<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    type Error = TransportError<SPI::Error, BUSY::Error, DC::Error, RST::Error>;

    fn busy_asserted_level(&self) -> bool {
        self.busy_level
    }

    fn set_busy_asserted_level(&mut self, level: bool) {
        self.busy_level = level;
    }

    fn execute(&mut self, commands: &mut [Command]) -> Result<(), Self::Error> {
        for command in commands.iter_mut() {
            self.run(command)?;
        }
        Ok(())
    }
}
