use crate::color::{DisplayColorStyle, RefreshMode};
use crate::epds::DeviceDescriptor;
use crate::error::Error;
use crate::image::Image;
use crate::sequence::Commands;

/// All opcodes need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Opcode: Copy {
    fn address(self) -> u8;
}

/// All the functions to drive one panel model, expressed as command lists
///
/// Implementations are stateless. Every call validates its inputs first and
/// either returns the full list or an [`Error`], never a partial list.
///
/// The usual order is [`initialize`](DeviceProtocol::initialize) (or
/// [`initialize_partial`](DeviceProtocol::initialize_partial)),
/// [`send_display_data`](DeviceProtocol::send_display_data),
/// [`refresh`](DeviceProtocol::refresh) and finally
/// [`turn_off`](DeviceProtocol::turn_off).
pub trait DeviceProtocol: Sync {
    /// Panel facts: size, busy polarity, styles
    fn descriptor(&self) -> &'static DeviceDescriptor;

    /// Power up and configure the panel for a full refresh in `style`
    fn initialize(&self, style: DisplayColorStyle) -> Result<Commands, Error>;

    /// Power up and configure the panel for a partial refresh of a window
    ///
    /// `x` and `width` are widened to byte boundaries.
    fn initialize_partial(
        &self,
        style: DisplayColorStyle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Commands, Error> {
        let _ = (style, x, y, width, height);
        Err(Error::PartialRefreshUnsupported)
    }

    /// Transmit a full frame to the panel RAM
    fn send_display_data(&self, style: DisplayColorStyle, image: &Image) -> Result<Commands, Error>;

    /// Show the RAM content
    fn refresh(&self, style: DisplayColorStyle, mode: RefreshMode) -> Result<Commands, Error>;

    /// Power down into deep sleep, leaves the image on the panel
    fn turn_off(&self) -> Commands;
}

/// Plays a command list back against real (or simulated) hardware
pub trait CommandExecutor {
    /// Transport failure
    type Error;

    /// Level of the busy pin that means the panel is busy
    fn busy_asserted_level(&self) -> bool;

    /// Set before running a panel's commands, panels disagree on the polarity
    fn set_busy_asserted_level(&mut self, level: bool);

    /// Run `commands` in order, stopping at the first failure
    ///
    /// `ReadData` commands get their `value` filled in.
    fn execute(&mut self, commands: &mut [crate::command::Command]) -> Result<(), Self::Error>;
}
