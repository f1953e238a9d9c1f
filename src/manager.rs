//! Drives one panel through a [`CommandExecutor`]
//!
//! The manager remembers which `(style, mode)` the panel was last
//! initialized for. Inside a batch, draws with the same pair skip the
//! initialization sequence. Closing the outermost batch puts the panel to
//! sleep, sends everything in one [`execute`](CommandExecutor::execute) call
//! and forgets the cached pair.
//!
//! ```rust
//! # use epd_waveshare_protocol::prelude::*;
//! # struct Sink;
//! # impl CommandExecutor for Sink {
//! #     type Error = core::convert::Infallible;
//! #     fn busy_asserted_level(&self) -> bool { false }
//! #     fn set_busy_asserted_level(&mut self, _: bool) {}
//! #     fn execute(&mut self, _: &mut [Command]) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! let mut manager = DisplayManager::new(DisplayKind::Epd2in7V2, Sink);
//!
//! manager.begin_batch();
//! manager.clear_screen(PixelColor::White)?;
//! let image = Image::filled(manager.width(), manager.height(), PixelColor::DarkGray);
//! manager.draw_full_screen(&image, DisplayColorStyle::FourGray)?;
//! manager.end_batch()?;
//! # Ok::<(), ManagerError<core::convert::Infallible>>(())
//! ```

use log::{debug, info};

use crate::color::{DisplayColorStyle, PixelColor, RefreshMode};
use crate::epds::{DeviceDescriptor, DisplayKind};
use crate::error::{Error, ManagerError};
use crate::image::Image;
use crate::sequence::Commands;
use crate::traits::{CommandExecutor, DeviceProtocol};

/// Batching front end for one physical panel
///
/// Not meant to be shared: use one manager per panel and serialize access.
pub struct DisplayManager<E: CommandExecutor> {
    kind: DisplayKind,
    protocol: &'static dyn DeviceProtocol,
    executor: E,
    applied: Option<(DisplayColorStyle, RefreshMode)>,
    depth: usize,
    pending: Commands,
}

impl<E: CommandExecutor> DisplayManager<E> {
    /// Creates a manager and configures the executor's busy polarity for `kind`
    pub fn new(kind: DisplayKind, mut executor: E) -> Self {
        let protocol = kind.protocol();
        executor.set_busy_asserted_level(protocol.descriptor().busy_asserted_level);
        DisplayManager {
            kind,
            protocol,
            executor,
            applied: None,
            depth: 0,
            pending: Commands::new(),
        }
    }

    /// Panel this manager drives
    pub fn kind(&self) -> DisplayKind {
        self.kind
    }

    /// Static facts of the panel
    pub fn descriptor(&self) -> &'static DeviceDescriptor {
        self.protocol.descriptor()
    }

    /// Width of the panel in pixels
    pub fn width(&self) -> usize {
        self.descriptor().width as usize
    }

    /// Height of the panel in pixels
    pub fn height(&self) -> usize {
        self.descriptor().height as usize
    }

    /// Style with the most colors the panel supports
    pub fn maximum_style(&self) -> Option<DisplayColorStyle> {
        self.descriptor().maximum_style()
    }

    /// Whether any style of the panel can show `color`
    pub fn can_display_color(&self, color: PixelColor) -> bool {
        self.descriptor().can_display_color(color)
    }

    /// Commands queued in the open batch
    pub fn pending(&self) -> &[crate::command::Command] {
        &self.pending
    }

    /// The `(style, mode)` the queued commands leave the panel in
    pub fn applied(&self) -> Option<(DisplayColorStyle, RefreshMode)> {
        self.applied
    }

    /// The executor commands are flushed to
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Mutable access to the executor, e.g. to adjust its configuration
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Gives the executor back
    pub fn release(self) -> E {
        self.executor
    }

    /// Opens a batch; batches nest and only the outermost one flushes
    pub fn begin_batch(&mut self) {
        self.depth += 1;
        if self.depth == 1 {
            self.pending.clear();
            self.applied = None;
        }
    }

    /// Closes a batch
    ///
    /// Closing the outermost batch appends the turn off sequence (when
    /// anything was queued), executes the queue and resets the cached state.
    /// The state is reset even if the executor fails.
    pub fn end_batch(&mut self) -> Result<(), ManagerError<E::Error>> {
        if self.depth == 0 {
            return Err(Error::UnbalancedBatch.into());
        }
        self.depth -= 1;
        if self.depth > 0 {
            return Ok(());
        }

        let result = if self.pending.is_empty() {
            Ok(())
        } else {
            self.pending.extend(self.protocol.turn_off());
            info!(
                "{}: flushing {} commands",
                self.descriptor().name,
                self.pending.len()
            );
            self.executor.execute(&mut self.pending)
        };

        self.pending.clear();
        self.applied = None;
        result.map_err(ManagerError::Transport)
    }

    /// Queues `image` in `style`, refreshed with `mode`
    ///
    /// Runs inside its own batch, so outside of a batch it is sent right
    /// away. Nothing is queued if any part of the sequence fails to build.
    pub fn draw(
        &mut self,
        image: &Image,
        style: DisplayColorStyle,
        mode: RefreshMode,
    ) -> Result<(), ManagerError<E::Error>> {
        self.begin_batch();
        let queued = self.enqueue(image, style, mode);
        let flushed = self.end_batch();
        queued?;
        flushed
    }

    /// Full refresh of `image` in `style`
    pub fn draw_full_screen(
        &mut self,
        image: &Image,
        style: DisplayColorStyle,
    ) -> Result<(), ManagerError<E::Error>> {
        self.draw(image, style, RefreshMode::Full)
    }

    /// Fills the panel with `color`, using the cheapest style that has it
    pub fn clear_screen(&mut self, color: PixelColor) -> Result<(), ManagerError<E::Error>> {
        let descriptor = self.descriptor();
        let style = descriptor
            .color_styles
            .iter()
            .copied()
            .find(|style| style.supports(color))
            .ok_or(Error::UnsupportedColorForStyle {
                color,
                style: descriptor
                    .maximum_style()
                    .unwrap_or(DisplayColorStyle::BlackAndWhite),
            })?;
        let image = Image::filled(self.width(), self.height(), color);
        self.draw(&image, style, RefreshMode::Full)
    }

    fn enqueue(
        &mut self,
        image: &Image,
        style: DisplayColorStyle,
        mode: RefreshMode,
    ) -> Result<(), Error> {
        let target = (style, mode);
        let mut commands = Commands::new();
        if self.applied != Some(target) {
            debug!("initializing for {:?} with {:?} refresh", style, mode);
            commands.extend(self.protocol.initialize(style)?);
        } else {
            debug!("already initialized for {:?} with {:?} refresh", style, mode);
        }
        commands.extend(self.protocol.send_display_data(style, image)?);
        commands.extend(self.protocol.refresh(style, mode)?);

        self.pending.extend(commands);
        self.applied = Some(target);
        Ok(())
    }
}
