//! Static facts about each supported panel and the registry to pick one
//!
//! A new panel needs a protocol module, a [`DeviceDescriptor`] and a
//! [`DisplayKind`] variant. Nothing else changes.

use crate::color::{DisplayColorStyle, PixelColor};
use crate::error::Error;
use crate::image::Image;
use crate::traits::DeviceProtocol;

/// A struct containing necessary info about a epd (electronic paper display). E.g:
///
/// - Width
/// - Height
/// - Styles it can be driven in
/// ...
///
/// This needs to be provided by each new display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Human readable model name
    pub name: &'static str,
    /// Width in pixels when not rotated
    pub width: u32,
    /// Height in pixels when not rotated
    pub height: u32,
    /// Level of the busy pin while the controller works
    pub busy_asserted_level: bool,
    /// Whether [`initialize_partial`](DeviceProtocol::initialize_partial) is available
    pub partial_refresh: bool,
    /// BCM numbers of the buttons on the HAT, if it has any
    pub button_pins: Option<&'static [u8]>,
    /// Supported styles, cheapest first
    pub color_styles: &'static [DisplayColorStyle],
}

impl DeviceDescriptor {
    /// Whether the panel can be driven in `style`
    pub fn supports_style(&self, style: DisplayColorStyle) -> bool {
        self.color_styles.contains(&style)
    }

    /// Whether any supported style has `color`
    pub fn can_display_color(&self, color: PixelColor) -> bool {
        self.color_styles.iter().any(|style| style.supports(color))
    }

    /// The style with the most colors
    pub fn maximum_style(&self) -> Option<DisplayColorStyle> {
        self.color_styles.last().copied()
    }

    pub(crate) fn check_style(&self, style: DisplayColorStyle) -> Result<(), Error> {
        if self.supports_style(style) {
            Ok(())
        } else {
            Err(Error::UnsupportedStyle { style })
        }
    }

    pub(crate) fn check_image(&self, image: &Image) -> Result<(), Error> {
        let expected = (self.width as usize, self.height as usize);
        let actual = (image.width(), image.height());
        if expected == actual {
            Ok(())
        } else {
            Err(Error::ImageDimensionMismatch { expected, actual })
        }
    }
}

/// Every supported panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKind {
    /// 2.13" black/white/red, [`crate::epd2in13bc`]
    Epd2in13bc,
    /// 2.7" v2 black/white and 4 gray, [`crate::epd2in7_v2`]
    Epd2in7V2,
    /// 7.5" v2 black/white, [`crate::epd7in5_v2`]
    Epd7in5V2,
}

impl DisplayKind {
    /// Every kind, in registry order
    pub const ALL: [DisplayKind; 3] = [
        DisplayKind::Epd2in13bc,
        DisplayKind::Epd2in7V2,
        DisplayKind::Epd7in5V2,
    ];

    /// Short names this kind is known by
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            DisplayKind::Epd2in13bc => &["2.13bc", "epd2in13bc"],
            DisplayKind::Epd2in7V2 => &["2.7v2", "epd2in7_v2"],
            DisplayKind::Epd7in5V2 => &["7.5v2", "epd7in5_v2"],
        }
    }

    /// Looks a kind up by one of its [aliases](DisplayKind::aliases), ignoring case
    pub fn from_alias(alias: &str) -> Option<DisplayKind> {
        DisplayKind::ALL.into_iter().find(|kind| {
            kind.aliases()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(alias))
        })
    }

    /// The protocol generator of this panel
    pub fn protocol(self) -> &'static dyn DeviceProtocol {
        match self {
            DisplayKind::Epd2in13bc => &crate::epd2in13bc::Epd2in13bc,
            DisplayKind::Epd2in7V2 => &crate::epd2in7_v2::Epd2in7,
            DisplayKind::Epd7in5V2 => &crate::epd7in5_v2::Epd7in5,
        }
    }

    /// Shortcut for `self.protocol().descriptor()`
    pub fn descriptor(self) -> &'static DeviceDescriptor {
        self.protocol().descriptor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_lookup() {
        for kind in DisplayKind::ALL {
            for alias in kind.aliases() {
                assert_eq!(DisplayKind::from_alias(alias), Some(kind));
            }
        }
        assert_eq!(DisplayKind::from_alias("2.7V2"), Some(DisplayKind::Epd2in7V2));
        assert_eq!(DisplayKind::from_alias("4.2"), None);
    }

    #[test]
    fn maximum_style_is_last() {
        let descriptor = DisplayKind::Epd2in7V2.descriptor();
        assert_eq!(descriptor.maximum_style(), Some(DisplayColorStyle::FourGray));
        assert!(descriptor.can_display_color(PixelColor::DarkGray));
        assert!(!descriptor.can_display_color(PixelColor::Red));
    }

    #[test]
    fn check_image_reports_sizes() {
        let descriptor = DisplayKind::Epd2in13bc.descriptor();
        let image = Image::filled(212, 104, PixelColor::White);
        assert_eq!(
            descriptor.check_image(&image),
            Err(Error::ImageDimensionMismatch {
                expected: (104, 212),
                actual: (212, 104),
            })
        );
    }
}
