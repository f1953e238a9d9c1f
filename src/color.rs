//! Pixel colors, the color styles a panel can be driven in, and RGB quantization

use alloc::vec::Vec;

use crate::error::Error;

/// Colors a pixel of an ePaper image can take
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PixelColor {
    /// Black
    Black,
    /// White
    White,
    /// The lighter of the two grays (`gray1`)
    LightGray,
    /// The darker of the two grays (`gray2`)
    DarkGray,
    /// Red, shown by three color panels
    Red,
}

/// 24 bit color as loaded from an image file
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Same value on every channel
    pub const fn gray(value: u8) -> Self {
        Rgb::new(value, value, value)
    }

    /// Integer luma, ~0.299 R + 0.587 G + 0.114 B
    ///
    /// Pure grays are returned unchanged.
    pub fn luma(self) -> u8 {
        if self.r == self.g && self.g == self.b {
            return self.r;
        }
        ((u32::from(self.r) * 307 + u32::from(self.g) * 604 + u32::from(self.b) * 113) >> 10) as u8
    }
}

impl PixelColor {
    /// Every color, in declaration order
    pub const ALL: [PixelColor; 5] = [
        PixelColor::Black,
        PixelColor::White,
        PixelColor::LightGray,
        PixelColor::DarkGray,
        PixelColor::Red,
    ];

    /// Short name, unique over all colors
    pub fn alias(self) -> &'static str {
        match self {
            PixelColor::Black => "black",
            PixelColor::White => "white",
            PixelColor::LightGray => "gray1",
            PixelColor::DarkGray => "gray2",
            PixelColor::Red => "red",
        }
    }

    /// Palette value used when the color is rendered back into a bitmap
    pub fn rgb(self) -> Rgb {
        match self {
            PixelColor::Black => Rgb::gray(0x00),
            PixelColor::White => Rgb::gray(0xFF),
            PixelColor::LightGray => Rgb::gray(0xAA),
            PixelColor::DarkGray => Rgb::gray(0x55),
            PixelColor::Red => Rgb::new(0xFF, 0x00, 0x00),
        }
    }

    /// Looks a color up by its [alias](PixelColor::alias)
    pub fn from_alias(alias: &str) -> Option<PixelColor> {
        PixelColor::ALL.into_iter().find(|c| c.alias() == alias)
    }
}

/// Modes a panel can be driven in, distinguished by the colors they show
///
/// Variants are ordered by the number of colors they support. Fewer colors
/// means a faster refresh, so keep new variants in that order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum DisplayColorStyle {
    /// 1 bit, black and white
    BlackAndWhite,
    /// Black, white and red in two planes
    BlackAndWhiteAndRed,
    /// 2 bit, four levels of gray
    FourGray,
}

/// Registered color set of each style
const STYLE_COLORS: &[(DisplayColorStyle, &[PixelColor])] = &[
    (
        DisplayColorStyle::BlackAndWhite,
        &[PixelColor::Black, PixelColor::White],
    ),
    (
        DisplayColorStyle::BlackAndWhiteAndRed,
        &[PixelColor::Black, PixelColor::White, PixelColor::Red],
    ),
    (
        DisplayColorStyle::FourGray,
        &[
            PixelColor::Black,
            PixelColor::White,
            PixelColor::LightGray,
            PixelColor::DarkGray,
        ],
    ),
];

impl DisplayColorStyle {
    /// Every style, cheapest first
    pub const ALL: [DisplayColorStyle; 3] = [
        DisplayColorStyle::BlackAndWhite,
        DisplayColorStyle::BlackAndWhiteAndRed,
        DisplayColorStyle::FourGray,
    ];

    /// Colors this style can show
    pub fn supported_colors(self) -> Result<&'static [PixelColor], Error> {
        STYLE_COLORS
            .iter()
            .find(|(style, _)| *style == self)
            .map(|(_, colors)| *colors)
            .ok_or(Error::UndefinedStyle { style: self })
    }

    /// Whether `color` is part of this style
    pub fn supports(self, color: PixelColor) -> bool {
        self.supported_colors()
            .map(|colors| colors.contains(&color))
            .unwrap_or(false)
    }

    /// Maps an RGB value onto the nearest color of this style
    ///
    /// Pure red becomes [`PixelColor::Red`] when the style has red. Anything
    /// else goes by luma: four bands for [`FourGray`](Self::FourGray) and a
    /// threshold at 128 otherwise.
    pub fn classify(self, rgb: Rgb) -> PixelColor {
        if self.supports(PixelColor::Red) && rgb == PixelColor::Red.rgb() {
            return PixelColor::Red;
        }

        let luma = rgb.luma();
        if self == DisplayColorStyle::FourGray {
            const ONE_THIRD: u8 = 255 / 3;
            return match luma {
                n if n < ONE_THIRD / 2 => PixelColor::Black,
                n if n < ONE_THIRD + ONE_THIRD / 2 => PixelColor::DarkGray,
                n if n < ONE_THIRD * 2 + ONE_THIRD / 2 => PixelColor::LightGray,
                _ => PixelColor::White,
            };
        }

        if luma < 128 {
            PixelColor::Black
        } else {
            PixelColor::White
        }
    }
}

/// Maps an RGB value onto a color of `style`, see [`DisplayColorStyle::classify`]
pub fn classify_grayscale(rgb: Rgb, style: DisplayColorStyle) -> PixelColor {
    style.classify(rgb)
}

/// All styles able to show every color in `colors`, cheapest first
pub fn choose_styles_containing<I>(colors: I) -> Vec<DisplayColorStyle>
where
    I: IntoIterator<Item = PixelColor>,
{
    let colors: Vec<PixelColor> = colors.into_iter().collect();
    DisplayColorStyle::ALL
        .into_iter()
        .filter(|style| colors.iter().all(|c| style.supports(*c)))
        .collect()
}

/// Ways to refresh the panel from its RAM
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum RefreshMode {
    /// Full waveform, the whole panel flashes
    #[default]
    Full,
    /// Only changed pixels of the RAM window are driven
    Partial,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::pixelcolor::PixelColor for PixelColor {
    type Raw = ();
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use alloc::vec;

    #[test]
    fn aliases_are_unique() {
        let aliases: BTreeSet<&str> = PixelColor::ALL.iter().map(|c| c.alias()).collect();
        assert_eq!(aliases.len(), PixelColor::ALL.len());
    }

    #[test]
    fn alias_lookup() {
        for color in PixelColor::ALL {
            assert_eq!(PixelColor::from_alias(color.alias()), Some(color));
        }
        assert_eq!(PixelColor::from_alias("gray1"), Some(PixelColor::LightGray));
        assert_eq!(PixelColor::from_alias("blue"), None);
    }

    #[test]
    fn every_style_has_colors() {
        for style in DisplayColorStyle::ALL {
            assert!(!style.supported_colors().unwrap().is_empty());
        }
    }

    #[test]
    fn styles_sorted_by_color_count() {
        let counts: Vec<usize> = DisplayColorStyle::ALL
            .iter()
            .map(|s| s.supported_colors().unwrap().len())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn style_color_sets_are_distinct() {
        let sets: BTreeSet<BTreeSet<PixelColor>> = DisplayColorStyle::ALL
            .iter()
            .map(|s| s.supported_colors().unwrap().iter().copied().collect())
            .collect();
        assert_eq!(sets.len(), DisplayColorStyle::ALL.len());
    }

    #[test]
    fn choose_from_black() {
        let styles = choose_styles_containing([PixelColor::Black]);
        assert_eq!(styles, DisplayColorStyle::ALL);
    }

    #[test]
    fn choose_from_red_and_black() {
        let styles = choose_styles_containing([PixelColor::Black, PixelColor::Red]);
        assert_eq!(styles, vec![DisplayColorStyle::BlackAndWhiteAndRed]);
    }

    #[test]
    fn choose_from_red_and_gray() {
        let styles = choose_styles_containing([PixelColor::DarkGray, PixelColor::Red]);
        assert!(styles.is_empty());
    }

    #[test]
    fn classify_black_and_white() {
        let style = DisplayColorStyle::BlackAndWhite;
        assert_eq!(style.classify(Rgb::gray(0)), PixelColor::Black);
        assert_eq!(style.classify(Rgb::gray(127)), PixelColor::Black);
        assert_eq!(style.classify(Rgb::gray(128)), PixelColor::White);
        assert_eq!(style.classify(Rgb::gray(255)), PixelColor::White);
        // no red in this style, luma of pure red is 76
        assert_eq!(style.classify(Rgb::new(255, 0, 0)), PixelColor::Black);
    }

    #[test]
    fn classify_red() {
        let style = DisplayColorStyle::BlackAndWhiteAndRed;
        assert_eq!(style.classify(Rgb::new(255, 0, 0)), PixelColor::Red);
        assert_eq!(style.classify(Rgb::new(254, 0, 0)), PixelColor::Black);
        assert_eq!(style.classify(Rgb::new(255, 255, 0)), PixelColor::White);
    }

    #[test]
    fn classify_four_gray_ramp() {
        let style = DisplayColorStyle::FourGray;
        for i in 0..=255u8 {
            let expected = match i {
                0..=41 => PixelColor::Black,
                42..=126 => PixelColor::DarkGray,
                127..=211 => PixelColor::LightGray,
                _ => PixelColor::White,
            };
            assert_eq!(classify_grayscale(Rgb::gray(i), style), expected, "level {i}");
        }
    }

    #[test]
    fn classify_four_gray_samples() {
        let style = DisplayColorStyle::FourGray;
        for v in [0xFF, 0xEE, 0xDD] {
            assert_eq!(style.classify(Rgb::gray(v)), PixelColor::White);
        }
        for v in [0xCC, 0xBB, 0xAA, 0x99, 0x88] {
            assert_eq!(style.classify(Rgb::gray(v)), PixelColor::LightGray);
        }
        for v in [0x77, 0x66, 0x55, 0x44, 0x33] {
            assert_eq!(style.classify(Rgb::gray(v)), PixelColor::DarkGray);
        }
        for v in [0x22, 0x11, 0x00] {
            assert_eq!(style.classify(Rgb::gray(v)), PixelColor::Black);
        }
    }

    #[test]
    fn palette_classifies_to_itself() {
        for style in DisplayColorStyle::ALL {
            for &color in style.supported_colors().unwrap() {
                assert_eq!(style.classify(color.rgb()), color);
            }
        }
    }

    #[test]
    fn luma_of_colors() {
        assert_eq!(Rgb::new(255, 0, 0).luma(), 76);
        assert_eq!(Rgb::new(0, 255, 0).luma(), 150);
        assert_eq!(Rgb::new(0, 0, 255).luma(), 28);
        assert_eq!(Rgb::new(10, 10, 10).luma(), 10);
    }
}
