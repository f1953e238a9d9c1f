//! Pixel grids handed to the display protocols and their bit packing
//!
//! Panels take image data row by row, 8 pixels per byte with the leftmost
//! pixel in the most significant bit. Rows are padded to a full byte.

use alloc::collections::BTreeSet;
use alloc::vec;
use alloc::vec::Vec;

use crate::color::{choose_styles_containing, DisplayColorStyle, PixelColor, Rgb};
use crate::error::Error;

/// Number of bytes one packed row of `width` pixels takes
pub const fn line_bytes(width: usize) -> usize {
    (width + 7) / 8
}

/// A `width` x `height` grid of [`PixelColor`], stored row by row
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<PixelColor>,
    #[cfg(feature = "graphics")]
    rotation: crate::graphics::DisplayRotation,
}

impl Image {
    /// Wraps row major pixels, `None` if their count is not `width * height`
    pub fn new(width: usize, height: usize, pixels: Vec<PixelColor>) -> Option<Self> {
        if width.checked_mul(height)? != pixels.len() {
            return None;
        }
        Some(Image {
            width,
            height,
            pixels,
            #[cfg(feature = "graphics")]
            rotation: Default::default(),
        })
    }

    /// Image of a single color, e.g. to clear the screen
    pub fn filled(width: usize, height: usize, color: PixelColor) -> Self {
        Image {
            width,
            height,
            pixels: vec![color; width * height],
            #[cfg(feature = "graphics")]
            rotation: Default::default(),
        }
    }

    /// Test pattern of `cell` sized squares cycling through `colors`
    ///
    /// An empty color list or a zero cell size gives a white image.
    pub fn chessboard(width: usize, height: usize, cell: usize, colors: &[PixelColor]) -> Self {
        let mut image = Image::filled(width, height, PixelColor::White);
        if colors.is_empty() || cell == 0 {
            return image;
        }
        for y in 0..height {
            for x in 0..width {
                image.pixels[y * width + x] = colors[(x / cell + y / cell) % colors.len()];
            }
        }
        image
    }

    /// Quantizes row major RGB pixels to the colors of `style`
    ///
    /// Exact white always stays white.
    pub fn from_rgb(width: usize, height: usize, rgb: &[Rgb], style: DisplayColorStyle) -> Option<Self> {
        let pixels = rgb
            .iter()
            .map(|&c| {
                if c == Rgb::gray(0xFF) {
                    PixelColor::White
                } else {
                    style.classify(c)
                }
            })
            .collect();
        Image::new(width, height, pixels)
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at (x, y), `None` outside of the image
    pub fn get(&self, x: usize, y: usize) -> Option<PixelColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Sets the color at (x, y), ignored outside of the image
    pub fn set(&mut self, x: usize, y: usize, color: PixelColor) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Pixels of row `y`
    pub fn row(&self, y: usize) -> Result<&[PixelColor], Error> {
        if y >= self.height {
            return Err(Error::RowOutOfRange { row: y });
        }
        Ok(&self.pixels[y * self.width..(y + 1) * self.width])
    }

    /// Distinct colors used anywhere in the image
    pub fn colors_used(&self) -> BTreeSet<PixelColor> {
        self.pixels.iter().copied().collect()
    }

    /// Cheapest style that can show every color of the image
    ///
    /// Drawing in the smallest style is noticeably faster on panels that
    /// support several, e.g. a black and white image on a 4 gray panel.
    pub fn detect_minimum_style(&self) -> Result<DisplayColorStyle, Error> {
        choose_styles_containing(self.colors_used())
            .into_iter()
            .min_by_key(|style| style.supported_colors().map(<[_]>::len).unwrap_or(usize::MAX))
            .ok_or(Error::NoMatchingStyle)
    }

    #[cfg(feature = "graphics")]
    pub(crate) fn pixels_mut(&mut self) -> &mut [PixelColor] {
        &mut self.pixels
    }

    #[cfg(feature = "graphics")]
    pub(crate) fn rotation_mut(&mut self) -> &mut crate::graphics::DisplayRotation {
        &mut self.rotation
    }

    #[cfg(feature = "graphics")]
    pub(crate) fn rotation(&self) -> crate::graphics::DisplayRotation {
        self.rotation
    }
}

/// Packs one row into bits, `bit` decides each pixel and rejects colors with `None`
pub(crate) fn pack_bits<F>(row: &[PixelColor], style: DisplayColorStyle, mut bit: F) -> Result<Vec<u8>, Error>
where
    F: FnMut(PixelColor) -> Option<bool>,
{
    let mut packed = vec![0u8; line_bytes(row.len())];
    for (x, &color) in row.iter().enumerate() {
        let set = bit(color).ok_or(Error::UnsupportedColorForStyle { color, style })?;
        if set {
            packed[x / 8] |= 0x80 >> (x % 8);
        }
    }
    Ok(packed)
}

/// 1 bit per pixel, white is 1 and black is 0
pub fn pack_row_monochrome(image: &Image, y: usize) -> Result<Vec<u8>, Error> {
    pack_bits(image.row(y)?, DisplayColorStyle::BlackAndWhite, |color| match color {
        PixelColor::White => Some(true),
        PixelColor::Black => Some(false),
        _ => None,
    })
}

/// 2 bits per pixel, split into a low bit and a high bit stream
///
/// | color     | low | high |
/// |-----------|-----|------|
/// | White     | 0   | 0    |
/// | LightGray | 1   | 0    |
/// | DarkGray  | 0   | 1    |
/// | Black     | 1   | 1    |
///
/// Unlike the 1 bit encoding, white is all zeros here.
pub fn pack_row_4gray(image: &Image, y: usize) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let row = image.row(y)?;
    let style = DisplayColorStyle::FourGray;
    let low = pack_bits(row, style, |color| match color {
        PixelColor::White | PixelColor::DarkGray => Some(false),
        PixelColor::LightGray | PixelColor::Black => Some(true),
        PixelColor::Red => None,
    })?;
    let high = pack_bits(row, style, |color| match color {
        PixelColor::White | PixelColor::LightGray => Some(false),
        PixelColor::DarkGray | PixelColor::Black => Some(true),
        PixelColor::Red => None,
    })?;
    Ok((low, high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use PixelColor::*;

    fn grid(width: usize, rows: &[&[PixelColor]]) -> Image {
        let pixels = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Image::new(width, rows.len(), pixels).unwrap()
    }

    #[test]
    fn new_checks_pixel_count() {
        assert!(Image::new(2, 2, vec![White; 3]).is_none());
        assert!(Image::new(2, 2, vec![White; 4]).is_some());
        assert!(Image::new(0, 0, vec![]).is_some());
    }

    #[test]
    fn detect_black_and_white() {
        let image = grid(2, &[&[Black, White], &[White, Black]]);
        assert_eq!(image.detect_minimum_style(), Ok(DisplayColorStyle::BlackAndWhite));
    }

    #[test]
    fn detect_red() {
        let image = grid(2, &[&[Black, Red], &[White, Black]]);
        assert_eq!(
            image.detect_minimum_style(),
            Ok(DisplayColorStyle::BlackAndWhiteAndRed)
        );
    }

    #[test]
    fn detect_gray() {
        let image = grid(2, &[&[Black, DarkGray], &[White, Black]]);
        assert_eq!(image.detect_minimum_style(), Ok(DisplayColorStyle::FourGray));
    }

    #[test]
    fn detect_impossible_mix() {
        let image = grid(2, &[&[Red, DarkGray], &[White, Black]]);
        assert_eq!(image.detect_minimum_style(), Err(Error::NoMatchingStyle));
    }

    #[test]
    fn monochrome_two_pixels() {
        let image = grid(2, &[&[Black, White]]);
        assert_eq!(pack_row_monochrome(&image, 0), Ok(vec![0b0100_0000]));
    }

    #[test]
    fn monochrome_pads_partial_byte() {
        let mut row = [White; 10];
        row[1] = Black;
        row[8] = Black;
        let image = grid(10, &[&row]);
        assert_eq!(pack_row_monochrome(&image, 0), Ok(vec![0b1011_1111, 0b0100_0000]));
    }

    #[test]
    fn monochrome_rejects_gray() {
        let image = grid(2, &[&[Black, LightGray]]);
        assert_eq!(
            pack_row_monochrome(&image, 0),
            Err(Error::UnsupportedColorForStyle {
                color: LightGray,
                style: DisplayColorStyle::BlackAndWhite
            })
        );
    }

    #[test]
    fn packing_checks_row() {
        let image = grid(2, &[&[Black, White]]);
        assert_eq!(pack_row_monochrome(&image, 1), Err(Error::RowOutOfRange { row: 1 }));
        assert_eq!(pack_row_4gray(&image, 3), Err(Error::RowOutOfRange { row: 3 }));
    }

    #[test]
    fn four_gray_bit_planes() {
        let image = grid(4, &[&[White, LightGray, DarkGray, Black]]);
        let (low, high) = pack_row_4gray(&image, 0).unwrap();
        assert_eq!(low, vec![0b0101_0000]);
        assert_eq!(high, vec![0b0011_0000]);
    }

    #[test]
    fn four_gray_rejects_red() {
        let image = grid(2, &[&[Black, Red]]);
        assert_eq!(
            pack_row_4gray(&image, 0),
            Err(Error::UnsupportedColorForStyle {
                color: Red,
                style: DisplayColorStyle::FourGray
            })
        );
    }

    #[test]
    fn chessboard_pattern() {
        let image = Image::chessboard(4, 2, 2, &[Black, White]);
        assert_eq!(image.row(0).unwrap(), &[Black, Black, White, White]);
        assert_eq!(image.row(1).unwrap(), &[Black, Black, White, White]);
        assert_eq!(Image::chessboard(2, 2, 0, &[Black]), Image::filled(2, 2, White));
    }

    #[test]
    fn from_rgb_quantizes() {
        let rgb = [
            Rgb::gray(0xFF),
            Rgb::gray(0x00),
            Rgb::gray(0x99),
            Rgb::gray(0x44),
        ];
        let image = Image::from_rgb(4, 1, &rgb, DisplayColorStyle::FourGray).unwrap();
        assert_eq!(image.row(0).unwrap(), &[White, Black, LightGray, DarkGray]);

        let image = Image::from_rgb(2, 1, &rgb[..2], DisplayColorStyle::BlackAndWhite).unwrap();
        assert_eq!(image.colors_used().into_iter().collect::<Vec<_>>(), vec![Black, White]);
    }

    #[test]
    fn get_and_set_ignore_outside() {
        let mut image = Image::filled(3, 2, White);
        image.set(2, 1, Red);
        image.set(3, 1, Red);
        assert_eq!(image.get(2, 1), Some(Red));
        assert_eq!(image.get(3, 1), None);
        assert_eq!(image.colors_used().len(), 2);
    }
}
