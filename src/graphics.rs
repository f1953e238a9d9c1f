//! Graphics Support for [`Image`]
//!
//! Lets embedded-graphics primitives, fonts and images be drawn straight
//! into the pixel grid that is later handed to a display protocol.

use crate::color::PixelColor;
use crate::image::Image;
use embedded_graphics_core::prelude::*;

/// Display rotation, only 90° increments supported
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Image {
    /// Set the drawing rotation.
    ///
    /// This only concerns future drawing made to it. Anything aready drawn
    /// stays as it is in the image.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        *self.rotation_mut() = rotation;
    }

    /// Get current rotation
    pub fn current_rotation(&self) -> DisplayRotation {
        self.rotation()
    }

    /// Set a pixel given in rotated coordinates, out of range pixels are dropped
    pub fn set_pixel(&mut self, pixel: Pixel<PixelColor>) {
        let Pixel(point, color) = pixel;
        let width = self.width() as i32;
        let height = self.height() as i32;

        let (x, y) = match self.rotation() {
            DisplayRotation::Rotate0 => (point.x, point.y),
            DisplayRotation::Rotate90 => (width - 1 - point.y, point.x),
            DisplayRotation::Rotate180 => (width - 1 - point.x, height - 1 - point.y),
            DisplayRotation::Rotate270 => (point.y, height - 1 - point.x),
        };

        if x < 0 || x >= width || y < 0 || y >= height {
            return;
        }
        let index = y as usize * self.width() + x as usize;
        self.pixels_mut()[index] = color;
    }
}

impl DrawTarget for Image {
    type Color = PixelColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for pixel in pixels {
            self.set_pixel(pixel);
        }
        Ok(())
    }
}

impl OriginDimensions for Image {
    fn size(&self) -> Size {
        let (w, h) = (self.width() as u32, self.height() as u32);
        match self.rotation() {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => Size::new(w, h),
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => Size::new(h, w),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PixelColor;
    use crate::image::pack_row_monochrome;
    use embedded_graphics::{
        prelude::*,
        primitives::{Line, PrimitiveStyle},
    };

    fn draw_line(rotation: DisplayRotation, start: Point, end: Point) -> Image {
        let mut image = Image::filled(200, 100, PixelColor::White);
        image.set_rotation(rotation);
        let _ = Line::new(start, end)
            .into_styled(PrimitiveStyle::with_stroke(PixelColor::Black, 1))
            .draw(&mut image);
        image
    }

    // the line always ends up in the first 8 pixels of the first row
    fn assert_first_byte_black(image: &Image) {
        let row = pack_row_monochrome(image, 0).unwrap();
        assert_eq!(row[0], 0x00);
        assert!(row[1..].iter().all(|&b| b == 0xFF));
        for y in 1..image.height() {
            assert!(pack_row_monochrome(image, y).unwrap().iter().all(|&b| b == 0xFF));
        }
    }

    #[test]
    fn graphics_size() {
        let mut image = Image::filled(200, 100, PixelColor::White);
        assert_eq!(image.size(), Size::new(200, 100));
        image.set_rotation(DisplayRotation::Rotate90);
        assert_eq!(image.size(), Size::new(100, 200));
    }

    #[test]
    fn graphics_rotation_0() {
        let image = draw_line(DisplayRotation::Rotate0, Point::new(0, 0), Point::new(7, 0));
        assert_first_byte_black(&image);
    }

    #[test]
    fn graphics_rotation_90() {
        let image = draw_line(DisplayRotation::Rotate90, Point::new(0, 192), Point::new(0, 199));
        assert_first_byte_black(&image);
    }

    #[test]
    fn graphics_rotation_180() {
        let image = draw_line(DisplayRotation::Rotate180, Point::new(192, 99), Point::new(199, 99));
        assert_first_byte_black(&image);
    }

    #[test]
    fn graphics_rotation_270() {
        let image = draw_line(DisplayRotation::Rotate270, Point::new(99, 0), Point::new(99, 7));
        assert_first_byte_black(&image);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let image = draw_line(DisplayRotation::Rotate0, Point::new(-5, 100), Point::new(300, 100));
        assert_eq!(image, Image::filled(200, 100, PixelColor::White));
    }
}
