//! `embedded-graphics` support
//!
//! Lets the SSD1306 framebuffer be used as a [`DrawTarget`]. Drawing stays
//! local like [`Ssd1306::set_pixel`]; call [`Ssd1306::show`] to render.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use periph_hal::I2cChannel;

use super::{DisplayError, Ssd1306};

impl<CH: I2cChannel, const N: usize> DrawTarget for Ssd1306<CH, N> {
    type Color = BinaryColor;
    type Error = DisplayError<CH::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            match self.set_pixel(point.x, point.y, color.is_on()) {
                // Off-screen pixels are clipped
                Ok(()) | Err(DisplayError::PixelOutOfBounds { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<CH: I2cChannel, const N: usize> OriginDimensions for Ssd1306<CH, N> {
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayState, Ssd1306Config};
    use crate::mock::MockChannel;
    use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

    #[test]
    fn test_size() {
        let display = Ssd1306::new(MockChannel::new(0x3C), Ssd1306Config::default()).unwrap();
        assert_eq!(display.size(), Size::new(128, 64));
    }

    #[test]
    fn test_draw_clips_off_screen() {
        let mut display =
            Ssd1306::new(MockChannel::new(0x3C), Ssd1306Config::default()).unwrap();

        Line::new(Point::new(-10, 0), Point::new(10, 0))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut display)
            .unwrap();

        assert_eq!(display.pixel(0, 0), Some(true));
        assert_eq!(display.pixel(10, 0), Some(true));
        assert_eq!(display.pixel(11, 0), Some(false));
    }

    #[test]
    fn test_fill_rectangle() {
        let mut display =
            Ssd1306::new(MockChannel::new(0x3C), Ssd1306Config::default()).unwrap();

        Rectangle::new(Point::new(0, 8), Size::new(4, 8))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut display)
            .unwrap();

        let page_one = &display.framebuffer().as_bytes()[1 + 128..1 + 128 + 5];
        assert_eq!(page_one, &[0xFF, 0xFF, 0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn test_draw_after_close_fails() {
        let mut display =
            Ssd1306::new(MockChannel::new(0x3C), Ssd1306Config::default()).unwrap();
        display.close().unwrap();
        assert_eq!(display.state(), DisplayState::Closed);

        let result = Pixel(Point::new(1, 1), BinaryColor::On).draw(&mut display);
        assert_eq!(result, Err(DisplayError::Closed));
    }
}
