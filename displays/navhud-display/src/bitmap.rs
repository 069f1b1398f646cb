//! Monochrome bitmaps
//!
//! Row-major, 1 bpp, most significant bit first. Each row is padded to a
//! whole byte.

use crate::backend::DisplayError;

/// Borrowed 1 bpp image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: u16,
    height: u16,
}

impl<'a> Bitmap<'a> {
    /// Wrap image data, checking that the size matches
    pub fn new(data: &'a [u8], width: u16, height: u16) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::DimensionMismatch);
        }
        if data.len() != row_stride(width) * height as usize {
            return Err(DisplayError::DimensionMismatch);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Raw image bytes
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Whether the pixel at (`x`, `y`) is set; false outside the image
    pub fn pixel(&self, x: u16, y: u16) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y as usize * row_stride(self.width) + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    /// Coordinates of every set pixel, row by row
    pub fn set_pixels(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y))
    }
}

/// Bytes per image row
pub const fn row_stride(width: u16) -> usize {
    (width as usize).div_ceil(8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_stride() {
        assert_eq!(row_stride(48), 6);
        assert_eq!(row_stride(20), 3);
        assert_eq!(row_stride(1), 1);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let data = [0u8; 288];
        assert!(Bitmap::new(&data, 48, 48).is_ok());
        assert_eq!(
            Bitmap::new(&data, 48, 40),
            Err(DisplayError::DimensionMismatch)
        );
        assert_eq!(
            Bitmap::new(&data, 0, 48),
            Err(DisplayError::DimensionMismatch)
        );
        assert_eq!(
            Bitmap::new(&data[..287], 48, 48),
            Err(DisplayError::DimensionMismatch)
        );
    }

    #[test]
    fn test_pixel_msb_first() {
        // 10x2: rows are two bytes each
        let data = [0b1000_0001, 0b0100_0000, 0, 0b1000_0000];
        let bitmap = Bitmap::new(&data, 10, 2).unwrap();

        assert!(bitmap.pixel(0, 0));
        assert!(bitmap.pixel(7, 0));
        assert!(bitmap.pixel(9, 0));
        assert!(!bitmap.pixel(8, 0));
        assert!(bitmap.pixel(8, 1));
        assert!(!bitmap.pixel(10, 0));
        assert!(!bitmap.pixel(0, 2));

        let set: Vec<_> = bitmap.set_pixels().collect();
        assert_eq!(set, [(0, 0), (7, 0), (9, 0), (8, 1)]);
    }
}
