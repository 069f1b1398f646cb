//! Display backend trait
//!
//! Defines the drawing primitives the screen layout needs from a panel.

use crate::bitmap::Bitmap;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
    /// Bitmap size does not match its data
    DimensionMismatch,
}

/// Text scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextSize {
    /// 8 px line height
    Small,
    /// 16 px line height
    Large,
}

impl TextSize {
    /// Line height in pixels
    pub const fn line_height(self) -> u16 {
        match self {
            TextSize::Small => 8,
            TextSize::Large => 16,
        }
    }
}

/// Display backend trait
///
/// Coordinates are pixels from the top-left corner. Drawing outside the
/// panel is clipped, not an error. Nothing reaches the panel before
/// [`flush`](DisplayBackend::flush).
pub trait DisplayBackend {
    /// Clear the frame buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Set or clear every pixel of a rectangle
    fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, on: bool)
        -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at (`x`, `y`)
    ///
    /// `inverted` draws dark glyphs, for use on a filled background.
    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        size: TextSize,
        inverted: bool,
    ) -> Result<(), DisplayError>;

    /// Draw a bitmap's set pixels; unset pixels are left untouched
    fn draw_bitmap(&mut self, x: u16, y: u16, bitmap: &Bitmap<'_>) -> Result<(), DisplayError>;

    /// Send the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Switch the panel on or off, keeping the frame buffer
    fn set_power(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Get pixel dimensions (width, height)
    fn pixel_dimensions(&self) -> (u16, u16);
}
