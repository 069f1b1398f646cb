//! Built-in icons

use crate::backend::DisplayError;
use crate::bitmap::Bitmap;

/// Logo edge length in pixels
pub const LOGO_SIZE: u16 = 48;

/// Link indicator edge length in pixels
pub const LINK_ICON_SIZE: u16 = 20;

/// Idle screen logo, 48x48
pub static LOGO: [u8; 288] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x80, 0x00, 0x00, 0x00, 0x00, 0x03, 0xc0, 0x00, 0x00,
    0x00, 0x00, 0x03, 0xc0, 0x00, 0x00, 0x00, 0x00, 0x07, 0xe0, 0x00, 0x00,
    0x00, 0x00, 0x07, 0xe0, 0x00, 0x00, 0x00, 0x00, 0x07, 0xe0, 0x00, 0x00,
    0x00, 0x00, 0x0f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x0f, 0xf0, 0x00, 0x00,
    0x00, 0x00, 0x1e, 0x78, 0x00, 0x00, 0x00, 0x00, 0x1e, 0x78, 0x00, 0x00,
    0x00, 0x00, 0x3e, 0x7c, 0x00, 0x00, 0x00, 0x00, 0x3c, 0x3c, 0x00, 0x00,
    0x00, 0x00, 0x3c, 0x3c, 0x00, 0x00, 0x00, 0x00, 0x78, 0x1e, 0x00, 0x00,
    0x00, 0x00, 0x78, 0x1e, 0x00, 0x00, 0x00, 0x00, 0xf8, 0x1f, 0x00, 0x00,
    0x00, 0x00, 0xf0, 0x0f, 0x00, 0x00, 0x00, 0x01, 0xf0, 0x0f, 0x80, 0x00,
    0x00, 0x01, 0xe0, 0x07, 0x80, 0x00, 0x00, 0x01, 0xe0, 0x07, 0x80, 0x00,
    0x00, 0x03, 0xc0, 0x03, 0xc0, 0x00, 0x00, 0x03, 0xc0, 0x03, 0xc0, 0x00,
    0x00, 0x07, 0xc0, 0x03, 0xe0, 0x00, 0x00, 0x07, 0x80, 0x01, 0xe0, 0x00,
    0x00, 0x0f, 0x80, 0x01, 0xf0, 0x00, 0x00, 0x0f, 0x00, 0x00, 0xf0, 0x00,
    0x00, 0x0f, 0x00, 0x00, 0xf0, 0x00, 0x00, 0x1e, 0x00, 0x00, 0x78, 0x00,
    0x00, 0x1e, 0x00, 0x00, 0x78, 0x00, 0x00, 0x3c, 0x00, 0x00, 0x3c, 0x00,
    0x00, 0x3c, 0x00, 0x00, 0x3c, 0x00, 0x00, 0x3c, 0x03, 0xc0, 0x3c, 0x00,
    0x00, 0x78, 0x0f, 0xf0, 0x1e, 0x00, 0x00, 0x78, 0x3f, 0xfc, 0x1e, 0x00,
    0x00, 0xf0, 0xff, 0xff, 0x0f, 0x00, 0x00, 0xf1, 0xfe, 0x7f, 0x8f, 0x00,
    0x01, 0xf7, 0xf8, 0x1f, 0xef, 0x80, 0x01, 0xff, 0xe0, 0x07, 0xff, 0x80,
    0x03, 0xff, 0x80, 0x01, 0xff, 0xc0, 0x03, 0xfe, 0x00, 0x00, 0x7f, 0xc0,
    0x03, 0xf8, 0x00, 0x00, 0x1f, 0xc0, 0x07, 0xe0, 0x00, 0x00, 0x07, 0xe0,
    0x03, 0xc0, 0x00, 0x00, 0x03, 0xc0, 0x01, 0x00, 0x00, 0x00, 0x00, 0x80,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Shown while a phone is connected, 20x20
pub static LINK_ICON: [u8; 60] = [
    0x00, 0x00, 0x00, 0x00, 0xf0, 0x00, 0x03, 0xfc, 0x00, 0x0f, 0xff, 0x00,
    0x1f, 0x9f, 0x80, 0x1f, 0x8f, 0x80, 0x3f, 0x87, 0xc0, 0x3e, 0x07, 0xc0,
    0x7f, 0x0f, 0xe0, 0x7f, 0x9f, 0xe0, 0x7f, 0x9f, 0xe0, 0x7f, 0x0f, 0xe0,
    0x3e, 0x07, 0xc0, 0x3e, 0x87, 0xc0, 0x1f, 0x8f, 0x80, 0x1f, 0x9f, 0x80,
    0x0f, 0xff, 0x00, 0x03, 0xfc, 0x00, 0x00, 0xf0, 0x00, 0x00, 0x00, 0x00,
];

pub fn logo() -> Result<Bitmap<'static>, DisplayError> {
    Bitmap::new(&LOGO, LOGO_SIZE, LOGO_SIZE)
}

pub fn link_icon() -> Result<Bitmap<'static>, DisplayError> {
    Bitmap::new(&LINK_ICON, LINK_ICON_SIZE, LINK_ICON_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_match_dimensions() {
        assert!(logo().is_ok());
        assert!(link_icon().is_ok());
    }

    #[test]
    fn test_logo_corners_are_blank() {
        let logo = logo().unwrap();
        assert!(!logo.pixel(0, 0));
        assert!(!logo.pixel(LOGO_SIZE - 1, LOGO_SIZE - 1));
        assert!(logo.set_pixels().count() > 0);
    }
}
