//! Navigation screen layout
//!
//! Fixed layout for a 128x64 panel:
//!
//! ```text
//!  0,0  status line (small)
//!  0,8  ETA (small)
//!  0,16 +--------+ 48,16 next instruction (large)
//!       |  icon  | 48,32 direction (small)
//!       | 48x48  |                         108,44 +------+
//!       |        |                                | link |
//!       +--------+                                +------+
//! ```
//!
//! The idle screen shows an inverted title bar and the logo instead.

use navhud_protocol::{DecodedMessage, LinkState, IMAGE_BYTES, IMAGE_HEIGHT, IMAGE_WIDTH};

use crate::backend::{DisplayBackend, DisplayError, TextSize};
use crate::bitmap::Bitmap;
use crate::icons::{self, LINK_ICON_SIZE};

/// Panel width in pixels
pub const SCREEN_WIDTH: u16 = 128;

/// Panel height in pixels
pub const SCREEN_HEIGHT: u16 = 64;

const STATUS_POS: (u16, u16) = (0, 0);
const ETA_POS: (u16, u16) = (0, 8);
const NEXT_POS: (u16, u16) = (48, 16);
const DIRECTION_POS: (u16, u16) = (48, 32);
const ICON_POS: (u16, u16) = (0, 16);
const LINK_POS: (u16, u16) = (108, 44);

const TITLE: &str = "navHUD";
const TITLE_POS: (u16, u16) = (30, 0);
const TITLE_BAR_HEIGHT: u16 = 16;
const LOGO_POS: (u16, u16) = (40, 16);

/// Renders decoded messages and link changes onto a backend
///
/// Tracks whether the panel is powered so a message or reconnect after a
/// disconnect wakes it.
#[derive(Debug, Clone)]
pub struct NavScreen {
    power_off_on_disconnect: bool,
    powered: bool,
}

impl NavScreen {
    pub const fn new(power_off_on_disconnect: bool) -> Self {
        Self {
            power_off_on_disconnect,
            powered: true,
        }
    }

    /// Whether the panel is switched on
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Draw one decoded message
    ///
    /// Messages without an icon fall back to the idle screen.
    pub fn render<B: DisplayBackend>(
        &mut self,
        backend: &mut B,
        message: &DecodedMessage,
        link: LinkState,
    ) -> Result<(), DisplayError> {
        let Some(icon) = &message.icon else {
            return self.render_idle(backend, link);
        };

        self.wake(backend)?;
        backend.clear()?;

        let small = TextSize::Small;
        draw_field(backend, STATUS_POS, message.status.as_str(), small)?;
        draw_field(backend, ETA_POS, message.eta.as_str(), small)?;
        draw_field(backend, NEXT_POS, message.next_instruction.as_str(), TextSize::Large)?;
        draw_field(backend, DIRECTION_POS, message.direction.as_str(), small)?;

        self.draw_icon(backend, icon, IMAGE_WIDTH as u16, IMAGE_HEIGHT as u16)?;
        draw_link(backend, link)?;
        backend.flush()
    }

    /// Draw the idle screen
    pub fn render_idle<B: DisplayBackend>(
        &mut self,
        backend: &mut B,
        link: LinkState,
    ) -> Result<(), DisplayError> {
        self.wake(backend)?;
        backend.clear()?;

        backend.fill_rect(0, 0, SCREEN_WIDTH, TITLE_BAR_HEIGHT, true)?;
        backend.draw_text(TITLE_POS.0, TITLE_POS.1, TITLE, TextSize::Large, true)?;
        backend.draw_bitmap(LOGO_POS.0, LOGO_POS.1, &icons::logo()?)?;

        draw_link(backend, link)?;
        backend.flush()
    }

    /// Draw the maneuver icon, checking the claimed dimensions first
    ///
    /// Nothing is drawn when `width * height` does not cover exactly the
    /// icon's bits.
    pub fn draw_icon<B: DisplayBackend>(
        &self,
        backend: &mut B,
        icon: &[u8; IMAGE_BYTES],
        width: u16,
        height: u16,
    ) -> Result<(), DisplayError> {
        if width as usize * height as usize != IMAGE_BYTES * 8 {
            return Err(DisplayError::DimensionMismatch);
        }
        let bitmap = Bitmap::new(icon, width, height)?;

        backend.fill_rect(ICON_POS.0, ICON_POS.1, width, height, false)?;
        backend.draw_bitmap(ICON_POS.0, ICON_POS.1, &bitmap)
    }

    /// React to the phone connecting or disconnecting
    ///
    /// Connecting wakes the panel and shows the link icon. Disconnecting
    /// either switches the panel off or just removes the icon.
    pub fn link_changed<B: DisplayBackend>(
        &mut self,
        backend: &mut B,
        link: LinkState,
    ) -> Result<(), DisplayError> {
        match link {
            LinkState::Connected => {
                self.wake(backend)?;
                draw_link(backend, link)?;
                backend.flush()
            }
            LinkState::Disconnected if self.power_off_on_disconnect => {
                if self.powered {
                    backend.set_power(false)?;
                    self.powered = false;
                }
                Ok(())
            }
            LinkState::Disconnected => {
                draw_link(backend, link)?;
                backend.flush()
            }
        }
    }

    fn wake<B: DisplayBackend>(&mut self, backend: &mut B) -> Result<(), DisplayError> {
        if !self.powered {
            backend.set_power(true)?;
            self.powered = true;
        }
        Ok(())
    }
}

fn draw_field<B: DisplayBackend>(
    backend: &mut B,
    (x, y): (u16, u16),
    text: &str,
    size: TextSize,
) -> Result<(), DisplayError> {
    // Fields may carry the message's line terminator
    let text = text.trim_end_matches(char::is_control);
    if text.is_empty() {
        return Ok(());
    }
    backend.draw_text(x, y, text, size, false)
}

/// Clear the indicator area, then draw the icon if connected
fn draw_link<B: DisplayBackend>(backend: &mut B, link: LinkState) -> Result<(), DisplayError> {
    let (x, y) = LINK_POS;
    backend.fill_rect(x, y, LINK_ICON_SIZE, LINK_ICON_SIZE, false)?;
    if link.is_connected() {
        backend.draw_bitmap(x, y, &icons::link_icon()?)?;
    }
    Ok(())
}
