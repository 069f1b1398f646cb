//! Display update task
//!
//! Draws the latest decoded message and follows link changes. Drawing
//! never happens on the task that services the bridge.

use defmt::*;
use embassy_futures::select::{select, Either};

use navhud_display::NavScreen;
use navhud_protocol::LinkState;

use crate::channels::{LATEST_MESSAGE, LINK_STATE};

/// Display task - renders messages and the link indicator
#[embassy_executor::task]
pub async fn display_task(mut display: crate::Display, mut screen: NavScreen) {
    info!("Display task started");

    let mut link = LinkState::Disconnected;

    if let Err(e) = screen.render_idle(&mut display, link) {
        error!("Idle screen failed: {:?}", e);
    }

    loop {
        let result = match select(LATEST_MESSAGE.wait(), LINK_STATE.wait()).await {
            Either::First(message) => {
                trace!("Rendering message (idle: {})", message.is_idle());
                screen.render(&mut display, &message, link)
            }
            Either::Second(state) => {
                link = state;
                screen.link_changed(&mut display, link)
            }
        };

        if let Err(e) = result {
            error!("Display update failed: {:?}", e);
        }
    }
}

