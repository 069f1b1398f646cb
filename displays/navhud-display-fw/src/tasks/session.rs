//! Transfer session task
//!
//! Sole owner of the receive pipeline. Feeds it bridge writes, expires
//! stalled transfers on a ticker and hands completed messages to the
//! display.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Ticker};

use navhud_core::{HudConfig, NavPipeline, PipelineEvent};
use navhud_protocol::{BridgeCommand, LinkState};

use crate::channels::{LinkEvent, BRIDGE_COMMANDS, BRIDGE_EVENTS, LATEST_MESSAGE, LINK_STATE};

/// Milliseconds since boot, wrapping
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Session task - reassembles and decodes navigation messages
#[embassy_executor::task]
pub async fn session_task(config: &'static HudConfig) {
    info!(
        "Session task started (timeout {} ms, tick {} ms)",
        config.link.session_timeout_ms, config.link.tick_interval_ms
    );

    let mut pipeline: NavPipeline = NavPipeline::from_config(config);
    let mut ticker = Ticker::every(Duration::from_millis(config.link.tick_interval_ms.into()));

    loop {
        match select(BRIDGE_EVENTS.receive(), ticker.next()).await {
            Either::First(LinkEvent::Packet(bytes)) => {
                handle_packet(&mut pipeline, &bytes);
            }
            Either::First(LinkEvent::Link(state)) => {
                handle_link(&mut pipeline, state).await;
            }
            Either::Second(()) => {
                if pipeline.on_tick(now_ms()) {
                    let stats = pipeline.stats();
                    warn!("Transfer stalled, dropped ({} stalled so far)", stats.stalled);
                }
            }
        }
    }
}

fn handle_packet(pipeline: &mut NavPipeline, bytes: &[u8]) {
    match pipeline.on_packet(bytes, now_ms()) {
        PipelineEvent::Dropped => {
            warn!("Dropped {}-byte write", bytes.len());
        }
        PipelineEvent::Pending { received, expected } => {
            if received == 1 {
                debug!("Starting transfer: {} chunks", expected);
            }
            trace!("Chunk {}/{}", received, expected);
        }
        PipelineEvent::Reset => {
            warn!("Protocol error, resetting");
        }
        PipelineEvent::Message(message) => {
            let stats = pipeline.stats();
            info!("Message #{} received: {}", stats.messages, message);
            LATEST_MESSAGE.signal(message);
        }
    }
}

async fn handle_link(pipeline: &mut NavPipeline, state: LinkState) {
    debug!("Link {:?}", state);

    if state == LinkState::Disconnected {
        if pipeline.in_transfer() {
            debug!("Discarding partial transfer");
        }
        pipeline.abort();
        BRIDGE_COMMANDS.send(BridgeCommand::Advertise).await;
    }

    LINK_STATE.signal(state);
}
