//! BLE bridge UART receive task
//!
//! Receives frames from the bridge and forwards them as link events.

use defmt::*;
use embassy_stm32::usart::RingBufferedUartRx;
use embedded_io_async::Read;

use navhud_protocol::{BridgeEvent, FrameParser};

use crate::channels::{LinkEvent, BRIDGE_EVENTS};

/// Bytes read from the ring buffer at a time
const RX_CHUNK: usize = 32;

/// Bridge RX task - receives and parses frames from the BLE bridge
#[embassy_executor::task]
pub async fn bridge_rx_task(mut rx: RingBufferedUartRx<'static>) {
    info!("Bridge RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_CHUNK];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                // Overrun: the frame in progress is lost
                warn!("UART read error: {:?}", e);
                parser.reset();
                continue;
            }
        };

        for &byte in &buf[..n] {
            match parser.feed(byte) {
                Ok(Some(frame)) => match BridgeEvent::from_frame(&frame) {
                    Ok(event) => {
                        trace!("Bridge event: {:?}", event);
                        BRIDGE_EVENTS.send(LinkEvent::from_bridge(&event)).await;
                    }
                    Err(e) => {
                        warn!("Unknown bridge frame 0x{:02x}: {:?}", frame.msg_type, e);
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    warn!("Frame parse error: {:?}", e);
                }
            }
        }
    }
}
