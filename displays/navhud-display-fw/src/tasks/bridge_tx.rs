//! BLE bridge UART transmit task
//!
//! Names the bridge at boot, starts advertising, then forwards queued
//! commands.

use defmt::*;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::UartTx;

use navhud_protocol::frame::MAX_FRAME_SIZE;
use navhud_protocol::BridgeCommand;

use crate::channels::BRIDGE_COMMANDS;

/// Bridge TX task - sends commands to the BLE bridge
#[embassy_executor::task]
pub async fn bridge_tx_task(mut tx: UartTx<'static, Async>, device_name: &'static str) {
    info!("Bridge TX task started");

    send(&mut tx, BridgeCommand::SetName(device_name)).await;
    send(&mut tx, BridgeCommand::Advertise).await;

    loop {
        let command = BRIDGE_COMMANDS.receive().await;
        send(&mut tx, command).await;
    }
}

async fn send(tx: &mut UartTx<'static, Async>, command: BridgeCommand<'_>) {
    let frame = match command.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Cannot encode {:?}: {:?}", command, e);
            return;
        }
    };

    let mut buf = [0u8; MAX_FRAME_SIZE];
    match frame.encode(&mut buf) {
        Ok(len) => {
            if let Err(e) = tx.write(&buf[..len]).await {
                error!("UART write error: {:?}", e);
            } else {
                debug!("Sent {:?}", command);
            }
        }
        Err(e) => warn!("Frame encode error: {:?}", e),
    }
}
