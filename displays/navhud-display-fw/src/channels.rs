//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;

use navhud_protocol::packet::MAX_PACKET_SIZE;
use navhud_protocol::{BridgeCommand, BridgeEvent, DecodedMessage, LinkState};

/// Channel capacity for bridge events
const EVENT_CHANNEL_SIZE: usize = 16;

/// Channel capacity for bridge commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Bridge event copied out of its frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// One characteristic write; longer writes are cut to a full packet
    Packet(Vec<u8, MAX_PACKET_SIZE>),
    /// Phone connected or disconnected
    Link(LinkState),
}

impl LinkEvent {
    pub fn from_bridge(event: &BridgeEvent<'_>) -> Self {
        match event {
            BridgeEvent::Write(data) => {
                let len = data.len().min(MAX_PACKET_SIZE);
                // Cannot fail: len is capped to the capacity
                let packet = Vec::from_slice(&data[..len]).unwrap_or_default();
                LinkEvent::Packet(packet)
            }
            BridgeEvent::Connected => LinkEvent::Link(LinkState::Connected),
            BridgeEvent::Disconnected => LinkEvent::Link(LinkState::Disconnected),
        }
    }
}

/// Events from the BLE bridge, consumed by the session task
pub static BRIDGE_EVENTS: Channel<CriticalSectionRawMutex, LinkEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Commands for the BLE bridge
pub static BRIDGE_COMMANDS: Channel<
    CriticalSectionRawMutex,
    BridgeCommand<'static>,
    COMMAND_CHANNEL_SIZE,
> = Channel::new();

/// Latest decoded message; a newer one replaces it unseen
pub static LATEST_MESSAGE: Signal<CriticalSectionRawMutex, DecodedMessage> = Signal::new();

/// Latest link state
pub static LINK_STATE: Signal<CriticalSectionRawMutex, LinkState> = Signal::new();
