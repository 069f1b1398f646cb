//! Message types for the radio bridge link
//!
//! Message types are divided into two categories:
//! - Bridge → Display: characteristic writes and connection events
//! - Display → Bridge: advertising control

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: Bridge → Display
pub const MSG_WRITE: u8 = 0x01;
pub const MSG_CONNECTED: u8 = 0x02;
pub const MSG_DISCONNECTED: u8 = 0x03;

// Message type IDs: Display → Bridge
pub const MSG_ADVERTISE: u8 = 0x20;
pub const MSG_SET_NAME: u8 = 0x21;

/// Maximum advertised name length
pub const MAX_NAME_LEN: usize = 16;

/// Connection state of the phone link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Connected,
    #[default]
    Disconnected,
}

impl LinkState {
    pub fn is_connected(self) -> bool {
        self == LinkState::Connected
    }
}

/// Events forwarded by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeEvent<'a> {
    /// One characteristic write, i.e. one chunk packet
    Write(&'a [u8]),
    /// A central connected
    Connected,
    /// The central went away
    Disconnected,
}

impl<'a> BridgeEvent<'a> {
    /// Parse an event from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_WRITE => Ok(BridgeEvent::Write(&frame.payload)),
            MSG_CONNECTED => Ok(BridgeEvent::Connected),
            MSG_DISCONNECTED => Ok(BridgeEvent::Disconnected),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this event into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            BridgeEvent::Write(packet) => Frame::new(MSG_WRITE, packet),
            BridgeEvent::Connected => Ok(Frame::empty(MSG_CONNECTED)),
            BridgeEvent::Disconnected => Ok(Frame::empty(MSG_DISCONNECTED)),
        }
    }

    /// Link state implied by a connection event
    pub fn link_state(&self) -> Option<LinkState> {
        match self {
            BridgeEvent::Connected => Some(LinkState::Connected),
            BridgeEvent::Disconnected => Some(LinkState::Disconnected),
            BridgeEvent::Write(_) => None,
        }
    }
}

/// Commands sent to the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeCommand<'a> {
    /// Start (or restart) advertising the navHUD service
    Advertise,
    /// Set the advertised device name
    SetName(&'a str),
}

impl<'a> BridgeCommand<'a> {
    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            BridgeCommand::Advertise => Ok(Frame::empty(MSG_ADVERTISE)),
            BridgeCommand::SetName(name) => {
                if name.len() > MAX_NAME_LEN.min(MAX_PAYLOAD_SIZE) {
                    return Err(FrameError::PayloadTooLarge);
                }
                Frame::new(MSG_SET_NAME, name.as_bytes())
            }
        }
    }

    /// Parse a command from a frame (bridge side)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_ADVERTISE => Ok(BridgeCommand::Advertise),
            MSG_SET_NAME => core::str::from_utf8(&frame.payload)
                .map(BridgeCommand::SetName)
                .map_err(|_| FrameError::InvalidFrame),
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_event_borrows_payload() {
        let frame = Frame::new(MSG_WRITE, &[0, 2, b'h', b'i']).unwrap();
        let event = BridgeEvent::from_frame(&frame).unwrap();
        assert_eq!(event, BridgeEvent::Write(&[0, 2, b'h', b'i']));
        assert_eq!(event.link_state(), None);
    }

    #[test]
    fn test_connection_events() {
        let connected = Frame::empty(MSG_CONNECTED);
        let disconnected = Frame::empty(MSG_DISCONNECTED);

        let event = BridgeEvent::from_frame(&connected).unwrap();
        assert_eq!(event.link_state(), Some(LinkState::Connected));

        let event = BridgeEvent::from_frame(&disconnected).unwrap();
        assert_eq!(event.link_state(), Some(LinkState::Disconnected));
    }

    #[test]
    fn test_unknown_event_type() {
        let frame = Frame::empty(0x7F);
        assert_eq!(BridgeEvent::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_event_frame_roundtrip() {
        let original = BridgeEvent::Write(&[1, 3, 0xFF]);
        let frame = original.to_frame().unwrap();
        assert_eq!(BridgeEvent::from_frame(&frame).unwrap(), original);
    }

    #[test]
    fn test_set_name_command() {
        let frame = BridgeCommand::SetName("navHUD").to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_SET_NAME);
        assert_eq!(frame.payload.as_slice(), b"navHUD");
        assert_eq!(
            BridgeCommand::from_frame(&frame).unwrap(),
            BridgeCommand::SetName("navHUD")
        );
    }

    #[test]
    fn test_set_name_too_long() {
        let result = BridgeCommand::SetName("a-very-long-device-name").to_frame();
        assert_eq!(result, Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_default_link_state() {
        assert!(!LinkState::default().is_connected());
    }
}
