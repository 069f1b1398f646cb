//! navHUD transport and message protocol
//!
//! This crate turns the stream of small BLE characteristic writes sent by the
//! phone into navigation data for the display.
//!
//! # Packet Format
//!
//! Every write carries one chunk of a larger message:
//! ```text
//! ┌─────────────┬──────────────┬──────────────────┐
//! │ CHUNK INDEX │ TOTAL CHUNKS │ PAYLOAD          │
//! │ 1B          │ 1B           │ 0–18B            │
//! └─────────────┴──────────────┴──────────────────┘
//! ```
//!
//! Once every chunk of a session has arrived the payloads form one message:
//! ```text
//! ┌──────────────────────────────────────┬───────────────────────┐
//! │ TEXT  next|direction|status-eta...   │ ICON 48x48, 1bpp      │
//! │ variable                             │ 288B                  │
//! └──────────────────────────────────────┴───────────────────────┘
//! ```
//!
//! The BLE stack itself runs on a coprocessor that forwards writes and
//! connection events over UART using the frames in [`frame`].

#![no_std]
#![deny(unsafe_code)]

pub mod decode;
pub mod frame;
pub mod link;
pub mod packet;
pub mod reassembly;

pub use decode::{
    BitmapOffset, DecodedMessage, MessageDecoder, IMAGE_BYTES, IMAGE_HEIGHT, IMAGE_WIDTH,
};
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use link::{BridgeCommand, BridgeEvent, LinkState};
pub use packet::{split_message, ChunkPacket, MessageBuilder, PacketError, CHUNK_CAPACITY};
pub use reassembly::{ChunkReassembler, SessionOutcome, MAX_MESSAGE_LEN};

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod proptests;
