//! Chunk packets as written to the BLE characteristic
//!
//! Packet format:
//! - INDEX (1 byte): position of this chunk within the message
//! - TOTAL (1 byte): number of chunks in the message
//! - PAYLOAD (0-18 bytes): message bytes starting at `INDEX * 18`
//!
//! Only the last chunk of a message may carry a short payload.

use heapless::Vec;

use crate::decode::IMAGE_BYTES;

/// Payload bytes carried by a full chunk (20-byte ATT write minus header)
pub const CHUNK_CAPACITY: usize = 18;

/// Index + total
pub const HEADER_SIZE: usize = 2;

/// Largest packet a sender will produce
pub const MAX_PACKET_SIZE: usize = HEADER_SIZE + CHUNK_CAPACITY;

/// Chunk count is a single byte
pub const MAX_CHUNKS: usize = u8::MAX as usize;

/// Errors from parsing or producing chunk packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Packet shorter than the two header bytes
    TooShort,
    /// Message needs more than 255 chunks
    MessageTooLarge,
    /// Message has no bytes to send
    Empty,
    /// Message does not fit the builder's buffer
    BufferTooSmall,
}

/// One parsed chunk packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChunkPacket<'a> {
    /// Position of this chunk (0-based)
    pub index: u8,
    /// Number of chunks in the session
    pub total: u8,
    /// Chunk payload, capped at [`CHUNK_CAPACITY`]
    pub payload: &'a [u8],
}

impl<'a> ChunkPacket<'a> {
    /// Parse a raw characteristic write
    ///
    /// Bytes beyond the chunk capacity are ignored.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, PacketError> {
        if bytes.len() < HEADER_SIZE {
            return Err(PacketError::TooShort);
        }

        let payload = &bytes[HEADER_SIZE..];
        let payload = &payload[..payload.len().min(CHUNK_CAPACITY)];

        Ok(Self {
            index: bytes[0],
            total: bytes[1],
            payload,
        })
    }

    /// Whether this is the terminal chunk of its session
    pub fn is_last(&self) -> bool {
        self.index as usize + 1 == self.total as usize
    }

    /// Encode into wire bytes
    pub fn encode(&self) -> Vec<u8, MAX_PACKET_SIZE> {
        let mut out = Vec::new();
        // Header plus a capped payload always fits
        let _ = out.push(self.index);
        let _ = out.push(self.total);
        let _ = out.extend_from_slice(&self.payload[..self.payload.len().min(CHUNK_CAPACITY)]);
        out
    }
}

/// Iterator over the packets of one message, see [`split_message`]
#[derive(Debug, Clone)]
pub struct MessageChunks<'a> {
    chunks: core::iter::Enumerate<core::slice::Chunks<'a, u8>>,
    total: u8,
}

impl<'a> MessageChunks<'a> {
    /// Number of packets the message splits into
    pub fn total(&self) -> u8 {
        self.total
    }
}

impl<'a> Iterator for MessageChunks<'a> {
    type Item = ChunkPacket<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().map(|(index, payload)| ChunkPacket {
            index: index as u8,
            total: self.total,
            payload,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for MessageChunks<'_> {}

/// Split a message into the packets a sender writes, in order
pub fn split_message(message: &[u8]) -> Result<MessageChunks<'_>, PacketError> {
    if message.is_empty() {
        return Err(PacketError::Empty);
    }

    let total = message.len().div_ceil(CHUNK_CAPACITY);
    if total > MAX_CHUNKS {
        return Err(PacketError::MessageTooLarge);
    }

    Ok(MessageChunks {
        chunks: message.chunks(CHUNK_CAPACITY).enumerate(),
        total: total as u8,
    })
}

/// Composes a message the way the phone application serialises it
///
/// Text is `title|details|subtext|` followed by a newline, then the optional
/// icon with nothing after it. The text region therefore ends exactly where the
/// icon begins, so any decoder recovers the text verbatim. A
/// [`Legacy`](crate::decode::BitmapOffset::Legacy) decoder reads the icon one
/// byte early and sees it shifted by one byte, as with messages from the phone.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> MessageBuilder<N> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append the three notification text fields
    pub fn text(mut self, title: &str, details: &str, subtext: &str) -> Result<Self, PacketError> {
        for field in [title, details, subtext] {
            self.extend(field.as_bytes())?;
            self.extend(b"|")?;
        }
        self.extend(b"\n")?;
        Ok(self)
    }

    /// Append a 48x48 icon
    pub fn icon(mut self, icon: &[u8; IMAGE_BYTES]) -> Result<Self, PacketError> {
        self.extend(icon)?;
        Ok(self)
    }

    /// Finished message bytes
    pub fn finish(self) -> Vec<u8, N> {
        self.buf
    }

    fn extend(&mut self, bytes: &[u8]) -> Result<(), PacketError> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| PacketError::BufferTooSmall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_only() {
        let packet = ChunkPacket::parse(&[3, 7]).unwrap();
        assert_eq!(packet.index, 3);
        assert_eq!(packet.total, 7);
        assert!(packet.payload.is_empty());
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(ChunkPacket::parse(&[]), Err(PacketError::TooShort));
        assert_eq!(ChunkPacket::parse(&[0]), Err(PacketError::TooShort));
    }

    #[test]
    fn test_parse_caps_payload() {
        let mut bytes = [0xAAu8; 30];
        bytes[0] = 0;
        bytes[1] = 1;
        let packet = ChunkPacket::parse(&bytes).unwrap();
        assert_eq!(packet.payload.len(), CHUNK_CAPACITY);
    }

    #[test]
    fn test_is_last() {
        assert!(ChunkPacket::parse(&[2, 3, 1]).unwrap().is_last());
        assert!(!ChunkPacket::parse(&[1, 3, 1]).unwrap().is_last());
        assert!(!ChunkPacket::parse(&[0, 0]).unwrap().is_last());
    }

    #[test]
    fn test_split_43_bytes() {
        let message = [0x55u8; 43];
        let chunks = split_message(&message).unwrap();
        assert_eq!(chunks.total(), 3);

        let lengths: Vec<usize, 4> = chunks.map(|c| c.payload.len()).collect();
        assert_eq!(lengths.as_slice(), &[18, 18, 7]);
    }

    #[test]
    fn test_split_exact_multiple() {
        let message = [1u8; 36];
        let chunks = split_message(&message).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.clone().all(|c| c.payload.len() == CHUNK_CAPACITY));
        assert_eq!(chunks.last().map(|c| c.index), Some(1));
    }

    #[test]
    fn test_split_limits() {
        assert_eq!(split_message(&[]).err(), Some(PacketError::Empty));

        let largest = [0u8; MAX_CHUNKS * CHUNK_CAPACITY];
        assert_eq!(split_message(&largest).unwrap().total(), 255);

        let too_large = [0u8; MAX_CHUNKS * CHUNK_CAPACITY + 1];
        assert_eq!(split_message(&too_large).err(), Some(PacketError::MessageTooLarge));
    }

    #[test]
    fn test_encode_matches_wire_layout() {
        let packet = ChunkPacket {
            index: 1,
            total: 2,
            payload: b"abc",
        };
        assert_eq!(packet.encode().as_slice(), &[1, 2, b'a', b'b', b'c']);
    }

    #[test]
    fn test_builder_text_layout() {
        let message = MessageBuilder::<64>::new()
            .text("Turn left", "Main St", "5 min")
            .unwrap()
            .finish();
        assert_eq!(message.as_slice(), b"Turn left|Main St|5 min|\n");
    }

    #[test]
    fn test_builder_icon_follows_text_directly() {
        let mut icon = [0xF0u8; IMAGE_BYTES];
        icon[0] = b'A';
        let message = MessageBuilder::<400>::new()
            .text("a", "b", "c")
            .unwrap()
            .icon(&icon)
            .unwrap()
            .finish();
        let text_len = b"a|b|c|\n".len();
        assert_eq!(message.len(), text_len + IMAGE_BYTES);
        assert_eq!(&message[..text_len], b"a|b|c|\n");
        assert_eq!(&message[text_len..], &icon[..]);
    }

    #[test]
    fn test_builder_overflow() {
        let result = MessageBuilder::<8>::new().text("too long title", "", "");
        assert_eq!(result.err(), Some(PacketError::BufferTooSmall));
    }
}
