//! Navigation message decoding
//!
//! A completed message is a text region followed by a 48x48 monochrome icon.
//! The text region is split into four fields by a single delimiter scan:
//!
//! ```text
//! next instruction | direction | status | status - eta
//!        0              1          2         3      4
//! ```
//!
//! `|` only advances the field selector. `-` advances it and is kept as the
//! first character of the new field, which lets the phone send values such as
//! "-Main St" unchanged.

use heapless::Vec;

/// Icon width in pixels
pub const IMAGE_WIDTH: usize = 48;

/// Icon height in pixels
pub const IMAGE_HEIGHT: usize = 48;

/// Packed icon size, 1 bit per pixel
pub const IMAGE_BYTES: usize = IMAGE_WIDTH * IMAGE_HEIGHT / 8;

/// Bytes kept per text field; longer input is truncated
pub const MAX_FIELD_LEN: usize = 64;

/// Where the icon starts relative to the end of the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BitmapOffset {
    /// One byte before `len - IMAGE_BYTES`, as deployed senders expect
    #[default]
    Legacy,
    /// Exactly the trailing `IMAGE_BYTES`
    Trailing,
}

impl BitmapOffset {
    /// First icon byte within a message of `len >= IMAGE_BYTES` bytes
    pub fn bitmap_start(self, len: usize) -> usize {
        let text_len = len - IMAGE_BYTES;
        match self {
            BitmapOffset::Legacy => text_len.saturating_sub(1),
            BitmapOffset::Trailing => text_len,
        }
    }
}

/// One decoded text field
///
/// Holds at most [`MAX_FIELD_LEN`] bytes. Bytes past that bound are dropped
/// without error. Stored as raw bytes so a truncated multi-byte character
/// never corrupts the rest of the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    bytes: Vec<u8, MAX_FIELD_LEN>,
}

impl Field {
    fn push(&mut self, byte: u8) {
        // Excess bytes are dropped
        let _ = self.bytes.push(byte);
    }

    /// Longest valid UTF-8 prefix of the field
    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&self.bytes[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    /// Raw field bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Field {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str());
    }
}

/// Navigation data ready for the display
///
/// Each text field keeps the first [`MAX_FIELD_LEN`] bytes routed to it and
/// silently drops the rest, so a long instruction shows truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Large instruction text ("Turn left")
    pub next_instruction: Field,
    /// Road or direction text
    pub direction: Field,
    /// Distance/time summary, selectors 2 and 3 concatenated
    pub status: Field,
    /// Arrival time
    pub eta: Field,
    /// Maneuver icon; `None` means show the idle screen
    pub icon: Option<[u8; IMAGE_BYTES]>,
}

impl DecodedMessage {
    /// Message carrying no navigation data
    pub fn idle() -> Self {
        Self::default()
    }

    /// True when the display should fall back to the idle screen
    pub fn is_idle(&self) -> bool {
        self.icon.is_none()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DecodedMessage {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "DecodedMessage {{ next: {}, direction: {}, status: {}, eta: {}, icon: {} }}",
            self.next_instruction,
            self.direction,
            self.status,
            self.eta,
            self.icon.is_some()
        );
    }
}

/// Decoder for completed messages
///
/// Decoding never fails: malformed input degrades to empty or truncated
/// fields.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageDecoder {
    offset: BitmapOffset,
}

impl MessageDecoder {
    /// Create a decoder with the given icon alignment
    pub const fn new(offset: BitmapOffset) -> Self {
        Self { offset }
    }

    /// Icon alignment in use
    pub fn offset(&self) -> BitmapOffset {
        self.offset
    }

    /// Decode a reassembled message
    ///
    /// Messages shorter than [`IMAGE_BYTES`] carry no navigation data and
    /// decode to [`DecodedMessage::idle`] without looking at the text.
    pub fn decode(&self, raw: &[u8]) -> DecodedMessage {
        if raw.len() < IMAGE_BYTES {
            return DecodedMessage::idle();
        }

        let text_len = raw.len() - IMAGE_BYTES;
        let start = self.offset.bitmap_start(raw.len());

        let mut icon = [0u8; IMAGE_BYTES];
        icon.copy_from_slice(&raw[start..start + IMAGE_BYTES]);

        let mut message = DecodedMessage {
            icon: Some(icon),
            ..DecodedMessage::default()
        };
        scan_fields(&raw[..text_len], &mut message);
        message
    }
}

/// Route text bytes into fields by delimiter count
fn scan_fields(text: &[u8], message: &mut DecodedMessage) {
    let mut selector: u8 = 0;

    for &byte in text {
        match byte {
            b'|' => {
                selector = selector.saturating_add(1);
                continue;
            }
            b'-' => selector = selector.saturating_add(1),
            _ => {}
        }

        match selector {
            0 => message.next_instruction.push(byte),
            1 => message.direction.push(byte),
            2 | 3 => message.status.push(byte),
            4 => {
                // Leading unit separators from the sender
                if matches!(byte, b' ' | b'-') && message.eta.len() < 2 {
                    continue;
                }
                message.eta.push(byte);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Text followed by an icon whose bytes count up from 1
    fn with_icon<const N: usize>(text: &[u8]) -> Vec<u8, N> {
        let mut raw = Vec::new();
        raw.extend_from_slice(text).unwrap();
        for i in 0..IMAGE_BYTES {
            raw.push((i % 250) as u8 + 1).unwrap();
        }
        raw
    }

    #[test]
    fn test_image_constants() {
        assert_eq!(IMAGE_BYTES, 288);
        assert_eq!(IMAGE_WIDTH * IMAGE_HEIGHT, IMAGE_BYTES * 8);
    }

    #[test]
    fn test_short_message_is_idle() {
        let decoder = MessageDecoder::default();
        let message = decoder.decode(b"Standby State|||\n");
        assert!(message.is_idle());
        assert!(message.next_instruction.is_empty());
        assert!(message.status.is_empty());
    }

    #[test]
    fn test_empty_message_is_idle() {
        assert_eq!(MessageDecoder::default().decode(&[]), DecodedMessage::idle());
    }

    #[test]
    fn test_one_byte_short_is_idle() {
        let raw = [b'x'; IMAGE_BYTES - 1];
        assert!(MessageDecoder::default().decode(&raw).is_idle());
    }

    #[test]
    fn test_delimiter_rules() {
        let raw = with_icon::<400>(b"Turn Left|-Main St|1.2-mi|--- 400 ft");
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);

        assert_eq!(message.next_instruction.as_str(), "Turn Left");
        // "-" right after "|" moves past the direction field
        assert_eq!(message.direction.as_str(), "");
        assert_eq!(message.status.as_str(), "-Main St1.2");
        // "-" opening the ETA field is a leading separator
        assert_eq!(message.eta.as_str(), "mi");
    }

    #[test]
    fn test_dash_joins_next_field() {
        let raw = with_icon::<400>(b"Head north-on Elm");
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);
        assert_eq!(message.next_instruction.as_str(), "Head north");
        assert_eq!(message.direction.as_str(), "-on Elm");
    }

    #[test]
    fn test_phone_notification_layout() {
        let raw = with_icon::<400>(b"Turn right|Main St|5 min | 2.1 km | 10:42 ETA|\n");
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);

        assert_eq!(message.next_instruction.as_str(), "Turn right");
        assert_eq!(message.direction.as_str(), "Main St");
        assert_eq!(message.status.as_str(), "5 min  2.1 km ");
        assert_eq!(message.eta.as_str(), "10:42 ETA");
    }

    #[test]
    fn test_eta_trims_only_leading_separators() {
        let raw = with_icon::<400>(b"a|b|c|d- 1 5 min");
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);
        // The space after "1" is still inside the first two characters
        assert_eq!(message.eta.as_str(), "15 min");
    }

    #[test]
    fn test_eta_keeps_separators_after_two_chars() {
        let raw = with_icon::<400>(b"a|b|c|d|12 km");
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);
        assert_eq!(message.eta.as_str(), "12 km");
    }

    #[test]
    fn test_excess_delimiters_are_discarded() {
        let raw = with_icon::<400>(b"a|b|c|d|e|f|g-h");
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);
        assert_eq!(message.next_instruction.as_str(), "a");
        assert_eq!(message.direction.as_str(), "b");
        assert_eq!(message.status.as_str(), "cd");
        assert_eq!(message.eta.as_str(), "e");
    }

    #[test]
    fn test_long_field_is_truncated() {
        let mut text = [b'x'; MAX_FIELD_LEN + 20];
        text[MAX_FIELD_LEN + 10] = b'|';
        let raw = with_icon::<500>(&text);
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);
        assert_eq!(message.next_instruction.len(), MAX_FIELD_LEN);
        assert_eq!(message.direction.as_str(), "xxxxxxxxx");
    }

    #[test]
    fn test_truncated_utf8_is_dropped() {
        let mut text = [b'a'; MAX_FIELD_LEN + 1];
        // 'é' straddles the field limit
        text[MAX_FIELD_LEN - 1] = 0xC3;
        text[MAX_FIELD_LEN] = 0xA9;
        let raw = with_icon::<500>(&text);
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);
        assert_eq!(message.next_instruction.len(), MAX_FIELD_LEN);
        assert_eq!(message.next_instruction.as_str().len(), MAX_FIELD_LEN - 1);
    }

    #[test]
    fn test_trailing_offset_takes_last_bytes() {
        let raw = with_icon::<400>(b"abc|def");
        let message = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);
        let icon = message.icon.unwrap();
        assert_eq!(&icon[..], &raw[raw.len() - IMAGE_BYTES..]);
    }

    #[test]
    fn test_legacy_offset_starts_one_byte_early() {
        let raw = with_icon::<400>(b"abc|def");
        let message = MessageDecoder::new(BitmapOffset::Legacy).decode(&raw);
        let icon = message.icon.unwrap();
        assert_eq!(icon[0], b'f');
        assert_eq!(&icon[1..], &raw[raw.len() - IMAGE_BYTES..raw.len() - 1]);
        // Text parsing is unaffected by the icon alignment
        assert_eq!(message.direction.as_str(), "def");
    }

    #[test]
    fn test_exact_image_size_has_no_text() {
        let raw = with_icon::<300>(b"");
        for offset in [BitmapOffset::Legacy, BitmapOffset::Trailing] {
            let message = MessageDecoder::new(offset).decode(&raw);
            assert_eq!(&message.icon.unwrap()[..], &raw[..]);
            assert!(message.next_instruction.is_empty());
        }
    }

    #[test]
    fn test_builder_text_survives_printable_icon() {
        use crate::packet::MessageBuilder;

        let mut icon = [0u8; IMAGE_BYTES];
        // Printable and a selector byte, neither may leak into the text
        icon[0] = b'A';
        icon[1] = b'|';
        icon[IMAGE_BYTES - 1] = 0x01;

        let raw = MessageBuilder::<400>::new()
            .text("Turn left", "Main St", "5 min")
            .unwrap()
            .icon(&icon)
            .unwrap()
            .finish();

        for offset in [BitmapOffset::Legacy, BitmapOffset::Trailing] {
            let message = MessageDecoder::new(offset).decode(&raw);
            assert_eq!(message.next_instruction.as_str(), "Turn left");
            assert_eq!(message.direction.as_str(), "Main St");
            assert_eq!(message.status.as_str(), "5 min\n");
            assert!(message.eta.is_empty());
        }

        let trailing = MessageDecoder::new(BitmapOffset::Trailing).decode(&raw);
        assert_eq!(trailing.icon, Some(icon));

        let legacy = MessageDecoder::new(BitmapOffset::Legacy).decode(&raw);
        let shifted = legacy.icon.unwrap();
        assert_eq!(shifted[0], b'\n');
        assert_eq!(&shifted[1..], &icon[..IMAGE_BYTES - 1]);
    }
}
