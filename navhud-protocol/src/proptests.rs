//! Property-based tests for the transfer pipeline
//!
//! - Delivery order and retransmission never change the reassembled message
//! - Decoding arbitrary bytes never panics and respects field limits
//! - The frame parser survives arbitrary line noise

use proptest::prelude::*;
use std::vec::Vec;

use crate::decode::{BitmapOffset, MessageDecoder, IMAGE_BYTES, MAX_FIELD_LEN};
use crate::frame::FrameParser;
use crate::packet::{split_message, ChunkPacket, CHUNK_CAPACITY};
use crate::reassembly::{ChunkReassembler, SessionOutcome, MAX_MESSAGE_LEN};

/// A message plus a random delivery order of its chunks
fn message_and_order() -> impl Strategy<Value = (Vec<u8>, Vec<usize>)> {
    prop::collection::vec(any::<u8>(), 1..700).prop_flat_map(|data| {
        let chunks = data.len().div_ceil(CHUNK_CAPACITY);
        let order: Vec<usize> = (0..chunks).collect();
        (Just(data), Just(order).prop_shuffle())
    })
}

proptest! {
    /// Any permutation of the chunks rebuilds the original message.
    #[test]
    fn any_order_rebuilds_message((data, order) in message_and_order()) {
        let packets: Vec<ChunkPacket<'_>> = split_message(&data).unwrap().collect();
        let mut reassembler = ChunkReassembler::<MAX_MESSAGE_LEN>::default();
        let mut completed = None;

        for (n, &i) in order.iter().enumerate() {
            match reassembler.ingest_packet(&packets[i], 0) {
                SessionOutcome::Completed(raw) => {
                    prop_assert_eq!(n, order.len() - 1);
                    completed = Some(raw.to_vec());
                }
                SessionOutcome::Incomplete => prop_assert!(n < order.len() - 1),
                SessionOutcome::Reset => prop_assert!(false, "unexpected reset"),
            }
        }

        prop_assert_eq!(completed, Some(data));
    }

    /// Re-sending every chunk right after it was first sent completes once,
    /// with the same bytes.
    #[test]
    fn retransmissions_are_harmless((data, order) in message_and_order()) {
        let packets: Vec<ChunkPacket<'_>> = split_message(&data).unwrap().collect();
        let mut reassembler = ChunkReassembler::<MAX_MESSAGE_LEN>::default();

        for (n, &i) in order.iter().enumerate() {
            let first = reassembler.ingest_packet(&packets[i], 0);
            if n == order.len() - 1 {
                match first {
                    SessionOutcome::Completed(raw) => prop_assert_eq!(raw, &data[..]),
                    other => prop_assert!(false, "expected completion, got {:?}", other),
                }
                break;
            }
            prop_assert_eq!(first, SessionOutcome::Incomplete);

            let again = reassembler.ingest_packet(&packets[i], 0);
            prop_assert_eq!(again, SessionOutcome::Incomplete);
            prop_assert_eq!(reassembler.received_chunks() as usize, n + 1);
        }
    }

    /// Decoding never panics; the icon is present exactly for long messages.
    #[test]
    fn decode_is_total(
        raw in prop::collection::vec(any::<u8>(), 0..1000),
        trailing in any::<bool>(),
    ) {
        let offset = if trailing { BitmapOffset::Trailing } else { BitmapOffset::Legacy };
        let message = MessageDecoder::new(offset).decode(&raw);

        prop_assert_eq!(message.icon.is_some(), raw.len() >= IMAGE_BYTES);
        let fields = [&message.next_instruction, &message.direction, &message.status, &message.eta];
        for field in fields {
            prop_assert!(field.len() <= MAX_FIELD_LEN);
            prop_assert!(field.as_str().len() <= field.len());
        }
    }

    /// Short messages never produce text, whatever they contain.
    #[test]
    fn short_messages_are_idle(raw in prop::collection::vec(any::<u8>(), 0..IMAGE_BYTES)) {
        let message = MessageDecoder::default().decode(&raw);
        prop_assert!(message.is_idle());
        prop_assert!(message.next_instruction.is_empty());
    }

    /// Arbitrary bytes never panic the frame parser.
    #[test]
    fn frame_parser_survives_noise(noise in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut parser = FrameParser::new();
        for byte in noise {
            let _ = parser.feed(byte);
        }
    }
}
