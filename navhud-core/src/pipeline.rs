//! Receive pipeline
//!
//! Glues the chunk reassembler and the message decoder together so the
//! firmware only has to hand over characteristic writes and clock ticks.
//! One pipeline owns the only reassembly session; it is not shared between
//! tasks.

use navhud_protocol::{
    ChunkPacket, ChunkReassembler, DecodedMessage, MessageDecoder, SessionOutcome,
    MAX_MESSAGE_LEN,
};

use crate::config::HudConfig;

/// What one packet did to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PipelineEvent {
    /// Too short to carry a chunk header; nothing changed
    Dropped,
    /// Session in progress
    Pending { received: u8, expected: u8 },
    /// Packet contradicted the session, which was discarded
    Reset,
    /// A message completed and was decoded
    Message(DecodedMessage),
}

/// Counters for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipelineStats {
    /// Packets offered, including dropped ones
    pub packets: u32,
    /// Packets too short to parse
    pub dropped: u32,
    /// Sessions discarded by a contradicting packet
    pub resets: u32,
    /// Sessions discarded by the idle timeout
    pub stalled: u32,
    /// Messages completed
    pub messages: u32,
}

/// Reassembly plus decoding, with counters
pub struct NavPipeline<const N: usize = MAX_MESSAGE_LEN> {
    reassembler: ChunkReassembler<N>,
    decoder: MessageDecoder,
    stats: PipelineStats,
}

impl<const N: usize> NavPipeline<N> {
    /// Create a pipeline with explicit settings
    pub const fn new(decoder: MessageDecoder, session_timeout_ms: u32) -> Self {
        Self {
            reassembler: ChunkReassembler::new(session_timeout_ms),
            decoder,
            stats: PipelineStats {
                packets: 0,
                dropped: 0,
                resets: 0,
                stalled: 0,
                messages: 0,
            },
        }
    }

    /// Create a pipeline from the firmware configuration
    pub fn from_config(config: &HudConfig) -> Self {
        Self::new(
            MessageDecoder::new(config.decoder.bitmap_offset),
            config.link.session_timeout_ms,
        )
    }

    /// Handle one characteristic write
    pub fn on_packet(&mut self, bytes: &[u8], now_ms: u32) -> PipelineEvent {
        self.stats.packets = self.stats.packets.wrapping_add(1);

        let Ok(packet) = ChunkPacket::parse(bytes) else {
            self.stats.dropped = self.stats.dropped.wrapping_add(1);
            return PipelineEvent::Dropped;
        };

        match self.reassembler.ingest_packet(&packet, now_ms) {
            SessionOutcome::Completed(message) => {
                self.stats.messages = self.stats.messages.wrapping_add(1);
                PipelineEvent::Message(self.decoder.decode(message))
            }
            SessionOutcome::Reset => {
                self.stats.resets = self.stats.resets.wrapping_add(1);
                PipelineEvent::Reset
            }
            SessionOutcome::Incomplete => PipelineEvent::Pending {
                received: self.reassembler.received_chunks(),
                expected: self.reassembler.expected_chunks().unwrap_or(0),
            },
        }
    }

    /// Drop a stalled session; true when one was dropped
    pub fn on_tick(&mut self, now_ms: u32) -> bool {
        let dropped = self.reassembler.tick(now_ms);
        if dropped {
            self.stats.stalled = self.stats.stalled.wrapping_add(1);
        }
        dropped
    }

    /// Abandon any partial transfer (e.g. the phone disconnected)
    pub fn abort(&mut self) {
        self.reassembler.reset();
    }

    /// Whether a transfer is in progress
    pub fn in_transfer(&self) -> bool {
        self.reassembler.is_active()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }
}

impl<const N: usize> Default for NavPipeline<N> {
    fn default() -> Self {
        Self::from_config(&HudConfig::default())
    }
}
