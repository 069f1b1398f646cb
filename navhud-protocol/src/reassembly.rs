//! Chunk reassembly
//!
//! Rebuilds one message from the chunk packets of a transfer session. There
//! is at most one session at a time; it is identified only by being the one
//! currently in progress.
//!
//! - The first packet of an idle reassembler fixes the chunk count.
//! - A packet disagreeing with that count, or indexing past it, discards
//!   the whole session.
//! - Re-delivered chunks are ignored, so senders may retransmit freely and
//!   chunks may arrive in any order.
//! - A session idle for longer than the configured timeout is dropped by
//!   [`ChunkReassembler::tick`].

use crate::packet::{ChunkPacket, CHUNK_CAPACITY, MAX_CHUNKS};

/// Largest message a full-size arena can hold
pub const MAX_MESSAGE_LEN: usize = MAX_CHUNKS * CHUNK_CAPACITY;

/// Default idle time before a stalled session is dropped
pub const DEFAULT_SESSION_TIMEOUT_MS: u32 = 3000;

/// Result of feeding one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionOutcome<'a> {
    /// More chunks are needed (or the packet was ignored)
    Incomplete,
    /// Every chunk arrived; the trimmed message
    Completed(&'a [u8]),
    /// The packet contradicted the session, which was discarded
    Reset,
}

/// One bit per chunk index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ReceivedMask([u64; 4]);

impl ReceivedMask {
    const fn new() -> Self {
        Self([0; 4])
    }

    fn contains(&self, index: u8) -> bool {
        self.0[index as usize / 64] & (1 << (index % 64)) != 0
    }

    fn insert(&mut self, index: u8) {
        self.0[index as usize / 64] |= 1 << (index % 64);
    }

    fn count(&self) -> u32 {
        self.0.iter().map(|word| word.count_ones()).sum()
    }

    /// All of `0..expected` present
    fn is_full(&self, expected: u8) -> bool {
        (0..expected).all(|index| self.contains(index))
    }

    fn clear(&mut self) {
        self.0 = [0; 4];
    }
}

/// Reassembles chunk packets into a contiguous message
///
/// `N` is the arena size in bytes. Sessions whose chunk count would not fit
/// (`total * 18 > N`) are refused with [`SessionOutcome::Reset`].
#[derive(Debug, Clone)]
pub struct ChunkReassembler<const N: usize = MAX_MESSAGE_LEN> {
    buffer: [u8; N],
    received: ReceivedMask,
    expected_chunks: u8,
    /// Payload length of the terminal chunk, once received
    tail_len: usize,
    active: bool,
    last_activity_ms: u32,
    timeout_ms: u32,
}

impl<const N: usize> Default for ChunkReassembler<N> {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TIMEOUT_MS)
    }
}

impl<const N: usize> ChunkReassembler<N> {
    /// Create an idle reassembler
    ///
    /// `timeout_ms` is how long a session may go without an accepted packet
    /// before [`tick`](Self::tick) drops it.
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            buffer: [0; N],
            received: ReceivedMask::new(),
            expected_chunks: 0,
            tail_len: 0,
            active: false,
            last_activity_ms: 0,
            timeout_ms,
        }
    }

    /// Whether a session is in progress
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Chunk count of the current session
    pub fn expected_chunks(&self) -> Option<u8> {
        self.active.then_some(self.expected_chunks)
    }

    /// Distinct chunks received in the current session
    pub fn received_chunks(&self) -> u8 {
        self.received.count() as u8
    }

    /// Idle threshold for stalled sessions
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Change the idle threshold
    pub fn set_timeout_ms(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }

    /// Discard any session in progress
    pub fn reset(&mut self) {
        self.received.clear();
        self.expected_chunks = 0;
        self.tail_len = 0;
        self.active = false;
    }

    /// Feed one raw characteristic write
    ///
    /// Writes shorter than the 2-byte header cannot be attributed to a
    /// session and are ignored.
    pub fn ingest(&mut self, bytes: &[u8], now_ms: u32) -> SessionOutcome<'_> {
        match ChunkPacket::parse(bytes) {
            Ok(packet) => self.ingest_packet(&packet, now_ms),
            Err(_) => SessionOutcome::Incomplete,
        }
    }

    /// Feed one parsed packet
    pub fn ingest_packet(&mut self, packet: &ChunkPacket<'_>, now_ms: u32) -> SessionOutcome<'_> {
        if !self.active {
            if packet.total as usize * CHUNK_CAPACITY > N {
                return SessionOutcome::Reset;
            }
            self.start(packet.total);
        }

        if packet.total != self.expected_chunks || packet.index >= self.expected_chunks {
            self.reset();
            return SessionOutcome::Reset;
        }

        self.last_activity_ms = now_ms;

        if self.received.contains(packet.index) {
            return SessionOutcome::Incomplete;
        }

        // Index and payload length are both validated, so the write stays
        // inside the session's slice of the arena
        let offset = packet.index as usize * CHUNK_CAPACITY;
        let payload = &packet.payload[..packet.payload.len().min(CHUNK_CAPACITY)];
        self.buffer[offset..offset + payload.len()].copy_from_slice(payload);
        self.received.insert(packet.index);

        if packet.is_last() {
            self.tail_len = payload.len();
        }

        if !self.received.is_full(self.expected_chunks) {
            return SessionOutcome::Incomplete;
        }

        let len = (self.expected_chunks as usize - 1) * CHUNK_CAPACITY + self.tail_len;
        self.reset();
        SessionOutcome::Completed(&self.buffer[..len])
    }

    /// Drop the session if it has been idle past the timeout
    ///
    /// Returns true when a session was dropped. Timestamps may wrap.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if !self.active {
            return false;
        }

        if now_ms.wrapping_sub(self.last_activity_ms) < self.timeout_ms {
            return false;
        }

        self.reset();
        true
    }

    fn start(&mut self, total: u8) {
        self.received.clear();
        self.expected_chunks = total;
        self.tail_len = 0;
        self.active = true;
        self.buffer[..total as usize * CHUNK_CAPACITY].fill(0);
    }
}
