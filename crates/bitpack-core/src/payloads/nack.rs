//! Selective negative-acknowledgment payload.
//!
//! ```text
//! msgId(u32) | blockCount(u8) | block[]
//! ```
//!
//! Each block packs `startIndex(u12) | bitmask(u12)` into 3 bytes. Bit `k`
//! of a block's bitmask set means fragment `startIndex + k` is missing.

use crate::error::CodecError;

/// Largest `startIndex` a block can carry (12 bits).
pub const MAX_START_INDEX: u16 = 4095;
/// Largest `bitmask` a block can carry (12 bits).
pub const MAX_BITMASK: u16 = 0xFFF;
/// Largest number of blocks a single NACK can carry.
pub const MAX_BLOCKS: usize = 8;
/// Number of consecutive fragment indices one block's bitmask spans.
pub const BLOCK_SPAN: u16 = 12;

/// One contiguous run of up to 12 fragment indices, some of which are
/// missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NackBlock {
    start_index: u16,
    bitmask: u16,
}

impl NackBlock {
    /// Build a block directly from its wire fields.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `start_index` exceeds
    /// [`MAX_START_INDEX`] or `bitmask` exceeds [`MAX_BITMASK`].
    pub fn new(start_index: u16, bitmask: u16) -> Result<Self, CodecError> {
        if start_index > MAX_START_INDEX {
            return Err(CodecError::ArgumentOutOfRange {
                field: "start_index",
                value: i64::from(start_index),
                expected: "0..=4095",
            });
        }
        if bitmask > MAX_BITMASK {
            return Err(CodecError::ArgumentOutOfRange {
                field: "bitmask",
                value: i64::from(bitmask),
                expected: "0..=0xFFF",
            });
        }
        Ok(Self { start_index, bitmask })
    }

    /// First fragment index this block covers.
    #[must_use]
    pub fn start_index(&self) -> u16 {
        self.start_index
    }

    /// 12-bit missing-fragment bitmask, relative to `start_index`.
    #[must_use]
    pub fn bitmask(&self) -> u16 {
        self.bitmask
    }

    /// Fragment indices this block reports missing.
    fn missing_indices(&self) -> impl Iterator<Item = u32> + '_ {
        (0..12).filter(move |k| self.bitmask & (1 << k) != 0).map(|k| u32::from(self.start_index) + k)
    }

    fn encode(&self, out: &mut Vec<u8>) {
        let packed: u32 = (u32::from(self.start_index) << 12) | u32::from(self.bitmask);
        out.push((packed >> 16) as u8);
        out.push((packed >> 8) as u8);
        out.push(packed as u8);
    }

    fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < 3 {
            return Err(CodecError::InsufficientData { needed: 3, available: buf.len() });
        }
        let packed = (u32::from(buf[0]) << 16) | (u32::from(buf[1]) << 8) | u32::from(buf[2]);
        let start_index = ((packed >> 12) & 0xFFF) as u16;
        let bitmask = (packed & 0xFFF) as u16;
        Self::new(start_index, bitmask)
    }
}

/// A selective NACK requesting retransmission of specific missing
/// fragments of message `message_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NackPayload {
    message_id: u32,
    blocks: Vec<NackBlock>,
}

impl NackPayload {
    /// Build from explicit blocks.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `blocks` is empty or
    /// exceeds [`MAX_BLOCKS`].
    pub fn new(message_id: u32, blocks: Vec<NackBlock>) -> Result<Self, CodecError> {
        if blocks.is_empty() || blocks.len() > MAX_BLOCKS {
            return Err(CodecError::ArgumentOutOfRange {
                field: "blocks",
                value: blocks.len() as i64,
                expected: "1..=8",
            });
        }
        Ok(Self { message_id, blocks })
    }

    /// Greedily pack a set of missing fragment indices into as few blocks
    /// as possible: indices are sorted, and a block accumulates
    /// consecutive-enough indices (within [`BLOCK_SPAN`] of its start)
    /// before a new block begins. Indices beyond [`MAX_START_INDEX`] are
    /// silently dropped (unrepresentable on the wire); if more than
    /// [`MAX_BLOCKS`] blocks would be needed, the earliest indices are
    /// kept and the remainder dropped.
    #[must_use]
    pub fn from_missing_indices(message_id: u32, indices: &[u32]) -> Self {
        let mut sorted: Vec<u32> = indices
            .iter()
            .copied()
            .filter(|&index| index <= u32::from(MAX_START_INDEX))
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut blocks = Vec::new();
        let mut iter = sorted.into_iter().peekable();
        while let Some(start) = iter.next() {
            if blocks.len() == MAX_BLOCKS {
                break;
            }
            let mut bitmask: u16 = 1;
            while let Some(&next) = iter.peek() {
                if next > start + u32::from(BLOCK_SPAN) - 1 {
                    break;
                }
                bitmask |= 1 << (next - start);
                iter.next();
            }
            blocks.push(
                NackBlock::new(start as u16, bitmask)
                    .unwrap_or_else(|_| unreachable!("start/bitmask are constructed within range")),
            );
        }

        Self { message_id, blocks }
    }

    /// The message these NACKs refer to.
    #[must_use]
    pub fn message_id(&self) -> u32 {
        self.message_id
    }

    /// The packed blocks.
    #[must_use]
    pub fn blocks(&self) -> &[NackBlock] {
        &self.blocks
    }

    /// All fragment indices reported missing across every block, sorted
    /// ascending.
    #[must_use]
    pub fn missing_indices(&self) -> Vec<u32> {
        let mut indices: Vec<u32> = self.blocks.iter().flat_map(NackBlock::missing_indices).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Serialized size in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        5 + 3 * self.blocks.len()
    }

    /// Encode to the wire representation.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_in_bytes());
        out.extend_from_slice(&self.message_id.to_be_bytes());
        out.push(self.blocks.len() as u8);
        for block in &self.blocks {
            block.encode(&mut out);
        }
        out
    }

    /// Decode a NACK payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is shorter than
    /// the 5-byte prefix or than `blockCount * 3` bytes, or
    /// [`CodecError::ArgumentOutOfRange`] if `blockCount` is `0` or
    /// exceeds [`MAX_BLOCKS`].
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < 5 {
            return Err(CodecError::InsufficientData { needed: 5, available: buf.len() });
        }
        let message_id = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        let block_count = buf[4] as usize;
        if block_count == 0 || block_count > MAX_BLOCKS {
            return Err(CodecError::ArgumentOutOfRange {
                field: "block_count",
                value: block_count as i64,
                expected: "1..=8",
            });
        }
        let needed = 5 + 3 * block_count;
        if buf.len() < needed {
            return Err(CodecError::InsufficientData { needed, available: buf.len() });
        }
        let mut blocks = Vec::with_capacity(block_count);
        for i in 0..block_count {
            let offset = 5 + 3 * i;
            blocks.push(NackBlock::decode(&buf[offset..offset + 3])?);
        }
        Ok(Self { message_id, blocks })
    }
}
