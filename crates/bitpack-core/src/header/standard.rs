//! The 11-byte Standard header.
//!
//! ```text
//! byte0:   [MODE=1|VERSION(1)|TYPE(6)]
//! byte1:   FLAGS (8 bits)
//! byte2:   HOP_TTL
//! byte3-6: MESSAGE_ID (u32 BE)
//! byte7:   [SEC_MODE(3)|PAYLOAD_LEN_HI(5)]
//! byte8:   PAYLOAD_LEN_LO
//! byte9-10: AGE_MINUTES (u16 BE)
//! ```

use std::time::Instant;

use crate::bitwise;
use crate::enums::{MessageType, PacketMode, SecurityMode};
use crate::error::CodecError;
use crate::flags::PacketFlags;
use crate::header::HeaderVariant;

/// An 11-byte header, used whenever a packet's fields don't fit Compact's
/// narrower domains (see [`crate::header::HeaderFactory::create_auto`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardHeader {
    version: u8,
    message_type: MessageType,
    flags: PacketFlags,
    hop_ttl: u8,
    message_id: u32,
    security_mode: SecurityMode,
    payload_length: u16,
    age_minutes: u16,
    received_at: Option<Instant>,
}

impl StandardHeader {
    /// Serialized size in bytes.
    pub const SIZE: usize = 11;
    /// Largest value `hop_ttl` may hold.
    pub const MAX_HOP_TTL: u8 = 255;
    /// Hop count a freshly built packet should start with, absent other
    /// guidance.
    pub const DEFAULT_HOP_TTL: u8 = 7;
    /// Largest value `payload_length` may hold (13 bits).
    pub const MAX_PAYLOAD_LEN: u16 = 8191;
    /// Largest value `age_minutes` may hold.
    pub const MAX_AGE_MINUTES: u16 = 65535;
    /// Accumulated age at or beyond which a packet is expired.
    pub const EXPIRY_THRESHOLD_MINUTES: u16 = 24 * 60;

    /// Build a new Standard header. `received_at` starts unset; call
    /// [`StandardHeader::mark_received`] after accepting the packet off
    /// the wire.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `version` is not `0`
    /// or `1`, or if `payload_length`/`age_minutes` exceed their documented
    /// maxima.
    pub fn new(
        version: u8,
        message_type: MessageType,
        flags: PacketFlags,
        hop_ttl: u8,
        message_id: u32,
        security_mode: SecurityMode,
        payload_length: u16,
        age_minutes: u16,
    ) -> Result<Self, CodecError> {
        if version > 1 {
            return Err(CodecError::ArgumentOutOfRange {
                field: "version",
                value: i64::from(version),
                expected: "0 or 1",
            });
        }
        if payload_length > Self::MAX_PAYLOAD_LEN {
            return Err(CodecError::ArgumentOutOfRange {
                field: "payload_length",
                value: i64::from(payload_length),
                expected: "0..=8191",
            });
        }
        Ok(Self {
            version,
            message_type,
            flags,
            hop_ttl,
            message_id,
            security_mode,
            payload_length,
            age_minutes,
            received_at: None,
        })
    }

    /// Decode a Standard header from the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is shorter than
    /// [`StandardHeader::SIZE`], [`CodecError::InvalidMode`] if bit 7 of
    /// byte 0 is clear, [`CodecError::UnknownType`] if the type code has no
    /// mapping, or [`CodecError::UnknownSecurityMode`] if the security code
    /// has no mapping.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < Self::SIZE {
            return Err(CodecError::InsufficientData { needed: Self::SIZE, available: buf.len() });
        }
        let byte0 = buf[0];
        let mode = PacketMode::detect(byte0);
        if mode != PacketMode::Standard {
            return Err(CodecError::InvalidMode { expected: PacketMode::Standard, actual: mode });
        }
        let version = (byte0 >> 6) & 0x01;
        let message_type = MessageType::from_code(byte0 & 0x3F)?;
        let flags = PacketFlags::from_standard_byte(buf[1]);
        let hop_ttl = buf[2];
        let message_id = bitwise::read32_be(buf, 3)?;
        let byte7 = buf[7];
        let security_mode = SecurityMode::from_code((byte7 >> 5) & 0x07)?;
        let payload_length = (u16::from(byte7 & 0x1F) << 8) | u16::from(buf[8]);
        let age_minutes = bitwise::read16_be(buf, 9)?;
        Ok(Self {
            version,
            message_type,
            flags,
            hop_ttl,
            message_id,
            security_mode,
            payload_length,
            age_minutes,
            received_at: None,
        })
    }

    /// Record when the local node accepted this packet. `receivedAt` is
    /// write-once: later calls are ignored once set, matching the
    /// decode-then-freeze lifecycle in the data model.
    pub fn mark_received(&mut self, at: Instant) {
        if self.received_at.is_none() {
            self.received_at = Some(at);
        }
    }

    /// Whether [`StandardHeader::mark_received`] has been called.
    #[must_use]
    pub fn received_at(&self) -> Option<Instant> {
        self.received_at
    }

    /// Accumulated age at `now`, clamped to
    /// [`StandardHeader::MAX_AGE_MINUTES`]. If `mark_received` was never
    /// called, this is just the wire `age_minutes` unchanged. A `now`
    /// earlier than `received_at` (a backward clock jump) contributes zero
    /// rather than underflowing.
    #[must_use]
    pub fn current_age_minutes(&self, now: Instant) -> u16 {
        let elapsed_minutes = match self.received_at {
            Some(received_at) if now > received_at => {
                let elapsed_secs = now.duration_since(received_at).as_secs();
                u16::try_from(elapsed_secs / 60).unwrap_or(u16::MAX)
            }
            _ => 0,
        };
        self.age_minutes.saturating_add(elapsed_minutes).min(Self::MAX_AGE_MINUTES)
    }

    /// The declared payload length in bytes (0..=8191).
    #[must_use]
    pub fn payload_length(&self) -> u16 {
        self.payload_length
    }

    /// Which AEAD cipher (if any) wraps the payload.
    #[must_use]
    pub fn security_mode(&self) -> SecurityMode {
        self.security_mode
    }

    /// Protocol version (`0` or `1`).
    #[must_use]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Wire `age_minutes` as last decoded, before any local accumulation.
    #[must_use]
    pub fn age_minutes(&self) -> u16 {
        self.age_minutes
    }
}

impl HeaderVariant for StandardHeader {
    fn mode(&self) -> PacketMode {
        PacketMode::Standard
    }

    fn message_type(&self) -> MessageType {
        self.message_type
    }

    fn flags(&self) -> PacketFlags {
        self.flags
    }

    fn ttl(&self) -> u16 {
        u16::from(self.hop_ttl)
    }

    fn message_id(&self) -> u32 {
        self.message_id
    }

    fn size_in_bytes(&self) -> usize {
        Self::SIZE
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.check_relay(now).is_err()
    }

    fn check_relay(&self, now: Instant) -> Result<(), CodecError> {
        if self.hop_ttl == 0 {
            return Err(CodecError::HopLimitReached);
        }
        let current = self.current_age_minutes(now);
        if current >= Self::EXPIRY_THRESHOLD_MINUTES {
            return Err(CodecError::AgeLimitReached { current, max: Self::EXPIRY_THRESHOLD_MINUTES });
        }
        Ok(())
    }

    fn encode(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        out[0] = 0x80 | (self.version << 6) | (self.message_type.to_code() & 0x3F);
        out[1] = self.flags.to_standard_byte();
        out[2] = self.hop_ttl;
        out[3..7].copy_from_slice(&self.message_id.to_be_bytes());
        out[7] = (self.security_mode.to_code() << 5) | ((self.payload_length >> 8) as u8 & 0x1F);
        out[8] = (self.payload_length & 0xFF) as u8;
        out[9..11].copy_from_slice(&self.age_minutes.to_be_bytes());
        out
    }
}
