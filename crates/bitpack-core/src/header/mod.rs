//! Header variants and the factory that picks/detects between them.

pub mod compact;
pub mod standard;

use std::time::Instant;

pub use compact::CompactHeader;
pub use standard::StandardHeader;

use crate::enums::{MessageType, PacketMode, SecurityMode};
use crate::error::CodecError;
use crate::flags::PacketFlags;

/// Capabilities common to both header variants.
///
/// Rust has no struct inheritance; this trait is the interface spec.md
/// describes as shared by `CompactHeader` and `StandardHeader`, and
/// [`Header`] (the tagged sum of the two) forwards to whichever variant it
/// holds.
pub trait HeaderVariant {
    /// Which wire variant this header is.
    fn mode(&self) -> PacketMode;
    /// The message type carried in this header.
    fn message_type(&self) -> MessageType;
    /// Flags carried in this header.
    fn flags(&self) -> PacketFlags;
    /// Remaining relay hops.
    fn ttl(&self) -> u16;
    /// The message identifier (widened to `u32` for a uniform interface;
    /// Compact's is a `u16` subset).
    fn message_id(&self) -> u32;
    /// Serialized size of this header in bytes.
    fn size_in_bytes(&self) -> usize;
    /// Whether this packet should be dropped rather than relayed, as of
    /// `now`.
    fn is_expired(&self, now: Instant) -> bool;
    /// Relay-forwarding check as of `now`, naming which limit was hit.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::HopLimitReached`] if the hop count reached
    /// zero, or [`CodecError::AgeLimitReached`] if the accumulated age
    /// reached the 24h cap.
    fn check_relay(&self, now: Instant) -> Result<(), CodecError>;
    /// Serialize this header to its wire bytes.
    fn encode(&self) -> Vec<u8>;
}

/// A decoded header of either variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    /// 4-byte header.
    Compact(CompactHeader),
    /// 11-byte header.
    Standard(StandardHeader),
}

impl HeaderVariant for Header {
    fn mode(&self) -> PacketMode {
        match self {
            Self::Compact(h) => h.mode(),
            Self::Standard(h) => h.mode(),
        }
    }

    fn message_type(&self) -> MessageType {
        match self {
            Self::Compact(h) => h.message_type(),
            Self::Standard(h) => h.message_type(),
        }
    }

    fn flags(&self) -> PacketFlags {
        match self {
            Self::Compact(h) => h.flags(),
            Self::Standard(h) => h.flags(),
        }
    }

    fn ttl(&self) -> u16 {
        match self {
            Self::Compact(h) => h.ttl(),
            Self::Standard(h) => h.ttl(),
        }
    }

    fn message_id(&self) -> u32 {
        match self {
            Self::Compact(h) => h.message_id(),
            Self::Standard(h) => h.message_id(),
        }
    }

    fn size_in_bytes(&self) -> usize {
        match self {
            Self::Compact(h) => h.size_in_bytes(),
            Self::Standard(h) => h.size_in_bytes(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        match self {
            Self::Compact(h) => h.is_expired(now),
            Self::Standard(h) => h.is_expired(now),
        }
    }

    fn check_relay(&self, now: Instant) -> Result<(), CodecError> {
        match self {
            Self::Compact(h) => h.check_relay(now),
            Self::Standard(h) => h.check_relay(now),
        }
    }

    fn encode(&self) -> Vec<u8> {
        match self {
            Self::Compact(h) => h.encode(),
            Self::Standard(h) => h.encode(),
        }
    }
}

/// Fields a caller supplies to [`HeaderFactory::create_auto`]; which
/// variant gets built is derived from these, not chosen by the caller.
#[derive(Debug, Clone, Copy)]
pub struct AutoHeaderFields {
    /// Message type to encode.
    pub message_type: MessageType,
    /// Flags to encode.
    pub flags: PacketFlags,
    /// Relay hop count.
    pub ttl: u16,
    /// Message identifier.
    pub message_id: u32,
    /// Security mode applied to the payload.
    pub security_mode: SecurityMode,
    /// Length in bytes of the (possibly encrypted) payload region.
    pub payload_length: u16,
    /// Accumulated age in minutes.
    pub age_minutes: u16,
    /// Force Standard mode even if Compact would otherwise suffice.
    pub force_standard: bool,
}

/// Detects and builds header variants.
pub struct HeaderFactory;

impl HeaderFactory {
    /// Largest payload length the auto-selector tolerates before forcing
    /// Standard mode.
    pub const MAX_COMPACT_PAYLOAD: u16 = 15;

    /// Read the mode bit out of a header's first byte without decoding the
    /// rest.
    #[must_use]
    pub fn detect_mode(byte0: u8) -> PacketMode {
        PacketMode::detect(byte0)
    }

    /// Whether `buf` is long enough to hold a complete header of the mode
    /// its first byte indicates.
    #[must_use]
    pub fn has_complete_header(buf: &[u8]) -> bool {
        let Some(&byte0) = buf.first() else { return false };
        match Self::detect_mode(byte0) {
            PacketMode::Compact => buf.len() >= CompactHeader::SIZE,
            PacketMode::Standard => buf.len() >= StandardHeader::SIZE,
        }
    }

    /// Decode a header of whichever mode byte 0 indicates, returning the
    /// header and the remaining bytes (which begin with the payload
    /// region and, for an encoded `Packet`, end with the trailing CRC
    /// byte).
    ///
    /// # Errors
    ///
    /// Propagates [`CodecError::InsufficientData`], [`CodecError::UnknownType`],
    /// or [`CodecError::UnknownSecurityMode`] from the selected variant's
    /// decoder.
    pub fn decode_with_payload(buf: &[u8]) -> Result<(Header, &[u8]), CodecError> {
        let byte0 = *buf.first().ok_or(CodecError::InsufficientData { needed: 1, available: 0 })?;
        match Self::detect_mode(byte0) {
            PacketMode::Compact => {
                let header = CompactHeader::decode(buf)?;
                let rest = &buf[CompactHeader::SIZE..];
                Ok((Header::Compact(header), rest))
            }
            PacketMode::Standard => {
                let header = StandardHeader::decode(buf)?;
                let rest = &buf[StandardHeader::SIZE..];
                Ok((Header::Standard(header), rest))
            }
        }
    }

    /// Build whichever header variant can losslessly carry `fields`,
    /// preferring the smaller Compact header.
    ///
    /// Standard is forced when any of: the message type requires it
    /// ([`MessageType::requires_standard_mode`]), `security_mode` is not
    /// [`SecurityMode::None`], either fragmentation flag is set,
    /// `payload_length` exceeds [`HeaderFactory::MAX_COMPACT_PAYLOAD`],
    /// `age_minutes` is nonzero, `message_id` exceeds `u16::MAX`, `ttl`
    /// exceeds [`CompactHeader::MAX_TTL`], or `fields.force_standard` is
    /// set.
    ///
    /// # Errors
    ///
    /// Propagates [`CodecError::ArgumentOutOfRange`] from the selected
    /// variant's constructor (e.g. `ttl` exceeding [`StandardHeader::MAX_HOP_TTL`]
    /// once widened).
    pub fn create_auto(fields: AutoHeaderFields) -> Result<Header, CodecError> {
        let needs_standard = fields.message_type.requires_standard_mode()
            || fields.security_mode != SecurityMode::None
            || fields.flags.is_fragment
            || fields.flags.more_fragments
            || fields.payload_length > Self::MAX_COMPACT_PAYLOAD
            || fields.age_minutes > 0
            || fields.message_id > u32::from(u16::MAX)
            || fields.ttl > u16::from(CompactHeader::MAX_TTL)
            || fields.force_standard;

        if needs_standard {
            let hop_ttl = u8::try_from(fields.ttl).unwrap_or(StandardHeader::MAX_HOP_TTL);
            let header = StandardHeader::new(
                0,
                fields.message_type,
                fields.flags,
                hop_ttl,
                fields.message_id,
                fields.security_mode,
                fields.payload_length,
                fields.age_minutes,
            )?;
            Ok(Header::Standard(header))
        } else {
            let header = CompactHeader::new(
                fields.message_type,
                fields.flags,
                fields.ttl as u8,
                fields.message_id as u16,
            )?;
            Ok(Header::Compact(header))
        }
    }
}
