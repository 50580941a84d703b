//! The 4-byte Compact header.
//!
//! ```text
//! byte0: [MODE=0|TYPE(4)|mesh|ackReq|encrypted]
//! byte1: [TTL(4)|compressed|urgent|reserved(2)]
//! byte2-3: MESSAGE_ID (u16 BE)
//! ```

use crate::bitwise;
use crate::enums::{MessageType, PacketMode};
use crate::error::CodecError;
use crate::flags::PacketFlags;
use crate::header::HeaderVariant;

/// A 4-byte header: the common case for Compact-eligible packets on a
/// BLE 4.2 link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactHeader {
    message_type: MessageType,
    flags: PacketFlags,
    ttl: u8,
    message_id: u16,
}

impl CompactHeader {
    /// Serialized size in bytes.
    pub const SIZE: usize = 4;
    /// Largest value `ttl` may hold (4 bits).
    pub const MAX_TTL: u8 = 15;

    /// Build a new Compact header.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `ttl` exceeds
    /// [`CompactHeader::MAX_TTL`], or if `message_type` requires Standard
    /// mode.
    pub fn new(message_type: MessageType, flags: PacketFlags, ttl: u8, message_id: u16) -> Result<Self, CodecError> {
        if ttl > Self::MAX_TTL {
            return Err(CodecError::ArgumentOutOfRange {
                field: "ttl",
                value: i64::from(ttl),
                expected: "0..=15",
            });
        }
        if message_type.requires_standard_mode() {
            return Err(CodecError::ArgumentOutOfRange {
                field: "message_type",
                value: i64::from(message_type.to_code()),
                expected: "a type compatible with Compact mode",
            });
        }
        Ok(Self { message_type, flags, ttl, message_id })
    }

    /// Decode a Compact header from the start of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is shorter than
    /// [`CompactHeader::SIZE`], [`CodecError::InvalidMode`] if bit 7 of
    /// byte 0 is set, or [`CodecError::UnknownType`] if the type nibble has
    /// no mapping.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        if buf.len() < Self::SIZE {
            return Err(CodecError::InsufficientData { needed: Self::SIZE, available: buf.len() });
        }
        let byte0 = buf[0];
        let mode = PacketMode::detect(byte0);
        if mode != PacketMode::Compact {
            return Err(CodecError::InvalidMode { expected: PacketMode::Compact, actual: mode });
        }
        let message_type = MessageType::from_code((byte0 >> 3) & 0x0F)?;
        let byte1 = buf[1];
        let flags = PacketFlags::from_compact_bits(byte0 & 0b0000_0111, byte1 & 0b0000_1100);
        let ttl = (byte1 >> 4) & 0x0F;
        let message_id = bitwise::read16_be(buf, 2)?;
        Ok(Self { message_type, flags, ttl, message_id })
    }

    /// The ACK-path / SOS subtype / etc message type.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    /// Remaining relay hops (0..=15).
    #[must_use]
    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    /// The 16-bit message identifier.
    #[must_use]
    pub fn message_id(&self) -> u16 {
        self.message_id
    }

    /// Flags carried by this header (`is_fragment`/`more_fragments` are
    /// always `false`: Compact cannot represent fragmentation).
    #[must_use]
    pub fn flags(&self) -> PacketFlags {
        self.flags
    }
}

impl HeaderVariant for CompactHeader {
    fn mode(&self) -> PacketMode {
        PacketMode::Compact
    }

    fn message_type(&self) -> MessageType {
        self.message_type
    }

    fn flags(&self) -> PacketFlags {
        self.flags
    }

    fn ttl(&self) -> u16 {
        u16::from(self.ttl)
    }

    fn message_id(&self) -> u32 {
        u32::from(self.message_id)
    }

    fn size_in_bytes(&self) -> usize {
        Self::SIZE
    }

    fn is_expired(&self, now: std::time::Instant) -> bool {
        self.check_relay(now).is_err()
    }

    fn check_relay(&self, _now: std::time::Instant) -> Result<(), CodecError> {
        if self.ttl == 0 { Err(CodecError::HopLimitReached) } else { Ok(()) }
    }

    fn encode(&self) -> Vec<u8> {
        let byte0 = (self.message_type.to_code() << 3) | self.flags.to_compact_byte0_bits();
        let byte1 = (self.ttl << 4) | self.flags.to_compact_byte1_bits();
        let mut out = vec![byte0, byte1, 0, 0];
        out[2..4].copy_from_slice(&self.message_id.to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn roundtrip() {
        let header = CompactHeader::new(
            MessageType::SosBeacon,
            PacketFlags { mesh: true, urgent: true, ..Default::default() },
            7,
            4242,
        )
        .unwrap();
        let bytes = header.encode();
        assert_eq!(bytes.len(), CompactHeader::SIZE);
        assert_eq!(CompactHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn mode_bit_is_clear() {
        let header = CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 0, 0).unwrap();
        assert_eq!(header.encode()[0] & 0x80, 0);
    }

    #[test]
    fn ttl_above_max_is_rejected() {
        assert!(matches!(
            CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 16, 0),
            Err(CodecError::ArgumentOutOfRange { field: "ttl", .. })
        ));
    }

    #[test]
    fn standard_only_type_is_rejected() {
        assert!(matches!(
            CompactHeader::new(MessageType::Challenge, PacketFlags::default(), 0, 0),
            Err(CodecError::ArgumentOutOfRange { field: "message_type", .. })
        ));
    }

    #[test]
    fn decode_rejects_standard_mode_bit() {
        let mut bytes = CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 0, 0).unwrap().encode();
        bytes[0] |= 0x80;
        assert!(matches!(
            CompactHeader::decode(&bytes),
            Err(CodecError::InvalidMode { expected: PacketMode::Compact, actual: PacketMode::Standard })
        ));
    }

    #[test]
    fn decode_short_buffer_is_an_error() {
        assert!(matches!(CompactHeader::decode(&[0u8; 3]), Err(CodecError::InsufficientData { .. })));
    }

    #[test]
    fn zero_ttl_is_expired() {
        let header = CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 0, 0).unwrap();
        assert!(header.is_expired(std::time::Instant::now()));
    }

    #[test]
    fn zero_ttl_fails_relay_check_with_hop_limit_reached() {
        let header = CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 0, 0).unwrap();
        assert!(matches!(header.check_relay(std::time::Instant::now()), Err(CodecError::HopLimitReached)));
    }

    #[test]
    fn nonzero_ttl_passes_relay_check() {
        let header = CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 3, 0).unwrap();
        assert!(header.check_relay(std::time::Instant::now()).is_ok());
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_fields(
            ttl in 0u8..=15,
            message_id in any::<u16>(),
            mesh in any::<bool>(),
            ack_requested in any::<bool>(),
            encrypted in any::<bool>(),
            compressed in any::<bool>(),
            urgent in any::<bool>(),
        ) {
            let flags = PacketFlags { mesh, ack_requested, encrypted, compressed, urgent, is_fragment: false, more_fragments: false };
            let header = CompactHeader::new(MessageType::SosBeacon, flags, ttl, message_id).unwrap();
            let bytes = header.encode();
            prop_assert_eq!(CompactHeader::decode(&bytes).unwrap(), header);
        }
    }
}
