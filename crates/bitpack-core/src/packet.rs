//! Frame assembly: header + payload + trailing CRC-8.

use std::time::Instant;

use crate::crc::Crc8;
use crate::enums::{MessageType, SecurityMode};
use crate::error::CodecError;
use crate::header::{Header, HeaderFactory, HeaderVariant};
use crate::payloads::PayloadKind;

/// A complete wire frame: one header variant, an opaque payload region,
/// and a trailing CRC-8 over `header || payload`.
///
/// The payload is opaque by design: when the header's security mode is
/// not [`SecurityMode::None`] it is ciphertext, and decrypting it is a
/// step this crate does not perform (see `bitpack-crypto`). Callers that
/// know the payload is plaintext can reach the typed payload via
/// [`Packet::decode_payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    header: Header,
    payload: Vec<u8>,
}

impl Packet {
    /// Pair an already-built header with its (possibly encrypted)
    /// payload bytes. Does not validate that `payload.len()` matches the
    /// header's declared `payload_length` for a [`Header::Standard`]
    /// header — callers that need that guarantee should compare
    /// explicitly.
    #[must_use]
    pub fn new(header: Header, payload: Vec<u8>) -> Self {
        Self { header, payload }
    }

    /// The frame's header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The opaque payload region (ciphertext if `security_mode != None`).
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total encoded size: header + payload + 1 CRC byte.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        self.header.size_in_bytes() + self.payload.len() + 1
    }

    /// Encode to `header_bytes || payload_bytes || crc8(header || payload)`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_in_bytes());
        out.extend_from_slice(&self.header.encode());
        out.extend_from_slice(&self.payload);
        out.push(Crc8::compute(&out));
        out
    }

    /// Decode a complete frame: detect the header variant, split off the
    /// trailing CRC-8 byte, and verify it. Since Compact headers carry no
    /// payload-length field, `buf` must be exactly the bytes of one
    /// frame (as delivered by the transport) — the payload region is
    /// whatever remains between the header and the final CRC byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is shorter than
    /// `header_size + 1`, or [`CodecError::CrcMismatch`] if the trailing
    /// byte does not match the computed CRC-8 of the rest of `buf`.
    /// Propagates header-decoding errors from [`HeaderFactory::decode_with_payload`].
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        let (header, rest) = HeaderFactory::decode_with_payload(buf)?;
        let header_size = header.size_in_bytes();
        if rest.is_empty() {
            return Err(CodecError::InsufficientData { needed: header_size + 1, available: buf.len() });
        }
        let (payload, crc_byte) = rest.split_at(rest.len() - 1);
        let expected = crc_byte[0];
        let actual = Crc8::compute(&buf[..buf.len() - 1]);
        if expected != actual {
            return Err(CodecError::CrcMismatch { expected, actual });
        }
        Ok(Self { header, payload: payload.to_vec() })
    }

    /// Interpret the payload region as plaintext and decode it per the
    /// header's message type. Do not call this when
    /// `security_mode != None` — the payload is ciphertext and must be
    /// decrypted first (see `bitpack-crypto`'s `AesGcmCipher`).
    ///
    /// # Errors
    ///
    /// Propagates the selected payload decoder's error.
    pub fn decode_payload(&self) -> Result<PayloadKind, CodecError> {
        let is_compact = matches!(self.header, Header::Compact(_));
        PayloadKind::decode(self.header.message_type(), is_compact, &self.payload)
    }

    /// Whether the header declares this payload to be encrypted.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.security_mode() != SecurityMode::None
    }

    /// The header's security mode ([`SecurityMode::None`] for a
    /// [`Header::Compact`] header, which has no security-mode field).
    #[must_use]
    pub fn security_mode(&self) -> SecurityMode {
        match &self.header {
            Header::Compact(_) => SecurityMode::None,
            Header::Standard(h) => h.security_mode(),
        }
    }

    /// The header's message type.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        self.header.message_type()
    }

    /// A relay's forwarding decision as of `now`: whether this packet
    /// should be relayed on, naming which limit stopped it if not.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::HopLimitReached`] or
    /// [`CodecError::AgeLimitReached`] per [`HeaderVariant::check_relay`].
    pub fn check_relay(&self, now: Instant) -> Result<(), CodecError> {
        self.header.check_relay(now)
    }

    /// Final delivery-to-application check as of `now`: whether this
    /// packet is still fresh enough to hand to the recipient, collapsing
    /// hop and age expiry into one outcome (an application has no use
    /// for which limit was hit, only whether the message is stale).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MessageExpired`] if the packet is expired.
    pub fn check_deliverable(&self, now: Instant) -> Result<(), CodecError> {
        if self.header.is_expired(now) {
            Err(CodecError::MessageExpired)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::enums::SosType;
    use crate::flags::PacketFlags;
    use crate::gps::Gps;
    use crate::header::{AutoHeaderFields, CompactHeader};
    use crate::payloads::SosPayload;

    fn compact_sos_packet() -> (Packet, SosPayload) {
        let sos =
            SosPayload::new(SosType::NeedRescue, 3, true, false, Gps::new(41.0082, 28.9784).unwrap(), "5551234567", 10, 64)
                .unwrap();
        let payload = sos.encode();
        let header =
            CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 7, 1).unwrap();
        (Packet::new(crate::header::Header::Compact(header), payload), sos)
    }

    #[test]
    fn scenario_a_compact_sos_packet_is_twenty_bytes() {
        // Scenario A: SosPayload encoded as a Compact packet.
        let (packet, _sos) = compact_sos_packet();
        let bytes = packet.encode();
        assert_eq!(bytes.len(), 20);
        assert_eq!(bytes[0] & 0x80, 0); // mode bit clear (Compact)
    }

    #[test]
    fn roundtrip_recovers_header_and_payload() {
        let (packet, sos) = compact_sos_packet();
        let bytes = packet.encode();
        let decoded = Packet::decode(&bytes).unwrap();
        assert_eq!(decoded.header(), packet.header());
        assert_eq!(decoded.payload(), packet.payload());

        let PayloadKind::Sos(decoded_sos) = decoded.decode_payload().unwrap() else {
            panic!("expected Sos payload kind");
        };
        assert_eq!(decoded_sos, sos);
    }

    #[test]
    fn tampered_byte_is_caught_by_crc() {
        let (packet, _) = compact_sos_packet();
        let mut bytes = packet.encode();
        let last = bytes.len() - 2;
        bytes[last] ^= 0xFF;
        assert!(matches!(Packet::decode(&bytes), Err(CodecError::CrcMismatch { .. })));
    }

    #[test]
    fn truncated_frame_is_insufficient_data() {
        let (packet, _) = compact_sos_packet();
        let bytes = packet.encode();
        assert!(matches!(Packet::decode(&bytes[..3]), Err(CodecError::InsufficientData { .. })));
    }

    #[test]
    fn standard_header_roundtrip_with_text_payload() {
        let fields = AutoHeaderFields {
            message_type: MessageType::TextShort,
            flags: PacketFlags::default(),
            ttl: 20,
            message_id: 99,
            security_mode: SecurityMode::None,
            payload_length: 10,
            age_minutes: 5,
            force_standard: false,
        };
        let header = HeaderFactory::create_auto(fields).unwrap();
        assert!(matches!(header, Header::Standard(_)));

        let text = crate::payloads::TextPayload::new("hi", None, None).unwrap();
        let packet = Packet::new(header, text.encode());
        let bytes = packet.encode();
        let decoded = Packet::decode(&bytes).unwrap();
        let PayloadKind::TextShort(decoded_text) = decoded.decode_payload().unwrap() else {
            panic!("expected TextShort payload kind");
        };
        assert_eq!(decoded_text, text);
    }

    #[test]
    fn encrypted_payload_reports_as_not_plaintext_decodable() {
        let fields = AutoHeaderFields {
            message_type: MessageType::TextShort,
            flags: PacketFlags::default(),
            ttl: 20,
            message_id: 1,
            security_mode: SecurityMode::Aes128Gcm,
            payload_length: 16,
            age_minutes: 0,
            force_standard: false,
        };
        let header = HeaderFactory::create_auto(fields).unwrap();
        let packet = Packet::new(header, vec![0u8; 16]);
        assert!(packet.is_encrypted());
    }

    #[test]
    fn check_relay_reports_hop_limit_reached() {
        let header = CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 0, 0).unwrap();
        let packet = Packet::new(crate::header::Header::Compact(header), vec![]);
        assert!(matches!(packet.check_relay(Instant::now()), Err(CodecError::HopLimitReached)));
    }

    #[test]
    fn check_relay_passes_for_fresh_packet() {
        let (packet, _) = compact_sos_packet();
        assert!(packet.check_relay(Instant::now()).is_ok());
    }

    #[test]
    fn check_deliverable_reports_message_expired() {
        let header = CompactHeader::new(MessageType::SosBeacon, PacketFlags::default(), 0, 0).unwrap();
        let packet = Packet::new(crate::header::Header::Compact(header), vec![]);
        assert!(matches!(packet.check_deliverable(Instant::now()), Err(CodecError::MessageExpired)));
    }

    #[test]
    fn check_deliverable_passes_for_fresh_packet() {
        let (packet, _) = compact_sos_packet();
        assert!(packet.check_deliverable(Instant::now()).is_ok());
    }

    proptest! {
        #[test]
        fn compact_packet_roundtrip_arbitrary(ttl in 0u8..=15, message_id in 0u16..=u16::MAX, text in "[a-z]{1,12}") {
            let payload = crate::payloads::TextPayload::new(text, None, None).unwrap();
            let header = CompactHeader::new(MessageType::TextShort, PacketFlags::default(), ttl, message_id).unwrap();
            let packet = Packet::new(crate::header::Header::Compact(header), payload.encode());
            let bytes = packet.encode();
            prop_assert_eq!(Packet::decode(&bytes).unwrap(), packet);
        }
    }
}
