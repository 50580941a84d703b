//! Send/receive convenience pipeline: builder → encode → optional encrypt
//! → CRC on the way out, and the mirror image on the way in.
//! `bitpack-core::Packet` stays crypto-agnostic, and `bitpack-crypto`
//! stays wire-format-agnostic; [`Envelope`] is the only place that knows
//! about both.

use std::time::Instant;

use bitpack_core::enums::{MessageType, SecurityMode};
use bitpack_core::flags::PacketFlags;
use bitpack_core::header::{AutoHeaderFields, Header, HeaderFactory};
use bitpack_core::payloads::PayloadKind;
use bitpack_core::{CodecError, Packet};
use bitpack_crypto::aead::{self, NONCE_LEN};
use bitpack_crypto::kdf::{KEY_LEN_128, KEY_LEN_256};
use bitpack_crypto::CryptoError;

use crate::error::{EnvelopeError, Result};

/// Header-level fields a caller chooses when sealing a packet. Security
/// mode and payload length are derived by [`seal`], not supplied here.
#[derive(Debug, Clone, Copy)]
pub struct SealFields {
    /// Message type to encode.
    pub message_type: MessageType,
    /// Flags to encode.
    pub flags: PacketFlags,
    /// Relay hop count.
    pub ttl: u16,
    /// Message identifier.
    pub message_id: u32,
    /// Accumulated age in minutes.
    pub age_minutes: u16,
    /// Force Standard mode even if Compact would otherwise suffice.
    pub force_standard: bool,
}

/// The orchestration boundary between the wire codec and the crypto
/// envelope. Holds no state of its own: every method is a pure function
/// of its arguments.
pub struct Envelope;

impl Envelope {
    /// Build a complete wire frame from `plaintext`, optionally encrypting
    /// it under `key`.
    ///
    /// When `key` is `None` the payload is carried as plaintext
    /// ([`SecurityMode::None`]). When `key` is `Some`, its length selects
    /// AES-128-GCM (16 bytes) or AES-256-GCM (32 bytes); `header.encode()`
    /// is bound as AAD via [`aead::encrypt_with_header`] so a tampered
    /// header can never be paired with a legitimate ciphertext. `nonce` is
    /// drawn from a secure RNG when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Crypto`] if `key` is present but neither
    /// 16 nor 32 bytes, [`EnvelopeError::Codec`] if the header fields are
    /// out of range or the (possibly encrypted) payload exceeds the
    /// 16-bit length field, and propagates any other header-construction
    /// error from [`HeaderFactory::create_auto`].
    pub fn seal(fields: SealFields, plaintext: &[u8], key: Option<&[u8]>, nonce: Option<[u8; NONCE_LEN]>) -> Result<Packet> {
        let security_mode = match key {
            None => SecurityMode::None,
            Some(k) if k.len() == KEY_LEN_128 => SecurityMode::Aes128Gcm,
            Some(k) if k.len() == KEY_LEN_256 => SecurityMode::Aes256Gcm,
            Some(k) => {
                return Err(EnvelopeError::Crypto(CryptoError::ArgumentOutOfRange {
                    field: "key",
                    value: k.len() as i64,
                    expected: "16 or 32 bytes",
                }));
            }
        };

        let sealed_len =
            if security_mode == SecurityMode::None { plaintext.len() } else { NONCE_LEN + plaintext.len() + aead::TAG_LEN };
        let payload_length = u16::try_from(sealed_len).map_err(|_| {
            EnvelopeError::Codec(CodecError::ArgumentOutOfRange {
                field: "payload_length",
                value: sealed_len as i64,
                expected: "fits in a 16-bit length field",
            })
        })?;

        let header = HeaderFactory::create_auto(AutoHeaderFields {
            message_type: fields.message_type,
            flags: fields.flags,
            ttl: fields.ttl,
            message_id: fields.message_id,
            security_mode,
            payload_length,
            age_minutes: fields.age_minutes,
            force_standard: fields.force_standard,
        })?;

        let payload = match (security_mode, key) {
            (SecurityMode::None, _) => plaintext.to_vec(),
            (_, Some(k)) => aead::encrypt_with_header(k, plaintext, &header, nonce)?,
            (_, None) => return Err(EnvelopeError::MissingKey { security_mode }),
        };

        Ok(Packet::new(header, payload))
    }

    /// Recover the typed payload from a received, CRC-verified `packet`.
    ///
    /// If the packet's header declares [`SecurityMode::None`], `key` is
    /// ignored and the payload is decoded directly. Otherwise `key` must
    /// be supplied and match the key length the header's security mode
    /// implies; the payload is decrypted (with the header bound as AAD,
    /// matching [`seal`]) before being decoded.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::MissingKey`] if the packet is encrypted
    /// and no key was supplied, [`EnvelopeError::Crypto`] on
    /// authentication failure, and [`EnvelopeError::Codec`] if the
    /// (decrypted) payload does not parse as the header's message type.
    pub fn open(packet: &Packet, key: Option<&[u8]>) -> Result<PayloadKind> {
        let security_mode = packet.security_mode();
        let is_compact = matches!(packet.header(), Header::Compact(_));

        let plaintext = match (security_mode, key) {
            (SecurityMode::None, _) => packet.payload().to_vec(),
            (_, Some(k)) => aead::decrypt_with_header(k, packet.payload(), packet.header())?,
            (_, None) => return Err(EnvelopeError::MissingKey { security_mode }),
        };

        Ok(PayloadKind::decode(packet.message_type(), is_compact, &plaintext)?)
    }

    /// Like [`Envelope::open`], but first rejects a `packet` that has
    /// expired (combined hop/age limit) as of `now` — the check an
    /// application performs before handing a received message to its
    /// recipient, as opposed to a relay's hop-by-hop forwarding decision
    /// (see [`bitpack_core::Packet::check_relay`]).
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Codec`] wrapping
    /// [`bitpack_core::CodecError::MessageExpired`] if the packet is
    /// stale, then propagates every error [`Envelope::open`] can return.
    pub fn open_if_fresh(packet: &Packet, key: Option<&[u8]>, now: Instant) -> Result<PayloadKind> {
        packet.check_deliverable(now)?;
        Self::open(packet, key)
    }
}

#[cfg(test)]
mod tests {
    use bitpack_core::payloads::TextPayload;

    use super::*;

    fn base_fields(message_type: MessageType) -> SealFields {
        SealFields { message_type, flags: PacketFlags::default(), ttl: 7, message_id: 1, age_minutes: 0, force_standard: false }
    }

    #[test]
    fn plaintext_roundtrip() {
        let text = TextPayload::new("hello mesh", None, None).unwrap();
        let packet = Envelope::seal(base_fields(MessageType::TextShort), &text.encode(), None, None).unwrap();
        assert!(!packet.is_encrypted());

        let bytes = packet.encode();
        let decoded_packet = Packet::decode(&bytes).unwrap();
        let PayloadKind::TextShort(decoded) = Envelope::open(&decoded_packet, None).unwrap() else {
            panic!("expected TextShort payload kind");
        };
        assert_eq!(decoded, text);
    }

    #[test]
    fn encrypted_roundtrip_aes128() {
        let key = [7u8; KEY_LEN_128];
        let text = TextPayload::new("classified", None, None).unwrap();
        let packet = Envelope::seal(base_fields(MessageType::TextShort), &text.encode(), Some(&key), None).unwrap();
        assert!(packet.is_encrypted());
        assert_eq!(packet.security_mode(), SecurityMode::Aes128Gcm);

        let bytes = packet.encode();
        let decoded_packet = Packet::decode(&bytes).unwrap();
        let PayloadKind::TextShort(decoded) = Envelope::open(&decoded_packet, Some(&key)).unwrap() else {
            panic!("expected TextShort payload kind");
        };
        assert_eq!(decoded, text);
    }

    #[test]
    fn encrypted_roundtrip_aes256() {
        let key = [9u8; KEY_LEN_256];
        let text = TextPayload::new("top secret", None, None).unwrap();
        let packet = Envelope::seal(base_fields(MessageType::TextShort), &text.encode(), Some(&key), None).unwrap();
        assert_eq!(packet.security_mode(), SecurityMode::Aes256Gcm);

        let bytes = packet.encode();
        let decoded_packet = Packet::decode(&bytes).unwrap();
        let opened = Envelope::open(&decoded_packet, Some(&key)).unwrap();
        assert_eq!(opened.message_type(), MessageType::TextShort);
    }

    #[test]
    fn opening_encrypted_packet_without_key_fails() {
        let key = [1u8; KEY_LEN_128];
        let text = TextPayload::new("hi", None, None).unwrap();
        let packet = Envelope::seal(base_fields(MessageType::TextShort), &text.encode(), Some(&key), None).unwrap();

        let result = Envelope::open(&packet, None);
        assert!(matches!(result, Err(EnvelopeError::MissingKey { .. })));
    }

    #[test]
    fn opening_with_wrong_key_fails_authentication() {
        let key = [1u8; KEY_LEN_128];
        let wrong_key = [2u8; KEY_LEN_128];
        let text = TextPayload::new("hi", None, None).unwrap();
        let packet = Envelope::seal(base_fields(MessageType::TextShort), &text.encode(), Some(&key), None).unwrap();

        let result = Envelope::open(&packet, Some(&wrong_key));
        assert!(matches!(result, Err(EnvelopeError::Crypto(CryptoError::AuthenticationFailed))));
    }

    #[test]
    fn tampered_header_after_seal_fails_authentication() {
        let key = [1u8; KEY_LEN_128];
        let text = TextPayload::new("hi", None, None).unwrap();
        let packet = Envelope::seal(base_fields(MessageType::TextShort), &text.encode(), Some(&key), None).unwrap();

        let mut bytes = packet.encode();
        // Flip a bit in the header's message-id field (well within the
        // Standard header, before the payload region).
        bytes[2] ^= 0xFF;
        let tampered_crc = bitpack_core::Packet::decode(&bytes);
        // The header mutation likely also breaks the trailing CRC; either
        // failure mode (CRC mismatch or authentication failure once
        // decoded) demonstrates the header is bound into the ciphertext.
        if let Ok(tampered_packet) = tampered_crc {
            assert!(Envelope::open(&tampered_packet, Some(&key)).is_err());
        }
    }

    #[test]
    fn open_if_fresh_accepts_unexpired_packet() {
        let text = TextPayload::new("hello mesh", None, None).unwrap();
        let packet = Envelope::seal(base_fields(MessageType::TextShort), &text.encode(), None, None).unwrap();
        let decoded_packet = Packet::decode(&packet.encode()).unwrap();
        let PayloadKind::TextShort(decoded) = Envelope::open_if_fresh(&decoded_packet, None, std::time::Instant::now()).unwrap()
        else {
            panic!("expected TextShort payload kind");
        };
        assert_eq!(decoded, text);
    }

    #[test]
    fn open_if_fresh_rejects_expired_packet() {
        let fields = SealFields { ttl: 0, ..base_fields(MessageType::TextShort) };
        let text = TextPayload::new("hello mesh", None, None).unwrap();
        let packet = Envelope::seal(fields, &text.encode(), None, None).unwrap();
        let decoded_packet = Packet::decode(&packet.encode()).unwrap();
        let result = Envelope::open_if_fresh(&decoded_packet, None, std::time::Instant::now());
        assert!(matches!(result, Err(EnvelopeError::Codec(CodecError::MessageExpired))));
    }

    #[test]
    fn unsupported_key_length_is_rejected() {
        let key = [1u8; 24];
        let text = TextPayload::new("hi", None, None).unwrap();
        let result = Envelope::seal(base_fields(MessageType::TextShort), &text.encode(), Some(&key), None);
        assert!(matches!(result, Err(EnvelopeError::Crypto(CryptoError::ArgumentOutOfRange { .. }))));
    }
}
