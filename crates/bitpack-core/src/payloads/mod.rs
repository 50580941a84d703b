//! Typed payload codecs dispatched by a packet header's `MessageType`.

pub mod ack;
pub mod location;
pub mod nack;
pub mod phone;
pub mod sos;
pub mod text;

pub use ack::AckPayload;
pub use location::LocationPayload;
pub use nack::NackPayload;
pub use phone::InternationalBcd;
pub use sos::SosPayload;
pub use text::TextPayload;

use crate::enums::MessageType;
use crate::error::CodecError;

/// A decoded payload tagged by the `MessageType` that produced it.
///
/// This does not add a wire feature: every variant's `encode`/`decode`
/// is exactly the per-type codec of its inner type. `PayloadKind` only
/// saves callers from hand-writing the `MessageType -> decoder` match at
/// every call site — the same role the header's message type plays when
/// routing a received frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadKind {
    /// [`MessageType::SosBeacon`].
    Sos(SosPayload),
    /// [`MessageType::SosAck`] — acknowledges receipt of an SOS beacon.
    SosAck(AckPayload),
    /// [`MessageType::Location`].
    Location(LocationPayload),
    /// [`MessageType::TextShort`].
    TextShort(TextPayload),
    /// [`MessageType::Ack`].
    Ack(AckPayload),
    /// [`MessageType::Nack`].
    Nack(NackPayload),
    /// [`MessageType::Challenge`] — opaque; decrypted and interpreted by
    /// `bitpack-crypto`'s challenge block, not by this crate.
    Challenge(Vec<u8>),
    /// [`MessageType::TextLong`].
    TextLong(TextPayload),
}

impl PayloadKind {
    /// The message type this payload is tagged with.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Sos(_) => MessageType::SosBeacon,
            Self::SosAck(_) => MessageType::SosAck,
            Self::Location(_) => MessageType::Location,
            Self::TextShort(_) => MessageType::TextShort,
            Self::Ack(_) => MessageType::Ack,
            Self::Nack(_) => MessageType::Nack,
            Self::Challenge(_) => MessageType::Challenge,
            Self::TextLong(_) => MessageType::TextLong,
        }
    }

    /// Serialized size in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        match self {
            Self::Sos(p) => p.size_in_bytes(),
            Self::SosAck(p) | Self::Ack(p) => p.size_in_bytes(),
            Self::Location(p) => p.size_in_bytes(),
            Self::TextShort(p) | Self::TextLong(p) => p.size_in_bytes(),
            Self::Nack(p) => p.size_in_bytes(),
            Self::Challenge(bytes) => bytes.len(),
        }
    }

    /// Encode to the wire representation of the inner payload.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Sos(p) => p.encode(),
            Self::SosAck(p) | Self::Ack(p) => p.encode(),
            Self::Location(p) => p.encode(),
            Self::TextShort(p) | Self::TextLong(p) => p.encode(),
            Self::Nack(p) => p.encode(),
            Self::Challenge(bytes) => bytes.clone(),
        }
    }

    /// Decode the payload region of a frame whose header carries
    /// `message_type`. `is_compact` selects the ACK message-id width
    /// (only consulted for `SosAck`/`Ack`); the Location layout is
    /// inferred from `buf`'s length, since neither header variant
    /// carries a dedicated extended/compact flag for it.
    ///
    /// # Errors
    ///
    /// Propagates the inner payload decoder's error.
    pub fn decode(message_type: MessageType, is_compact: bool, buf: &[u8]) -> Result<Self, CodecError> {
        match message_type {
            MessageType::SosBeacon => Ok(Self::Sos(SosPayload::decode(buf)?)),
            MessageType::SosAck => Ok(Self::SosAck(AckPayload::decode(buf, is_compact)?)),
            MessageType::Location => {
                let extended = buf.len() > LocationPayload::COMPACT_SIZE;
                Ok(Self::Location(LocationPayload::decode(buf, extended)?))
            }
            MessageType::TextShort => Ok(Self::TextShort(TextPayload::decode(buf)?)),
            MessageType::Ack => Ok(Self::Ack(AckPayload::decode(buf, is_compact)?)),
            MessageType::Nack => Ok(Self::Nack(NackPayload::decode(buf)?)),
            MessageType::Challenge => Ok(Self::Challenge(buf.to_vec())),
            MessageType::TextLong => Ok(Self::TextLong(TextPayload::decode(buf)?)),
        }
    }
}
