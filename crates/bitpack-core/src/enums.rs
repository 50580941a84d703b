//! Wire-stable enumerations.
//!
//! Every enum here carries an explicit `to_code`/`from_code` pair instead of
//! `#[repr(u8)]`, because most of these codes occupy a sub-byte field
//! (3-bit, 4-bit, 6-bit) rather than a whole byte — a bare `#[repr(u8)]`
//! discriminant would suggest a byte-aligned layout that does not exist on
//! the wire.

use crate::error::CodecError;

/// Which header variant a packet uses, selected by bit 7 of byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketMode {
    /// Bit 7 of byte 0 is `0`: 4-byte header.
    Compact,
    /// Bit 7 of byte 0 is `1`: 11-byte header.
    Standard,
}

impl PacketMode {
    /// Read the mode bit out of a header's first byte.
    #[must_use]
    pub fn detect(byte0: u8) -> Self {
        if byte0 & 0x80 != 0 { Self::Standard } else { Self::Compact }
    }
}

/// Message type carried in the header: 4 bits in Compact, 6 bits in
/// Standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Emergency SOS beacon.
    SosBeacon,
    /// Acknowledgment of a received SOS beacon.
    SosAck,
    /// GPS location report.
    Location,
    /// Short free-text message.
    TextShort,
    /// Positive delivery acknowledgment.
    Ack,
    /// Selective negative acknowledgment (missing fragment bitmap).
    Nack,
    /// Challenge/response handshake block (Standard-only: opaque
    /// ciphertext payload too large for Compact).
    Challenge,
    /// Extended, long-form text (Standard-only: needs the 13-bit payload
    /// length field Compact lacks).
    TextLong,
}

impl MessageType {
    /// Wire code for this type. Compact uses the low 4 bits; Standard uses
    /// the low 6 bits. Codes are assigned so the same numeric value is
    /// valid in both widths.
    #[must_use]
    pub fn to_code(self) -> u8 {
        match self {
            Self::SosBeacon => 0x0,
            Self::SosAck => 0x1,
            Self::Location => 0x2,
            Self::TextShort => 0x3,
            Self::Ack => 0x4,
            Self::Nack => 0x5,
            Self::Challenge => 0x6,
            Self::TextLong => 0x7,
        }
    }

    /// Recover a [`MessageType`] from its wire code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownType`] for any code with no mapping.
    pub fn from_code(code: u8) -> Result<Self, CodecError> {
        match code {
            0x0 => Ok(Self::SosBeacon),
            0x1 => Ok(Self::SosAck),
            0x2 => Ok(Self::Location),
            0x3 => Ok(Self::TextShort),
            0x4 => Ok(Self::Ack),
            0x5 => Ok(Self::Nack),
            0x6 => Ok(Self::Challenge),
            0x7 => Ok(Self::TextLong),
            other => Err(CodecError::UnknownType(other)),
        }
    }

    /// Types whose wire representation cannot fit a Compact header/payload
    /// and therefore force Standard mode.
    #[must_use]
    pub fn requires_standard_mode(self) -> bool {
        matches!(self, Self::Challenge | Self::TextLong)
    }
}

/// 3-bit SOS subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SosType {
    /// Needs rescue, condition unspecified.
    NeedRescue,
    /// Injured, needs medical attention.
    Injured,
    /// Physically trapped (collapsed structure, etc).
    Trapped,
    /// Safe; beacon sent to confirm status, not to request help.
    Safe,
    /// Able to assist other survivors.
    CanHelp,
}

impl SosType {
    /// 3-bit wire code.
    #[must_use]
    pub fn to_code(self) -> u8 {
        match self {
            Self::NeedRescue => 0,
            Self::Injured => 1,
            Self::Trapped => 2,
            Self::Safe => 3,
            Self::CanHelp => 4,
        }
    }

    /// Recover a [`SosType`] from its 3-bit wire code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownType`] for any code with no mapping.
    pub fn from_code(code: u8) -> Result<Self, CodecError> {
        match code {
            0 => Ok(Self::NeedRescue),
            1 => Ok(Self::Injured),
            2 => Ok(Self::Trapped),
            3 => Ok(Self::Safe),
            4 => Ok(Self::CanHelp),
            other => Err(CodecError::UnknownType(other)),
        }
    }
}

/// 3-bit security mode selecting the AEAD cipher (if any) wrapping the
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityMode {
    /// Payload is plaintext.
    None,
    /// Payload is AES-128-GCM ciphertext.
    Aes128Gcm,
    /// Payload is AES-256-GCM ciphertext.
    Aes256Gcm,
}

impl SecurityMode {
    /// 3-bit wire code.
    #[must_use]
    pub fn to_code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Aes128Gcm => 1,
            Self::Aes256Gcm => 2,
        }
    }

    /// Recover a [`SecurityMode`] from its 3-bit wire code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownSecurityMode`] for any code with no
    /// mapping.
    pub fn from_code(code: u8) -> Result<Self, CodecError> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::Aes128Gcm),
            2 => Ok(Self::Aes256Gcm),
            other => Err(CodecError::UnknownSecurityMode(other)),
        }
    }
}

/// 8-bit delivery status carried by an ACK payload.
///
/// Unknown codes fall back to [`AckStatus::Received`] rather than erroring
/// (see the open question recorded in `DESIGN.md` about a strict-mode
/// alternative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckStatus {
    /// The receiving node has the frame.
    Received,
    /// The frame reached its application-level destination.
    Delivered,
    /// The recipient has read/acted on the message.
    Read,
    /// Delivery failed; may carry a UTF-8 reason string.
    Failed,
    /// The recipient explicitly rejected the message.
    Rejected,
    /// The frame was relayed onward rather than consumed locally.
    Relayed,
}

impl AckStatus {
    /// 8-bit wire code.
    #[must_use]
    pub fn to_code(self) -> u8 {
        match self {
            Self::Received => 0,
            Self::Delivered => 1,
            Self::Read => 2,
            Self::Failed => 3,
            Self::Rejected => 4,
            Self::Relayed => 5,
        }
    }

    /// Recover an [`AckStatus`] from its wire code. Unknown codes decode as
    /// [`AckStatus::Received`], matching spec-mandated lenient behavior.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Delivered,
            2 => Self::Read,
            3 => Self::Failed,
            4 => Self::Rejected,
            5 => Self::Relayed,
            _ => Self::Received,
        }
    }
}

/// 3-bit country-code shortcut used by [`crate::payloads::phone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountryCode {
    /// +1 (USA/Canada).
    UsaCanada,
    /// +44 (United Kingdom).
    Uk,
    /// +49 (Germany).
    Germany,
    /// +90 (Turkey).
    Turkey,
    /// Country code does not have a shortcut; the numeric code follows as
    /// two explicit BCD bytes.
    Custom,
}

impl CountryCode {
    /// 3-bit wire code.
    #[must_use]
    pub fn to_code(self) -> u8 {
        match self {
            Self::UsaCanada => 0x1,
            Self::Uk => 0x2,
            Self::Germany => 0x3,
            Self::Turkey => 0x6,
            Self::Custom => 0x7,
        }
    }

    /// Recover a [`CountryCode`] from its 3-bit wire code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownType`] for any code with no mapping
    /// (codes `0x0`, `0x4`, `0x5` are reserved).
    pub fn from_code(code: u8) -> Result<Self, CodecError> {
        match code {
            0x1 => Ok(Self::UsaCanada),
            0x2 => Ok(Self::Uk),
            0x3 => Ok(Self::Germany),
            0x6 => Ok(Self::Turkey),
            0x7 => Ok(Self::Custom),
            other => Err(CodecError::UnknownType(other)),
        }
    }

    /// Dialing prefix for this shortcut, or `None` for [`CountryCode::Custom`]
    /// (whose numeric code is carried separately as BCD digits).
    #[must_use]
    pub fn dial_prefix(self) -> Option<&'static str> {
        match self {
            Self::UsaCanada => Some("+1"),
            Self::Uk => Some("+44"),
            Self::Germany => Some("+49"),
            Self::Turkey => Some("+90"),
            Self::Custom => None,
        }
    }
}
