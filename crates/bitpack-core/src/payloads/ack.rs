//! Positive delivery acknowledgment payload.
//!
//! Compact form (3 bytes): `msgId(u16) | status(u8)`.
//! Standard form (5 bytes): `msgId(u32) | status(u8)`.
//! [`AckStatus::Failed`] may additionally append `[len(u8)]reason_utf8`.

use crate::enums::AckStatus;
use crate::error::CodecError;

/// An ACK payload, sized to whichever header variant carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckPayload {
    message_id: u32,
    is_compact: bool,
    status: AckStatus,
    reason: Option<String>,
}

impl AckPayload {
    /// Wire size of the Compact form (no reason).
    pub const COMPACT_SIZE: usize = 3;
    /// Wire size of the Standard form (no reason).
    pub const STANDARD_SIZE: usize = 5;

    /// Build a Compact-sized ACK (`message_id` truncated to 16 bits on
    /// encode; construction rejects a wider value outright).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `message_id` exceeds
    /// `u16::MAX`, if `reason` is supplied for a status other than
    /// [`AckStatus::Failed`], or if `reason` exceeds 255 bytes.
    pub fn compact(message_id: u32, status: AckStatus, reason: Option<String>) -> Result<Self, CodecError> {
        if message_id > u32::from(u16::MAX) {
            return Err(CodecError::ArgumentOutOfRange {
                field: "message_id",
                value: i64::from(message_id),
                expected: "0..=65535 for a Compact ACK",
            });
        }
        Self::build(message_id, true, status, reason)
    }

    /// Build a Standard-sized ACK.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `reason` is supplied
    /// for a status other than [`AckStatus::Failed`], or if `reason`
    /// exceeds 255 bytes.
    pub fn standard(message_id: u32, status: AckStatus, reason: Option<String>) -> Result<Self, CodecError> {
        Self::build(message_id, false, status, reason)
    }

    fn build(message_id: u32, is_compact: bool, status: AckStatus, reason: Option<String>) -> Result<Self, CodecError> {
        if reason.is_some() && status != AckStatus::Failed {
            return Err(CodecError::ArgumentOutOfRange {
                field: "reason",
                value: status.to_code() as i64,
                expected: "only present when status is Failed",
            });
        }
        if let Some(reason) = &reason {
            if reason.len() > u8::MAX as usize {
                return Err(CodecError::ArgumentOutOfRange {
                    field: "reason",
                    value: reason.len() as i64,
                    expected: "at most 255 bytes",
                });
            }
        }
        Ok(Self { message_id, is_compact, status, reason })
    }

    /// The acknowledged message identifier.
    #[must_use]
    pub fn message_id(&self) -> u32 {
        self.message_id
    }

    /// Whether this ACK uses the 16-bit Compact message-id width.
    #[must_use]
    pub fn is_compact(&self) -> bool {
        self.is_compact
    }

    /// Delivery status.
    #[must_use]
    pub fn status(&self) -> AckStatus {
        self.status
    }

    /// Failure reason, present only when `status` is
    /// [`AckStatus::Failed`].
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Serialized size in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        let base = if self.is_compact { Self::COMPACT_SIZE } else { Self::STANDARD_SIZE };
        base + self.reason.as_ref().map_or(0, |r| 1 + r.len())
    }

    /// Encode to the wire representation.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_in_bytes());
        if self.is_compact {
            out.extend_from_slice(&(self.message_id as u16).to_be_bytes());
        } else {
            out.extend_from_slice(&self.message_id.to_be_bytes());
        }
        out.push(self.status.to_code());
        if let Some(reason) = &self.reason {
            out.push(reason.len() as u8);
            out.extend_from_slice(reason.as_bytes());
        }
        out
    }

    /// Decode an ACK payload. `is_compact` selects the 16- vs 32-bit
    /// message-id width.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if `buf` is too short for
    /// the selected width, or for a declared reason length that runs past
    /// the end of `buf`.
    pub fn decode(buf: &[u8], is_compact: bool) -> Result<Self, CodecError> {
        let id_width = if is_compact { 2 } else { 4 };
        let base = id_width + 1;
        if buf.len() < base {
            return Err(CodecError::InsufficientData { needed: base, available: buf.len() });
        }
        let message_id = if is_compact {
            u32::from(u16::from_be_bytes([buf[0], buf[1]]))
        } else {
            u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]])
        };
        let status = AckStatus::from_code(buf[id_width]);

        let reason = if status == AckStatus::Failed && buf.len() > base {
            let len = buf[base] as usize;
            let start = base + 1;
            let end = start + len;
            let bytes = buf.get(start..end).ok_or(CodecError::InsufficientData { needed: end, available: buf.len() })?;
            Some(String::from_utf8_lossy(bytes).into_owned())
        } else {
            None
        };

        Self::build(message_id, is_compact, status, reason)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn compact_roundtrip() {
        let ack = AckPayload::compact(42, AckStatus::Delivered, None).unwrap();
        let bytes = ack.encode();
        assert_eq!(bytes.len(), AckPayload::COMPACT_SIZE);
        assert_eq!(AckPayload::decode(&bytes, true).unwrap(), ack);
    }

    #[test]
    fn standard_roundtrip() {
        let ack = AckPayload::standard(0xDEAD_BEEF, AckStatus::Relayed, None).unwrap();
        let bytes = ack.encode();
        assert_eq!(bytes.len(), AckPayload::STANDARD_SIZE);
        assert_eq!(AckPayload::decode(&bytes, false).unwrap(), ack);
    }

    #[test]
    fn failed_with_reason_roundtrip() {
        let ack = AckPayload::standard(7, AckStatus::Failed, Some("no route".to_string())).unwrap();
        let bytes = ack.encode();
        assert_eq!(bytes.len(), AckPayload::STANDARD_SIZE + 1 + 8);
        assert_eq!(AckPayload::decode(&bytes, false).unwrap(), ack);
    }

    #[test]
    fn reason_without_failed_status_is_rejected() {
        assert!(AckPayload::compact(1, AckStatus::Delivered, Some("why".to_string())).is_err());
    }

    #[test]
    fn oversized_compact_message_id_is_rejected() {
        assert!(AckPayload::compact(70_000, AckStatus::Received, None).is_err());
    }

    proptest! {
        #[test]
        fn compact_roundtrip_arbitrary(message_id in 0u32..=u32::from(u16::MAX)) {
            let ack = AckPayload::compact(message_id, AckStatus::Received, None).unwrap();
            let bytes = ack.encode();
            prop_assert_eq!(AckPayload::decode(&bytes, true).unwrap(), ack);
        }

        #[test]
        fn standard_roundtrip_arbitrary(message_id in any::<u32>()) {
            let ack = AckPayload::standard(message_id, AckStatus::Read, None).unwrap();
            let bytes = ack.encode();
            prop_assert_eq!(AckPayload::decode(&bytes, false).unwrap(), ack);
        }
    }
}
