//! Short free-text message payload.
//!
//! ```text
//! byte0: [hasSender|hasRecipient|reserved(6)]
//! [len(1)]senderId[len bytes]       (only if hasSender)
//! [len(1)]recipientId[len bytes]    (only if hasRecipient)
//! text (UTF-8, to end of payload)
//! ```

use crate::error::CodecError;

/// A short text message, with optional sender/recipient identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    sender_id: Option<String>,
    recipient_id: Option<String>,
    text: String,
}

impl TextPayload {
    /// Build a new text payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::ArgumentOutOfRange`] if `text` is empty, or if
    /// a sender/recipient id exceeds 255 bytes (the length prefix is a
    /// single byte).
    pub fn new(text: impl Into<String>, sender_id: Option<String>, recipient_id: Option<String>) -> Result<Self, CodecError> {
        let text = text.into();
        if text.is_empty() {
            return Err(CodecError::ArgumentOutOfRange {
                field: "text",
                value: 0,
                expected: "a non-empty string",
            });
        }
        for (field, id) in [("sender_id", &sender_id), ("recipient_id", &recipient_id)] {
            if let Some(id) = id {
                if id.len() > u8::MAX as usize {
                    return Err(CodecError::ArgumentOutOfRange {
                        field,
                        value: id.len() as i64,
                        expected: "at most 255 bytes",
                    });
                }
            }
        }
        Ok(Self { sender_id, recipient_id, text })
    }

    /// Sender identifier, if present.
    #[must_use]
    pub fn sender_id(&self) -> Option<&str> {
        self.sender_id.as_deref()
    }

    /// Recipient identifier, if present.
    #[must_use]
    pub fn recipient_id(&self) -> Option<&str> {
        self.recipient_id.as_deref()
    }

    /// The message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Serialized size in bytes.
    #[must_use]
    pub fn size_in_bytes(&self) -> usize {
        1 + self.sender_id.as_ref().map_or(0, |s| 1 + s.len())
            + self.recipient_id.as_ref().map_or(0, |s| 1 + s.len())
            + self.text.len()
    }

    /// Encode to the variable-length wire representation.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size_in_bytes());
        let byte0 = (u8::from(self.sender_id.is_some()) << 7) | (u8::from(self.recipient_id.is_some()) << 6);
        out.push(byte0);
        if let Some(sender_id) = &self.sender_id {
            out.push(sender_id.len() as u8);
            out.extend_from_slice(sender_id.as_bytes());
        }
        if let Some(recipient_id) = &self.recipient_id {
            out.push(recipient_id.len() as u8);
            out.extend_from_slice(recipient_id.as_bytes());
        }
        out.extend_from_slice(self.text.as_bytes());
        out
    }

    /// Decode a text payload.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientData`] if a length-prefixed field
    /// or the trailing text runs past the end of `buf`, or
    /// [`CodecError::ArgumentOutOfRange`] if the remaining text is empty
    /// or not valid UTF-8.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        let byte0 = *buf.first().ok_or(CodecError::InsufficientData { needed: 1, available: 0 })?;
        let has_sender = byte0 & 0x80 != 0;
        let has_recipient = byte0 & 0x40 != 0;

        let mut offset = 1;
        let sender_id = if has_sender { Some(read_length_prefixed(buf, &mut offset)?) } else { None };
        let recipient_id = if has_recipient { Some(read_length_prefixed(buf, &mut offset)?) } else { None };

        let text_bytes = buf.get(offset..).ok_or(CodecError::InsufficientData { needed: offset, available: buf.len() })?;
        let text = std::str::from_utf8(text_bytes).map_err(|_| CodecError::ArgumentOutOfRange {
            field: "text",
            value: text_bytes.len() as i64,
            expected: "valid UTF-8",
        })?;

        Self::new(text, sender_id, recipient_id)
    }
}

fn read_length_prefixed(buf: &[u8], offset: &mut usize) -> Result<String, CodecError> {
    let len = *buf.get(*offset).ok_or(CodecError::InsufficientData { needed: *offset + 1, available: buf.len() })? as usize;
    let start = *offset + 1;
    let end = start + len;
    let bytes = buf.get(start..end).ok_or(CodecError::InsufficientData { needed: end, available: buf.len() })?;
    let s = std::str::from_utf8(bytes)
        .map_err(|_| CodecError::ArgumentOutOfRange { field: "sender_or_recipient_id", value: len as i64, expected: "valid UTF-8" })?
        .to_string();
    *offset = end;
    Ok(s)
}
