//! Error taxonomy for the bit-packed codec layer.
//!
//! Encoder misuse (a caller-supplied field outside its declared domain) and
//! decoder input corruption (a malformed or truncated buffer) are kept in
//! distinct variants so the two failure classes are never conflated: the
//! former is a programming bug in the sender, the latter is untrusted mesh
//! traffic that must be dropped, not panicked on.

use thiserror::Error;

/// Errors raised by header, payload, and packet codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A caller supplied a field value outside its declared domain (e.g. a
    /// Compact `ttl` greater than 15). Raised only at encode time.
    #[error("argument out of range: {field} = {value} (expected {expected})")]
    ArgumentOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The value that was supplied.
        value: i64,
        /// Human-readable description of the valid domain.
        expected: &'static str,
    },

    /// The buffer was shorter than the header/payload/field it was asked to
    /// yield.
    #[error("insufficient data: need {needed} bytes, have {available}")]
    InsufficientData {
        /// Bytes required to proceed.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// The mode bit of byte 0 did not match the header variant the caller
    /// asked to decode.
    #[error("invalid mode: expected {expected:?}, byte 0 indicates {actual:?}")]
    InvalidMode {
        /// The variant the caller expected.
        expected: crate::enums::PacketMode,
        /// The variant the first byte actually encodes.
        actual: crate::enums::PacketMode,
    },

    /// A message type code has no entry in the known type map.
    #[error("unknown message type code: {0:#04x}")]
    UnknownType(u8),

    /// A security mode code has no entry in the known mode map.
    #[error("unknown security mode code: {0:#04x}")]
    UnknownSecurityMode(u8),

    /// The trailing CRC-8 did not match the computed CRC-8 over
    /// `header || payload`.
    #[error("crc mismatch: expected {expected:#04x}, computed {actual:#04x}")]
    CrcMismatch {
        /// The CRC byte found in the frame.
        expected: u8,
        /// The CRC computed from the received bytes.
        actual: u8,
    },

    /// A BCD nibble was neither a decimal digit nor the `0xF` pad sentinel.
    #[error("invalid BCD nibble: {0:#03x}")]
    InvalidBcdNibble(u8),

    /// A varint continued past the maximum 5-byte encoding for a 32-bit
    /// value, or ran off the end of the buffer before terminating.
    #[error("varint truncated or too long")]
    VarIntTruncated,

    /// A GPS coordinate fell outside the valid latitude/longitude domain.
    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate {
        /// Decimal-degree latitude supplied.
        lat: f64,
        /// Decimal-degree longitude supplied.
        lon: f64,
    },

    /// Relay check: the packet's hop count reached zero.
    #[error("hop limit reached")]
    HopLimitReached,

    /// Relay check: the packet's accumulated age reached the 24h cap.
    #[error("age limit reached: {current} minutes >= {max} minute cap")]
    AgeLimitReached {
        /// Current accumulated age in minutes.
        current: u16,
        /// The cap that was exceeded.
        max: u16,
    },

    /// Relay check: combined hop/age expiry (see
    /// [`crate::header::HeaderVariant::is_expired`]).
    #[error("message expired")]
    MessageExpired,
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
