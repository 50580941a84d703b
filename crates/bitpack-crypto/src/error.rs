//! Typed failure modes for key derivation, AEAD, and the challenge block.

use thiserror::Error;

/// Failure kinds surfaced by this crate. Deliberately disjoint from
/// [`bitpack_core::CodecError`]: encryption/derivation failures and
/// wire-decoding failures are never the same kind of problem, so callers
/// convert at the boundary instead of matching one combined enum.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CryptoError {
    /// A construction-time argument was outside its valid range.
    #[error("{field} out of range: {value} ({expected})")]
    ArgumentOutOfRange {
        /// Name of the invalid field.
        field: &'static str,
        /// The value supplied.
        value: i64,
        /// A human-readable description of the valid range.
        expected: &'static str,
    },

    /// PBKDF2 parameter validation or primitive failure: an empty
    /// password, an undersized salt, a zero key length, or an iteration
    /// count outside the accepted range.
    #[error("key derivation failed: {field} out of range: {value} ({expected})")]
    KeyDerivationFailed {
        /// Name of the invalid PBKDF2 parameter.
        field: &'static str,
        /// The value supplied.
        value: i64,
        /// A human-readable description of the valid range.
        expected: &'static str,
    },

    /// Input shorter than the minimum the operation requires.
    #[error("insufficient data: needed at least {needed} bytes, got {available}")]
    InsufficientData {
        /// Minimum byte count required.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// AES-GCM decryption failed: wrong key, tampered ciphertext or tag,
    /// or mismatched AAD. Deliberately does not distinguish which, to
    /// avoid leaking an oracle to an attacker.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Challenge-block verification failed: decryption failed, or the
    /// decrypted plaintext did not start with the expected magic.
    #[error("challenge verification failed")]
    ChallengeVerificationFailed,
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
