//! The facade's error type: a thin `From`-based join of `bitpack-core`'s
//! and `bitpack-crypto`'s error enums, converted at the boundary rather
//! than matched as one combined type.

use thiserror::Error;

/// Failures that can occur while sealing or opening an [`crate::Envelope`].
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EnvelopeError {
    /// Header/payload encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] bitpack_core::CodecError),

    /// Key derivation, AEAD, or challenge-block verification failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] bitpack_crypto::CryptoError),

    /// A packet's header declares encryption but no key was supplied, or
    /// vice versa.
    #[error("security mode {security_mode:?} requires a key, none was supplied")]
    MissingKey {
        /// The packet's declared security mode.
        security_mode: bitpack_core::SecurityMode,
    },
}

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, EnvelopeError>;
