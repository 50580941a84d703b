//! Cryptographic envelope for the BitPack mesh protocol: PBKDF2 key
//! derivation, AES-GCM authenticated encryption, and a magic-prefix
//! challenge block for proving possession of a shared secret.
//!
//! Every function here is pure and single-threaded: randomness (nonces,
//! salts, the challenge block's suffix) is drawn from the platform's
//! secure RNG at the call site rather than cached behind any hidden
//! state, and the caller may always substitute their own bytes for
//! deterministic testing. PBKDF2 and AES-GCM are the only CPU-heavy
//! operations in the protocol; callers on latency-sensitive threads
//! should dispatch them to a worker rather than call them inline.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod challenge;
pub mod error;
pub mod kdf;

pub use error::{CryptoError, Result};
