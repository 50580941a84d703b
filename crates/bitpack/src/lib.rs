//! Send/receive convenience pipeline for the BitPack mesh protocol.
//!
//! This crate is a thin orchestration layer: it owns no wire-format
//! knowledge beyond `bitpack-core` and no cryptographic primitives beyond
//! `bitpack-crypto`. [`Envelope::seal`] composes header construction,
//! optional AES-GCM encryption, and CRC framing into one call; the
//! returned [`bitpack_core::Packet`] is still a plain `bitpack-core`
//! value — this crate adds no new wire type of its own. [`Envelope::open`]
//! is the mirror image on receive.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod envelope;
mod error;

pub use envelope::{Envelope, SealFields};
pub use error::{EnvelopeError, Result};
