//! Bit-packed header, payload, and packet codecs for the BitPack mesh
//! protocol.
//!
//! This crate is the wire-format core described in layers L0-L3 and L5 of
//! the protocol design: big-endian bit primitives, the Compact/Standard
//! header variants, the typed payload codecs, and the `Packet` that
//! composes a header, a payload region, and a trailing CRC-8 into one
//! frame. It knows nothing about encryption — `Packet`'s payload region is
//! an opaque byte blob whether or not it happens to be an AEAD ciphertext;
//! see the `bitpack-crypto` crate for that layer.
//!
//! Every entry point here is a pure function of its arguments. There are
//! no globals beyond a lazily built CRC-32 lookup table, no hidden clocks,
//! and no logging: malformed input is reported through [`error::CodecError`],
//! never printed or swallowed.

pub mod bcd;
pub mod bitwise;
pub mod crc;
pub mod enums;
pub mod error;
pub mod flags;
pub mod gps;
pub mod header;
pub mod packet;
pub mod payloads;
pub mod varint;

pub use enums::{AckStatus, CountryCode, MessageType, PacketMode, SecurityMode, SosType};
pub use error::{CodecError, Result};
pub use flags::PacketFlags;
pub use gps::Gps;
pub use header::{AutoHeaderFields, CompactHeader, Header, HeaderFactory, HeaderVariant, StandardHeader};
pub use packet::Packet;
pub use payloads::{AckPayload, InternationalBcd, LocationPayload, NackPayload, PayloadKind, SosPayload, TextPayload};
