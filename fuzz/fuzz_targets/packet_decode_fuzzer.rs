//! Fuzz target for Packet::decode
//!
//! Arbitrary byte sequences exercise header-variant detection, the
//! trailing CRC-8 check, and the Compact/Standard payload-length split.
//! The decoder should never panic: every malformed input is either
//! accepted as a packet or turned into a `CodecError`.

#![no_main]

use bitpack_core::Packet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(packet) = Packet::decode(data) {
        // A packet that decoded must re-encode to bytes the decoder
        // accepts again with an identical result.
        let reencoded = packet.encode();
        let redecoded = Packet::decode(&reencoded).expect("re-encoding a decoded packet must redecode");
        assert_eq!(redecoded, packet);

        // Decoding the payload as plaintext must never panic, even
        // when the header claims encryption (the caller's mistake to
        // make, not this crate's to crash on).
        let _ = packet.decode_payload();
    }
});
