//! Fuzz target for CompactHeader::decode, StandardHeader::decode, and
//! HeaderFactory::decode_with_payload.
//!
//! Runs all three decoders over the same arbitrary buffer: the per-variant
//! decoders must accept any input their length check lets through without
//! panicking, and the factory's mode-detecting dispatch must agree with
//! whichever variant it picks.

#![no_main]

use bitpack_core::header::{CompactHeader, HeaderFactory, HeaderVariant, StandardHeader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = CompactHeader::decode(data);
    let _ = StandardHeader::decode(data);

    if let Ok((header, rest)) = HeaderFactory::decode_with_payload(data) {
        assert!(rest.len() <= data.len());
        assert_eq!(header.size_in_bytes() + rest.len(), data.len());

        let reencoded = header.encode();
        assert_eq!(reencoded.len(), header.size_in_bytes());
    }

    if !data.is_empty() {
        let mode = HeaderFactory::detect_mode(data[0]);
        let _ = HeaderFactory::has_complete_header(data);
        let _ = mode;
    }
});
