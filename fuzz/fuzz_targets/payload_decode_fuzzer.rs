//! Fuzz target for PayloadKind::decode
//!
//! Drives every message type's typed payload decoder (SOS, location,
//! text, ack/nack, challenge) over arbitrary bytes in both Compact and
//! Standard framing. Type confusion (wrong decoder for the byte length
//! at hand) and truncated/oversized buffers must surface as
//! `CodecError`, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use bitpack_core::enums::MessageType;
use bitpack_core::payloads::PayloadKind;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    type_code: u8,
    is_compact: bool,
    bytes: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let Ok(message_type) = MessageType::from_code(input.type_code % 8) else {
        return;
    };

    if let Ok(decoded) = PayloadKind::decode(message_type, input.is_compact, &input.bytes) {
        assert_eq!(decoded.message_type(), message_type);

        // A successfully decoded payload must re-encode to bytes that
        // decode back to an equal value.
        let reencoded = decoded.encode();
        let redecoded =
            PayloadKind::decode(message_type, input.is_compact, &reencoded).expect("re-encoded payload must redecode");
        assert_eq!(redecoded.message_type(), decoded.message_type());
    }
});
