//! Fuzz target for challenge::verify_or_throw
//!
//! Arbitrary ciphertexts and keys must never panic the challenge-block
//! verifier, regardless of key length, truncation, or a magic prefix
//! that happens to collide by chance. A genuine challenge block created
//! under the same key must always verify.

#![no_main]

use arbitrary::Arbitrary;
use bitpack_crypto::challenge;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    key: Vec<u8>,
    ciphertext: Vec<u8>,
    suffix: [u8; challenge::RANDOM_SUFFIX_LEN],
}

fuzz_target!(|input: Input| {
    let _ = challenge::verify(&input.ciphertext, &input.key);
    let _ = challenge::verify_or_throw(&input.ciphertext, &input.key);

    if input.key.len() != 16 && input.key.len() != 32 {
        assert!(challenge::create_with_suffix(&input.key, input.suffix).is_err());
        return;
    }

    let genuine = challenge::create_with_suffix(&input.key, input.suffix).expect("valid key length must succeed");
    assert!(challenge::verify(&genuine, &input.key));
    assert!(challenge::verify_or_throw(&genuine, &input.key).is_ok());

    let last = genuine.len() - 1;
    let mut tampered = genuine.clone();
    tampered[last] ^= 0xFF;
    assert!(!challenge::verify(&tampered, &input.key));
});
