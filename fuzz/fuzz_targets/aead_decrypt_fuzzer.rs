//! Fuzz target for aead::decrypt
//!
//! Arbitrary keys, ciphertexts, and AAD must never panic the AES-GCM
//! decoder: too-short input, a wrong key length, or a corrupted tag are
//! all `CryptoError`, not a crash. When the ciphertext happens to be a
//! genuine encryption under the same key and AAD, decryption must
//! recover the original plaintext.

#![no_main]

use arbitrary::Arbitrary;
use bitpack_crypto::aead;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    key: Vec<u8>,
    data: Vec<u8>,
    aad: Vec<u8>,
    plaintext: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let _ = aead::decrypt(&input.key, &input.data, &input.aad);

    // Only 16- and 32-byte keys are valid; anything else must be
    // rejected rather than accepted or panicked on.
    if input.key.len() != 16 && input.key.len() != 32 {
        assert!(aead::encrypt(&input.key, &input.plaintext, None, &input.aad).is_err());
        return;
    }

    let Ok(ciphertext) = aead::encrypt(&input.key, &input.plaintext, None, &input.aad) else {
        return;
    };
    let recovered = aead::decrypt(&input.key, &ciphertext, &input.aad).expect("decrypting a genuine ciphertext must succeed");
    assert_eq!(recovered, input.plaintext);

    // Flipping any ciphertext byte must break authentication.
    if !ciphertext.is_empty() {
        let mut tampered = ciphertext.clone();
        let index = input.data.len() % tampered.len();
        tampered[index] ^= 0x01;
        assert!(aead::decrypt(&input.key, &tampered, &input.aad).is_err());
    }
});
