//! Zero-knowledge challenge block: proves possession of a shared secret
//! without disclosing it, by encrypting a magic-prefixed value the
//! verifier can recognize on successful decryption.

use rand::RngCore;

use crate::aead;
use crate::error::{CryptoError, Result};

/// The 8-byte magic prefix of a challenge block's plaintext: ASCII
/// `"BITPACK"` followed by a literal NUL byte.
pub const MAGIC: [u8; 8] = [0x42, 0x49, 0x54, 0x50, 0x41, 0x43, 0x4B, 0x00];
/// Length of the random suffix appended after [`MAGIC`].
pub const RANDOM_SUFFIX_LEN: usize = 8;
/// Plaintext length: [`MAGIC`] + [`RANDOM_SUFFIX_LEN`].
pub const PLAINTEXT_LEN: usize = MAGIC.len() + RANDOM_SUFFIX_LEN;
/// Ciphertext length: nonce + plaintext + tag.
pub const CIPHERTEXT_LEN: usize = aead::NONCE_LEN + PLAINTEXT_LEN + aead::TAG_LEN;

/// Encrypt a challenge block under `key`. The random suffix is drawn from
/// a cryptographically-secure RNG.
///
/// # Errors
///
/// Propagates [`CryptoError::ArgumentOutOfRange`] from [`aead::encrypt`]
/// if `key` is neither 16 nor 32 bytes.
pub fn create(key: &[u8]) -> Result<Vec<u8>> {
    let mut suffix = [0u8; RANDOM_SUFFIX_LEN];
    rand::thread_rng().fill_bytes(&mut suffix);
    create_with_suffix(key, suffix)
}

/// Encrypt a challenge block using a caller-supplied random suffix, for
/// deterministic testing.
///
/// # Errors
///
/// See [`create`].
pub fn create_with_suffix(key: &[u8], suffix: [u8; RANDOM_SUFFIX_LEN]) -> Result<Vec<u8>> {
    let mut plaintext = Vec::with_capacity(PLAINTEXT_LEN);
    plaintext.extend_from_slice(&MAGIC);
    plaintext.extend_from_slice(&suffix);
    aead::encrypt(key, &plaintext, None, b"")
}

/// Build a `(ciphertext, expected_plaintext)` pair for transports that
/// want to cache the expected response rather than re-derive it.
///
/// # Errors
///
/// See [`create`].
pub fn create_pair(key: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut suffix = [0u8; RANDOM_SUFFIX_LEN];
    rand::thread_rng().fill_bytes(&mut suffix);
    let ciphertext = create_with_suffix(key, suffix)?;
    let mut expected_plaintext = Vec::with_capacity(PLAINTEXT_LEN);
    expected_plaintext.extend_from_slice(&MAGIC);
    expected_plaintext.extend_from_slice(&suffix);
    Ok((ciphertext, expected_plaintext))
}

/// Verify a challenge block, swallowing every failure mode into `false`
/// (wrong key, tampered ciphertext, or a decrypted plaintext that does
/// not start with [`MAGIC`]). Use [`verify_or_throw`] when the caller
/// needs to distinguish the failure.
#[must_use]
pub fn verify(ciphertext: &[u8], key: &[u8]) -> bool {
    verify_or_throw(ciphertext, key).is_ok()
}

/// Verify a challenge block, surfacing the failure.
///
/// # Errors
///
/// Returns [`CryptoError::ChallengeVerificationFailed`] if decryption
/// fails or the decrypted plaintext does not start with [`MAGIC`].
pub fn verify_or_throw(ciphertext: &[u8], key: &[u8]) -> Result<()> {
    let plaintext = aead::decrypt(key, ciphertext, b"").map_err(|_| CryptoError::ChallengeVerificationFailed)?;
    if plaintext.len() >= MAGIC.len() && plaintext[..MAGIC.len()] == MAGIC[..] {
        Ok(())
    } else {
        Err(CryptoError::ChallengeVerificationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::KEY_LEN_128;

    #[test]
    fn scenario_e_create_then_verify_succeeds() {
        // Scenario E: ChallengeBlock.create(K) -> verify(ct, K).
        let key = [5u8; KEY_LEN_128];
        let ciphertext = create(&key).unwrap();
        assert_eq!(ciphertext.len(), 44);
        assert_eq!(ciphertext.len(), CIPHERTEXT_LEN);
        assert!(verify(&ciphertext, &key));

        let plaintext = aead::decrypt(&key, &ciphertext, b"").unwrap();
        assert!(plaintext.starts_with(b"BITPACK\0"));
    }

    #[test]
    fn scenario_e_plaintext_layout_hex_snapshot() {
        // The ciphertext itself is not deterministic (the nonce is drawn
        // fresh each call), so the magic+suffix plaintext layout — not
        // the ciphertext — is what gets pinned here.
        let suffix = [0xAAu8; RANDOM_SUFFIX_LEN];
        let mut plaintext = Vec::with_capacity(PLAINTEXT_LEN);
        plaintext.extend_from_slice(&MAGIC);
        plaintext.extend_from_slice(&suffix);
        insta::assert_snapshot!(hex::encode(&plaintext), @"4249545041434b00aaaaaaaaaaaaaaaa");
    }

    #[test]
    fn wrong_key_fails_verification() {
        let key = [5u8; KEY_LEN_128];
        let wrong_key = [6u8; KEY_LEN_128];
        let ciphertext = create(&key).unwrap();
        assert!(!verify(&ciphertext, &wrong_key));
        assert!(verify_or_throw(&ciphertext, &wrong_key).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails_verification() {
        let key = [5u8; KEY_LEN_128];
        let mut ciphertext = create(&key).unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xFF;
        assert!(!verify(&ciphertext, &key));
    }

    #[test]
    fn create_pair_returns_matching_expected_plaintext() {
        let key = [5u8; KEY_LEN_128];
        let (ciphertext, expected_plaintext) = create_pair(&key).unwrap();
        let decrypted = aead::decrypt(&key, &ciphertext, b"").unwrap();
        assert_eq!(decrypted, expected_plaintext);
        assert!(expected_plaintext.starts_with(&MAGIC));
    }

    #[test]
    fn verify_rejects_garbage_input() {
        let key = [5u8; KEY_LEN_128];
        assert!(!verify(&[0u8; 44], &key));
        assert!(!verify(&[], &key));
    }
}
