//! AES-GCM authenticated encryption, selecting AES-128 or AES-256 from key
//! length. All functions are pure: the nonce is either caller-supplied or
//! drawn from a cryptographically-secure RNG at the call site, never from
//! hidden state.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};
use bitpack_core::HeaderVariant;
use rand::RngCore;

use crate::error::{CryptoError, Result};
use crate::kdf::{KEY_LEN_128, KEY_LEN_256};

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Draw a random 12-byte nonce from a cryptographically-secure RNG.
#[must_use]
pub fn random_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Encrypt `plaintext` under `key`, with optional associated data.
///
/// `nonce` is drawn from [`random_nonce`] when `None`. Output is
/// `nonce || ciphertext || tag`.
///
/// # Errors
///
/// Returns [`CryptoError::ArgumentOutOfRange`] if `key.len()` is neither
/// [`KEY_LEN_128`] nor [`KEY_LEN_256`].
pub fn encrypt(key: &[u8], plaintext: &[u8], nonce: Option<[u8; NONCE_LEN]>, aad: &[u8]) -> Result<Vec<u8>> {
    let nonce_bytes = nonce.unwrap_or_else(random_nonce);
    let payload = Payload { msg: plaintext, aad };
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = match key.len() {
        KEY_LEN_128 => {
            let Ok(cipher) = Aes128Gcm::new_from_slice(key) else {
                unreachable!("key length was just checked to be KEY_LEN_128");
            };
            let Ok(ciphertext) = cipher.encrypt(nonce, payload) else {
                unreachable!("AES-GCM encryption cannot fail with valid inputs");
            };
            ciphertext
        }
        KEY_LEN_256 => {
            let Ok(cipher) = Aes256Gcm::new_from_slice(key) else {
                unreachable!("key length was just checked to be KEY_LEN_256");
            };
            let Ok(ciphertext) = cipher.encrypt(nonce, payload) else {
                unreachable!("AES-GCM encryption cannot fail with valid inputs");
            };
            ciphertext
        }
        other => {
            return Err(CryptoError::ArgumentOutOfRange {
                field: "key",
                value: other as i64,
                expected: "16 or 32 bytes",
            });
        }
    };

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt `nonce || ciphertext || tag` under `key`, with optional
/// associated data that must match what was passed to [`encrypt`].
///
/// # Errors
///
/// Returns [`CryptoError::InsufficientData`] if `data` is shorter than
/// [`NONCE_LEN`] + [`TAG_LEN`], [`CryptoError::ArgumentOutOfRange`] if
/// `key.len()` is neither [`KEY_LEN_128`] nor [`KEY_LEN_256`], or
/// [`CryptoError::AuthenticationFailed`] on a wrong key, tampered
/// ciphertext or tag, or mismatched AAD.
pub fn decrypt(key: &[u8], data: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(CryptoError::InsufficientData { needed: NONCE_LEN + TAG_LEN, available: data.len() });
    }
    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);
    let payload = Payload { msg: ciphertext, aad };

    match key.len() {
        KEY_LEN_128 => {
            let Ok(cipher) = Aes128Gcm::new_from_slice(key) else {
                return Err(CryptoError::ArgumentOutOfRange {
                    field: "key",
                    value: key.len() as i64,
                    expected: "16 or 32 bytes",
                });
            };
            cipher.decrypt(nonce, payload).map_err(|_| CryptoError::AuthenticationFailed)
        }
        KEY_LEN_256 => {
            let Ok(cipher) = Aes256Gcm::new_from_slice(key) else {
                return Err(CryptoError::ArgumentOutOfRange {
                    field: "key",
                    value: key.len() as i64,
                    expected: "16 or 32 bytes",
                });
            };
            cipher.decrypt(nonce, payload).map_err(|_| CryptoError::AuthenticationFailed)
        }
        other => Err(CryptoError::ArgumentOutOfRange { field: "key", value: other as i64, expected: "16 or 32 bytes" }),
    }
}

/// Encrypt `plaintext`, binding `header`'s encoded bytes as AAD so a
/// tampered header cannot be paired with a legitimate payload.
///
/// # Errors
///
/// See [`encrypt`].
pub fn encrypt_with_header(
    key: &[u8],
    plaintext: &[u8],
    header: &impl HeaderVariant,
    nonce: Option<[u8; NONCE_LEN]>,
) -> Result<Vec<u8>> {
    encrypt(key, plaintext, nonce, &header.encode())
}

/// Decrypt a payload encrypted with [`encrypt_with_header`], verifying it
/// against the same header's encoded bytes.
///
/// # Errors
///
/// See [`decrypt`].
pub fn decrypt_with_header(key: &[u8], data: &[u8], header: &impl HeaderVariant) -> Result<Vec<u8>> {
    decrypt(key, data, &header.encode())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn scenario_d_output_length_is_nonce_plus_ciphertext_plus_tag() {
        // Scenario D: AES-GCM(key=K128, plaintext=5 bytes) -> output length 33.
        let key = [0u8; KEY_LEN_128];
        let output = encrypt(&key, b"hello", None, b"").unwrap();
        assert_eq!(output.len(), NONCE_LEN + 5 + TAG_LEN);
        assert_eq!(output.len(), 33);
    }

    #[test]
    fn roundtrip_aes128() {
        let key = [7u8; KEY_LEN_128];
        let ciphertext = encrypt(&key, b"rescue needed", None, b"").unwrap();
        assert_eq!(decrypt(&key, &ciphertext, b"").unwrap(), b"rescue needed");
    }

    #[test]
    fn roundtrip_aes256() {
        let key = [9u8; KEY_LEN_256];
        let ciphertext = encrypt(&key, b"rescue needed", None, b"").unwrap();
        assert_eq!(decrypt(&key, &ciphertext, b"").unwrap(), b"rescue needed");
    }

    #[test]
    fn roundtrip_with_aad() {
        use bitpack_core::enums::{MessageType, SecurityMode};
        use bitpack_core::flags::PacketFlags;
        use bitpack_core::header::standard::StandardHeader;

        let key = [1u8; KEY_LEN_128];
        let header =
            StandardHeader::new(0, MessageType::TextShort, PacketFlags::default(), 5, 1, SecurityMode::Aes128Gcm, 7, 0)
                .unwrap();
        let ciphertext = encrypt_with_header(&key, b"payload", &header, None).unwrap();
        assert_eq!(decrypt_with_header(&key, &ciphertext, &header).unwrap(), b"payload");
    }

    #[test]
    fn tampered_header_fails_authentication() {
        use bitpack_core::enums::{MessageType, SecurityMode};
        use bitpack_core::flags::PacketFlags;
        use bitpack_core::header::standard::StandardHeader;

        let key = [1u8; KEY_LEN_128];
        let header =
            StandardHeader::new(0, MessageType::TextShort, PacketFlags::default(), 5, 1, SecurityMode::Aes128Gcm, 7, 0)
                .unwrap();
        let tampered =
            StandardHeader::new(0, MessageType::TextShort, PacketFlags::default(), 5, 2, SecurityMode::Aes128Gcm, 7, 0)
                .unwrap();
        let ciphertext = encrypt_with_header(&key, b"payload", &header, None).unwrap();
        assert_eq!(decrypt_with_header(&key, &ciphertext, &tampered), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let key = [1u8; KEY_LEN_128];
        let wrong_key = [2u8; KEY_LEN_128];
        let ciphertext = encrypt(&key, b"secret", None, b"").unwrap();
        assert_eq!(decrypt(&wrong_key, &ciphertext, b""), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn tampered_ciphertext_fails_authentication() {
        let key = [1u8; KEY_LEN_128];
        let mut ciphertext = encrypt(&key, b"secret", None, b"").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xFF;
        assert_eq!(decrypt(&key, &ciphertext, b""), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn mismatched_aad_fails_authentication() {
        let key = [1u8; KEY_LEN_128];
        let ciphertext = encrypt(&key, b"secret", None, b"header-a").unwrap();
        assert_eq!(decrypt(&key, &ciphertext, b"header-b"), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn short_input_is_insufficient_data() {
        let key = [1u8; KEY_LEN_128];
        assert!(matches!(decrypt(&key, &[0u8; 10], b""), Err(CryptoError::InsufficientData { .. })));
    }

    #[test]
    fn unsupported_key_length_is_rejected() {
        let key = [1u8; 24];
        assert!(matches!(encrypt(&key, b"x", None, b""), Err(CryptoError::ArgumentOutOfRange { .. })));
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_plaintext(plaintext in proptest::collection::vec(any::<u8>(), 0..128)) {
            let key = [3u8; KEY_LEN_128];
            let ciphertext = encrypt(&key, &plaintext, None, b"").unwrap();
            prop_assert_eq!(decrypt(&key, &ciphertext, b"").unwrap(), plaintext);
        }
    }
}
