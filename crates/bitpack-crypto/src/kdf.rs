//! PBKDF2-HMAC-SHA256 key derivation.
//!
//! Pure functions: randomness (the salt, when not caller-supplied) is the
//! only external input, and it is always handed in by the caller rather
//! than read from a hidden RNG — the same "caller supplies randomness"
//! discipline as the rest of this crate's AEAD operations.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};

/// Default PBKDF2 round count: a balance of brute-force resistance against
/// the CPU budget of a mobile device doing this on the UI thread. Callers
/// running on more capable hardware, or needing resistance against a more
/// determined attacker, are free to raise it.
pub const DEFAULT_ITERATIONS: u32 = 10_000;
/// Lower bound accepted for `iterations`.
pub const MIN_ITERATIONS: u32 = 1_000;
/// Upper bound accepted for `iterations`.
pub const MAX_ITERATIONS: u32 = 1_000_000;
/// Default length, in bytes, for [`generate_salt`].
pub const DEFAULT_SALT_LEN: usize = 16;
/// Minimum salt length [`derive_key`] accepts.
pub const MIN_SALT_LEN: usize = 8;
/// AES-128 key length in bytes.
pub const KEY_LEN_128: usize = 16;
/// AES-256 key length in bytes.
pub const KEY_LEN_256: usize = 32;

/// Derive a symmetric key from a password and salt.
///
/// `key_len` is typically [`KEY_LEN_128`] or [`KEY_LEN_256`] (selecting
/// AES-128 or AES-256 in [`crate::aead`]), but any positive length is
/// accepted. The returned key is wrapped in [`Zeroizing`] so it is wiped
/// from memory when dropped.
///
/// # Errors
///
/// Returns [`CryptoError::KeyDerivationFailed`] if `password` is empty, if
/// `salt` is shorter than [`MIN_SALT_LEN`], if `key_len` is zero, or if
/// `iterations` falls outside `[`MIN_ITERATIONS`, `MAX_ITERATIONS`]`.
pub fn derive_key(password: &[u8], salt: &[u8], key_len: usize, iterations: u32) -> Result<Zeroizing<Vec<u8>>> {
    if password.is_empty() {
        return Err(CryptoError::KeyDerivationFailed {
            field: "password",
            value: 0,
            expected: "a non-empty password",
        });
    }
    if salt.len() < MIN_SALT_LEN {
        return Err(CryptoError::KeyDerivationFailed {
            field: "salt",
            value: salt.len() as i64,
            expected: "at least 8 bytes",
        });
    }
    if key_len == 0 {
        return Err(CryptoError::KeyDerivationFailed { field: "key_len", value: 0, expected: "a positive length" });
    }
    if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&iterations) {
        return Err(CryptoError::KeyDerivationFailed {
            field: "iterations",
            value: i64::from(iterations),
            expected: "1_000..=1_000_000",
        });
    }

    let mut key = vec![0u8; key_len];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
    Ok(Zeroizing::new(key))
}

/// Build the 20-byte deterministic salt `senderId[0..8] || recipientId[0..8]
/// || messageId_be32` used to bind a derived key to a specific (sender,
/// recipient, message) triple. Sender/recipient are zero-padded if shorter
/// than 8 bytes, and truncated if longer.
#[must_use]
pub fn create_message_salt(sender_id: &[u8], recipient_id: &[u8], message_id: u32) -> [u8; 20] {
    let mut salt = [0u8; 20];
    let sender_len = sender_id.len().min(8);
    let recipient_len = recipient_id.len().min(8);
    salt[0..sender_len].copy_from_slice(&sender_id[..sender_len]);
    salt[8..8 + recipient_len].copy_from_slice(&recipient_id[..recipient_len]);
    salt[16..20].copy_from_slice(&message_id.to_be_bytes());
    salt
}

/// Generate a cryptographically-secure random salt of [`DEFAULT_SALT_LEN`]
/// bytes.
#[must_use]
pub fn generate_salt() -> [u8; DEFAULT_SALT_LEN] {
    let mut salt = [0u8; DEFAULT_SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}
