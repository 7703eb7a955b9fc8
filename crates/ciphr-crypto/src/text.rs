//! AES-256-GCM encryption of in-memory payloads
//!
//! Envelope format (binary):
//! ```text
//! [12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! No additional authenticated data is bound.

use aes_gcm::aead::Aead;
use aes_gcm::Nonce;

use crate::block::BlockCipher;
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::DerivedKey;
use crate::nonce::random_array;
use crate::{NONCE_SIZE, TAG_SIZE};

/// Largest plaintext AES-GCM can seal under one nonce (2^36 - 32 bytes).
pub const MAX_PLAINTEXT: u64 = (1 << 36) - 32;

/// Seal `plaintext` under `key`.
///
/// Returns: `[12-byte nonce][ciphertext][16-byte tag]`
pub fn encrypt_text(plaintext: &[u8], key: &DerivedKey) -> CryptoResult<Vec<u8>> {
    let actual = plaintext.len() as u64;
    check_plaintext_len(actual)?;

    let aead = BlockCipher::new(key.as_bytes())?.aead();
    let nonce_bytes: [u8; NONCE_SIZE] = random_array()?;

    // Sealing only fails on length, which was checked above
    let ciphertext = aead
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| CryptoError::PayloadTooLarge {
            actual,
            max: MAX_PLAINTEXT,
        })?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

fn check_plaintext_len(actual: u64) -> CryptoResult<()> {
    if actual > MAX_PLAINTEXT {
        return Err(CryptoError::PayloadTooLarge {
            actual,
            max: MAX_PLAINTEXT,
        });
    }
    Ok(())
}

/// Open an envelope produced by [`encrypt_text`].
///
/// Nothing is returned unless the tag verifies.
pub fn decrypt_text(envelope: &[u8], key: &DerivedKey) -> CryptoResult<Vec<u8>> {
    if envelope.len() < NONCE_SIZE {
        return Err(CryptoError::MalformedEnvelope {
            actual: envelope.len(),
            nonce_size: NONCE_SIZE,
        });
    }

    let aead = BlockCipher::new(key.as_bytes())?.aead();
    let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_SIZE);

    aead.decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| {
            tracing::debug!(
                envelope_len = envelope.len(),
                min_len = NONCE_SIZE + TAG_SIZE,
                "text envelope failed authentication"
            );
            CryptoError::AuthenticationFailed
        })
}
