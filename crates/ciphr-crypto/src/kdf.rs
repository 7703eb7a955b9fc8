//! Key derivation: scrypt (password, salt) → 256-bit key

use scrypt::Params;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{CryptoError, CryptoResult};
use crate::KEY_SIZE;

/// Password and salt pair supplied by the caller.
///
/// Nothing here is cached: every derivation reads these bytes afresh.
#[derive(Clone)]
pub struct Credentials {
    password: Zeroizing<Vec<u8>>,
    salt: Vec<u8>,
}

impl Credentials {
    pub fn new(password: impl Into<Vec<u8>>, salt: impl Into<Vec<u8>>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
            salt: salt.into(),
        }
    }

    pub fn password(&self) -> &[u8] {
        &self.password
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"[REDACTED]")
            .field("salt_len", &self.salt.len())
            .finish()
    }
}

/// A 256-bit key derived from [`Credentials`].
///
/// Zeroized on drop to prevent secrets lingering in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// scrypt cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost N (default: 15, N = 32768)
    pub log_n: u8,
    /// Block size factor (default: 8)
    pub r: u32,
    /// Parallelization factor (default: 1)
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 15,
            r: 8,
            p: 1,
        }
    }
}

/// Derive a 256-bit key with the default scrypt cost (N=32768, r=8, p=1).
///
/// Deliberately slow; cache the result instead of calling this per request.
pub fn derive_key(credentials: &Credentials) -> CryptoResult<DerivedKey> {
    derive_key_with_params(credentials, &KdfParams::default())
}

/// Derive a 256-bit key with explicit scrypt cost parameters.
pub fn derive_key_with_params(
    credentials: &Credentials,
    params: &KdfParams,
) -> CryptoResult<DerivedKey> {
    if credentials.password().is_empty() {
        return Err(CryptoError::Configuration("password is empty".into()));
    }
    if credentials.salt().is_empty() {
        return Err(CryptoError::Configuration("salt is empty".into()));
    }

    let scrypt_params = Params::new(params.log_n, params.r, params.p, KEY_SIZE)
        .map_err(|e| CryptoError::Configuration(format!("invalid scrypt params: {e}")))?;

    let mut key = [0u8; KEY_SIZE];
    scrypt::scrypt(
        credentials.password(),
        credentials.salt(),
        &scrypt_params,
        &mut key,
    )
    .map_err(|e| CryptoError::Configuration(format!("scrypt output length rejected: {e}")))?;

    tracing::debug!(log_n = params.log_n, r = params.r, p = params.p, "derived key");
    Ok(DerivedKey::from_bytes(key))
}
