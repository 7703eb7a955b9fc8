//! Credential-bound entry point for text and file encryption.
//!
//! Every call re-derives the key from the stored [`Credentials`]. Callers on
//! a hot path should derive once with [`Cipher::derive_key`] and use the
//! key-level functions in [`crate::text`] and [`crate::file`] directly.

use std::path::Path;

use crate::error::CryptoResult;
use crate::kdf::{derive_key_with_params, Credentials, DerivedKey, KdfParams};
use crate::stream::DEFAULT_CHUNK_SIZE;
use crate::{file, text};

#[derive(Debug, Clone)]
pub struct Cipher {
    credentials: Credentials,
    kdf_params: KdfParams,
    chunk_size: usize,
}

impl Cipher {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            kdf_params: KdfParams::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }

    /// Chunk size for file streaming; validated when a file operation runs.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf_params
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn derive_key(&self) -> CryptoResult<DerivedKey> {
        derive_key_with_params(&self.credentials, &self.kdf_params)
    }

    /// Encrypt a UTF-8 string into a `[nonce][ciphertext][tag]` envelope.
    pub fn encrypt_text(&self, plaintext: &str) -> CryptoResult<Vec<u8>> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// Decrypt an envelope whose plaintext must be UTF-8.
    pub fn decrypt_text(&self, envelope: &[u8]) -> CryptoResult<String> {
        let plaintext = self.decrypt_bytes(envelope)?;
        Ok(String::from_utf8(plaintext)?)
    }

    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = self.derive_key()?;
        text::encrypt_text(plaintext, &key)
    }

    pub fn decrypt_bytes(&self, envelope: &[u8]) -> CryptoResult<Vec<u8>> {
        let key = self.derive_key()?;
        text::decrypt_text(envelope, &key)
    }

    pub fn encrypt_file(&self, src: &Path, dst: &Path) -> CryptoResult<u64> {
        let key = self.derive_key()?;
        file::encrypt_file(&key, src, dst, self.chunk_size)
    }

    pub fn decrypt_file(&self, src: &Path, dst: &Path) -> CryptoResult<u64> {
        let key = self.derive_key()?;
        file::decrypt_file(&key, src, dst, self.chunk_size)
    }
}
