//! ciphr-crypto: password-based symmetric encryption for text and files
//!
//! Pipeline:
//! ```text
//! Credentials (password, salt)
//!   └── scrypt (N=32768, r=8, p=1) → 256-bit DerivedKey
//!         └── AES-256 BlockCipher
//!               ├── Text: AES-256-GCM   → [12-byte nonce][ciphertext][16-byte tag]
//!               └── File: AES-256-CTR   → [ciphertext][16-byte IV]
//! ```
//!
//! Text envelopes are authenticated. File streams are NOT: the format is kept
//! bit-compatible with existing encrypted files, so tampering goes undetected.
//! A chunked AEAD construction would be needed to fix that.

pub mod block;
pub mod cipher;
pub mod error;
pub mod file;
pub mod kdf;
pub mod nonce;
pub mod stream;
pub mod text;

pub use block::BlockCipher;
pub use cipher::Cipher;
pub use error::{CryptoError, CryptoResult};
pub use file::{decrypt_file, encrypt_file};
pub use kdf::{derive_key, derive_key_with_params, Credentials, DerivedKey, KdfParams};
pub use nonce::random_bytes;
pub use stream::{decrypt_stream, encrypt_stream, DEFAULT_CHUNK_SIZE};
pub use text::{decrypt_text, encrypt_text};

/// Size of a derived key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// AES block size, and the size of the file IV
pub const BLOCK_SIZE: usize = 16;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;
