use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("authentication failed: wrong key or corrupted envelope")]
    AuthenticationFailed,

    #[error("payload too large: {actual} bytes exceeds the {max}-byte AES-GCM limit")]
    PayloadTooLarge { actual: u64, max: u64 },

    #[error("malformed envelope: {actual} bytes is shorter than the {nonce_size}-byte nonce")]
    MalformedEnvelope { actual: usize, nonce_size: usize },

    #[error("truncated input: {actual} bytes is shorter than the {iv_size}-byte IV")]
    TruncatedInput { actual: u64, iv_size: usize },

    #[error("invalid chunk size {0}: must be a non-zero multiple of the block size")]
    InvalidChunkSize(usize),

    #[error("decrypted text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
