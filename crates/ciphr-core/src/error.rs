use ciphr_crypto::CryptoError;
use thiserror::Error;

pub type CiphrResult<T> = Result<T, CiphrError>;

#[derive(Debug, Error)]
pub enum CiphrError {
    #[error("config error: {0}")]
    Config(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
