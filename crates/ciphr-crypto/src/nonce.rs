//! Nonce/IV generation from the OS CSPRNG
//!
//! There is no usage counter. With 96-bit random GCM nonces, rotate the
//! password/salt pair after roughly 2^32 encryptions under one key.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};

/// Fill a fresh `n`-byte buffer from the OS random source.
pub fn random_bytes(n: usize) -> CryptoResult<Vec<u8>> {
    let mut buf = vec![0u8; n];
    fill(&mut buf)?;
    Ok(buf)
}

/// Fixed-size variant of [`random_bytes`].
pub fn random_array<const N: usize>() -> CryptoResult<[u8; N]> {
    let mut buf = [0u8; N];
    fill(&mut buf)?;
    Ok(buf)
}

fn fill(buf: &mut [u8]) -> CryptoResult<()> {
    OsRng.try_fill_bytes(buf).map_err(|e| {
        tracing::warn!(len = buf.len(), "failed to read random bytes: {e}");
        CryptoError::EntropyUnavailable(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes_length() {
        for n in [0usize, 1, 12, 16, 1000] {
            assert_eq!(random_bytes(n).unwrap().len(), n);
        }
    }

    #[test]
    fn test_random_bytes_differ() {
        let a = random_bytes(16).unwrap();
        let b = random_bytes(16).unwrap();
        assert_ne!(a, b, "two 128-bit draws must not collide");
    }

    #[test]
    fn test_random_array() {
        let a: [u8; 12] = random_array().unwrap();
        let b: [u8; 12] = random_array().unwrap();
        assert_ne!(a, b);
    }
}
