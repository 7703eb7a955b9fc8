//! AES-256 block cipher, the shared primitive behind both pipelines

use aes::cipher::{InnerIvInit, KeyInit};
use aes::Aes256;
use aes_gcm::Aes256Gcm;

use crate::error::{CryptoError, CryptoResult};
use crate::{BLOCK_SIZE, KEY_SIZE};

/// AES-256 in CTR mode with a 128-bit big-endian counter.
pub type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// A keyed AES-256 transform. Cheap to clone; holds only the key schedule.
#[derive(Clone)]
pub struct BlockCipher {
    inner: Aes256,
}

impl BlockCipher {
    /// Key a new block cipher. `key` must be exactly [`KEY_SIZE`] bytes.
    pub fn new(key: &[u8]) -> CryptoResult<Self> {
        let inner = Aes256::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_SIZE,
            actual: key.len(),
        })?;
        Ok(Self { inner })
    }

    pub fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// AES-256-GCM over this key (12-byte nonce, 16-byte tag).
    pub fn aead(&self) -> Aes256Gcm {
        Aes256Gcm::from(self.inner.clone())
    }

    /// CTR keystream starting at `iv`.
    pub fn keystream(&self, iv: &[u8; BLOCK_SIZE]) -> Aes256Ctr {
        Aes256Ctr::from_core(ctr::CtrCore::inner_iv_init(self.inner.clone(), iv.into()))
    }
}

impl std::fmt::Debug for BlockCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockCipher")
            .field("algorithm", &"AES-256")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::cipher::StreamCipher;

    #[test]
    fn test_new_accepts_32_byte_key() {
        let cipher = BlockCipher::new(&[7u8; KEY_SIZE]).unwrap();
        assert_eq!(cipher.block_size(), 16);
    }

    #[test]
    fn test_new_rejects_wrong_key_length() {
        for len in [0usize, 16, 24, 31, 33] {
            let result = BlockCipher::new(&vec![0u8; len]);
            assert!(
                matches!(
                    result,
                    Err(CryptoError::InvalidKeyLength { expected: 32, actual }) if actual == len
                ),
                "key of {len} bytes must be rejected"
            );
        }
    }

    #[test]
    fn test_ctr_nist_sp800_38a_vector() {
        // NIST SP 800-38A F.5.5 CTR-AES256.Encrypt, first block
        let key: [u8; 32] = [
            0x60, 0x3d, 0xeb, 0x10, 0x15, 0xca, 0x71, 0xbe, 0x2b, 0x73, 0xae, 0xf0, 0x85, 0x7d,
            0x77, 0x81, 0x1f, 0x35, 0x2c, 0x07, 0x3b, 0x61, 0x08, 0xd7, 0x2d, 0x98, 0x10, 0xa3,
            0x09, 0x14, 0xdf, 0xf4,
        ];
        let iv: [u8; 16] = [
            0xf0, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8, 0xf9, 0xfa, 0xfb, 0xfc, 0xfd,
            0xfe, 0xff,
        ];
        let mut block: [u8; 16] = [
            0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93,
            0x17, 0x2a,
        ];
        let expected: [u8; 16] = [
            0x60, 0x1e, 0xc3, 0x13, 0x77, 0x57, 0x89, 0xa5, 0xb7, 0xa7, 0xf5, 0x04, 0xbb, 0xf3,
            0xd2, 0x28,
        ];

        let cipher = BlockCipher::new(&key).unwrap();
        cipher.keystream(&iv).apply_keystream(&mut block);

        assert_eq!(block, expected);
    }

    #[test]
    fn test_keystream_is_deterministic_per_iv() {
        let cipher = BlockCipher::new(&[1u8; KEY_SIZE]).unwrap();
        let mut a = [0u8; 48];
        let mut b = [0u8; 48];
        let mut c = [0u8; 48];

        cipher.keystream(&[9u8; 16]).apply_keystream(&mut a);
        cipher.keystream(&[9u8; 16]).apply_keystream(&mut b);
        cipher.keystream(&[8u8; 16]).apply_keystream(&mut c);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
