//! AES-256-CTR encryption of arbitrary-size byte streams
//!
//! Encrypted stream format (binary):
//! ```text
//! [N bytes: ciphertext][16 bytes: IV]
//! ```
//!
//! The IV trails the body, so decryption needs random access to the source.
//! There is no header, length prefix, or integrity tag: a tampered body
//! decrypts to garbage without error.

use std::io::{self, Read, Seek, SeekFrom, Write};

use aes::cipher::StreamCipher;
use zeroize::Zeroizing;

use crate::block::BlockCipher;
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::DerivedKey;
use crate::nonce::random_array;
use crate::BLOCK_SIZE;

/// Default read buffer size (64 AES blocks).
pub const DEFAULT_CHUNK_SIZE: usize = BLOCK_SIZE * 64;

/// Encrypt everything `reader` yields into `writer`, then append the IV.
///
/// Returns the number of plaintext bytes encrypted. On error, whatever was
/// already written to `writer` stays there.
pub fn encrypt_stream<R: Read, W: Write>(
    key: &DerivedKey,
    mut reader: R,
    mut writer: W,
    chunk_size: usize,
) -> CryptoResult<u64> {
    check_chunk_size(chunk_size)?;

    let block = BlockCipher::new(key.as_bytes())?;
    let iv: [u8; BLOCK_SIZE] = random_array()?;
    let mut keystream = block.keystream(&iv);

    let mut buf = Zeroizing::new(vec![0u8; chunk_size]);
    let mut total = 0u64;
    loop {
        let n = read_chunk(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        keystream.apply_keystream(&mut buf[..n]);
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }

    writer.write_all(&iv)?;
    writer.flush()?;

    tracing::debug!(bytes = total, chunk_size, "stream encrypted");
    Ok(total)
}

/// Decrypt a stream produced by [`encrypt_stream`].
///
/// Reads the trailing IV first, then rewinds and decrypts the body. The IV
/// bytes are never passed through the keystream or written out.
pub fn decrypt_stream<R: Read + Seek, W: Write>(
    key: &DerivedKey,
    mut reader: R,
    mut writer: W,
    chunk_size: usize,
) -> CryptoResult<u64> {
    check_chunk_size(chunk_size)?;

    let length = reader.seek(SeekFrom::End(0))?;
    if length < BLOCK_SIZE as u64 {
        return Err(CryptoError::TruncatedInput {
            actual: length,
            iv_size: BLOCK_SIZE,
        });
    }
    let message_len = length - BLOCK_SIZE as u64;

    let mut iv = [0u8; BLOCK_SIZE];
    reader.seek(SeekFrom::Start(message_len))?;
    reader.read_exact(&mut iv)?;

    let block = BlockCipher::new(key.as_bytes())?;
    let mut keystream = block.keystream(&iv);

    reader.seek(SeekFrom::Start(0))?;
    let mut body = reader.take(message_len);

    let mut buf = Zeroizing::new(vec![0u8; chunk_size]);
    let mut total = 0u64;
    loop {
        let n = read_chunk(&mut body, &mut buf)?;
        if n == 0 {
            break;
        }
        keystream.apply_keystream(&mut buf[..n]);
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
    writer.flush()?;

    if total != message_len {
        return Err(CryptoError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("source shrank during decryption: read {total} of {message_len} bytes"),
        )));
    }

    tracing::debug!(bytes = total, chunk_size, "stream decrypted");
    Ok(total)
}

fn check_chunk_size(chunk_size: usize) -> CryptoResult<()> {
    if chunk_size == 0 || chunk_size % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidChunkSize(chunk_size));
    }
    Ok(())
}

/// One read, retried on `Interrupted`. Returns 0 only at end of stream.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
