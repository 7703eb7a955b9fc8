//! File-path wrappers around the stream pipeline
//!
//! Destinations are created or truncated with owner-only permissions on
//! Unix. Nothing is written atomically: on error the destination may hold
//! partial output, and removing it is the caller's job. A source and
//! destination naming the same file are rejected before anything is opened
//! for writing.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use crate::error::CryptoResult;
use crate::kdf::DerivedKey;
use crate::stream::{decrypt_stream, encrypt_stream};

/// Encrypt `src` into `dst` as `[ciphertext][IV]`. Returns plaintext bytes read.
pub fn encrypt_file(
    key: &DerivedKey,
    src: &Path,
    dst: &Path,
    chunk_size: usize,
) -> CryptoResult<u64> {
    ensure_distinct(src, dst)?;
    let input = BufReader::new(File::open(src)?);
    let output = BufWriter::new(create_destination(dst)?);

    let bytes = encrypt_stream(key, input, output, chunk_size)?;
    tracing::info!(src = %src.display(), dst = %dst.display(), bytes, "file encrypted");
    Ok(bytes)
}

/// Decrypt a file produced by [`encrypt_file`]. Returns plaintext bytes written.
pub fn decrypt_file(
    key: &DerivedKey,
    src: &Path,
    dst: &Path,
    chunk_size: usize,
) -> CryptoResult<u64> {
    ensure_distinct(src, dst)?;
    let input = BufReader::new(File::open(src)?);
    let output = BufWriter::new(create_destination(dst)?);

    let bytes = decrypt_stream(key, input, output, chunk_size)?;
    tracing::info!(src = %src.display(), dst = %dst.display(), bytes, "file decrypted");
    Ok(bytes)
}

/// Truncating `dst` would destroy `src` before it is read.
fn ensure_distinct(src: &Path, dst: &Path) -> io::Result<()> {
    let (Ok(src_meta), Ok(dst_meta)) = (std::fs::metadata(src), std::fs::metadata(dst)) else {
        // A missing side cannot alias; File::open reports a missing source
        return Ok(());
    };

    #[cfg(unix)]
    let same = {
        use std::os::unix::fs::MetadataExt;
        src_meta.dev() == dst_meta.dev() && src_meta.ino() == dst_meta.ino()
    };
    #[cfg(not(unix))]
    let same = {
        let _ = (src_meta, dst_meta);
        std::fs::canonicalize(src)? == std::fs::canonicalize(dst)?
    };

    if same {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "source and destination are the same file",
        ));
    }
    Ok(())
}

fn create_destination(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
