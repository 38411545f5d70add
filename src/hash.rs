//! Streaming content digests for monitored files.
//!
//! Files are read in bounded chunks and fed incrementally into the selected
//! algorithm, so hashing never loads a whole file into memory. The algorithm
//! is an explicit configuration choice: baselines hashed with different
//! algorithms are not comparable, so nothing here defaults silently.

use crate::error::FimError;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default read chunk size for streaming digests (bytes).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Supported digest algorithms.
///
/// `Sha256` is the strong default, `Blake3` a modern fast alternative, and
/// `Md5` a legacy option kept for compatibility with existing baselines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Blake3,
    Md5,
}

impl HashAlgorithm {
    /// Length of the hex digest string this algorithm produces.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Blake3 => 64,
            HashAlgorithm::Md5 => 32,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
            HashAlgorithm::Md5 => write!(f, "md5"),
        }
    }
}

enum StreamingHasher {
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
    Md5(Md5),
}

impl StreamingHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => StreamingHasher::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => StreamingHasher::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Md5 => StreamingHasher::Md5(Md5::new()),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            StreamingHasher::Sha256(h) => h.update(bytes),
            StreamingHasher::Blake3(h) => {
                h.update(bytes);
            }
            StreamingHasher::Md5(h) => h.update(bytes),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            StreamingHasher::Sha256(h) => hex::encode(h.finalize()),
            StreamingHasher::Blake3(h) => h.finalize().to_hex().to_string(),
            StreamingHasher::Md5(h) => hex::encode(h.finalize()),
        }
    }
}

/// Compute the hex digest of a file's content by streaming `chunk_size`
/// reads through `algorithm`.
///
/// Fails with [`FimError::FileAccess`] if the file cannot be opened or a
/// read fails mid-stream; the caller decides whether that is recoverable.
pub fn digest_file(
    path: &Path,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> Result<String, FimError> {
    let mut file = File::open(path).map_err(|source| FimError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = StreamingHasher::new(algorithm);
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|source| FimError::FileAccess {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hasher.finalize_hex())
}

/// Compute the hex digest of an in-memory buffer. Used by tests and callers
/// that already hold the content.
pub fn digest_bytes(bytes: &[u8], algorithm: HashAlgorithm) -> String {
    let mut hasher = StreamingHasher::new(algorithm);
    hasher.update(bytes);
    hasher.finalize_hex()
}
