//! SHA-256 file verification
//!
//! Files are streamed through the hasher, never loaded whole.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChecksumError {
    #[error("cannot read {} for hashing: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<ChecksumError> for ensurebin_core::EnsurebinError {
    fn from(err: ChecksumError) -> Self {
        let kind = match &err {
            ChecksumError::Unreadable { source, .. } => source.kind(),
        };
        ensurebin_core::EnsurebinError::IoError(io::Error::new(kind, err.to_string()))
    }
}

/// Hex-encoded SHA-256 of the file at `path`
pub fn sha256_file(path: &Path) -> Result<String, ChecksumError> {
    let unreadable = |source| ChecksumError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(unreadable)?;
    Ok(hex_digest(hasher))
}

/// Whether the file at `path` hashes to `expected` (hex, any case)
///
/// # Errors
///
/// [`ChecksumError::Unreadable`] when the file cannot be opened or read;
/// callers treat this as "not verified".
pub fn verify_checksum(path: &Path, expected: &str) -> Result<bool, ChecksumError> {
    let actual = sha256_file(path)?;
    Ok(actual.eq_ignore_ascii_case(expected.trim()))
}

pub(crate) fn hex_digest(hasher: Sha256) -> String {
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
