use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::lock::LockError;

#[derive(Error, Debug)]
pub enum EnsurebinError {
    // Manifest errors
    #[error("MANIFEST_NOT_FOUND: {} does not exist", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("MANIFEST_INVALID: {0}")]
    ManifestInvalid(String),

    // Platform errors
    #[error(
        "UNSUPPORTED_PLATFORM: no {binary} binary is available for {platform}/{arch}; \
         install {binary} by other means and make sure it is on PATH"
    )]
    UnsupportedPlatform {
        binary: String,
        platform: String,
        arch: String,
    },

    // Transport errors
    #[error("DOWNLOAD_FAILED: {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error(
        "SELF_SIGNED_CERT_IN_CHAIN: the certificate chain for {url} contains a self-signed \
         certificate; pass your proxy's CA bundle with --ca/--cafile \
         (ENSUREBIN_CA/ENSUREBIN_CAFILE) or disable verification with --strict-ssl false"
    )]
    SelfSignedCertificate { url: String },

    #[error("CHECKSUM_MISMATCH: {url}: expected sha256 {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    // Filesystem errors
    #[error("NO_WRITABLE_TEMP_DIR: none of the candidate directories are writable: {candidates}")]
    NoWritableTempDir { candidates: String },

    #[error("INSTALL_FAILED: {0}")]
    InstallFailed(String),

    // Location record errors
    #[error("LOCATION_NOT_FOUND: no resolved binary recorded at {}", path.display())]
    LocationNotFound { path: PathBuf },

    #[error("LOCATION_WRITE_ERROR: {0}")]
    LocationWriteError(String),

    #[error("LOCK_ERROR: {0}")]
    Lock(#[from] LockError),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    Generic(String),
}

/// Coarse failure classes used when reporting a failed install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Filesystem,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration error"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Filesystem => write!(f, "filesystem error"),
            ErrorKind::Internal => write!(f, "internal error"),
        }
    }
}

impl EnsurebinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnsurebinError::ManifestNotFound { .. }
            | EnsurebinError::ManifestInvalid(_)
            | EnsurebinError::UnsupportedPlatform { .. } => ErrorKind::Configuration,
            EnsurebinError::DownloadFailed { .. }
            | EnsurebinError::SelfSignedCertificate { .. }
            | EnsurebinError::ChecksumMismatch { .. } => ErrorKind::Transport,
            EnsurebinError::NoWritableTempDir { .. }
            | EnsurebinError::InstallFailed(_)
            | EnsurebinError::LocationNotFound { .. }
            | EnsurebinError::LocationWriteError(_)
            | EnsurebinError::Lock(_)
            | EnsurebinError::IoError(_) => ErrorKind::Filesystem,
            EnsurebinError::Generic(_) => ErrorKind::Internal,
        }
    }
}

impl From<toml::de::Error> for EnsurebinError {
    fn from(err: toml::de::Error) -> Self {
        EnsurebinError::ManifestInvalid(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EnsurebinError>;
