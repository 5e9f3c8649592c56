use ensurebin_core::EnsurebinError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Failures while acquiring the binary; all of them are fatal
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("request to {url} failed: {reason}")]
    Request { url: Url, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: Url, status: u16 },

    #[error("certificate chain for {url} contains a self-signed certificate")]
    SelfSignedCertificate { url: Url },

    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: Url,
        expected: String,
        actual: String,
    },

    #[error("no writable temp directory among: {}", join_paths(candidates))]
    NoWritableTempDir { candidates: Vec<PathBuf> },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl DownloadError {
    pub(crate) fn io(operation: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let operation = operation.into();
        move |source| DownloadError::Io { operation, source }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<DownloadError> for EnsurebinError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Request { url, reason } => EnsurebinError::DownloadFailed {
                url: url.to_string(),
                reason,
            },
            DownloadError::Status { url, status } => EnsurebinError::DownloadFailed {
                url: url.to_string(),
                reason: format!("server responded with HTTP {status}"),
            },
            DownloadError::SelfSignedCertificate { url } => {
                EnsurebinError::SelfSignedCertificate {
                    url: url.to_string(),
                }
            }
            DownloadError::ChecksumMismatch {
                url,
                expected,
                actual,
            } => EnsurebinError::ChecksumMismatch {
                url: url.to_string(),
                expected,
                actual,
            },
            DownloadError::NoWritableTempDir { candidates } => EnsurebinError::NoWritableTempDir {
                candidates: join_paths(&candidates),
            },
            err @ DownloadError::Io { .. } => EnsurebinError::InstallFailed(err.to_string()),
        }
    }
}
