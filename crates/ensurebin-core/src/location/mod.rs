//! Location record - persisted pointer to the last resolved binary
//!
//! The record is a small TOML file (`location.toml`) living in the package's
//! lib directory:
//!
//! ```toml
//! location = "bin/phantomjs"
//! platform = "linux"
//! arch = "x64"
//! source = "download"
//! resolved_at = "2026-01-15T10:00:00Z"
//! ```
//!
//! `location` is relative to the directory containing the record (or
//! absolute when the binary lives on another root). `platform`/`arch` are
//! only written when both are identifier-safe (ASCII alphanumeric), so odd
//! override values can never corrupt the file; a record without them never
//! matches a target and is ignored by readers.
//!
//! Reading never fails: a missing or malformed record is simply "no record".

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{EnsurebinError, Result};
use crate::path::{has_absolute_or_rooted_component, normalize_lexically, relative_path};
use crate::platform::PlatformArch;

/// Which ladder step produced the recorded binary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BinarySource {
    /// Previously recorded binary, re-verified
    Local,
    /// Standalone binary found on the search path
    Path,
    /// Binary owned by a prior global install, found through its wrapper
    Global,
    /// Freshly downloaded
    Download,
}

impl fmt::Display for BinarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinarySource::Local => write!(f, "local"),
            BinarySource::Path => write!(f, "path"),
            BinarySource::Global => write!(f, "global"),
            BinarySource::Download => write!(f, "download"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationRecord {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<BinarySource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A record read back from disk with its location resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBinary {
    pub path: PathBuf,
    pub record: LocationRecord,
}

impl LocationRecord {
    pub fn new(location: &Path, target: &PlatformArch, source: BinarySource) -> Result<Self> {
        let location = location
            .to_str()
            .ok_or_else(|| {
                EnsurebinError::LocationWriteError(format!(
                    "binary path is not valid UTF-8: {}",
                    location.display()
                ))
            })?
            .to_string();

        let platform = target.platform.as_str();
        let arch = target.arch.as_str();
        let (platform, arch) = if is_identifier_safe(platform) && is_identifier_safe(arch) {
            (Some(platform.to_string()), Some(arch.to_string()))
        } else {
            (None, None)
        };

        Ok(Self {
            location,
            platform,
            arch,
            source: Some(source),
            resolved_at: Some(Utc::now()),
        })
    }

    pub fn matches(&self, target: &PlatformArch) -> bool {
        self.platform.as_deref() == Some(target.platform.as_str())
            && self.arch.as_deref() == Some(target.arch.as_str())
    }
}

impl RecordedBinary {
    pub fn matches(&self, target: &PlatformArch) -> bool {
        self.record.matches(target)
    }
}

fn is_identifier_safe(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Writes the record at `record_path`, replacing any previous one
///
/// `binary` may be absolute or relative to the record's directory.
pub fn write_location(
    record_path: &Path,
    binary: &Path,
    target: &PlatformArch,
    source: BinarySource,
) -> Result<LocationRecord> {
    let record_dir = record_dir(record_path);
    let location = if has_absolute_or_rooted_component(binary) {
        relative_path(&std::path::absolute(&record_dir)?, binary)
    } else {
        binary.to_path_buf()
    };

    let record = LocationRecord::new(&location, target, source)?;
    let content = toml::to_string(&record)
        .map_err(|e| EnsurebinError::LocationWriteError(format!("Failed to serialize: {e}")))?;

    debug!("Writing location record {}", record_path.display());
    atomic_write(&content, record_path, &record_dir)?;
    Ok(record)
}

/// Reads the record at `record_path`, resolving its location
///
/// Returns `None` when the file is missing or malformed.
pub fn read_location(record_path: &Path) -> Option<RecordedBinary> {
    let content = std::fs::read_to_string(record_path).ok()?;
    let record: LocationRecord = match toml::from_str(&content) {
        Ok(record) => record,
        Err(e) => {
            debug!(
                "Ignoring malformed location record {}: {}",
                record_path.display(),
                e
            );
            return None;
        }
    };

    let path = normalize_lexically(&record_dir(record_path).join(&record.location));
    Some(RecordedBinary { path, record })
}

/// Binary recorded in `record_path`, for downstream callers
///
/// # Errors
///
/// `LOCATION_NOT_FOUND` when there is no readable record or the recorded
/// file no longer exists.
pub fn resolved_binary(record_path: &Path) -> Result<RecordedBinary> {
    read_location(record_path)
        .filter(|recorded| recorded.path.is_file())
        .ok_or_else(|| EnsurebinError::LocationNotFound {
            path: record_path.to_path_buf(),
        })
}

fn record_dir(record_path: &Path) -> PathBuf {
    record_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn atomic_write(content: &str, path: &Path, parent: &Path) -> Result<()> {
    let write_err = |what: &str, e: std::io::Error| {
        EnsurebinError::LocationWriteError(format!("{what} {}: {e}", path.display()))
    };

    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    std::fs::create_dir_all(parent).map_err(|e| write_err("Failed to create directory for", e))?;

    let mut temp_file =
        NamedTempFile::new_in(parent).map_err(|e| write_err("Failed to stage", e))?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| write_err("Failed to write", e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| write_err("Failed to sync", e))?;
    temp_file
        .persist(path)
        .map_err(|e| write_err("Failed to persist", e.error))?;

    Ok(())
}
