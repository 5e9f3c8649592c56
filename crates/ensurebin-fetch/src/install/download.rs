//! Verified binary download
//!
//! The artifact is streamed into a staging file while being hashed. Only a
//! file whose SHA-256 matches the platform table is made executable and
//! moved into the install directory; anything else is discarded.

use log::{debug, info};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use url::Url;

use super::DownloadError;
use crate::checksum::{ChecksumError, hex_digest, verify_checksum};
use crate::spec::DownloadSpec;

/// Transport seam: streams the body at a URL into a sink
pub trait Fetch {
    /// Writes the response body for `url` into `sink`, returning the byte count
    fn fetch(&self, url: &Url, sink: &mut dyn Write) -> Result<u64, DownloadError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &Url, sink: &mut dyn Write) -> Result<u64, DownloadError> {
        (**self).fetch(url, sink)
    }
}

/// Writer that hashes everything passing through it
struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
}

impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
        }
    }

    fn finish(self) -> String {
        hex_digest(self.hasher)
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Downloads `spec` and installs it at `destination`
///
/// 1. Streams the body into a staging file under `staging_dir`, hashing it
/// 2. Rejects the file unless the digest equals `spec.checksum`
/// 3. Sets the executable bits on Unix
/// 4. Atomically moves it to `destination`, creating parent directories
///
/// # Errors
///
/// Transport errors from `fetcher`, [`DownloadError::ChecksumMismatch`],
/// or [`DownloadError::Io`] for any filesystem step.
pub fn download_binary<F: Fetch>(
    fetcher: &F,
    spec: &DownloadSpec,
    staging_dir: &Path,
    destination: &Path,
) -> Result<PathBuf, DownloadError> {
    let mut staged = NamedTempFile::new_in(staging_dir).map_err(DownloadError::io(format!(
        "create staging file in {}",
        staging_dir.display()
    )))?;

    let mut writer = HashingWriter::new(staged.as_file_mut());
    let bytes = fetcher.fetch(&spec.url, &mut writer)?;
    writer
        .flush()
        .map_err(DownloadError::io("flush staging file"))?;
    let actual = writer.finish();

    if !actual.eq_ignore_ascii_case(&spec.checksum) {
        return Err(DownloadError::ChecksumMismatch {
            url: spec.url.clone(),
            expected: spec.checksum.clone(),
            actual,
        });
    }
    debug!("Received {} bytes from {}, sha256 {}", bytes, spec.url, actual);

    staged
        .as_file()
        .sync_all()
        .map_err(DownloadError::io("sync staging file"))?;

    #[cfg(unix)]
    set_executable_permissions(staged.path())?;

    let dest_dir = destination
        .parent()
        .ok_or_else(|| DownloadError::Io {
            operation: format!("get parent directory of {}", destination.display()),
            source: io::Error::other("no parent directory"),
        })?;
    fs::create_dir_all(dest_dir).map_err(DownloadError::io(format!(
        "create install directory {}",
        dest_dir.display()
    )))?;

    atomic_move(staged.path(), destination)?;

    if let Err(e) = confirm_installed(spec, destination) {
        let _ = fs::remove_file(destination);
        return Err(e);
    }

    info!("Installed {}", destination.display());
    Ok(destination.to_path_buf())
}

/// Re-hashes the installed copy
fn confirm_installed(spec: &DownloadSpec, destination: &Path) -> Result<(), DownloadError> {
    match verify_checksum(destination, &spec.checksum) {
        Ok(true) => Ok(()),
        Ok(false) => Err(DownloadError::ChecksumMismatch {
            url: spec.url.clone(),
            expected: spec.checksum.clone(),
            actual: format!("a different digest for {}", destination.display()),
        }),
        Err(ChecksumError::Unreadable { path, source }) => Err(DownloadError::Io {
            operation: format!("verify {}", path.display()),
            source,
        }),
    }
}

/// Adds the executable bit for owner, group and other
#[cfg(unix)]
fn set_executable_permissions(path: &Path) -> Result<(), DownloadError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(DownloadError::io(format!(
        "get metadata for {}",
        path.display()
    )))?;

    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | 0o111);

    fs::set_permissions(path, permissions).map_err(DownloadError::io(format!(
        "set permissions for {}",
        path.display()
    )))
}

/// Copies `from` next to `to` and renames it into place
///
/// The copy lives in the destination directory so the final rename never
/// crosses filesystems. Permissions are preserved on Unix. An existing file
/// at `to` is replaced.
fn atomic_move(from: &Path, to: &Path) -> Result<(), DownloadError> {
    let dest_dir = to.parent().ok_or_else(|| DownloadError::Io {
        operation: format!("get parent directory of {}", to.display()),
        source: io::Error::other("no parent directory"),
    })?;

    let mut temp_dest = NamedTempFile::new_in(dest_dir).map_err(DownloadError::io(format!(
        "create temporary file in {}",
        dest_dir.display()
    )))?;

    let mut src_file = fs::File::open(from).map_err(DownloadError::io(format!(
        "open staged file {}",
        from.display()
    )))?;
    io::copy(&mut src_file, &mut temp_dest).map_err(DownloadError::io("copy file contents"))?;
    drop(src_file);

    #[cfg(unix)]
    {
        let permissions = fs::metadata(from)
            .map_err(DownloadError::io(format!("get metadata for {}", from.display())))?
            .permissions();
        fs::set_permissions(temp_dest.path(), permissions)
            .map_err(DownloadError::io("set permissions on temporary file"))?;
    }

    temp_dest
        .as_file()
        .sync_all()
        .map_err(DownloadError::io("sync temporary file"))?;

    temp_dest.persist(to).map_err(|e| DownloadError::Io {
        operation: format!("rename temporary file to {}", to.display()),
        source: e.error,
    })?;

    #[cfg(unix)]
    {
        let dir = fs::File::open(dest_dir).map_err(DownloadError::io(format!(
            "open install directory {}",
            dest_dir.display()
        )))?;
        dir.sync_all()
            .map_err(DownloadError::io("sync install directory"))?;
    }

    Ok(())
}
