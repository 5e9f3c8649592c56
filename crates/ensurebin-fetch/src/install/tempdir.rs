//! Staging directory discovery
//!
//! Candidates, in order: the `tmp` override, the system temp dir, then
//! `<cwd>/tmp`, each with the binary name appended. The first one that can
//! be created and written to wins.

use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::DownloadError;

pub fn temp_dir_candidates(override_dir: Option<&Path>, binary_name: &str) -> Vec<PathBuf> {
    let mut bases: Vec<PathBuf> = Vec::new();
    bases.extend(override_dir.map(Path::to_path_buf));
    bases.push(std::env::temp_dir());
    if let Ok(cwd) = std::env::current_dir() {
        bases.push(cwd.join("tmp"));
    }

    bases.into_iter().map(|base| base.join(binary_name)).collect()
}

/// First writable staging directory for `binary_name`
///
/// # Errors
///
/// [`DownloadError::NoWritableTempDir`] once every candidate has failed.
pub fn find_suitable_temp_dir(
    override_dir: Option<&Path>,
    binary_name: &str,
) -> Result<PathBuf, DownloadError> {
    let candidates = temp_dir_candidates(override_dir, binary_name);

    for candidate in &candidates {
        match prepare_candidate(candidate) {
            Ok(()) => {
                info!("Staging download in {}", candidate.display());
                return Ok(candidate.clone());
            }
            Err(e) => warn!("{} is not writable: {}", candidate.display(), e),
        }
    }

    Err(DownloadError::NoWritableTempDir { candidates })
}

fn prepare_candidate(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Shared across users; another user's directory may refuse chmod
        if let Err(e) = fs::set_permissions(dir, fs::Permissions::from_mode(0o777)) {
            log::debug!("Could not chmod {}: {}", dir.display(), e);
        }
    }

    let probe = dir.join(format!(".ensurebin-probe-{}", std::process::id()));
    fs::write(&probe, b"probe")?;
    fs::remove_file(&probe)?;
    Ok(())
}
