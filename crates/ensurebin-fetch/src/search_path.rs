//! Executable search path used for discovery and probing
//!
//! The process `PATH` is read once and never modified. A cleaned copy is
//! passed explicitly to `which` and to every probe subprocess, so wrapper
//! directories of the invoking package manager cannot make the binary find
//! itself.

use log::debug;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    /// Cleaned copy of the process `PATH`
    pub fn from_env_cleaned() -> Self {
        Self::from_value(std::env::var_os("PATH").unwrap_or_default()).cleaned()
    }

    /// Splits a raw `PATH`-style value without cleaning it
    pub fn from_value(value: impl Into<OsString>) -> Self {
        Self {
            entries: std::env::split_paths(&value.into()).collect(),
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Drops `node_modules` entries, `./bin` and empty entries, keeping order
    pub fn cleaned(self) -> Self {
        let entries = self
            .entries
            .into_iter()
            .filter(|entry| {
                let keep = !is_wrapper_dir(entry);
                if !keep {
                    debug!("Dropping {} from search path", entry.display());
                }
                keep
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Value suitable for a child's `PATH`
    pub fn to_os_string(&self) -> OsString {
        std::env::join_paths(&self.entries).unwrap_or_default()
    }

    /// First executable named `name` on this search path
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        if self.entries.is_empty() {
            return None;
        }
        let cwd = std::env::current_dir().ok()?;
        which::which_in(name, Some(self.to_os_string()), cwd).ok()
    }
}

fn is_wrapper_dir(entry: &Path) -> bool {
    let text = entry.to_string_lossy();
    text.is_empty() || text.contains("node_modules") || text == "./bin" || text == ".\\bin"
}

/// Whether `path` contains any of the self-install `hints`
pub fn contains_hint(path: &Path, hints: &[String]) -> bool {
    let text = path.to_string_lossy();
    hints
        .iter()
        .any(|hint| !hint.is_empty() && text.contains(hint.as_str()))
}

/// Whether the file at `path` contains the marker token anywhere
///
/// The file is scanned in chunks so large binaries are never read whole.
pub fn has_marker(path: &Path, marker: &str) -> io::Result<bool> {
    let needle = marker.as_bytes();
    if needle.is_empty() {
        return Ok(false);
    }

    let mut file = File::open(path)?;
    let mut buffer = vec![0u8; 64 * 1024];
    // Tail of the previous chunk, so a token split across reads still matches
    let mut window: Vec<u8> = Vec::with_capacity(buffer.len() + needle.len());

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            return Ok(false);
        }
        window.extend_from_slice(&buffer[..read]);
        if window.windows(needle.len()).any(|w| w == needle) {
            return Ok(true);
        }
        let keep = needle.len().saturating_sub(1).min(window.len());
        window.drain(..window.len() - keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensurebin_testkit::{temp_dir_in_workspace, write_fake_binary, write_marker_wrapper};

    #[test]
    #[cfg(unix)]
    fn test_cleaning_drops_wrapper_entries() {
        let path = SearchPath::from_value(
            "/usr/local/bin:/proj/node_modules/.bin:./bin::/usr/bin:/opt/node_modules/x/bin",
        )
        .cleaned();

        assert_eq!(
            path.entries(),
            &[PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")]
        );
    }

    #[test]
    fn test_cleaning_drops_windows_local_bin() {
        let path = SearchPath::from_entries([PathBuf::from(".\\bin"), PathBuf::from("tools")]);
        assert_eq!(path.cleaned().entries(), &[PathBuf::from("tools")]);
    }

    #[test]
    #[cfg(unix)]
    fn test_find_uses_only_given_entries() {
        let temp = temp_dir_in_workspace();
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        write_fake_binary(&second, "phantomjs", "2.1.1");

        let path = SearchPath::from_entries([first.clone(), second.clone()]);
        assert_eq!(path.find("phantomjs"), Some(second.join("phantomjs")));

        let path = SearchPath::from_entries([first]);
        assert_eq!(path.find("phantomjs"), None);
    }

    #[test]
    fn test_empty_search_path_finds_nothing() {
        assert_eq!(SearchPath::default().find("sh"), None);
    }

    #[test]
    fn test_contains_hint() {
        let hints = vec![Path::new("npm").join("phantomjs").to_string_lossy().into_owned()];
        let own = Path::new("usr")
            .join("lib")
            .join("node")
            .join("npm")
            .join("phantomjs")
            .join("bin");
        assert!(contains_hint(&own, &hints));
        assert!(!contains_hint(Path::new("/usr/bin/phantomjs"), &hints));
        assert!(!contains_hint(Path::new("/usr/bin/phantomjs"), &[String::new()]));
    }

    #[test]
    fn test_marker_detection() {
        let temp = temp_dir_in_workspace();
        let wrapper = write_marker_wrapper(temp.path(), "wrapper", "ENSUREBIN_INSTALL_MARKER");
        let plain = write_fake_binary(temp.path(), "plain", "2.1.1");

        assert!(has_marker(&wrapper, "ENSUREBIN_INSTALL_MARKER").unwrap());
        assert!(!has_marker(&plain, "ENSUREBIN_INSTALL_MARKER").unwrap());
        assert!(has_marker(&temp.path().join("missing"), "X").is_err());
    }

    #[test]
    fn test_marker_split_across_chunks() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("big");
        let mut contents = vec![b'x'; 64 * 1024 - 4];
        contents.extend_from_slice(b"ENSUREBIN_INSTALL_MARKER");
        std::fs::write(&path, contents).unwrap();

        assert!(has_marker(&path, "ENSUREBIN_INSTALL_MARKER").unwrap());
    }
}
