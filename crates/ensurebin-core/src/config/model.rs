use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::defaults;
use crate::error::{EnsurebinError, Result};
use crate::platform::PlatformArch;

/// ensurebin.toml schema - what to install and where to put it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub binary: BinaryConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Platform table, `[[download]]` entries
    #[serde(default, rename = "download")]
    pub downloads: Vec<DownloadEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryConfig {
    pub name: String,
    /// Exact, trimmed output expected from `<name> <version_flag>`
    pub version: String,
    #[serde(default = "default_version_flag")]
    pub version_flag: String,
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default)]
    pub self_install_hints: Vec<String>,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_lib_dir")]
    pub lib_dir: PathBuf,
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lib_dir: default_lib_dir(),
            install_dir: default_install_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadEntry {
    pub platform: String,
    /// `None` matches every architecture of `platform`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    pub url: String,
    /// Hex-encoded SHA-256 of the artifact
    pub checksum: String,
}

fn default_version_flag() -> String {
    defaults::VERSION_FLAG.to_string()
}

fn default_marker() -> String {
    defaults::MARKER.to_string()
}

fn default_probe_timeout_ms() -> u64 {
    defaults::PROBE_TIMEOUT_MS
}

fn default_lib_dir() -> PathBuf {
    PathBuf::from(defaults::LIB_DIR)
}

fn default_install_dir() -> PathBuf {
    PathBuf::from(defaults::INSTALL_DIR)
}

impl BinaryConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Path fragments marking a binary this mechanism itself created
    ///
    /// Defaults to `npm/<name>` joined with the host separator.
    pub fn self_install_hints(&self) -> Vec<String> {
        if self.self_install_hints.is_empty() {
            vec![Path::new("npm").join(&self.name).to_string_lossy().into_owned()]
        } else {
            self.self_install_hints.clone()
        }
    }
}

impl DownloadEntry {
    pub fn matches(&self, target: &PlatformArch) -> bool {
        self.platform == target.platform.as_str()
            && self
                .arch
                .as_deref()
                .is_none_or(|arch| arch == target.arch.as_str())
    }
}

impl Manifest {
    /// Reads and validates ensurebin.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EnsurebinError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Rejects manifests the resolver could not act on safely
    pub fn validate(&self) -> Result<()> {
        let name = &self.binary.name;
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(invalid(format!(
                "binary.name must be a bare file name, got '{name}'"
            )));
        }
        if self.binary.version.trim().is_empty() {
            return Err(invalid("binary.version must not be empty".to_string()));
        }
        if self.binary.marker.is_empty() {
            return Err(invalid("binary.marker must not be empty".to_string()));
        }

        for (field, dir) in [
            ("layout.lib_dir", &self.layout.lib_dir),
            ("layout.install_dir", &self.layout.install_dir),
        ] {
            if crate::path::has_absolute_or_rooted_component(dir) {
                return Err(invalid(format!(
                    "{field} must be relative to the package root, got '{}'",
                    dir.display()
                )));
            }
        }

        for (index, entry) in self.downloads.iter().enumerate() {
            if entry.platform.is_empty() {
                return Err(invalid(format!("download[{index}].platform is empty")));
            }
            url::Url::parse(&entry.url).map_err(|e| {
                invalid(format!("download[{index}].url '{}': {e}", entry.url))
            })?;
            if !is_sha256_hex(&entry.checksum) {
                return Err(invalid(format!(
                    "download[{index}].checksum must be 64 hex characters (sha256), got '{}'",
                    entry.checksum
                )));
            }
        }

        Ok(())
    }
}

fn invalid(reason: String) -> EnsurebinError {
    EnsurebinError::ManifestInvalid(reason)
}

fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Platform};

    const CHECKSUM: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn test_parse_minimal_manifest() {
        let toml = r#"
[binary]
name = "phantomjs"
version = "2.1.1"
"#;
        let manifest = Manifest::parse(toml).unwrap();
        assert_eq!(manifest.binary.name, "phantomjs");
        assert_eq!(manifest.binary.version_flag, "--version");
        assert_eq!(manifest.binary.marker, "ENSUREBIN_INSTALL_MARKER");
        assert_eq!(manifest.binary.probe_timeout(), Duration::from_secs(10));
        assert_eq!(manifest.layout.lib_dir, PathBuf::from("lib"));
        assert_eq!(manifest.layout.install_dir, PathBuf::from("lib/bin"));
        assert!(manifest.downloads.is_empty());
    }

    #[test]
    fn test_parse_full_manifest() {
        let toml = format!(
            r#"
[binary]
name = "phantomjs"
version = "2.1.1"
version_flag = "-v"
marker = "MY_MARKER"
self_install_hints = ["global/phantomjs"]
probe_timeout_ms = 500

[layout]
lib_dir = "dist"
install_dir = "dist/phantom/bin"

[[download]]
platform = "linux"
arch = "x64"
url = "https://example.com/phantomjs-linux-x64"
checksum = "{CHECKSUM}"

[[download]]
platform = "darwin"
url = "https://example.com/phantomjs-macos"
checksum = "{CHECKSUM}"
"#
        );
        let manifest = Manifest::parse(&toml).unwrap();
        assert_eq!(manifest.binary.version_flag, "-v");
        assert_eq!(manifest.binary.self_install_hints(), vec!["global/phantomjs"]);
        assert_eq!(manifest.layout.install_dir, PathBuf::from("dist/phantom/bin"));
        assert_eq!(manifest.downloads.len(), 2);
        assert_eq!(manifest.downloads[1].arch, None);
    }

    #[test]
    fn test_default_self_install_hint() {
        let manifest = Manifest::parse("[binary]\nname = \"phantomjs\"\nversion = \"2.1.1\"\n")
            .unwrap();
        let expected = Path::new("npm").join("phantomjs");
        assert_eq!(
            manifest.binary.self_install_hints(),
            vec![expected.to_string_lossy().into_owned()]
        );
    }

    #[test]
    fn test_rejects_short_checksum() {
        let toml = r#"
[binary]
name = "phantomjs"
version = "2.1.1"

[[download]]
platform = "linux"
arch = "x64"
url = "https://example.com/phantomjs"
checksum = "47a37457cb2a5c2bcbca02e36eec4ee67784e528"
"#;
        let err = Manifest::parse(toml).unwrap_err();
        assert!(err.to_string().starts_with("MANIFEST_INVALID:"));
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn test_rejects_unparseable_url() {
        let toml = format!(
            r#"
[binary]
name = "phantomjs"
version = "2.1.1"

[[download]]
platform = "linux"
url = "not a url"
checksum = "{CHECKSUM}"
"#
        );
        let err = Manifest::parse(&toml).unwrap_err();
        assert!(err.to_string().contains("download[0].url"));
    }

    #[test]
    fn test_rejects_name_with_separator() {
        let err = Manifest::parse("[binary]\nname = \"bin/phantomjs\"\nversion = \"1\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("binary.name"));
    }

    #[test]
    fn test_rejects_absolute_layout() {
        let toml = r#"
[binary]
name = "phantomjs"
version = "2.1.1"

[layout]
lib_dir = "/usr/lib"
"#;
        let err = Manifest::parse(toml).unwrap_err();
        assert!(err.to_string().contains("layout.lib_dir"));
    }

    #[test]
    fn test_missing_manifest_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = Manifest::from_file(temp.path().join("ensurebin.toml")).unwrap_err();
        assert!(matches!(err, EnsurebinError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_entry_matching() {
        let any_arch = DownloadEntry {
            platform: "darwin".to_string(),
            arch: None,
            url: "https://example.com/mac".to_string(),
            checksum: CHECKSUM.to_string(),
        };
        let x64_only = DownloadEntry {
            platform: "linux".to_string(),
            arch: Some("x64".to_string()),
            url: "https://example.com/linux".to_string(),
            checksum: CHECKSUM.to_string(),
        };

        assert!(any_arch.matches(&PlatformArch::new(Platform::Darwin, Arch::X64)));
        assert!(any_arch.matches(&PlatformArch::new(
            Platform::Darwin,
            Arch::Other("arm64".to_string())
        )));
        assert!(x64_only.matches(&PlatformArch::new(Platform::Linux, Arch::X64)));
        assert!(!x64_only.matches(&PlatformArch::new(Platform::Linux, Arch::Ia32)));
        assert!(!x64_only.matches(&PlatformArch::new(Platform::Win32, Arch::X64)));
    }
}
