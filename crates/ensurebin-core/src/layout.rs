//! Where things live inside the host package

use std::path::{Path, PathBuf};

use crate::config::Manifest;
use crate::config::consts::files;
use crate::platform::PlatformArch;

/// Absolute locations derived from the package root and the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub root: PathBuf,
    /// Directory holding the location record; record paths are relative to it
    pub lib_dir: PathBuf,
    /// Directory receiving downloaded binaries
    pub install_dir: PathBuf,
}

impl PackageLayout {
    pub fn new(root: impl Into<PathBuf>, manifest: &Manifest) -> Self {
        let root = root.into();
        Self {
            lib_dir: root.join(&manifest.layout.lib_dir),
            install_dir: root.join(&manifest.layout.install_dir),
            root,
        }
    }

    pub fn manifest_path(root: &Path) -> PathBuf {
        root.join(files::MANIFEST)
    }

    pub fn record_path(&self) -> PathBuf {
        self.lib_dir.join(files::LOCATION_RECORD)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.lib_dir.join(files::INSTALL_LOCK)
    }

    /// Final install path of the downloaded binary for `target`
    pub fn binary_path(&self, name: &str, target: &PlatformArch) -> PathBuf {
        self.install_dir.join(target.binary_file_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Platform};

    fn manifest() -> Manifest {
        Manifest::parse(
            r#"
[binary]
name = "phantomjs"
version = "2.1.1"

[layout]
lib_dir = "lib"
install_dir = "lib/phantom/bin"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_layout_paths() {
        let layout = PackageLayout::new("/pkg", &manifest());
        assert_eq!(layout.lib_dir, PathBuf::from("/pkg/lib"));
        assert_eq!(layout.record_path(), PathBuf::from("/pkg/lib/location.toml"));
        assert_eq!(layout.lock_path(), PathBuf::from("/pkg/lib/.ensurebin.lock"));
        assert_eq!(
            PackageLayout::manifest_path(Path::new("/pkg")),
            PathBuf::from("/pkg/ensurebin.toml")
        );
    }

    #[test]
    fn test_binary_path_per_platform() {
        let layout = PackageLayout::new("/pkg", &manifest());
        let linux = PlatformArch::new(Platform::Linux, Arch::X64);
        let windows = PlatformArch::new(Platform::Win32, Arch::Ia32);

        assert_eq!(
            layout.binary_path("phantomjs", &linux),
            PathBuf::from("/pkg/lib/phantom/bin/phantomjs")
        );
        assert_eq!(
            layout.binary_path("phantomjs", &windows),
            PathBuf::from("/pkg/lib/phantom/bin/phantomjs.exe")
        );
    }
}
