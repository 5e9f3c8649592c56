//! Target platform and architecture
//!
//! Names follow the installer convention (`linux`, `darwin`, `win32`, `x64`,
//! `ia32`, ...) rather than Rust's `std::env::consts` spelling, because they
//! are what manifests and location records are written in.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Darwin,
    OpenBsd,
    FreeBsd,
    Win32,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Ia32,
    Other(String),
}

impl Platform {
    pub fn parse(name: &str) -> Self {
        match name {
            "linux" => Platform::Linux,
            "darwin" => Platform::Darwin,
            "openbsd" => Platform::OpenBsd,
            "freebsd" => Platform::FreeBsd,
            "win32" => Platform::Win32,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Platform of the running process
    pub fn host() -> Self {
        match std::env::consts::OS {
            "linux" => Platform::Linux,
            "macos" => Platform::Darwin,
            "openbsd" => Platform::OpenBsd,
            "freebsd" => Platform::FreeBsd,
            "windows" => Platform::Win32,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::OpenBsd => "openbsd",
            Platform::FreeBsd => "freebsd",
            Platform::Win32 => "win32",
            Platform::Other(name) => name,
        }
    }
}

impl Arch {
    pub fn parse(name: &str) -> Self {
        match name {
            "x64" => Arch::X64,
            "ia32" => Arch::Ia32,
            other => Arch::Other(other.to_string()),
        }
    }

    /// Architecture of the running process
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86_64" => Arch::X64,
            "x86" => Arch::Ia32,
            "aarch64" => Arch::Other("arm64".to_string()),
            other => Arch::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Arch::X64 => "x64",
            Arch::Ia32 => "ia32",
            Arch::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (platform, arch) pair, fixed for the lifetime of one install run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformArch {
    pub platform: Platform,
    pub arch: Arch,
}

impl PlatformArch {
    pub fn new(platform: Platform, arch: Arch) -> Self {
        Self { platform, arch }
    }

    pub fn host() -> Self {
        Self::new(Platform::host(), Arch::host())
    }

    /// Target pair with optional overrides applied on top of the host pair
    ///
    /// Empty override strings count as unset.
    pub fn with_overrides(platform: Option<&str>, arch: Option<&str>) -> Self {
        let platform = platform
            .filter(|p| !p.is_empty())
            .map(Platform::parse)
            .unwrap_or_else(Platform::host);
        let arch = arch
            .filter(|a| !a.is_empty())
            .map(Arch::parse)
            .unwrap_or_else(Arch::host);
        Self::new(platform, arch)
    }

    pub fn is_host(&self) -> bool {
        *self == Self::host()
    }

    /// File name the binary is installed under for this target
    pub fn binary_file_name(&self, name: &str) -> String {
        match self.platform {
            Platform::Win32 => format!("{name}.exe"),
            _ => name.to_string(),
        }
    }
}

impl fmt::Display for PlatformArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_round_trip() {
        for name in ["linux", "darwin", "openbsd", "freebsd", "win32"] {
            assert_eq!(Platform::parse(name).as_str(), name);
        }
        for name in ["x64", "ia32"] {
            assert_eq!(Arch::parse(name).as_str(), name);
        }
    }

    #[test]
    fn test_unknown_names_are_kept_verbatim() {
        assert_eq!(
            Platform::parse("sunos"),
            Platform::Other("sunos".to_string())
        );
        assert_eq!(Arch::parse("ppc64").as_str(), "ppc64");
    }

    #[test]
    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    fn test_host_linux_x64() {
        let host = PlatformArch::host();
        assert_eq!(host.platform, Platform::Linux);
        assert_eq!(host.arch, Arch::X64);
        assert_eq!(host.to_string(), "linux/x64");
    }

    #[test]
    #[cfg(target_os = "macos")]
    fn test_host_macos_is_darwin() {
        assert_eq!(Platform::host(), Platform::Darwin);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let target = PlatformArch::with_overrides(Some("win32"), Some("ia32"));
        assert_eq!(target.platform, Platform::Win32);
        assert_eq!(target.arch, Arch::Ia32);
    }

    #[test]
    fn test_empty_overrides_fall_back_to_host() {
        let target = PlatformArch::with_overrides(Some(""), None);
        assert_eq!(target, PlatformArch::host());
        assert!(target.is_host());
    }

    #[test]
    fn test_partial_override_is_not_host() {
        let other = if Platform::host() == Platform::Win32 {
            "linux"
        } else {
            "win32"
        };
        let target = PlatformArch::with_overrides(Some(other), None);
        assert!(!target.is_host());
        assert_eq!(target.arch, Arch::host());
    }

    #[test]
    fn test_binary_file_name_windows_suffix() {
        let win = PlatformArch::new(Platform::Win32, Arch::X64);
        assert_eq!(win.binary_file_name("phantomjs"), "phantomjs.exe");

        let linux = PlatformArch::new(Platform::Linux, Arch::X64);
        assert_eq!(linux.binary_file_name("phantomjs"), "phantomjs");
    }
}
