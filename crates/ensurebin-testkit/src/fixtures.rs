//! Fixtures: fake binaries, wrapper scripts and manifests
//!
//! Fake binaries are `#!/bin/sh` scripts, so tests using them should be
//! `#[cfg(unix)]`.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// A manifest `[[download]]` entry for [`write_manifest`]
#[derive(Debug, Clone)]
pub struct FakeDownload {
    pub platform: String,
    pub arch: Option<String>,
    pub url: String,
    pub checksum: String,
}

impl FakeDownload {
    pub fn new(platform: &str, arch: Option<&str>, url: &str, body: &[u8]) -> Self {
        Self {
            platform: platform.to_string(),
            arch: arch.map(str::to_string),
            url: url.to_string(),
            checksum: sha256_hex(body),
        }
    }
}

/// Writes an executable shell script `dir/name` with `body` after the shebang
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
    }

    path
}

/// Writes a fake binary that prints `stdout` and exits 0
pub fn write_fake_binary(dir: &Path, name: &str, stdout: &str) -> PathBuf {
    write_script(dir, name, &format!("echo '{stdout}'"))
}

/// Body of a downloadable fake binary printing `version`
pub fn fake_binary_body(version: &str) -> Vec<u8> {
    format!("#!/bin/sh\necho '{version}'\n").into_bytes()
}

/// Writes a wrapper script carrying `marker`, like the one a prior global
/// install leaves on PATH
pub fn write_marker_wrapper(dir: &Path, name: &str, marker: &str) -> PathBuf {
    write_script(dir, name, &format!("# {marker}\nexit 0"))
}

/// Writes `<root>/ensurebin.toml` describing `name`@`version`
pub fn write_manifest(
    root: &Path,
    name: &str,
    version: &str,
    downloads: &[FakeDownload],
) -> PathBuf {
    std::fs::create_dir_all(root).unwrap();

    let mut content = format!(
        "[binary]\nname = \"{name}\"\nversion = \"{version}\"\nprobe_timeout_ms = 5000\n"
    );
    for download in downloads {
        content.push_str("\n[[download]]\n");
        content.push_str(&format!("platform = \"{}\"\n", download.platform));
        if let Some(arch) = &download.arch {
            content.push_str(&format!("arch = \"{arch}\"\n"));
        }
        content.push_str(&format!("url = \"{}\"\n", download.url));
        content.push_str(&format!("checksum = \"{}\"\n", download.checksum));
    }

    let path = root.join("ensurebin.toml");
    std::fs::write(&path, content).unwrap();
    path
}

/// Hex-encoded SHA-256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
