//! Shim command - write a wrapper that runs the recorded binary
//!
//! The wrapper carries the manifest's marker token, so a later install that
//! finds it on the search path follows `<wrapper>/../../<lib_dir>` back to
//! this package's location record instead of probing the wrapper itself.

use anyhow::{Context as _, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::context::Context;

/// Execute `ensurebin shim`
pub fn run(package_dir: Option<PathBuf>, bin_dir: Option<PathBuf>) -> Result<()> {
    let ctx = Context::load(package_dir)?;
    let bin_dir = match bin_dir {
        Some(dir) => std::path::absolute(dir)?,
        None => ctx.root.join("bin"),
    };
    std::fs::create_dir_all(&bin_dir)
        .with_context(|| format!("Failed to create {}", bin_dir.display()))?;

    let name = &ctx.manifest.binary.name;
    #[cfg(unix)]
    let shim_path = bin_dir.join(name);
    #[cfg(windows)]
    let shim_path = bin_dir.join(format!("{name}.cmd"));

    let ensurebin = std::env::current_exe().context("Failed to locate the ensurebin executable")?;
    let content = shim_content(&ctx.manifest.binary.marker, &ensurebin, &ctx.root);
    std::fs::write(&shim_path, content)
        .with_context(|| format!("Failed to write {}", shim_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&shim_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&shim_path, perms)?;
    }

    println!("{} Created {}", "✓".green(), shim_path.display());
    Ok(())
}

#[cfg(unix)]
fn shim_content(marker: &str, ensurebin: &Path, root: &Path) -> String {
    format!(
        r#"#!/bin/sh
# {marker}
# ensurebin-generated wrapper
exec {} exec --package-dir {} -- "$@"
"#,
        sh_quote(&ensurebin.to_string_lossy()),
        sh_quote(&root.to_string_lossy())
    )
}

#[cfg(windows)]
fn shim_content(marker: &str, ensurebin: &Path, root: &Path) -> String {
    format!(
        "@echo off\r\nREM {marker}\r\nREM ensurebin-generated wrapper\r\n\"{}\" exec --package-dir \"{}\" -- %*\r\n",
        ensurebin.display(),
        root.display()
    )
}

/// Single-quotes `value` for POSIX sh
#[cfg(unix)]
fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_sh_quote_escapes_single_quotes() {
        assert_eq!(sh_quote("/opt/pkg"), "'/opt/pkg'");
        assert_eq!(sh_quote("/it's"), r"'/it'\''s'");
    }

    #[test]
    fn test_shim_carries_marker_and_package_dir() {
        let content = shim_content(
            "ENSUREBIN_INSTALL_MARKER",
            Path::new("/usr/bin/ensurebin"),
            Path::new("/home/me/pkg"),
        );
        assert!(content.starts_with("#!/bin/sh\n"));
        assert!(content.contains("# ENSUREBIN_INSTALL_MARKER\n"));
        assert!(content.contains(
            "exec '/usr/bin/ensurebin' exec --package-dir '/home/me/pkg' -- \"$@\""
        ));
    }
}
