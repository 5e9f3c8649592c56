//! Exec command - run the recorded binary

use anyhow::{Context as _, Result};
use ensurebin_core::location::resolved_binary;
use log::debug;
use std::path::PathBuf;
use std::process::Command;

use crate::context::Context;

/// Execute `ensurebin exec -- <args>`
///
/// Exits with the binary's status code when it fails.
pub fn run(package_dir: Option<PathBuf>, args: Vec<String>) -> Result<()> {
    let ctx = Context::load(package_dir)?;
    let recorded = resolved_binary(&ctx.layout.record_path())?;

    debug!("Running {} {:?}", recorded.path.display(), args);
    let status = Command::new(&recorded.path)
        .args(&args)
        .status()
        .with_context(|| format!("Failed to run {}", recorded.path.display()))?;

    if !status.success() {
        // Killed by a signal: no code
        std::process::exit(status.code().unwrap_or(1));
    }

    Ok(())
}
