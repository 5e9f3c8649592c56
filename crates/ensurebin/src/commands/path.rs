//! Path command - print where the recorded binary lives

use anyhow::Result;
use ensurebin_core::location::{BinarySource, resolved_binary};
use serde::Serialize;
use std::path::PathBuf;

use crate::context::Context;
use crate::output::print_json;

#[derive(Serialize)]
struct PathInfo {
    path: PathBuf,
    platform: Option<String>,
    arch: Option<String>,
    source: Option<BinarySource>,
}

/// Execute `ensurebin path`
pub fn run(package_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = Context::load(package_dir)?;
    let recorded = resolved_binary(&ctx.layout.record_path())?;

    if json {
        print_json(&PathInfo {
            path: recorded.path,
            platform: recorded.record.platform,
            arch: recorded.record.arch,
            source: recorded.record.source,
        })?;
    } else {
        println!("{}", recorded.path.display());
    }

    Ok(())
}
