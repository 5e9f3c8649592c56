//! Platform command - show which download applies to the target

use anyhow::Result;
use colored::Colorize;
use ensurebin_core::PlatformArch;
use ensurebin_core::config::Overrides;
use ensurebin_fetch::resolve_download_spec;
use serde::Serialize;
use std::path::PathBuf;

use crate::context::Context;
use crate::output::print_json;

#[derive(Serialize)]
struct PlatformReport {
    target: TargetInfo,
    host: TargetInfo,
    /// `None` when the target is unsupported
    download: Option<DownloadInfo>,
}

#[derive(Serialize)]
struct TargetInfo {
    platform: String,
    arch: String,
}

#[derive(Serialize)]
struct DownloadInfo {
    url: String,
    checksum: String,
}

impl From<&PlatformArch> for TargetInfo {
    fn from(target: &PlatformArch) -> Self {
        Self {
            platform: target.platform.to_string(),
            arch: target.arch.to_string(),
        }
    }
}

/// Execute `ensurebin platform`
pub fn run(package_dir: Option<PathBuf>, explicit: Overrides, json: bool) -> Result<()> {
    let ctx = Context::load(package_dir)?;
    let target = Overrides::from_env().apply(explicit).target();
    let host = PlatformArch::host();
    let spec = resolve_download_spec(&ctx.manifest.downloads, &target);

    if json {
        return Ok(print_json(&PlatformReport {
            target: TargetInfo::from(&target),
            host: TargetInfo::from(&host),
            download: spec.map(|spec| DownloadInfo {
                url: spec.url.to_string(),
                checksum: spec.checksum,
            }),
        })?);
    }

    println!("Target: {}", target);
    println!("Host:   {}", host);
    match spec {
        Some(spec) => {
            println!("{} {} is supported", "✓".green(), target);
            println!("  URL: {}", spec.url);
            println!("  SHA-256: {}", spec.checksum);
        }
        None => println!(
            "{} {} is unsupported: no download of {}",
            "✗".red(),
            target,
            ctx.manifest.binary.name
        ),
    }

    Ok(())
}
