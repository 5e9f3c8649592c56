//! Install command - run the resolution ladder and record the result

use anyhow::Result;
use colored::Colorize;
use ensurebin_core::config::Overrides;
use ensurebin_core::location::BinarySource;
use ensurebin_fetch::{HttpFetcher, InstallContext, Installer};
use serde::Serialize;
use std::path::PathBuf;

use crate::context::Context;
use crate::output::print_json;

#[derive(Serialize)]
struct InstallSummary {
    name: String,
    version: String,
    path: PathBuf,
    source: BinarySource,
    platform: String,
    arch: String,
}

/// Execute `ensurebin install`
pub fn run(package_dir: Option<PathBuf>, explicit: Overrides, json: bool) -> Result<()> {
    let ctx = Context::load(package_dir)?;
    let name = ctx.manifest.binary.name.clone();
    let version = ctx.manifest.binary.version.clone();

    let overrides = Overrides::from_env().apply(explicit);
    let fetcher = HttpFetcher::from_overrides(&overrides);
    let install_ctx = InstallContext::new(&ctx.root, ctx.manifest, overrides);

    let resolved = match Installer::new(&install_ctx, fetcher).run() {
        Ok(resolved) => resolved,
        Err(e) => {
            if !json {
                eprintln!(
                    "{} {} {} could not be installed for {}",
                    "✗".red(),
                    name,
                    version,
                    install_ctx.target
                );
            }
            return Err(e.into());
        }
    };

    if json {
        print_json(&InstallSummary {
            name,
            version,
            path: resolved.path,
            source: resolved.source,
            platform: install_ctx.target.platform.to_string(),
            arch: install_ctx.target.arch.to_string(),
        })?;
    } else {
        println!(
            "{} {} {} ready ({})",
            "✓".green(),
            name,
            version,
            resolved.source
        );
        println!("  Path: {}", resolved.path.display());
        println!("  Target: {}", install_ctx.target);
    }

    Ok(())
}
