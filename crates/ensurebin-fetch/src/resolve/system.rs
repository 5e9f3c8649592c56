//! CheckPath: a binary already on the search path

use ensurebin_core::config::consts::files;
use ensurebin_core::location::{BinarySource, read_location};
use log::info;
use std::path::{Path, PathBuf};

use super::{InstallContext, Step};
use crate::info::ResolvedBinary;
use crate::probe::VersionProbe;
use crate::search_path::{contains_hint, has_marker};

pub(super) fn check_path(ctx: &InstallContext, probe: &VersionProbe) -> Step {
    if !ctx.target.is_host() {
        return Step::Continue(format!(
            "target {} differs from host {}",
            ctx.target,
            ensurebin_core::PlatformArch::host()
        ));
    }

    let name = ctx.binary_name();
    let Some(found) = ctx.search_path.find(name) else {
        return Step::Continue(format!("{name} not found on the search path"));
    };
    let found = std::path::absolute(&found).unwrap_or(found);

    if contains_hint(&found, &ctx.manifest.binary.self_install_hints()) {
        return Step::Continue(format!(
            "{} is this package's own install",
            found.display()
        ));
    }

    match has_marker(&found, &ctx.manifest.binary.marker) {
        Err(e) => Step::Continue(format!("cannot read {}: {}", found.display(), e)),
        Ok(true) => check_global_install(ctx, probe, &found),
        Ok(false) => {
            info!("Found standalone {} at {}", name, found.display());
            Step::Resolved(ResolvedBinary::new(found, BinarySource::Path))
        }
    }
}

/// Follows a wrapper left by a global install to the binary it recorded
fn check_global_install(ctx: &InstallContext, probe: &VersionProbe, wrapper: &Path) -> Step {
    info!(
        "{} is a wrapper from a global install, looking up its binary",
        wrapper.display()
    );

    let record_path = match nested_record_path(ctx, wrapper) {
        Ok(path) => path,
        Err(e) => {
            return Step::Continue(format!("cannot resolve {}: {}", wrapper.display(), e));
        }
    };

    let Some(recorded) = read_location(&record_path) else {
        return Step::Continue(format!(
            "global install has no location record at {}",
            record_path.display()
        ));
    };

    if !recorded.matches(&ctx.target) {
        return Step::Continue(format!(
            "global install record is for {}/{}, target is {}",
            recorded.record.platform.as_deref().unwrap_or("?"),
            recorded.record.arch.as_deref().unwrap_or("?"),
            ctx.target
        ));
    }

    if !recorded.path.is_file() || !probe.probe(&recorded.path) {
        return Step::Continue(format!(
            "global install binary {} is missing or not version {}",
            recorded.path.display(),
            probe.expected()
        ));
    }

    Step::Resolved(ResolvedBinary::new(recorded.path, BinarySource::Global))
}

/// `realpath(wrapper)/../../<lib_dir>/location.toml`
fn nested_record_path(ctx: &InstallContext, wrapper: &Path) -> std::io::Result<PathBuf> {
    let real = std::fs::canonicalize(wrapper)?;
    let package_root = real
        .parent()
        .and_then(Path::parent)
        .ok_or_else(|| std::io::Error::other("wrapper has no package directory"))?;

    Ok(package_root
        .join(&ctx.manifest.layout.lib_dir)
        .join(files::LOCATION_RECORD))
}
