//! CheckLocal: the binary named by the location record

use ensurebin_core::location::{BinarySource, read_location};
use log::info;

use super::{InstallContext, Step};
use crate::checksum::verify_checksum;
use crate::info::ResolvedBinary;
use crate::probe::VersionProbe;
use crate::spec::resolve_download_spec;

pub(super) fn check_local(ctx: &InstallContext, probe: &VersionProbe) -> Step {
    let record_path = ctx.layout.record_path();
    let Some(recorded) = read_location(&record_path) else {
        return Step::Continue(format!("no location record at {}", record_path.display()));
    };

    if !recorded.matches(&ctx.target) {
        return Step::Continue(format!(
            "record is for {}/{}, target is {}",
            recorded.record.platform.as_deref().unwrap_or("?"),
            recorded.record.arch.as_deref().unwrap_or("?"),
            ctx.target
        ));
    }

    if !recorded.path.is_file() {
        return Step::Continue(format!(
            "recorded binary {} no longer exists",
            recorded.path.display()
        ));
    }

    info!("Found {} at {}, verifying", ctx.binary_name(), recorded.path.display());

    if ctx.target.is_host() {
        if !probe.probe(&recorded.path) {
            return Step::Continue(format!(
                "{} is not version {}",
                recorded.path.display(),
                probe.expected()
            ));
        }
    } else {
        // Cannot run a binary built for another target; compare with the table instead
        let Some(spec) = resolve_download_spec(&ctx.manifest.downloads, &ctx.target) else {
            return Step::Continue(format!("no checksum known for {}", ctx.target));
        };
        match verify_checksum(&recorded.path, &spec.checksum) {
            Ok(true) => info!("Verified checksum of previously downloaded file"),
            Ok(false) => {
                return Step::Continue(format!(
                    "{} does not match the expected checksum",
                    recorded.path.display()
                ));
            }
            Err(e) => return Step::Continue(e.to_string()),
        }
    }

    Step::Resolved(ResolvedBinary::new(recorded.path, BinarySource::Local))
}
