//! Download: the terminal phase

use ensurebin_core::EnsurebinError;
use ensurebin_core::location::BinarySource;

use super::{InstallContext, Step};
use crate::info::ResolvedBinary;
use crate::install::{Fetch, download_binary, find_suitable_temp_dir};
use crate::spec::resolve_download_spec;

pub(super) fn download<F: Fetch>(ctx: &InstallContext, fetcher: &F) -> Step {
    match try_download(ctx, fetcher) {
        Ok(binary) => Step::Resolved(binary),
        Err(err) => Step::Failed(err),
    }
}

fn try_download<F: Fetch>(
    ctx: &InstallContext,
    fetcher: &F,
) -> Result<ResolvedBinary, EnsurebinError> {
    let name = ctx.binary_name();
    let spec = resolve_download_spec(&ctx.manifest.downloads, &ctx.target).ok_or_else(|| {
        EnsurebinError::UnsupportedPlatform {
            binary: name.to_string(),
            platform: ctx.target.platform.to_string(),
            arch: ctx.target.arch.to_string(),
        }
    })?;

    let staging_dir = find_suitable_temp_dir(ctx.overrides.tmp.as_deref(), name)?;
    let destination = ctx.layout.binary_path(name, &ctx.target);
    let path = download_binary(fetcher, &spec, &staging_dir, &destination)?;

    Ok(ResolvedBinary::new(path, BinarySource::Download))
}
