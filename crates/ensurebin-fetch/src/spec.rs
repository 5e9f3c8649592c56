//! Platform table lookup
//!
//! The table is the manifest's `[[download]]` list. The first entry whose
//! platform matches and whose arch is absent or matches wins.

use ensurebin_core::PlatformArch;
use ensurebin_core::config::DownloadEntry;
use url::Url;

/// Where to fetch the binary for one target, and what it must hash to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
    pub url: Url,
    /// Lowercase hex SHA-256
    pub checksum: String,
}

/// Returns the download spec for `target`, or `None` when unsupported
///
/// Entries with an unparseable URL never match; manifests are validated on
/// load so this only matters for hand-built tables.
pub fn resolve_download_spec(
    table: &[DownloadEntry],
    target: &PlatformArch,
) -> Option<DownloadSpec> {
    table
        .iter()
        .filter(|entry| entry.matches(target))
        .find_map(|entry| {
            let url = Url::parse(&entry.url).ok()?;
            Some(DownloadSpec {
                url,
                checksum: entry.checksum.to_ascii_lowercase(),
            })
        })
}
