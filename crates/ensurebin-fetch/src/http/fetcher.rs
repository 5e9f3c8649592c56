//! Network [`Fetch`] implementation

use ensurebin_core::config::Overrides;
use log::info;
use std::error::Error as StdError;
use std::io::{Read, Write};
use url::Url;

use super::client::{NetworkOptions, build_client};
use crate::install::{DownloadError, Fetch};

/// Fetches over HTTP(S) with the configured proxy and trust roots
///
/// The client is built per fetch, so a bad proxy or CA setting only fails
/// runs that actually need the network.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    options: NetworkOptions,
}

impl HttpFetcher {
    pub fn new(options: NetworkOptions) -> Self {
        Self { options }
    }

    pub fn from_overrides(overrides: &Overrides) -> Self {
        Self::new(NetworkOptions::from_overrides(overrides))
    }

    pub fn options(&self) -> &NetworkOptions {
        &self.options
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url, sink: &mut dyn Write) -> Result<u64, DownloadError> {
        let client = build_client(&self.options).map_err(|e| DownloadError::Request {
            url: url.clone(),
            reason: format!("invalid network configuration: {}", error_chain(&e)),
        })?;

        info!("Downloading {}", url);
        let mut response = client
            .get(url.as_str())
            .send()
            .map_err(|e| classify(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        let mut downloaded: u64 = 0;
        let mut buffer = [0; 8192];
        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| classify(url, &e))?;
            if bytes_read == 0 {
                break;
            }

            sink.write_all(&buffer[..bytes_read])
                .map_err(DownloadError::io("write downloaded bytes"))?;
            downloaded += bytes_read as u64;
        }

        Ok(downloaded)
    }
}

/// Maps a transport error, singling out self-signed certificate chains
fn classify(url: &Url, err: &(dyn StdError + 'static)) -> DownloadError {
    let chain = error_chain(err);
    if is_self_signed(&chain) {
        DownloadError::SelfSignedCertificate { url: url.clone() }
    } else {
        DownloadError::Request {
            url: url.clone(),
            reason: chain,
        }
    }
}

/// `err` and all its sources, joined with `: `
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

fn is_self_signed(chain: &str) -> bool {
    let lower = chain.to_ascii_lowercase();
    ["self signed", "self-signed", "selfsigned", "unknownissuer", "unknown issuer"]
        .iter()
        .any(|needle| lower.contains(needle))
}
