//! HTTP client construction with proxy and TLS settings

use ensurebin_core::config::Overrides;
use log::{error, info, warn};
use reqwest::blocking::Client;
use reqwest::{Certificate, Proxy};
use std::time::Duration;
use url::Url;

/// Default timeout for a whole download (5 minutes for large binaries)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const CERT_BEGIN: &str = "-----BEGIN CERTIFICATE-----";

/// Resolved network settings for one install run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkOptions {
    pub proxy: Option<String>,
    pub strict_ssl: bool,
    /// Extra trusted roots, one PEM certificate each
    pub ca_certs: Vec<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            strict_ssl: true,
            ca_certs: Vec::new(),
            user_agent: default_user_agent(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub fn default_user_agent() -> String {
    format!("ensurebin/{}", env!("CARGO_PKG_VERSION"))
}

impl NetworkOptions {
    /// Inline CA content wins over a CA file. An unreadable CA file is
    /// logged and ignored.
    pub fn from_overrides(overrides: &Overrides) -> Self {
        let ca_certs = if let Some(ca) = &overrides.ca {
            split_ca_bundle(ca)
        } else if let Some(cafile) = &overrides.cafile {
            match std::fs::read_to_string(cafile) {
                Ok(content) => split_ca_bundle(&content),
                Err(e) => {
                    error!(
                        "Could not read CA file {}: {}; using default roots",
                        cafile.display(),
                        e
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self {
            proxy: overrides.proxy.clone(),
            strict_ssl: overrides.strict_ssl(),
            ca_certs,
            user_agent: overrides
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Builds the blocking client for `options`
///
/// # Errors
///
/// Returns error if the proxy URL or a CA certificate is invalid, or the
/// TLS backend cannot be initialized.
pub fn build_client(options: &NetworkOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(options.user_agent.as_str())
        .timeout(options.timeout);

    if let Some(proxy) = &options.proxy {
        info!("Using proxy {}", mask_proxy_password(proxy));
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    for pem in &options.ca_certs {
        builder = builder.add_root_certificate(Certificate::from_pem(pem.as_bytes())?);
    }

    if !options.strict_ssl {
        warn!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build()
}

/// Proxy URL with any password replaced by `******`
///
/// Unparseable values are returned unchanged.
pub fn mask_proxy_password(proxy: &str) -> String {
    match Url::parse(proxy) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("******")).is_ok() {
                url.to_string()
            } else {
                proxy.to_string()
            }
        }
        _ => proxy.to_string(),
    }
}

/// Splits a PEM bundle into single certificates
///
/// Text before the first certificate (comments, headers) is dropped.
pub fn split_ca_bundle(content: &str) -> Vec<String> {
    let starts: Vec<usize> = content.match_indices(CERT_BEGIN).map(|(i, _)| i).collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(content.len());
            content[start..end].trim_end().to_string()
        })
        .collect()
}
