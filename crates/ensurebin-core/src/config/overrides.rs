//! Environment overrides
//!
//! Precedence is explicit flag > `ENSUREBIN_*` variable > ambient default.
//! The CLI fills in flags with [`Overrides::apply`] after
//! [`Overrides::from_env`] has read the environment.

use log::warn;
use std::path::PathBuf;

use super::consts::env;
use crate::platform::PlatformArch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub platform: Option<String>,
    pub arch: Option<String>,
    pub proxy: Option<String>,
    /// `None` means verify certificates
    pub strict_ssl: Option<bool>,
    /// Inline PEM content, wins over `cafile`
    pub ca: Option<String>,
    pub cafile: Option<PathBuf>,
    pub tmp: Option<PathBuf>,
    pub user_agent: Option<String>,
}

impl Overrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds overrides from an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let strict_ssl = get(env::STRICT_SSL).and_then(|value| {
            let parsed = parse_bool(&value);
            if parsed.is_none() {
                warn!(
                    "Ignoring {}={:?}, expected true or false",
                    env::STRICT_SSL,
                    value
                );
            }
            parsed
        });

        Self {
            platform: get(env::PLATFORM),
            arch: get(env::ARCH),
            proxy: env::PROXY_CHAIN.iter().find_map(|key| get(*key)),
            strict_ssl,
            ca: get(env::CA),
            cafile: get(env::CAFILE).map(PathBuf::from),
            tmp: get(env::TMP).map(PathBuf::from),
            user_agent: get(env::USER_AGENT),
        }
    }

    /// Layers explicitly passed values on top
    pub fn apply(mut self, explicit: Overrides) -> Self {
        let Overrides {
            platform,
            arch,
            proxy,
            strict_ssl,
            ca,
            cafile,
            tmp,
            user_agent,
        } = explicit;

        self.platform = platform.or(self.platform);
        self.arch = arch.or(self.arch);
        self.proxy = proxy.or(self.proxy);
        self.strict_ssl = strict_ssl.or(self.strict_ssl);
        self.ca = ca.or(self.ca);
        self.cafile = cafile.or(self.cafile);
        self.tmp = tmp.or(self.tmp);
        self.user_agent = user_agent.or(self.user_agent);
        self
    }

    pub fn strict_ssl(&self) -> bool {
        self.strict_ssl.unwrap_or(true)
    }

    pub fn target(&self) -> PlatformArch {
        PlatformArch::with_overrides(self.platform.as_deref(), self.arch.as_deref())
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
