use std::path::PathBuf;

pub use ensurebin_core::location::BinarySource;

/// A binary one of the ladder steps settled on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    pub path: PathBuf,
    pub source: BinarySource,
}

impl ResolvedBinary {
    pub fn new(path: impl Into<PathBuf>, source: BinarySource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
