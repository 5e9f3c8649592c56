pub mod consts;
pub mod model;
pub mod overrides;

pub use model::{BinaryConfig, DownloadEntry, LayoutConfig, Manifest};
pub use overrides::Overrides;
