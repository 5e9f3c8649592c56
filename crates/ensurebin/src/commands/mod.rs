//! CLI command implementations

pub mod exec;
pub mod install;
pub mod path;
pub mod platform;
pub mod shim;
