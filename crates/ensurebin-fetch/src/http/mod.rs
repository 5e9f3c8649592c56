//! HTTP transport: client construction and the network [`Fetch`](crate::install::Fetch)

pub mod client;
pub mod fetcher;

pub use client::{NetworkOptions, build_client, mask_proxy_password, split_ca_bundle};
pub use fetcher::HttpFetcher;
