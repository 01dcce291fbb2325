//! Fetch, normalize and digest pages linked from a news listing.
//!
//! The three operations live on [`service::HackerDigest`] and return typed
//! results; [`render`] turns those into the text handed back to callers, and
//! [`tools`] exposes them by name to a transport.

pub mod config;
pub mod digest;
pub mod errors;
pub mod fetcher;
pub mod links;
pub mod normalizer;
pub mod render;
pub mod service;
pub mod summary;
pub mod tools;

pub use errors::PipelineError;
pub use service::{DigestSettings, HackerDigest};
