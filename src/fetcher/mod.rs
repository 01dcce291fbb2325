pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::{DEFAULT_TIMEOUT, Fetch, HttpFetcher};
pub use errors::FetchError;
pub use types::{Charset, PageResponse};

#[cfg(test)]
pub use client::MockFetch;
