//! Fetcher implementations.
//!
//! - `HttpFetcher` - fetches markup over HTTP via reqwest
//! - `MockFetcher` - canned pages for testing

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::MockFetcher;
