//! # Data Retrieval Module
//!
//! A single place for talking HTTP to the TFT websites.
//!
//! ## Contained Modules:
//!
//! - **`fetcher`**: a `reqwest`-based `Fetcher` that retries failed page loads
//!   forever with a fixed cooldown. The cooldown is cancellable, so a shutdown
//!   never waits on an unreachable site.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// HTTP fetcher with fixed-cooldown retry.
pub mod fetcher;

pub use fetcher::{FetchError, Fetcher, FetcherOptions};
