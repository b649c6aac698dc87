//! # lib_tft
//!
//! Shared library behind the TFT bot. Each folder is a feature-gated module:
//!
//! - **`core`**: the guild message registry, the reconciler, the
//!   `LiveBoard` refresh component and the multi-message `Bulletin`.
//! - **`retrieve`**: the HTTP fetcher.
//! - **`scrape`**: parsers for the TFT leaderboard, competition and help pages.
//! - **`render`**: turns parsed entries into a `BoardEmbed`.
//! - **`sources`**: fetch + parse + render pipelines plugged into a `LiveBoard`
//!   or a `Bulletin`.

#[cfg(feature = "core")]
pub mod core;
#[cfg(feature = "render")]
pub mod render;
#[cfg(feature = "retrieve")]
pub mod retrieve;
#[cfg(feature = "scrape")]
pub mod scrape;
#[cfg(feature = "sources")]
pub mod sources;
