//! # Board Sources
//!
//! The two `BoardSource` implementations the bot runs, the monthly
//! leaderboard and the competition in progress, plus the FAQ
//! `BulletinSource`. Each one fetches its pages, hands them to the scrapers
//! and renders the result.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use crate::core::SourceError;
use crate::retrieve::FetchError;

/// Monthly leaderboard.
pub mod leaderboard;
/// Competition in progress.
pub mod competition;
/// Help center FAQ.
pub mod faq;

pub use competition::{CompetitionSource, COMPETITION_URL};
pub use faq::{FaqSource, FAQ_BASE_URL, FAQ_INDEX_URL};
pub use leaderboard::{LeaderboardSource, LEADERBOARD_URL};

impl From<FetchError> for SourceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Cancelled => SourceError::Cancelled,
            other => SourceError::Failed(Box::new(other)),
        }
    }
}
