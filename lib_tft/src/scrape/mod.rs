//! # TFT Page Parsers
//!
//! Turns the raw TFT pages into ordered, ranked rows. Ranks are always
//! assigned from the parse order (1-based), never read from the page.
//!
//! ## Contained Modules:
//!
//! - **`entries`**: the row types (`LeaderboardEntry`, `CompetitionEntry`) and
//!   the `Ranked` trait the renderer uses to lay them out.
//! - **`dom`**: document-order helpers on top of `scraper`.
//! - **`leaderboard`**: the monthly leaderboard table.
//! - **`competition`**: the competition list, details page and rankings JSON.
//! - **`faq`**: the help center index and category pages.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Row types shared by parsers and renderers.
pub mod entries;
/// Document-order element lookups.
pub mod dom;
/// Leaderboard page parser.
pub mod leaderboard;
/// Competition pages parser.
pub mod competition;
/// Help center pages parser.
pub mod faq;

pub use competition::{find_active_competition, parse_competition_details, parse_rankings, CompetitionDetails};
pub use entries::{CompetitionEntry, LeaderboardEntry, Ranked};
pub use faq::{parse_faq_articles, parse_faq_categories, FaqArticle, FaqCategory};
pub use leaderboard::parse_leaderboard;
