use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::core::{BoardEmbed, BoardSource, SourceError};
use crate::render::leaderboard_embed;
use crate::retrieve::Fetcher;
use crate::scrape::parse_leaderboard;

/// Default leaderboard page.
pub const LEADERBOARD_URL: &str = "https://leaderboard.thefundedtraderprogram.com";

/// # Leaderboard Source
///
/// One GET per build; the page holds the whole table.
pub struct LeaderboardSource {
    fetcher: Arc<Fetcher>,
    url: String,
    update_minutes: u64,
}

impl LeaderboardSource {
    /// Creates a source reading `url`. `update_minutes` only feeds the footer.
    pub fn new(fetcher: Arc<Fetcher>, url: impl Into<String>, update_minutes: u64) -> Self {
        Self {
            fetcher,
            url: url.into(),
            update_minutes,
        }
    }
}

impl BoardSource for LeaderboardSource {
    async fn build(&self, cancel: &CancellationToken) -> Result<Option<BoardEmbed>, SourceError> {
        let html = self.fetcher.fetch_text(&self.url, cancel).await?;
        let entries = parse_leaderboard(&html);
        log::debug!("Parsed {} leaderboard row(s)", entries.len());

        leaderboard_embed(&entries, Utc::now(), self.update_minutes)
            .map(Some)
            .ok_or(SourceError::EmptyBoard)
    }
}
