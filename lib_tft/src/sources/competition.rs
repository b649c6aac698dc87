use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::core::{BoardEmbed, BoardSource, SourceError};
use crate::render::competition_embed;
use crate::retrieve::Fetcher;
use crate::scrape::{find_active_competition, parse_competition_details, parse_rankings, CompetitionEntry};

/// Default competition list page.
pub const COMPETITION_URL: &str = "https://competitions.thefundedtraderprogram.com/";

/// Shown for a label the details page does not carry.
const NOT_FOUND: &str = "Not Found";
/// Rows requested from the rankings endpoint.
const RANKINGS_LENGTH: u32 = 10;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankingsQuery {
    competition_id: u64,
    start: u32,
    length: u32,
}

/// # Competition Source
///
/// Finds the competition in progress on the list page, then reads its details
/// page and the rankings endpoint. No competition in progress is not an
/// error: the build returns `Ok(None)` and every guild keeps its message.
pub struct CompetitionSource {
    fetcher: Arc<Fetcher>,
    base_url: String,
    update_minutes: u64,
}

impl CompetitionSource {
    /// Creates a source rooted at the competition list page `list_url`.
    pub fn new(fetcher: Arc<Fetcher>, list_url: impl Into<String>, update_minutes: u64) -> Self {
        Self {
            fetcher,
            base_url: list_url.into(),
            update_minutes,
        }
    }

    fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Details page of competition `id`.
    pub fn details_url(&self, id: u64) -> String {
        format!("{}/competition/{}", self.root(), id)
    }

    /// Rankings endpoint.
    pub fn rankings_url(&self) -> String {
        format!("{}/leaderboard/getleaderboarddata", self.root())
    }

    /// The top rows from the rankings endpoint. A failed request is logged
    /// and yields no rows.
    async fn fetch_rankings(&self, id: u64) -> Vec<CompetitionEntry> {
        let query = RankingsQuery {
            competition_id: id,
            start: 0,
            length: RANKINGS_LENGTH,
        };
        match self.fetcher.post_form_json(&self.rankings_url(), &query).await {
            Ok(value) => parse_rankings(&value),
            Err(e) => {
                log::error!("Could not fetch competition listings: {}", e);
                Vec::new()
            }
        }
    }
}

impl BoardSource for CompetitionSource {
    async fn build(&self, cancel: &CancellationToken) -> Result<Option<BoardEmbed>, SourceError> {
        let list = self.fetcher.fetch_text(&self.base_url, cancel).await?;
        let Some(id) = find_active_competition(&list) else {
            log::info!("No competition in progress");
            return Ok(None);
        };

        let html = self.fetcher.fetch_text(&self.details_url(id), cancel).await?;
        let details = parse_competition_details(&html);

        let mut entries = tokio::select! {
            _ = cancel.cancelled() => return Err(SourceError::Cancelled),
            entries = self.fetch_rankings(id) => entries,
        };
        if entries.is_empty() {
            log::debug!("Rankings endpoint had no rows for competition {}, using the details page", id);
            entries = details.entries;
        }

        let prize_pool = details.prize_pool.as_deref().unwrap_or(NOT_FOUND);
        let contestants = details.remaining_contestants.as_deref().unwrap_or(NOT_FOUND);

        competition_embed(&entries, prize_pool, contestants, Utc::now(), self.update_minutes)
            .map(Some)
            .ok_or(SourceError::EmptyBoard)
    }
}
