use std::sync::Arc;

use lib_tft::core::{Bulletin, GuildRegistry, LiveBoard, MessageLog, Reconciler};
use lib_tft::retrieve::Fetcher;
use lib_tft::sources::{CompetitionSource, FaqSource, LeaderboardSource};
use serenity::all::{Cache, Http};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::config::Settings;
use super::platform::SerenityPlatform;

pub type LeaderboardBoard = LiveBoard<LeaderboardSource, SerenityPlatform>;
pub type CompetitionBoard = LiveBoard<CompetitionSource, SerenityPlatform>;
pub type FaqBulletin = Bulletin<FaqSource, SerenityPlatform>;

/// Shared by every command invocation.
pub struct Data {
    pub leaderboard: Arc<LeaderboardBoard>,
    pub competition: Arc<CompetitionBoard>,
    pub faq: Arc<FaqBulletin>,
    pub admin_role: String,
}

/// Everything prepared before the gateway connects. Turned into `Data` once
/// the framework hands over the HTTP client and cache.
pub struct Startup {
    pub settings: Settings,
    pub fetcher: Arc<Fetcher>,
    pub leaderboard_registry: Arc<GuildRegistry>,
    pub competition_registry: Arc<GuildRegistry>,
    pub faq_messages: Arc<MessageLog>,
    pub shutdown: CancellationToken,
    pub tracker: TaskTracker,
    pub ready: watch::Receiver<bool>,
}

impl Startup {
    /// Builds both boards and the FAQ, and starts the boards' refresh loops.
    pub fn into_data(self, http: Arc<Http>, cache: Arc<Cache>) -> Data {
        let platform = Arc::new(SerenityPlatform::new(http, cache));
        let interval = self.settings.update_interval();
        let minutes = self.settings.update_minutes;

        let leaderboard = Arc::new(LiveBoard::new(
            "Leaderboard",
            LeaderboardSource::new(Arc::clone(&self.fetcher), self.settings.leaderboard_url.clone(), minutes),
            Reconciler::new(self.leaderboard_registry, Arc::clone(&platform)),
            interval,
            self.shutdown.child_token(),
        ));
        let competition = Arc::new(LiveBoard::new(
            "Competition",
            CompetitionSource::new(Arc::clone(&self.fetcher), self.settings.competition_url.clone(), minutes),
            Reconciler::new(self.competition_registry, Arc::clone(&platform)),
            interval,
            self.shutdown.child_token(),
        ));
        let faq = Arc::new(Bulletin::new(
            "FAQ",
            FaqSource::new(
                Arc::clone(&self.fetcher),
                self.settings.faq_base_url.clone(),
                self.settings.faq_index_url.clone(),
            ),
            platform,
            self.faq_messages,
            self.shutdown.child_token(),
        ));

        leaderboard.start(self.ready.clone(), &self.tracker);
        competition.start(self.ready, &self.tracker);

        Data {
            leaderboard,
            competition,
            faq,
            admin_role: self.settings.admin_role,
        }
    }
}
