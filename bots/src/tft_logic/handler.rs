use serenity::all::{Context, EventHandler, GuildId, Ready};
use serenity::async_trait;
use tokio::sync::watch;

/// Flips the readiness flag the refresh loops wait on.
pub struct ReadyHandler {
    ready: watch::Sender<bool>,
}

impl ReadyHandler {
    pub fn new(ready: watch::Sender<bool>) -> Self {
        Self { ready }
    }
}

#[async_trait]
impl EventHandler for ReadyHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        log::info!("Connected as {} in {} guild(s)", ready.user.name, ready.guilds.len());
        // No guild to wait for, so the cache will never report ready.
        if ready.guilds.is_empty() {
            self.ready.send_replace(true);
        }
    }

    async fn cache_ready(&self, _ctx: Context, guilds: Vec<GuildId>) {
        log::info!("Cache ready with {} guild(s)", guilds.len());
        self.ready.send_replace(true);
    }
}
