//! # LiveBoard
//!
//! One `LiveBoard` exists per board (leaderboard, competition). It owns
//! everything that board needs: the source that builds a fresh embed, the
//! reconciler bound to the board's registry, the last successfully built
//! embed, and the cancellation token that ends its refresh task.
//!
//! ## Refresh cycle
//! 1. Wait once until the session cache is ready.
//! 2. On every tick build exactly one embed, shared by every guild.
//! 3. Reconcile every registered guild against it.
//!
//! A failed build skips the guild pass for that tick only. Late ticks are
//! delayed, never replayed.

use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{watch, RwLock};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::payload::BoardEmbed;
use super::platform::{MessagePlatform, PlatformError};
use super::reconciler::{CycleReport, ReconcileError, Reconciler};
use super::registry::MessageLocation;

/// Failures while building a board.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Shutdown was requested while the source was fetching.
    #[error("cancelled")]
    Cancelled,
    /// The page parsed but held no rows to show.
    #[error("no entries to display")]
    EmptyBoard,
    /// Fetching or parsing failed.
    #[error("{0}")]
    Failed(#[source] Box<dyn StdError + Send + Sync>),
}

/// # Board Source
///
/// Fetches, parses and renders one board. `Ok(None)` means there is nothing to
/// show right now (for example no competition in progress).
pub trait BoardSource: Send + Sync + 'static {
    /// Builds a fresh embed. Long waits inside must end when `cancel` fires.
    fn build(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Option<BoardEmbed>, SourceError>> + Send;
}

/// Failures of the post command.
#[derive(Debug, Error)]
pub enum BoardError {
    /// No embed could be built.
    #[error("could not build the board: {0}")]
    Source(#[from] SourceError),
    /// The new message could not be sent.
    #[error("could not send the board: {0}")]
    Send(#[source] PlatformError),
    /// The message was sent but could not be registered.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Result of a successful post command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// The board was posted and is now the guild's live message.
    Posted(MessageLocation),
    /// There was nothing to post.
    NoPayload,
}

/// Result of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// An embed was built and every registered guild was visited.
    Refreshed(CycleReport),
    /// The source had nothing to show; no guild was touched.
    NoPayload,
    /// The build failed; no guild was touched.
    Failed(String),
    /// Shutdown interrupted the build.
    Cancelled,
}

/// # Live Board
pub struct LiveBoard<S, P> {
    name: String,
    source: S,
    reconciler: Reconciler<P>,
    interval: Duration,
    cached: RwLock<Option<Arc<BoardEmbed>>>,
    cancel: CancellationToken,
}

impl<S: BoardSource, P: MessagePlatform> LiveBoard<S, P> {
    /// Creates a board. `cancel` is usually a child of the process-wide token.
    pub fn new(
        name: impl Into<String>,
        source: S,
        reconciler: Reconciler<P>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            reconciler,
            interval,
            cached: RwLock::new(None),
            cancel,
        }
    }

    /// Board name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reconciler bound to this board's registry.
    pub fn reconciler(&self) -> &Reconciler<P> {
        &self.reconciler
    }

    /// The last embed built successfully.
    pub async fn cached(&self) -> Option<Arc<BoardEmbed>> {
        self.cached.read().await.clone()
    }

    /// Builds a fresh embed and caches it.
    ///
    /// When the source has nothing to show the cache is left as it was.
    pub async fn update(&self) -> Result<Option<Arc<BoardEmbed>>, SourceError> {
        match self.source.build(&self.cancel).await? {
            Some(embed) => {
                let embed = Arc::new(embed);
                *self.cached.write().await = Some(Arc::clone(&embed));
                Ok(Some(embed))
            }
            None => Ok(None),
        }
    }

    /// Runs one refresh cycle.
    pub async fn cycle(&self) -> CycleOutcome {
        log::info!("Updating {} from TFT site", self.name);

        match self.update().await {
            Ok(Some(payload)) => {
                let report = self.reconciler.refresh_all(&payload).await;
                log::info!(
                    "{}: {} edited, {} invalidated, {} failed",
                    self.name,
                    report.edited,
                    report.invalidated,
                    report.failed.len()
                );
                CycleOutcome::Refreshed(report)
            }
            Ok(None) => {
                log::info!("{}: nothing to show, guilds left untouched", self.name);
                CycleOutcome::NoPayload
            }
            Err(SourceError::Cancelled) => CycleOutcome::Cancelled,
            Err(e) => {
                log::error!("{}: update failed, guilds left untouched: {}", self.name, e);
                CycleOutcome::Failed(e.to_string())
            }
        }
    }

    /// Posts the board in `channel_id` and makes it the guild's live message.
    pub async fn post(&self, guild_id: u64, channel_id: u64) -> Result<PostOutcome, BoardError> {
        let payload = match self.cached().await {
            Some(payload) => payload,
            None => match self.update().await? {
                Some(payload) => payload,
                None => return Ok(PostOutcome::NoPayload),
            },
        };

        let location = self
            .reconciler
            .platform()
            .send(channel_id, &payload)
            .await
            .map_err(BoardError::Send)?;
        self.reconciler.register(guild_id, location).await?;

        Ok(PostOutcome::Posted(location))
    }

    /// The refresh loop. Returns when the board is stopped.
    pub async fn run(self: Arc<Self>, mut ready: watch::Receiver<bool>) {
        let is_ready = tokio::select! {
            _ = self.cancel.cancelled() => false,
            ok = wait_ready(&mut ready) => ok,
        };
        if !is_ready {
            log::info!("{} polling task stopped before the session was ready", self.name);
            return;
        }

        log::info!("Starting {} polling task every {:?}", self.name, self.interval);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            if let CycleOutcome::Cancelled = self.cycle().await {
                break;
            }
        }

        log::info!("{} polling task stopped", self.name);
    }

    /// Spawns the refresh loop under a supervisor tracked by `tracker`.
    ///
    /// A panic inside the loop is logged and stops this board only.
    pub fn start(self: &Arc<Self>, ready: watch::Receiver<bool>, tracker: &TaskTracker) {
        let name = self.name.clone();
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(Arc::clone(self).run(ready));

        tracker.spawn(async move {
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_panic() => {
                    log::error!("{} polling task panicked, board disabled: {}", name, e);
                    cancel.cancel();
                }
                Err(e) => log::warn!("{} polling task aborted: {}", name, e),
            }
        });
    }

    /// Stops the refresh loop and interrupts any pending fetch cooldown.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether `stop` was called (or the parent token cancelled).
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Waits until the flag turns true. Returns false if the sender is gone first.
async fn wait_ready(ready: &mut watch::Receiver<bool>) -> bool {
    loop {
        if *ready.borrow_and_update() {
            return true;
        }
        if ready.changed().await.is_err() {
            return false;
        }
    }
}
