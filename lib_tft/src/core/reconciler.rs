//! # Message Reconciler
//!
//! Keeps at most one live board message per guild.
//!
//! Each registered guild is either `Unregistered` (no registry entry) or
//! `Registered(location)`:
//!
//! - **register**: an operator posted a fresh message. The previous one, if it
//!   can still be resolved, is deleted and the new location stored.
//! - **refresh**: the message is edited in place. If it cannot be resolved, or
//!   the edit reports it gone, the entry is dropped. A dropped guild stays
//!   dropped until the operator posts again.

use std::sync::Arc;

use thiserror::Error;

use super::payload::BoardEmbed;
use super::platform::{MessagePlatform, PlatformError};
use super::registry::{GuildRegistry, MessageLocation, RegistryError};

/// Failures of a single guild's reconciliation step.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The platform rejected an edit or delete for a reason other than the
    /// message being gone.
    #[error("platform call failed for guild {guild_id}: {source}")]
    Platform {
        /// Guild being reconciled.
        guild_id: u64,
        /// Platform failure.
        #[source]
        source: PlatformError,
    },

    /// The registry mutation could not be persisted.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// What happened to one guild during a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildOutcome {
    /// The live message was edited; the location is unchanged.
    Edited,
    /// The message is gone; the registry entry was removed.
    Invalidated,
    /// The guild was no longer registered when its turn came.
    Skipped,
}

/// Summary of one `refresh_all` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Guilds whose message was edited.
    pub edited: usize,
    /// Guilds whose entry was dropped.
    pub invalidated: usize,
    /// Guilds unregistered mid-cycle.
    pub skipped: usize,
    /// Guilds whose step failed, with the error text.
    pub failed: Vec<(u64, String)>,
}

impl CycleReport {
    /// Guilds visited in this pass.
    pub fn visited(&self) -> usize {
        self.edited + self.invalidated + self.skipped + self.failed.len()
    }
}

/// # Reconciler
///
/// Binds a registry to a platform. Both are shared: the refresh loop and the
/// command handlers hold clones of the same reconciler.
pub struct Reconciler<P> {
    registry: Arc<GuildRegistry>,
    platform: Arc<P>,
}

impl<P> Clone for Reconciler<P> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            platform: Arc::clone(&self.platform),
        }
    }
}

impl<P: MessagePlatform> Reconciler<P> {
    /// Creates a reconciler over `registry` and `platform`.
    pub fn new(registry: Arc<GuildRegistry>, platform: Arc<P>) -> Self {
        Self { registry, platform }
    }

    /// The registry this reconciler mutates.
    pub fn registry(&self) -> &Arc<GuildRegistry> {
        &self.registry
    }

    /// The platform this reconciler calls.
    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    /// Records `new_location` as the guild's live message, removing the
    /// previous one first.
    ///
    /// A previous message that is already gone or that the bot may not delete
    /// is left alone. Any other delete failure aborts the registration and
    /// leaves the old entry in place.
    pub async fn register(&self, guild_id: u64, new_location: MessageLocation) -> Result<(), ReconcileError> {
        if let Some(old) = self.registry.get(guild_id).await {
            if old == new_location {
                log::debug!("Guild {} re-registered the same message {}", guild_id, old.message_id);
            } else if let Some(target) = self.platform.resolve(guild_id, old) {
                match self.platform.delete(target).await {
                    Ok(()) => {
                        log::info!("Deleted previous message {} in guild {}", old.message_id, guild_id);
                    }
                    Err(PlatformError::NotFound | PlatformError::Forbidden) => {
                        log::info!("Failed to delete message {} in guild {}", old.message_id, guild_id);
                    }
                    Err(source) => return Err(ReconcileError::Platform { guild_id, source }),
                }
            }
        }

        self.registry.put(guild_id, new_location).await?;
        log::info!(
            "Guild {} now tracks message {} in channel {}",
            guild_id,
            new_location.message_id,
            new_location.channel_id
        );
        Ok(())
    }

    /// Brings one guild's live message up to date with `payload`.
    pub async fn refresh_guild(&self, guild_id: u64, payload: &BoardEmbed) -> Result<GuildOutcome, ReconcileError> {
        let Some(location) = self.registry.get(guild_id).await else {
            return Ok(GuildOutcome::Skipped);
        };

        let Some(target) = self.platform.resolve(guild_id, location) else {
            log::info!("Message {} of guild {} cannot be resolved, forgetting it", location.message_id, guild_id);
            self.invalidate(guild_id, location).await?;
            return Ok(GuildOutcome::Invalidated);
        };

        match self.platform.edit(target, payload).await {
            Ok(()) => Ok(GuildOutcome::Edited),
            Err(PlatformError::NotFound) => {
                log::info!("Message {} of guild {} was deleted, forgetting it", location.message_id, guild_id);
                self.invalidate(guild_id, location).await?;
                Ok(GuildOutcome::Invalidated)
            }
            Err(source) => Err(ReconcileError::Platform { guild_id, source }),
        }
    }

    /// Drops the guild's entry unless an operator replaced it meanwhile.
    async fn invalidate(&self, guild_id: u64, stale: MessageLocation) -> Result<(), ReconcileError> {
        self.registry.remove_if(guild_id, stale).await?;
        Ok(())
    }

    /// Refreshes every guild registered when the pass starts.
    ///
    /// Guilds are handled one after the other; a failing guild is logged and
    /// reported but never stops the rest.
    pub async fn refresh_all(&self, payload: &BoardEmbed) -> CycleReport {
        let mut report = CycleReport::default();

        for guild_id in self.registry.keys().await {
            match self.refresh_guild(guild_id, payload).await {
                Ok(GuildOutcome::Edited) => report.edited += 1,
                Ok(GuildOutcome::Invalidated) => report.invalidated += 1,
                Ok(GuildOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    log::error!("Failed to update guild {}: {}", guild_id, e);
                    report.failed.push((guild_id, e.to_string()));
                }
            }
        }

        report
    }
}
