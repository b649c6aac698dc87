//! # Bulletin
//!
//! A post made of several messages that is replaced as a whole (the FAQ).
//! Unlike a `LiveBoard` it has no refresh loop and no per-guild slot: every
//! publish takes down all previously posted messages, wherever they are, and
//! posts the fresh set in the requesting channel.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::liveboard::SourceError;
use super::message_log::MessageLog;
use super::payload::BoardEmbed;
use super::platform::{MessagePlatform, MessageRef, PlatformError};
use super::registry::{MessageLocation, RegistryError};

/// # Bulletin Source
///
/// Builds the ordered messages of a bulletin. An empty list means there is
/// nothing to post.
pub trait BulletinSource: Send + Sync + 'static {
    /// Builds every message. Long waits inside must end when `cancel` fires.
    fn build(&self, cancel: &CancellationToken) -> impl Future<Output = Result<Vec<BoardEmbed>, SourceError>> + Send;
}

/// Failures of a publish.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The messages could not be built; nothing was taken down.
    #[error("could not build the bulletin: {0}")]
    Source(#[from] SourceError),
    /// A message could not be sent. The ones sent before it are recorded.
    #[error("could not send message {index} of the bulletin: {source}")]
    Send {
        /// Zero-based position of the failed message.
        index: usize,
        /// Platform failure.
        #[source]
        source: PlatformError,
    },
    /// The message log could not be persisted.
    #[error(transparent)]
    Log(#[from] RegistryError),
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The previous set was taken down and the new one posted.
    Published {
        /// Previous messages the platform confirmed deleted.
        retracted: usize,
        /// Locations of the new messages, in order.
        posted: Vec<MessageLocation>,
    },
    /// The source had nothing to post; the previous set was left alone.
    NoPayload,
}

/// # Bulletin
pub struct Bulletin<S, P> {
    name: String,
    source: S,
    platform: Arc<P>,
    log: Arc<MessageLog>,
    cancel: CancellationToken,
    publishing: Mutex<()>,
}

impl<S: BulletinSource, P: MessagePlatform> Bulletin<S, P> {
    /// Creates a bulletin recording its messages in `log`.
    pub fn new(
        name: impl Into<String>,
        source: S,
        platform: Arc<P>,
        log: Arc<MessageLog>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            platform,
            log,
            cancel,
            publishing: Mutex::new(()),
        }
    }

    /// Bulletin name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The log of currently posted messages.
    pub fn log(&self) -> &Arc<MessageLog> {
        &self.log
    }

    /// Builds the bulletin, takes the previous set down and posts the new set
    /// in `channel_id`.
    ///
    /// Publishes are serialized. The old set stays up when the build fails or
    /// has nothing to show.
    pub async fn publish(&self, channel_id: u64) -> Result<PublishOutcome, PublishError> {
        let _guard = self.publishing.lock().await;

        let messages = self.source.build(&self.cancel).await?;
        if messages.is_empty() {
            log::info!("{}: nothing to post", self.name);
            return Ok(PublishOutcome::NoPayload);
        }

        let retracted = self.retract().await?;

        let mut posted = Vec::with_capacity(messages.len());
        for (index, message) in messages.iter().enumerate() {
            let location = self
                .platform
                .send(channel_id, message)
                .await
                .map_err(|source| PublishError::Send { index, source })?;
            self.log.record(location.channel_id, location.message_id).await?;
            posted.push(location);
        }

        log::info!(
            "{}: posted {} message(s) in channel {}, {} old one(s) removed",
            self.name,
            posted.len(),
            channel_id,
            retracted
        );
        Ok(PublishOutcome::Published { retracted, posted })
    }

    /// Deletes every logged message and empties the log.
    ///
    /// Deletes are best effort: a message that is gone, forbidden or failing
    /// is logged and forgotten like the rest.
    async fn retract(&self) -> Result<usize, RegistryError> {
        let mut deleted = 0;

        for (channel_id, message_ids) in self.log.snapshot().await {
            for message_id in message_ids {
                let target = MessageRef { channel_id, message_id };
                match self.platform.delete(target).await {
                    Ok(()) => deleted += 1,
                    Err(PlatformError::NotFound) => {
                        log::warn!("Tried to delete message that did not exist {}", message_id);
                    }
                    Err(PlatformError::Forbidden) => {
                        log::warn!("Tried to delete message {} with no permissions", message_id);
                    }
                    Err(e) => log::warn!("Failed to delete message {} in channel {}: {}", message_id, channel_id, e),
                }
            }
        }

        self.log.clear().await?;
        Ok(deleted)
    }
}
