//! # Platform Boundary
//!
//! The reconciler talks to the chat platform only through `MessagePlatform`.
//! Keeping the seam this narrow lets the bot crate plug in serenity while the
//! tests plug in a recording mock.

use std::future::Future;

use thiserror::Error;

use super::payload::BoardEmbed;
use super::registry::MessageLocation;

/// A lazy reference to a message that is believed to exist.
///
/// Building one never touches the network; whether the message is really
/// there is only learned from the outcome of the next edit or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    /// Channel holding the message.
    pub channel_id: u64,
    /// The message itself.
    pub message_id: u64,
}

impl From<MessageLocation> for MessageRef {
    fn from(location: MessageLocation) -> Self {
        Self {
            channel_id: location.channel_id,
            message_id: location.message_id,
        }
    }
}

/// Failures reported by the platform for a single call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// The message (or its channel) no longer exists.
    #[error("message not found")]
    NotFound,
    /// The bot lacks permission for the call.
    #[error("forbidden")]
    Forbidden,
    /// Anything else: rate limits, server errors, transport failures.
    #[error("platform error: {0}")]
    Other(String),
}

/// # Message Platform
///
/// The four operations the reconciler needs from the chat platform.
pub trait MessagePlatform: Send + Sync + 'static {
    /// Resolves a stored location to a message reference using only the local
    /// session cache. Returns `None` when the guild or channel is unknown to
    /// this process.
    fn resolve(&self, guild_id: u64, location: MessageLocation) -> Option<MessageRef>;

    /// Replaces the content of `target` with `payload`.
    fn edit(
        &self,
        target: MessageRef,
        payload: &BoardEmbed,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Deletes `target`.
    fn delete(&self, target: MessageRef) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Posts `payload` as a new message in `channel_id`.
    fn send(
        &self,
        channel_id: u64,
        payload: &BoardEmbed,
    ) -> impl Future<Output = Result<MessageLocation, PlatformError>> + Send;
}
