//! # Core Engine Module
//!
//! This module holds the stateful part of the bot: everything that decides which
//! Discord message currently shows a board in each guild, and keeps that message
//! up to date.
//!
//! ## Core Components:
//!
//! - **`payload`**: the rendered `BoardEmbed` handed to the platform. The core
//!   never looks inside it.
//! - **`platform`**: the `MessagePlatform` trait (resolve / edit / delete / send)
//!   and its error type. The bot crate implements it on top of serenity.
//! - **`registry`**: the persistent guild → `MessageLocation` map, written to
//!   disk as JSON after every mutation.
//! - **`reconciler`**: the per-guild state machine. It replaces old messages when
//!   an operator posts, edits live messages on refresh, and drops registry
//!   entries whose message has disappeared.
//! - **`liveboard`**: one explicit component per board (leaderboard,
//!   competition). It owns the source, the reconciler, the cached payload and the
//!   periodic refresh task.
//! - **`message_log`**: the persistent channel → posted message ids map used
//!   by multi-message posts.
//! - **`bulletin`**: a multi-message post (the FAQ) replaced as a whole on
//!   every publish.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// The opaque rendered message body.
pub mod payload;
/// The chat platform boundary used by the reconciler.
pub mod platform;
/// Persistent guild → message location map.
pub mod registry;
/// The guild-scoped single-message reconciler.
pub mod reconciler;
/// The board component with its supervised refresh loop.
pub mod liveboard;
/// Persistent channel → posted messages map.
pub mod message_log;
/// Multi-message post replaced on every publish.
pub mod bulletin;

// --- Public API Re-exports ---
pub use bulletin::{Bulletin, BulletinSource, PublishError, PublishOutcome};
pub use liveboard::{BoardError, BoardSource, CycleOutcome, LiveBoard, PostOutcome, SourceError};
pub use message_log::MessageLog;
pub use payload::{BoardEmbed, EmbedField};
pub use platform::{MessagePlatform, MessageRef, PlatformError};
pub use reconciler::{CycleReport, GuildOutcome, ReconcileError, Reconciler};
pub use registry::{GuildRegistry, MessageLocation, RegistryError};
