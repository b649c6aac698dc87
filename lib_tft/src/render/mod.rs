//! # Board Rendering
//!
//! Builds the `BoardEmbed` shown in Discord from parsed rows.
//!
//! ## Contained Modules:
//!
//! - **`table`**: the plain-text ranking table used as embed body.
//! - **`time`**: "time remaining in the month" arithmetic and wording.
//! - **`embed`**: the leaderboard, competition and FAQ embed layouts.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Ranking table layout.
pub mod table;
/// Month-end countdown.
pub mod time;
/// Embed layouts.
pub mod embed;

pub use embed::{absolute_url, competition_embed, faq_embed, leaderboard_embed, markdown_block, TFT_LOGO_URL};
pub use table::ranking_table;
pub use time::{friendly_time_delta, last_day_of_month, time_remaining};
