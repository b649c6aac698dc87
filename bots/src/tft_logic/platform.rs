//! `MessagePlatform` on top of serenity: resolution comes from the gateway
//! cache, edits/deletes/sends go through the HTTP client.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use lib_tft::core::{BoardEmbed, MessageLocation, MessagePlatform, MessageRef, PlatformError};
use serenity::all::{
    Cache, ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage, GuildId, Http, MessageId, Timestamp,
};
use serenity::model::ModelError;

pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }
}

/// Maps a serenity failure onto the three outcomes the reconciler tells apart.
pub fn classify(error: serenity::Error) -> PlatformError {
    match &error {
        serenity::Error::Http(http) => match http.status_code().map(|s| s.as_u16()) {
            Some(404) => PlatformError::NotFound,
            Some(403) => PlatformError::Forbidden,
            _ => PlatformError::Other(error.to_string()),
        },
        serenity::Error::Model(ModelError::InvalidPermissions { .. }) => PlatformError::Forbidden,
        _ => PlatformError::Other(error.to_string()),
    }
}

fn unix_seconds(at: SystemTime) -> i64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

pub fn to_create_embed(payload: &BoardEmbed) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(&payload.title)
        .description(&payload.description);

    if let Some(url) = &payload.image_url {
        embed = embed.image(url);
    }
    for field in &payload.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(footer) = &payload.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(at) = payload.timestamp {
        if let Ok(ts) = Timestamp::from_unix_timestamp(unix_seconds(at)) {
            embed = embed.timestamp(ts);
        }
    }
    embed
}

impl MessagePlatform for SerenityPlatform {
    fn resolve(&self, guild_id: u64, location: MessageLocation) -> Option<MessageRef> {
        // Snowflakes are never zero; the id constructors would panic on one.
        if guild_id == 0 || location.channel_id == 0 || location.message_id == 0 {
            return None;
        }

        let guild = self.cache.guild(GuildId::new(guild_id))?;
        let channel_id = ChannelId::new(location.channel_id);
        let known = guild.channels.contains_key(&channel_id) || guild.threads.iter().any(|t| t.id == channel_id);

        known.then(|| MessageRef::from(location))
    }

    async fn edit(&self, target: MessageRef, payload: &BoardEmbed) -> Result<(), PlatformError> {
        let builder = EditMessage::new().embed(to_create_embed(payload));
        ChannelId::new(target.channel_id)
            .edit_message(self.http.as_ref(), MessageId::new(target.message_id), builder)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn delete(&self, target: MessageRef) -> Result<(), PlatformError> {
        ChannelId::new(target.channel_id)
            .delete_message(self.http.as_ref(), MessageId::new(target.message_id))
            .await
            .map_err(classify)
    }

    async fn send(&self, channel_id: u64, payload: &BoardEmbed) -> Result<MessageLocation, PlatformError> {
        if channel_id == 0 {
            return Err(PlatformError::NotFound);
        }
        let builder = CreateMessage::new().embed(to_create_embed(payload));
        let message = ChannelId::new(channel_id)
            .send_message(self.http.as_ref(), builder)
            .await
            .map_err(classify)?;

        Ok(MessageLocation::new(message.channel_id.get(), message.id.get()))
    }
}
