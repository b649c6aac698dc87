use lib_tft::core::{BoardSource, LiveBoard, PostOutcome, PublishOutcome};

use super::platform::SerenityPlatform;
use super::state::Data;

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Posts the monthly leaderboard here and keeps it updated.
#[poise::command(prefix_command, guild_only, check = "is_admin")]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), Error> {
    post_board(ctx, &ctx.data().leaderboard, "No Leaderboard found.").await
}

/// Posts the competition in progress here and keeps it updated.
#[poise::command(prefix_command, guild_only, check = "is_admin")]
pub async fn competition(ctx: Context<'_>) -> Result<(), Error> {
    post_board(ctx, &ctx.data().competition, "No Competitions found.").await
}

/// Replaces every FAQ message previously posted with a fresh set here.
#[poise::command(prefix_command, guild_only, check = "is_admin")]
pub async fn faq(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer_or_broadcast().await?;

    let bulletin = &ctx.data().faq;
    match bulletin.publish(ctx.channel_id().get()).await? {
        PublishOutcome::Published { retracted, posted } => {
            log::info!(
                "{} posted in channel {}: {} message(s), {} removed",
                bulletin.name(),
                ctx.channel_id(),
                posted.len(),
                retracted
            );
        }
        PublishOutcome::NoPayload => {
            ctx.say("No FAQ found.").await?;
        }
    }
    Ok(())
}

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![leaderboard(), competition(), faq()]
}

async fn post_board<S: BoardSource>(
    ctx: Context<'_>,
    board: &LiveBoard<S, SerenityPlatform>,
    nothing_found: &str,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };
    ctx.defer_or_broadcast().await?;

    match board.post(guild_id.get(), ctx.channel_id().get()).await? {
        PostOutcome::Posted(location) => {
            log::info!("{} posted in guild {} as message {}", board.name(), guild_id, location.message_id);
        }
        PostOutcome::NoPayload => {
            ctx.say(nothing_found).await?;
        }
    }
    Ok(())
}

/// Passes when the author holds the configured role in this guild.
async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(false);
    };
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    let wanted = &ctx.data().admin_role;
    let Some(guild) = ctx.cache().guild(guild_id) else {
        return Ok(false);
    };
    let allowed = member
        .roles
        .iter()
        .any(|id| guild.roles.get(id).is_some_and(|role| &role.name == wanted));
    Ok(allowed)
}

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
            let guild = ctx.guild().map(|g| g.name.clone()).unwrap_or_default();
            log::warn!(
                "{} tried to use {}{} in guild: {} without the {} role",
                ctx.author().display_name(),
                ctx.prefix(),
                ctx.command().name,
                guild,
                ctx.data().admin_role
            );
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            log::error!("Command {} failed: {:#}", ctx.command().name, error);
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                log::error!("Error while handling error: {}", e);
            }
        }
    }
}
