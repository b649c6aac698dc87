use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use lib_tft::core::{GuildRegistry, MessageLog};
use lib_tft::retrieve::{Fetcher, FetcherOptions};
use serenity::all::{Client, GatewayIntents};
use tokio::signal;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

mod tft_logic;
use tft_logic::{commands, config, handler, logger, state};

/// How long the refresh loops get to finish their cycle on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, notes) = config::load_config()?;
    logger::setup_logging(&settings.log_dir, &settings.log_level)?;
    // Config loading runs before fern is installed; replay what it reported.
    notes.iter().for_each(config::ConfigNote::emit);
    log::info!("Starting TFT bot, boards refresh every {} minutes", settings.update_minutes);

    // A registry that exists but does not parse would be wiped by the next
    // write, so refuse to start instead.
    let leaderboard_registry = GuildRegistry::load(settings.leaderboard_registry())
        .await
        .context("loading the leaderboard registry")?;
    let competition_registry = GuildRegistry::load(settings.competition_registry())
        .await
        .context("loading the competition registry")?;
    let faq_messages = MessageLog::load(settings.faq_messages())
        .await
        .context("loading the FAQ message log")?;

    let fetcher = Fetcher::new(FetcherOptions {
        cooldown: settings.retry_cooldown,
        timeout: settings.request_timeout,
        ..Default::default()
    })?;

    let shutdown = CancellationToken::new();
    let tracker = TaskTracker::new();
    let (ready_tx, ready_rx) = watch::channel(false);

    let startup = state::Startup {
        settings: settings.clone(),
        fetcher: Arc::new(fetcher),
        leaderboard_registry: Arc::new(leaderboard_registry),
        competition_registry: Arc::new(competition_registry),
        faq_messages: Arc::new(faq_messages),
        shutdown: shutdown.clone(),
        tracker: tracker.clone(),
        ready: ready_rx,
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(settings.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(commands::on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, _framework| {
            Box::pin(async move {
                log::info!("Framework ready, starting board polling tasks");
                Ok(startup.into_data(ctx.http.clone(), ctx.cache.clone()))
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&settings.discord_token, intents)
        .event_handler(handler::ReadyHandler::new(ready_tx))
        .framework(framework)
        .await
        .context("building the Discord client")?;
    let shard_manager = client.shard_manager.clone();

    let mut client_handle = tokio::spawn(async move { client.start().await });

    // Wait for a shutdown signal or for the client to stop on its own
    tokio::select! {
        _ = signal::ctrl_c() => {
            log::info!("Ctrl-C received, initiating shutdown.");
        }
        _ = async {
            #[cfg(unix)]
            {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut term_signal) => {
                        term_signal.recv().await;
                        log::info!("SIGTERM received, initiating shutdown.");
                    }
                    Err(e) => {
                        log::warn!("Cannot listen for SIGTERM: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
            #[cfg(not(unix))]
            {
                // On non-unix platforms, just wait forever.
                std::future::pending::<()>().await;
            }
        } => {}
        result = &mut client_handle => {
            match result {
                Ok(Ok(())) => log::warn!("Discord client stopped, shutting down."),
                Ok(Err(e)) => log::error!("Discord client failed: {}", e),
                Err(e) => log::error!("Discord client task failed: {}", e),
            }
        }
    }

    // Stop the boards, then the gateway
    shutdown.cancel();
    tracker.close();
    if tokio::time::timeout(SHUTDOWN_GRACE, tracker.wait()).await.is_err() {
        log::warn!("Board polling tasks did not stop within {:?}", SHUTDOWN_GRACE);
    }
    shard_manager.shutdown_all().await;
    if !client_handle.is_finished() {
        client_handle.abort();
    }

    log::info!("Shutdown complete.");
    Ok(())
}
