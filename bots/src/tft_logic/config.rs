use anyhow::{bail, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lib_tft::sources::{COMPETITION_URL, FAQ_BASE_URL, FAQ_INDEX_URL, LEADERBOARD_URL};

const DEFAULT_CONFIG_FILE: &str = "tft_bot.conf";

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default)]
#[clap(about = "Discord bot keeping live TFT leaderboard and competition boards", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[clap(long, env = "DISCORD_TOKEN", hide_env_values = true, help = "Discord bot token.")]
    #[serde(skip_serializing)]
    pub discord_token: Option<String>,

    #[clap(long, env = "TFT_PREFIX", help = "Prefix of text commands.")]
    pub prefix: Option<String>,

    #[clap(long, env = "TFT_ADMIN_ROLE", help = "Role a member needs to post a board.")]
    pub admin_role: Option<String>,

    #[clap(long, env = "TFT_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "TFT_DATA_DIR", help = "Directory holding the guild registry files.")]
    pub data_dir: Option<PathBuf>,

    #[clap(long, env = "TFT_LOG_DIR", help = "Directory for log files.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "TFT_LOG_LEVEL", help = "Logging level (trace, debug, info, warn, error).")]
    pub log_level: Option<String>,

    #[clap(long, env = "TFT_LEADERBOARD_URL", help = "Leaderboard page.")]
    pub leaderboard_url: Option<String>,

    #[clap(long, env = "TFT_COMPETITION_URL", help = "Competition list page.")]
    pub competition_url: Option<String>,

    #[clap(long, env = "TFT_FAQ_BASE_URL", help = "Help center root that FAQ links are relative to.")]
    pub faq_base_url: Option<String>,

    #[clap(long, env = "TFT_FAQ_INDEX_URL", help = "Help center page listing the FAQ categories.")]
    pub faq_index_url: Option<String>,

    #[clap(long, env = "TFT_UPDATE_MINUTES", help = "Minutes between two refreshes of every board.")]
    pub update_minutes: Option<u64>,

    #[clap(long, env = "TFT_RETRY_COOLDOWN_SECONDS", help = "Seconds to wait before retrying a failed page fetch.")]
    pub retry_cooldown_seconds: Option<u64>,

    #[clap(long, env = "TFT_REQUEST_TIMEOUT_SECONDS", help = "Timeout in seconds of a single HTTP request.")]
    pub request_timeout_seconds: Option<u64>,
}

impl Config {
    // Merge two Config structs, where 'other' overrides 'self' for Some values
    fn merge(self, other: Config) -> Config {
        Config {
            discord_token: other.discord_token.or(self.discord_token),
            prefix: other.prefix.or(self.prefix),
            admin_role: other.admin_role.or(self.admin_role),
            config_path: other.config_path.or(self.config_path),
            data_dir: other.data_dir.or(self.data_dir),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
            leaderboard_url: other.leaderboard_url.or(self.leaderboard_url),
            competition_url: other.competition_url.or(self.competition_url),
            faq_base_url: other.faq_base_url.or(self.faq_base_url),
            faq_index_url: other.faq_index_url.or(self.faq_index_url),
            update_minutes: other.update_minutes.or(self.update_minutes),
            retry_cooldown_seconds: other.retry_cooldown_seconds.or(self.retry_cooldown_seconds),
            request_timeout_seconds: other.request_timeout_seconds.or(self.request_timeout_seconds),
        }
    }

    fn defaults() -> Config {
        Config {
            prefix: Some("!".to_string()),
            admin_role: Some("Admin".to_string()),
            data_dir: Some(PathBuf::from("./data")),
            log_dir: Some(PathBuf::from("./logs")),
            log_level: Some("info".to_string()),
            leaderboard_url: Some(LEADERBOARD_URL.to_string()),
            competition_url: Some(COMPETITION_URL.to_string()),
            faq_base_url: Some(FAQ_BASE_URL.to_string()),
            faq_index_url: Some(FAQ_INDEX_URL.to_string()),
            update_minutes: Some(10),
            retry_cooldown_seconds: Some(120),
            request_timeout_seconds: Some(30),
            ..Default::default()
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub prefix: String,
    pub admin_role: String,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub leaderboard_url: String,
    pub competition_url: String,
    pub faq_base_url: String,
    pub faq_index_url: String,
    pub update_minutes: u64,
    pub retry_cooldown: Duration,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_minutes * 60)
    }

    pub fn leaderboard_registry(&self) -> PathBuf {
        self.data_dir.join("leaderboard.json")
    }

    pub fn competition_registry(&self) -> PathBuf {
        self.data_dir.join("competition.json")
    }

    pub fn faq_messages(&self) -> PathBuf {
        self.data_dir.join("faq_messages.json")
    }
}

/// A message produced while loading the configuration, before any logger
/// exists. Replayed once logging is set up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNote {
    pub level: log::Level,
    pub message: String,
}

impl ConfigNote {
    fn info(message: String) -> Self {
        Self { level: log::Level::Info, message }
    }

    fn warn(message: String) -> Self {
        Self { level: log::Level::Warn, message }
    }

    pub fn emit(&self) {
        log::log!(self.level, "{}", self.message);
    }
}

pub fn load_config() -> Result<(Settings, Vec<ConfigNote>)> {
    // .env first so clap sees its variables.
    let _ = dotenvy::dotenv();
    resolve(Config::parse())
}

/// Layers defaults < config file < environment/CLI.
pub fn resolve(cli: Config) -> Result<(Settings, Vec<ConfigNote>)> {
    let config_file_path = cli
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut notes = Vec::new();
    let file_config = read_config_file(&config_file_path, &mut notes);
    let merged = Config::defaults().merge(file_config).merge(cli);

    let Some(discord_token) = merged.discord_token.filter(|t| !t.trim().is_empty()) else {
        bail!("Discord token missing: set DISCORD_TOKEN or pass --discord-token");
    };
    let update_minutes = merged.update_minutes.unwrap_or(10);
    if update_minutes == 0 {
        bail!("update minutes must be at least 1");
    }

    let settings = Settings {
        discord_token,
        prefix: merged.prefix.unwrap_or_default(),
        admin_role: merged.admin_role.unwrap_or_default(),
        data_dir: merged.data_dir.unwrap_or_default(),
        log_dir: merged.log_dir.unwrap_or_default(),
        log_level: merged.log_level.unwrap_or_default(),
        leaderboard_url: merged.leaderboard_url.unwrap_or_default(),
        competition_url: merged.competition_url.unwrap_or_default(),
        faq_base_url: merged.faq_base_url.unwrap_or_default(),
        faq_index_url: merged.faq_index_url.unwrap_or_default(),
        update_minutes,
        retry_cooldown: Duration::from_secs(merged.retry_cooldown_seconds.unwrap_or(120)),
        request_timeout: Duration::from_secs(merged.request_timeout_seconds.unwrap_or(30)),
    };
    Ok((settings, notes))
}

/// The file layer. Unreadable or unparsable files are skipped with a warning.
fn read_config_file(path: &Path, notes: &mut Vec<ConfigNote>) -> Config {
    if !path.exists() {
        notes.push(ConfigNote::info(format!(
            "Config file not found at {}. Using defaults and environment/CLI variables.",
            path.display()
        )));
        return Config::default();
    }

    match fs::read_to_string(path) {
        Ok(config_str) => match serde_json::from_str::<Config>(&config_str) {
            Ok(file_config) => {
                notes.push(ConfigNote::info(format!("Loaded config file {}", path.display())));
                file_config
            }
            Err(e) => {
                notes.push(ConfigNote::warn(format!(
                    "Failed to parse config file: {}: {}. Falling back to other sources.",
                    path.display(),
                    e
                )));
                Config::default()
            }
        },
        Err(e) => {
            notes.push(ConfigNote::warn(format!(
                "Failed to read config file: {}: {}. Falling back to other sources.",
                path.display(),
                e
            )));
            Config::default()
        }
    }
}
