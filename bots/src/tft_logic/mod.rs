pub mod commands;
pub mod config;
pub mod handler;
pub mod logger;
pub mod platform;
pub mod state;
