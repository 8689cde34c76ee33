mod auth_config;
mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod mail_config;
mod server_config;

pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use mail_config::MailConfig;
pub use server_config::ServerConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8200;
const MIN_PORT: u16 = 1024;
const DEFAULT_DATABASE_FILENAME: &str = "tally.db";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;
const MIN_SESSION_TTL_SECS: i64 = 60;
const MIN_JWT_SECRET_BYTES: usize = 32;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "no-reply@tally.local";
const DEFAULT_LINK_BASE_URL: &str = "http://127.0.0.1:8200/claim";

#[cfg(test)]
mod tests;
