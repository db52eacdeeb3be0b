mod file_config;

pub use file_config::FileConfig;

use crate::gutendex::{DEFAULT_GUTENDEX_URL, DEFAULT_USER_AGENT};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_GUTENDEX_TIMEOUT_SEC: u64 = 30;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub gutendex_url: String,
    pub gutendex_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_dir: None,
            port: 3001,
            logging_level: RequestsLoggingLevel::default(),
            gutendex_url: DEFAULT_GUTENDEX_URL.to_string(),
            gutendex_timeout_sec: DEFAULT_GUTENDEX_TIMEOUT_SEC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub gutendex: GutendexSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GutendexSettings {
    pub base_url: String,
    pub timeout_sec: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .ok_or_else(|| anyhow::anyhow!("Invalid logging_level in config file: {}", s))?,
            None => cli.logging_level.clone(),
        };

        let base_url = file
            .gutendex_url
            .unwrap_or_else(|| cli.gutendex_url.clone());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("Gutendex url must be an http(s) url: {}", base_url);
        }
        let timeout_sec = file
            .gutendex_timeout_sec
            .unwrap_or(cli.gutendex_timeout_sec);
        if timeout_sec == 0 {
            bail!("Gutendex timeout must be at least one second");
        }
        let user_agent = file
            .gutendex_user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            db_dir,
            port,
            logging_level,
            gutendex: GutendexSettings {
                base_url,
                timeout_sec,
                user_agent,
            },
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
