use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use book_catalog_server::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_GUTENDEX_TIMEOUT_SEC,
};
use book_catalog_server::gutendex::DEFAULT_GUTENDEX_URL;
use book_catalog_server::server::ServerConfig;
use book_catalog_server::{
    run_server, CatalogService, GutendexClient, RequestsLoggingLevel, SqliteCatalogStore,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the catalog database (catalog.db is created if missing).
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Optional TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Base URL of the Gutendex books endpoint.
    #[clap(long, default_value = DEFAULT_GUTENDEX_URL)]
    pub gutendex_url: String,

    /// Timeout in seconds for Gutendex requests.
    #[clap(long, default_value_t = DEFAULT_GUTENDEX_TIMEOUT_SEC)]
    pub gutendex_timeout_sec: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        db_dir: cli_args.db_dir,
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        gutendex_url: cli_args.gutendex_url,
        gutendex_timeout_sec: cli_args.gutendex_timeout_sec,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!(
        "Opening SQLite catalog database at {:?}...",
        config.catalog_db_path()
    );
    let catalog_store = Arc::new(SqliteCatalogStore::new(config.catalog_db_path())?);

    let gutendex = GutendexClient::new(
        &config.gutendex.base_url,
        config.gutendex.timeout_sec,
        &config.gutendex.user_agent,
    )?;
    info!(
        "External catalog at {} (timeout {}s)",
        gutendex.base_url(),
        config.gutendex.timeout_sec
    );

    let catalog_service = CatalogService::new(catalog_store, Arc::new(gutendex));

    run_server(
        ServerConfig {
            requests_logging_level: config.logging_level,
            port: config.port,
        },
        catalog_service,
    )
    .await
}
