use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use oscilloscope_vocabulary::config::{
    self, TransportKind, DEFAULT_EXTRACT_TIMEOUT_SEC, DEFAULT_MAX_RENDER_DIMENSION, DEFAULT_PORT,
};
use oscilloscope_vocabulary::mcp::{create_mcp_state, stdio::serve_stdio};
use oscilloscope_vocabulary::run_server;
use oscilloscope_vocabulary::vocabulary::color::DEFAULT_MAX_IMAGE_BYTES;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[clap(version, about)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// How MCP clients connect.
    #[clap(long, value_enum, default_value_t = TransportKind::Stdio)]
    pub transport: TransportKind,

    /// The port to listen on (websocket transport only).
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds before an image color extraction is abandoned.
    #[clap(long, default_value_t = DEFAULT_EXTRACT_TIMEOUT_SEC)]
    pub extract_timeout_sec: u64,

    /// Largest image file, in bytes, that color extraction will read.
    #[clap(long, default_value_t = DEFAULT_MAX_IMAGE_BYTES)]
    pub max_image_bytes: u64,

    /// Largest width or height accepted by the pattern renderer.
    #[clap(long, default_value_t = DEFAULT_MAX_RENDER_DIMENSION)]
    pub max_render_dimension: u32,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            transport: args.transport,
            port: args.port,
            extract_timeout_sec: args.extract_timeout_sec,
            max_image_bytes: args.max_image_bytes,
            max_render_dimension: args.max_render_dimension,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Stdout carries protocol frames on the stdio transport, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  transport: {:?}", app_config.transport);
    info!(
        "  extract timeout: {}s",
        app_config.tools.extract_timeout.as_secs()
    );
    info!("  max image bytes: {}", app_config.tools.max_image_bytes);
    info!(
        "  max render dimension: {}",
        app_config.tools.max_render_dimension
    );

    match app_config.transport {
        TransportKind::Stdio => {
            let mcp_state = Arc::new(create_mcp_state(app_config.tools));
            serve_stdio(mcp_state).await
        }
        TransportKind::Websocket => {
            info!("  port: {}", app_config.port);
            run_server(app_config.tools, app_config.port).await
        }
    }
}
