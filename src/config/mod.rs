mod file_config;

pub use file_config::{FileConfig, ToolsConfig};

use anyhow::{bail, Result};
use clap::ValueEnum;
use std::time::Duration;

use crate::vocabulary::color::DEFAULT_MAX_IMAGE_BYTES;

pub const DEFAULT_PORT: u16 = 3011;
pub const DEFAULT_EXTRACT_TIMEOUT_SEC: u64 = 30;
pub const DEFAULT_MAX_RENDER_DIMENSION: u32 = 4096;

/// How MCP messages reach the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// Newline-delimited JSON-RPC on stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over WebSocket at `/v1/mcp`.
    Websocket,
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub transport: TransportKind,
    pub port: u16,
    pub extract_timeout_sec: u64,
    pub max_image_bytes: u64,
    pub max_render_dimension: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            port: DEFAULT_PORT,
            extract_timeout_sec: DEFAULT_EXTRACT_TIMEOUT_SEC,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_render_dimension: DEFAULT_MAX_RENDER_DIMENSION,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub transport: TransportKind,
    pub port: u16,
    pub tools: ToolSettings,
}

/// Limits applied by the MCP tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub extract_timeout: Duration,
    pub max_image_bytes: u64,
    pub max_render_dimension: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            extract_timeout: Duration::from_secs(DEFAULT_EXTRACT_TIMEOUT_SEC),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_render_dimension: DEFAULT_MAX_RENDER_DIMENSION,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let transport = match file.transport {
            Some(name) => match parse_transport(&name) {
                Some(transport) => transport,
                None => bail!("Unknown transport in config file: {}", name),
            },
            None => cli.transport,
        };

        let port = file.port.unwrap_or(cli.port);

        let tools_file = file.tools.unwrap_or_default();
        let extract_timeout_sec = tools_file
            .extract_timeout_sec
            .unwrap_or(cli.extract_timeout_sec);
        let max_image_bytes = tools_file.max_image_bytes.unwrap_or(cli.max_image_bytes);
        let max_render_dimension = tools_file
            .max_render_dimension
            .unwrap_or(cli.max_render_dimension);

        if extract_timeout_sec == 0 {
            bail!("extract_timeout_sec must be greater than 0");
        }
        if max_image_bytes == 0 {
            bail!("max_image_bytes must be greater than 0");
        }
        if max_render_dimension == 0 {
            bail!("max_render_dimension must be greater than 0");
        }

        Ok(Self {
            transport,
            port,
            tools: ToolSettings {
                extract_timeout: Duration::from_secs(extract_timeout_sec),
                max_image_bytes,
                max_render_dimension,
            },
        })
    }
}

/// Parses a transport name using clap's ValueEnum trait.
fn parse_transport(s: &str) -> Option<TransportKind> {
    TransportKind::from_str(s, true).ok()
}
