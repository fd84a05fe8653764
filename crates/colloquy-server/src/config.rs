//! Server configuration
//!
//! Layers, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file passed with `--config`
//! 3. `COLLOQUY__*` environment variables (`COLLOQUY__ENGINE__DIALOGUE__MAX_TURNS=10`)
//! 4. Command-line flags

use clap::{Parser, ValueEnum};
use colloquy_core::EngineConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Plain,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Json => "json",
        }
    }
}

/// Command-line interface
#[derive(Debug, Default, Parser)]
#[command(name = "colloquy-server", version, about = "HTTP and SSE server for the Colloquy engine")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "COLLOQUY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "COLLOQUY_HOST")]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long, env = "COLLOQUY_PORT")]
    pub port: Option<u16>,

    /// Directory holding the QA store, brains and logs
    #[arg(long, env = "COLLOQUY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, env = "COLLOQUY_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

/// Effective server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Root directory of the file store
    pub data_dir: PathBuf,

    /// Log output format
    pub log_format: LogFormat,

    /// Engine settings
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            data_dir: PathBuf::from("data"),
            log_format: LogFormat::Plain,
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Resolve the effective configuration for `cli`
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        Self::load_with_env(cli, Environment::with_prefix("COLLOQUY").separator("__"))
    }

    fn load_with_env(cli: &Cli, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        builder = builder
            .add_source(env.try_parsing(true))
            .set_override_option("host", cli.host.clone())?
            .set_override_option("port", cli.port.map(i64::from))?
            .set_override_option(
                "data_dir",
                cli.data_dir.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("log_format", cli.log_format.map(LogFormat::as_str))?;

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.engine.validate()?;
        Ok(config)
    }

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuration rendered as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env() -> Environment {
        Environment::with_prefix("COLLOQUY").separator("__").source(Some(HashMap::new()))
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::load_with_env(&Cli::default(), no_env()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_layers_in_order() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "port = 4000\nhost = \"0.0.0.0\"\n\n[engine]\nmin_line_len = 6\n\n[engine.dialogue]\nmax_turns = 12"
        )
        .unwrap();

        let env = Environment::with_prefix("COLLOQUY")
            .separator("__")
            .source(Some(HashMap::from([
                ("COLLOQUY__PORT".to_string(), "5000".to_string()),
                ("COLLOQUY__ENGINE__DIALOGUE__MAX_TURNS".to_string(), "20".to_string()),
            ])));

        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            port: Some(6000),
            log_format: Some(LogFormat::Json),
            ..Cli::default()
        };

        let config = ServerConfig::load_with_env(&cli, env).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 6000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.engine.min_line_len, 6);
        assert_eq!(config.engine.dialogue.max_turns, 20);
        assert_eq!(config.engine.dialogue.tick_interval_ms, 4_000);
        assert_eq!(config.engine.agents.len(), 2);
    }

    #[test]
    fn test_invalid_engine_config_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine]\ncooldown_capacity = 0").unwrap();

        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            ..Cli::default()
        };
        assert!(ServerConfig::load_with_env(&cli, no_env()).is_err());
    }

    #[test]
    fn test_toml_rendering() {
        let rendered = ServerConfig::default().to_toml().unwrap();
        assert!(rendered.contains("port = 3000"));
        assert!(rendered.contains("[engine.dialogue]"));
    }
}
