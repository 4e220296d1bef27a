//! Logging
//!
//! `tracing` subscriber setup. Level, format, and destination come from
//! [`LoggingConfig`], each overridable through `CANOPY_LOG`,
//! `CANOPY_LOG_FORMAT`, `CANOPY_LOG_OUTPUT`, and `CANOPY_LOG_FILE`.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// json or text
    #[serde(default = "default_format")]
    pub format: String,

    /// stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// ANSI colors for text output to a terminal
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `canopy::resolver = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Destinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Log file path: `CANOPY_LOG_FILE`, then config, then the platform state dir.
pub fn resolve_log_file_path(config_file: Option<PathBuf>) -> Result<PathBuf, ApiError> {
    if let Ok(env_path) = std::env::var("CANOPY_LOG_FILE") {
        if !env_path.is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }
    if let Some(path) = config_file.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    let dirs = directories::ProjectDirs::from("", "canopy", "canopy").ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform state directory for log file".to_string())
    })?;
    let base = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();
    Ok(base.join("canopy.log"))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    if !config.enabled {
        return Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| ApiError::ConfigError(format!("Logging already initialized: {}", e)));
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let destinations = determine_output(config)?;
    let writer = build_writer(config, destinations)?;
    let ansi = config.color && !destinations.file;

    let result = match format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => Registry::default()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };
    result.map_err(|e| ApiError::ConfigError(format!("Logging already initialized: {}", e)))
}

fn build_writer(config: &LoggingConfig, dest: Destinations) -> Result<BoxMakeWriter, ApiError> {
    let open_file = || -> Result<Arc<std::fs::File>, ApiError> {
        let path = resolve_log_file_path(config.file.clone())?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::ConfigError(format!("Failed to create log directory: {}", e))
            })?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ApiError::ConfigError(format!("Failed to open log file {:?}: {}", path, e)))?;
        Ok(Arc::new(file))
    };

    let writer = match (dest.file, dest.stdout, dest.stderr) {
        (true, _, true) => BoxMakeWriter::new(open_file()?.and(std::io::stderr)),
        (true, _, false) => BoxMakeWriter::new(open_file()?),
        (false, true, true) => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        (false, true, false) => BoxMakeWriter::new(std::io::stdout),
        (false, false, _) => BoxMakeWriter::new(std::io::stderr),
    };
    Ok(writer)
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    if let Ok(filter) = EnvFilter::try_from_env("CANOPY_LOG") {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }
    let mut filter = EnvFilter::new(&config.level);
    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level)
            .parse::<Directive>()
            .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

fn determine_format(config: &LoggingConfig) -> Result<LogFormat, ApiError> {
    let raw = std::env::var("CANOPY_LOG_FORMAT").unwrap_or_else(|_| config.format.clone());
    match raw.as_str() {
        "json" => Ok(LogFormat::Json),
        "text" => Ok(LogFormat::Text),
        other => Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn determine_output(config: &LoggingConfig) -> Result<Destinations, ApiError> {
    let raw = std::env::var("CANOPY_LOG_OUTPUT").unwrap_or_else(|_| config.output.clone());
    parse_destinations(&raw)
}

fn parse_destinations(output: &str) -> Result<Destinations, ApiError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        "both" => (true, true, false),
        other => {
            return Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                other
            )))
        }
    };
    Ok(Destinations { stdout, stderr, file })
}
