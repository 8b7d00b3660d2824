//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.askpad/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::inference::{EndpointOptions, SamplingParams};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AskpadConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub storage_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub proxy: Option<String>,
    pub accept_invalid_certs: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "https://api.cyfuture.ai/v1";
pub const DEFAULT_MODEL: &str = "/workspace/models/Llama-4-Maverick-17B-128E-Instruct";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: String,
    pub sampling: SamplingParams,
    pub base_url: String,
    pub api_key: Option<String>,
    pub proxy: Option<String>,
    pub accept_invalid_certs: bool,
    /// None = `~/.askpad/storage/`
    pub storage_dir: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn endpoint_options(&self) -> EndpointOptions {
        EndpointOptions {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            proxy: self.proxy.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}

/// Values taken from command-line flags (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub storage_dir: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.askpad/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".askpad").join("config.toml"))
}

/// Load config from `~/.askpad/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AskpadConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AskpadConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AskpadConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<AskpadConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(AskpadConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AskpadConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", redacted(&config));
    Ok(config)
}

/// Debug view of the config with the API key masked.
fn redacted(config: &AskpadConfig) -> String {
    let key = if config.endpoint.api_key.is_some() {
        "<set>"
    } else {
        "<unset>"
    };
    format!(
        "general={:?}, base_url={:?}, api_key={}, proxy={:?}",
        config.general, config.endpoint.base_url, key, config.endpoint.proxy
    )
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# askpad Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# model = "/workspace/models/Llama-4-Maverick-17B-128E-Instruct"  # Or ASKPAD_MODEL
# max_tokens = 500
# temperature = 0.7
# top_p = 1.0
# storage_dir = "/home/me/.askpad/storage"

# [endpoint]
# base_url = "https://api.cyfuture.ai/v1"   # Or ASKPAD_BASE_URL
# api_key = "..."                           # Or AI_API_KEY env var
# proxy = "http://localhost:8080"           # Or ASKPAD_PROXY (development)
# accept_invalid_certs = false
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Reads an env var, treating empty values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AskpadConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Model: CLI → env → config → default
    let model_name = cli
        .model
        .clone()
        .or_else(|| env_var("ASKPAD_MODEL"))
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env_var("ASKPAD_BASE_URL"))
        .or_else(|| config.endpoint.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // API key: env → config
    let api_key = env_var("AI_API_KEY")
        .or_else(|| env_var("VITE_AI_API_KEY"))
        .or_else(|| config.endpoint.api_key.clone());

    // Proxy: env → config
    let proxy = env_var("ASKPAD_PROXY").or_else(|| config.endpoint.proxy.clone());

    let defaults = SamplingParams::default();
    let sampling = SamplingParams {
        max_tokens: config.general.max_tokens.unwrap_or(defaults.max_tokens),
        temperature: config.general.temperature.unwrap_or(defaults.temperature),
        top_p: config.general.top_p.unwrap_or(defaults.top_p),
    };

    ResolvedConfig {
        model_name,
        sampling,
        base_url,
        api_key,
        proxy,
        accept_invalid_certs: config.endpoint.accept_invalid_certs.unwrap_or(false),
        storage_dir: cli
            .storage_dir
            .clone()
            .or_else(|| config.general.storage_dir.clone()),
    }
}
