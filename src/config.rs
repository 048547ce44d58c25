use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chef::{RunList, RunListParseError};
use crate::event::RunConfig;

pub const CONFIG_ENV: &str = "CHEF_COLLECTOR_CONFIG";
pub const CONFIG_FILE: &str = "chef-collector.yaml";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub chef: ChefConfig,
    pub data_collector: DataCollectorSettings,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChefConfig {
    /// Chef server URL, reported as `chef_server_fqdn`
    pub server_url: String,
    pub organization: String,
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataCollectorSettings {
    pub url: String,
    pub token: String,
    /// Accept any TLS certificate from the data collector
    pub skip_tls_verify: bool,
    /// Overall request timeout in seconds, 0 for none
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub node_prefix: String,
    pub runs: usize,
    pub concurrency: usize,
    pub run_list: Vec<String>,
    /// Simulated length of a client run
    pub converge_secs: u64,
}

impl Default for ChefConfig {
    fn default() -> Self {
        Self {
            server_url: "https://localhost/organizations/demo".to_string(),
            organization: "demo".to_string(),
            environment: "_default".to_string(),
        }
    }
}

impl Default for DataCollectorSettings {
    fn default() -> Self {
        Self {
            url: "https://localhost/data-collector/v0/".to_string(),
            token: String::new(),
            skip_tls_verify: false,
            timeout_secs: 30,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_prefix: "chef-load".to_string(),
            runs: 1,
            concurrency: 4,
            run_list: vec!["recipe[base]".to_string()],
            converge_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let path = Self::expand_path(path);
            return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = Self::expand_path(Path::new(&env_path));
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", CONFIG_ENV, e);
                    }
                }
            }
        }

        // Try ./chef-collector.yaml (for development)
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("chef-collector").join(CONFIG_FILE);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }

    /// Delivery settings for run messages
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            chef_server_url: self.chef.server_url.clone(),
            chef_environment: self.chef.environment.clone(),
            data_collector_url: self.data_collector.url.clone(),
            data_collector_token: self.data_collector.token.clone(),
            skip_tls_verify: self.data_collector.skip_tls_verify,
            timeout: Duration::from_secs(self.data_collector.timeout_secs),
        }
    }

    pub fn simulation_run_list(&self) -> std::result::Result<RunList, RunListParseError> {
        RunList::parse(&self.simulation.run_list)
    }
}
