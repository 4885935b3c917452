//! Configuration management for the mlmod CLI and client

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::cli::ConfigCommand;
use crate::controller::ErrorRetention;
use crate::error::{MlmodError, Result};
use crate::ui::UI;
use crate::version::format_version_info;

const DEFAULT_ENDPOINT: &str = "http://localhost:8080";
const ENV_PREFIX: &str = "MLMOD";

/// Settings persisted by `mlmod config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    pub endpoint: String,
    pub timeout: u64,
    pub verbose: bool,
    /// Whether a later success clears the displayed error
    #[serde(default)]
    pub error_retention: ErrorRetention,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: default_timeout(),
            verbose: false,
            error_retention: ErrorRetention::default(),
        }
    }
}

impl CliConfig {
    /// Load the persisted settings, writing defaults when the file is missing or unreadable
    pub async fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        if config_file.exists() {
            let content = fs::read_to_string(&config_file).await?;

            match serde_json::from_str::<Self>(&content) {
                Ok(config) => Ok(config),
                Err(e) => {
                    tracing::warn!(
                        "Ignoring unreadable config at {}: {}",
                        config_file.display(),
                        e
                    );
                    let config = Self::default();
                    config.save(&config_file).await?;
                    Ok(config)
                }
            }
        } else {
            let config = Self::default();
            config.save(&config_file).await?;
            Ok(config)
        }
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    /// Build the HTTP client configuration from these settings
    ///
    /// `MLMOD_*` environment variables still take precedence.
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        let normalized_endpoint = normalize_endpoint(&self.endpoint);

        let use_proxy = !is_local_endpoint(&normalized_endpoint);

        ClientConfigBuilder::new()
            .base_url(&normalized_endpoint)
            .timeout(self.timeout)
            .use_proxy(use_proxy)
            .build()
    }
}

/// Strip a trailing slash and a trailing `/api`, which the resource path already carries
fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .to_string()
}

fn is_local_endpoint(endpoint: &str) -> bool {
    endpoint.contains("localhost") || endpoint.contains("127.0.0.1")
}

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mlmod")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_use_proxy")]
    pub use_proxy: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_use_proxy() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            timeout: default_timeout(),
            use_proxy: default_use_proxy(),
        }
    }
}

/// Builder for ClientConfig
///
/// Values given to the builder sit below the config file and the `MLMOD_*`
/// environment variables.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<u64>,
    config_file: Option<PathBuf>,
    use_proxy: Option<bool>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn use_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = Some(use_proxy);
        self
    }

    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();

        let mut builder = Config::builder()
            .set_default("base_url", self.base_url.unwrap_or(defaults.base_url))?
            .set_default("timeout", self.timeout.unwrap_or(defaults.timeout))?
            .set_default("use_proxy", self.use_proxy.unwrap_or(defaults.use_proxy))?;

        if let Some(config_path) = &self.config_file {
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path.as_path()));
            }
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(MlmodError::invalid_endpoint("Base URL cannot be empty"));
        }
        if self.timeout == 0 {
            return Err(MlmodError::config("Timeout must be at least one second"));
        }
        Ok(())
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        let base_url =
            if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
                self.base_url.clone()
            } else {
                format!("http://{}", self.base_url)
            };

        format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
    }
}

/// Handles `mlmod config` subcommands
pub struct ConfigService {
    config: CliConfig,
    config_path: PathBuf,
    ui: UI,
}

impl ConfigService {
    pub fn new(config: CliConfig) -> Self {
        Self::with_config_path(config, default_config_path())
    }

    pub fn with_config_path(config: CliConfig, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            ui: UI::new(),
        }
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }

    pub async fn handle_config(&mut self, command: ConfigCommand) -> Result<()> {
        match command {
            ConfigCommand::Show => {
                self.show();
                return Ok(());
            }
            ConfigCommand::SetEndpoint { url } => self.set_endpoint(&url)?,
            ConfigCommand::SetTimeout { seconds } => self.set_timeout(seconds)?,
            ConfigCommand::SetVerbose { enabled } => self.set_verbose(&enabled)?,
            ConfigCommand::SetErrorRetention { mode } => {
                self.config.error_retention = mode.parse()?
            }
            ConfigCommand::Reset => self.config = CliConfig::default(),
        }

        self.config.save(&self.config_path).await?;
        self.ui.success("Configuration updated");
        Ok(())
    }

    fn show(&self) {
        self.ui.card(
            "Configuration",
            vec![
                ("Endpoint", self.config.endpoint.clone()),
                ("Timeout", format!("{}s", self.config.timeout)),
                ("Verbose", self.config.verbose.to_string()),
                ("Error retention", self.config.error_retention.to_string()),
                ("File", self.config_path.display().to_string()),
                ("Client", format_version_info()),
            ],
        );
    }

    fn set_endpoint(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MlmodError::invalid_endpoint(format!(
                "Endpoint must start with http:// or https://, got '{}'",
                url
            )));
        }
        self.config.endpoint = url.to_string();
        Ok(())
    }

    fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(MlmodError::invalid_input("Timeout must be at least one second"));
        }
        self.config.timeout = seconds;
        Ok(())
    }

    fn set_verbose(&mut self, enabled: &str) -> Result<()> {
        self.config.verbose = match enabled.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => true,
            "false" | "off" | "no" | "0" => false,
            other => {
                return Err(MlmodError::invalid_input(format!(
                    "Expected true or false, got '{}'",
                    other
                )))
            }
        };
        Ok(())
    }
}
