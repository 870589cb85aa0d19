//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.webdoctor.toml` files.

use crate::client::DemoMode;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".webdoctor.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend endpoints.
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Audit history settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Demo mode settings.
    #[serde(default)]
    pub demo: DemoConfig,

    /// Contact form settings.
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL of the website analyzer.
    #[serde(default = "default_analyzer_url")]
    pub analyzer_url: String,

    /// Base URL of the audit-history, GTM and auth backend.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            analyzer_url: default_analyzer_url(),
            api_url: default_api_url(),
        }
    }
}

fn default_analyzer_url() -> String {
    "https://web-doctor-playwright.onrender.com".to_string()
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout() -> u64 {
    60 // the hosted analyzer cold-starts slowly
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Audits per history page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// How many recent audits the statistics view samples.
    #[serde(default = "default_stats_sample")]
    pub stats_sample: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            stats_sample: default_stats_sample(),
        }
    }
}

fn default_per_page() -> u32 {
    10
}

fn default_stats_sample() -> u32 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Serve the demo URL from the bundled fixture.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// The URL that triggers demo mode.
    #[serde(default = "default_demo_url")]
    pub url: String,

    /// Simulated analysis delay in milliseconds.
    #[serde(default = "default_demo_delay")]
    pub delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_demo_url(),
            delay_ms: default_demo_delay(),
        }
    }
}

impl DemoConfig {
    pub fn mode(&self) -> Option<DemoMode> {
        self.enabled.then(|| DemoMode {
            url: self.url.clone(),
            delay: Duration::from_millis(self.delay_ms),
        })
    }
}

fn default_true() -> bool {
    true
}

fn default_demo_url() -> String {
    "https://example.com".to_string()
}

fn default_demo_delay() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Simulated submission delay in milliseconds.
    #[serde(default = "default_submit_delay")]
    pub submit_delay_ms: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_submit_delay(),
        }
    }
}

fn default_submit_delay() -> u64 {
    1500
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            bail!("http.timeout_seconds must be greater than 0");
        }
        if self.history.per_page == 0 {
            bail!("history.per_page must be greater than 0");
        }
        if self.history.stats_sample == 0 {
            bail!("history.stats_sample must be greater than 0");
        }
        Ok(())
    }

    /// Try to load configuration from the default location in `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default(dir: &Path) -> Result<Option<Self>> {
        let default_path = dir.join(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(&default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given explicitly on the command line (or via env) win.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.analyzer_url {
            self.endpoints.analyzer_url = url.clone();
        }
        if let Some(ref url) = args.api_url {
            self.endpoints.api_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.http.timeout_seconds = timeout;
        }
        if args.no_demo {
            self.demo.enabled = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
