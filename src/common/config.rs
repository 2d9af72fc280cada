//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::paths::{config_path, socket_path};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Test runner settings
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Report delivery settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Observer settings
    #[serde(default)]
    pub observer: ObserverConfig,
}

/// Settings that shape a single test run
///
/// Fixed for the lifetime of a runner.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// How long the resolver waits for an identifier to appear
    #[serde(default = "default_wait_time")]
    pub wait_time_ms: u64,

    /// Delay before the first test case starts
    #[serde(default)]
    pub start_delay_ms: u64,

    /// Interval between registry lookups while resolving
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            wait_time_ms: default_wait_time(),
            start_delay_ms: 0,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl RunnerConfig {
    /// Create a runner configuration with the default poll interval
    pub fn new(wait_time_ms: u64, start_delay_ms: u64) -> Self {
        Self {
            wait_time_ms,
            start_delay_ms,
            ..Self::default()
        }
    }

    pub fn wait_time(&self) -> Duration {
        Duration::from_millis(self.wait_time_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    /// Poll interval, clamped to at least one millisecond
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

fn default_wait_time() -> u64 {
    2000
}
fn default_poll_interval() -> u64 {
    100
}

/// Report delivery configuration
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Socket the observer listens on (defaults to the per-user runtime path)
    pub socket: Option<PathBuf>,

    /// Give up on delivering a single message after this long
    #[serde(default = "default_send_timeout")]
    pub send_timeout_ms: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            socket: None,
            send_timeout_ms: default_send_timeout(),
        }
    }
}

impl ReportConfig {
    /// Socket path, falling back to the platform default
    pub fn socket_path(&self) -> PathBuf {
        self.socket.clone().unwrap_or_else(socket_path)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

fn default_send_timeout() -> u64 {
    5000
}

/// Observer configuration
#[derive(Debug, Deserialize)]
pub struct ObserverConfig {
    /// Stop waiting after this many seconds without a reporter connecting.
    /// An open connection is never timed out, however long a test runs.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

fn default_idle_timeout() -> u64 {
    300
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return Self::from_toml_str(&content);
            }
        }
        Ok(Self::default())
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
