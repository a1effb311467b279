use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Remote blog API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (0 disables the timeout).
    #[serde(default)]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Local persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Overrides the credential cache location.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

/// Form validation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Max remembered server rejections per field (default: 32).
    #[serde(default = "default_memo_capacity")]
    pub rejection_memo_capacity: usize,
}

fn default_base_url() -> String {
    "https://blog.kata.academy/api".to_string()
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_memo_capacity() -> usize {
    32
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: 0,
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            rejection_memo_capacity: default_memo_capacity(),
        }
    }
}
