use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FormdeskError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub line: LineConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineConfig {
    /// Channel secret used to verify webhook signatures. Empty disables
    /// verification (local testing only).
    #[serde(default)]
    pub channel_secret: String,
    /// Channel access token used for the reply/push/profile API calls.
    #[serde(default)]
    pub channel_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    /// A1 range of the form table, header row included.
    #[serde(default = "default_data_range")]
    pub data_range: String,
    /// A1 range holding blocked requester ids. Empty disables the check.
    #[serde(default)]
    pub blocklist_range: String,
    /// Worksheet name of the interaction log. Empty disables logging.
    #[serde(default)]
    pub log_sheet: String,
}

fn default_data_range() -> String {
    "Sheet1!A:F".to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            data_range: default_data_range(),
            blocklist_range: String::new(),
            log_sheet: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Normalized edit-distance ceiling for a fuzzy hit (0.0 = exact only).
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_fuzzy_threshold() -> f64 {
    0.4
}

fn default_page_size() -> usize {
    12
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of requesters with a live pagination session.
    #[serde(default = "default_session_capacity")]
    pub capacity: usize,
    /// Seconds after which an untouched session expires.
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
}

fn default_session_capacity() -> usize {
    512
}

fn default_session_ttl() -> u64 {
    1800
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: default_session_capacity(),
            ttl_secs: default_session_ttl(),
        }
    }
}

impl Config {
    /// Load config: defaults → formdesk.toml → env vars (env wins).
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| FormdeskError::Config(format!("failed to read config: {e}")))?;
            toml::from_str(&content)
                .map_err(|e| FormdeskError::Config(format!("failed to parse config: {e}")))?
        } else {
            Self::default()
        };

        // Override with env vars
        if let Ok(v) = std::env::var("FORMDESK_LINE_CHANNEL_SECRET") {
            config.line.channel_secret = v;
        }
        if let Ok(v) = std::env::var("FORMDESK_LINE_CHANNEL_TOKEN") {
            config.line.channel_token = v;
        }
        if let Ok(v) = std::env::var("FORMDESK_SPREADSHEET_ID") {
            config.sheets.spreadsheet_id = v;
        }
        if let Ok(v) = std::env::var("FORMDESK_GOOGLE_CLIENT_ID") {
            config.sheets.client_id = v;
        }
        if let Ok(v) = std::env::var("FORMDESK_GOOGLE_CLIENT_SECRET") {
            config.sheets.client_secret = v;
        }
        if let Ok(v) = std::env::var("FORMDESK_GOOGLE_REFRESH_TOKEN") {
            config.sheets.refresh_token = v;
        }

        Ok(config)
    }
}
