// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Dialflow autodial engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Dialflow configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DialflowConfig {
    /// Engine timing and pagination settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Customer-listing (CRM) API settings.
    #[serde(default)]
    pub crm: CrmConfig,

    /// Call-provider API settings.
    #[serde(default)]
    pub telephony: TelephonyConfig,

    /// Durable store settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Engine timing and pagination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Seconds between automatic advance ticks while a session is running.
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,

    /// Records requested per customer-page fetch.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval_secs(),
            page_size: default_page_size(),
            log_level: default_log_level(),
        }
    }
}

fn default_tick_interval_secs() -> u64 {
    45
}

fn default_page_size() -> u32 {
    200
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Customer-listing (CRM) API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CrmConfig {
    /// Base URL of the CRM backend.
    #[serde(default = "default_crm_base_url")]
    pub base_url: String,

    /// Bearer token for the CRM API. `None` requires an environment override.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_crm_base_url(),
            api_key: None,
        }
    }
}

fn default_crm_base_url() -> String {
    "https://crm.example.com".to_string()
}

/// Call-provider API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelephonyConfig {
    /// Base URL of the call-provider backend.
    #[serde(default = "default_telephony_base_url")]
    pub base_url: String,

    /// Bearer token for the call-provider API.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            base_url: default_telephony_base_url(),
            api_key: None,
        }
    }
}

fn default_telephony_base_url() -> String {
    "https://voice.example.com".to_string()
}

/// Durable store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Milliseconds between cross-context change polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("dialflow").join("dialflow.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("dialflow.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    1000
}
