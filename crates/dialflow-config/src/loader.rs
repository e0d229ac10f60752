// SPDX-FileCopyrightText: 2026 Dialflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dialflow.toml` > `~/.config/dialflow/dialflow.toml`
//! > `/etc/dialflow/dialflow.toml` with environment variable overrides via the
//! `DIALFLOW_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DialflowConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dialflow/dialflow.toml` (system-wide)
/// 3. `~/.config/dialflow/dialflow.toml` (user XDG config)
/// 4. `./dialflow.toml` (local directory)
/// 5. `DIALFLOW_*` environment variables
pub fn load_config() -> Result<DialflowConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DialflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DialflowConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DialflowConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DialflowConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(DialflowConfig::default()))
        .merge(Toml::file("/etc/dialflow/dialflow.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dialflow/dialflow.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dialflow.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DIALFLOW_ENGINE_TICK_INTERVAL_SECS` must
/// map to `engine.tick_interval_secs`, not `engine.tick.interval.secs`.
fn env_provider() -> Env {
    Env::prefixed("DIALFLOW_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("engine_", "engine.", 1)
            .replacen("crm_", "crm.", 1)
            .replacen("telephony_", "telephony.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
