// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest first: built-in defaults, the TOML config file, then
//! `REPOGRAPH_*` environment variables (`__` separates nested keys, e.g.
//! `REPOGRAPH_LAYOUT__STEPS=200`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::layout::{LayoutParams, Theme};
use crate::view::ViewPrefs;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the hosting provider's REST API
    pub api_url: String,
    /// Access token sent as a bearer credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// User-Agent header for API requests
    pub user_agent: String,
    /// Branch to list instead of the repository default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Per-request timeout; none when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Colour theme
    pub theme: Theme,
    /// Draw node labels at startup
    pub show_labels: bool,
    /// Show the tree panel at startup
    pub tree_visible: bool,
    /// Directory for the interactive session log
    pub cache_dir: PathBuf,
    /// Force simulation parameters
    pub layout: LayoutParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            user_agent: format!("repograph/{}", env!("CARGO_PKG_VERSION")),
            branch: None,
            timeout_secs: None,
            theme: Theme::Dark,
            show_labels: true,
            tree_visible: true,
            cache_dir: directories::ProjectDirs::from("org", "hyperpolymath", "repograph")
                .map(|d| d.cache_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".repograph")),
            layout: LayoutParams::default(),
        }
    }
}

impl Config {
    /// Startup preferences for the view engine
    #[must_use]
    pub fn view_prefs(&self) -> ViewPrefs {
        ViewPrefs {
            show_labels: self.show_labels,
            tree_visible: self.tree_visible,
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Default config file location
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "repograph")
        .map(|d| d.config_dir().join("config.toml"))
}

/// Load configuration from disk and environment, or use defaults
///
/// An explicit `path` must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let defaults = config::Config::try_from(&Config::default())
        .context("Failed to seed configuration defaults")?;

    let mut builder = config::Config::builder().add_source(defaults);
    match path {
        Some(p) => {
            builder = builder.add_source(config::File::from(p.to_path_buf()).required(true));
        }
        None => {
            if let Some(p) = default_path() {
                builder = builder.add_source(config::File::from(p).required(false));
            }
        }
    }
    builder = builder.add_source(
        config::Environment::with_prefix("REPOGRAPH")
            .prefix_separator("_")
            .separator("__"),
    );

    builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}
