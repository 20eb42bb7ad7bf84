// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! View command - interactive explorer

use crate::config::Config;
use crate::tui;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Launch the interactive explorer, optionally loading `url` right away
pub async fn run(config: &Config, url: Option<String>) -> Result<()> {
    info!("Launching TUI...");
    let client = super::client(config)?;
    tui::run(config, Arc::new(client), url).await
}
