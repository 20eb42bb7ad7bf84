// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod export;
pub mod info;
pub mod tree;
pub mod view;

use crate::config::Config;
use crate::session::{Resolution, Session};
use crate::source::GitHubClient;
use anyhow::{anyhow, Context, Result};

/// Build the GitHub client for the effective configuration
pub fn client(config: &Config) -> Result<GitHubClient> {
    GitHubClient::new(config).context("Failed to set up the GitHub client")
}

/// Fetch `url` into a fresh session
///
/// Failures carry the user-visible message; the detail has already been
/// logged.
pub async fn load(config: &Config, url: &str) -> Result<Session> {
    let client = client(config)?;
    let mut session = Session::new(config.view_prefs());

    match session.visualize(&client, url).await {
        Resolution::Applied => Ok(session),
        Resolution::Failed(err) => Err(anyhow!(err.user_message())),
        Resolution::Stale => Err(anyhow!("Request for {} was superseded", url)),
    }
}
