// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Info command - repository metadata

use crate::config::Config;
use crate::source::RepoSource;
use crate::types::{RepoInfo, RepoRef};
use anyhow::{anyhow, Context, Result};
use owo_colors::OwoColorize;
use tracing::warn;

/// Run the info command
pub async fn run(config: &Config, url: &str, json: bool, color: bool) -> Result<()> {
    let repo = RepoRef::from_url(url)?;
    let client = super::client(config)?;
    let info = client.fetch_repo_info(&repo).await.map_err(|e| {
        warn!("Info request for {} failed: {}", repo, e);
        anyhow!(crate::error::FETCH_FAILED_MESSAGE)
    })?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&info).context("Failed to serialize repository info")?
        );
    } else {
        print!("{}", describe(&info, color));
    }
    Ok(())
}

/// Human-readable summary, one field per line
#[must_use]
pub fn describe(info: &RepoInfo, color: bool) -> String {
    let title = format!("{}/{}", info.owner.login, info.name);
    let mut lines = vec![if color {
        title.bold().to_string()
    } else {
        title
    }];
    lines.push(format!(
        "  {}",
        info.description.as_deref().unwrap_or("No description")
    ));
    lines.push(format!("  stars: {}", info.stargazers_count));
    lines.push(format!("  forks: {}", info.forks_count));
    lines.push(format!("  default branch: {}", info.default_branch));
    if let Some(updated) = info.updated_at {
        lines.push(format!("  updated: {}", updated.format("%Y-%m-%d %H:%M UTC")));
    }
    if let Some(url) = &info.html_url {
        lines.push(format!("  {url}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
