// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - writes the repository graph in various formats

use crate::config::Config;
use crate::types::RepoGraph;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT format
    Dot,
    /// JSON `{nodes, edges}`
    Json,
    /// TOML
    Toml,
}

impl ExportFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Some(Self::Dot),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Get file extension for format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Render a graph
    pub fn render(&self, graph: &RepoGraph) -> Result<String> {
        match self {
            Self::Dot => Ok(graph.to_dot()),
            Self::Json => graph.to_json(),
            Self::Toml => graph.to_toml(),
        }
    }
}

/// Run the export command
pub async fn run(
    config: &Config,
    url: &str,
    format: &str,
    output: Option<PathBuf>,
    search: Option<String>,
) -> Result<()> {
    let export_format = ExportFormat::from_str(format).ok_or_else(|| {
        anyhow::anyhow!("Unknown export format: {}. Supported: dot, json, toml", format)
    })?;

    let mut session = super::load(config, url).await?;

    if let Some(term) = search {
        info!("Filtering by search term: {}", term);
        session.view_mut().set_search_term(term);
    }

    let graph = session.view().filtered_view();
    info!(
        "Exporting {} nodes, {} edges as {}",
        graph.node_count(),
        graph.edge_count(),
        export_format.extension()
    );
    let content = export_format.render(graph)?;

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(ExportFormat::from_str("DOT"), Some(ExportFormat::Dot));
        assert_eq!(ExportFormat::from_str("graphviz"), Some(ExportFormat::Dot));
        assert_eq!(ExportFormat::from_str("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_str("toml"), Some(ExportFormat::Toml));
        assert_eq!(ExportFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Json.extension(), "json");
    }
}
