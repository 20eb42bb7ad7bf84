// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tree command - prints the repository hierarchy

use crate::config::Config;
use crate::tree::flatten;
use crate::types::TreeNode;
use anyhow::Result;
use owo_colors::OwoColorize;

/// Run the tree command
pub async fn run(config: &Config, url: &str, search: Option<String>, color: bool) -> Result<()> {
    let session = super::load(config, url).await?;
    let view = session.view();

    if let Some(repo) = session.repo() {
        println!("{}", repo.slug());
    }
    print!("{}", render(view.tree(), search.as_deref().unwrap_or(""), color));

    let graph = view.graph();
    println!();
    println!(
        "{} entries, {} edges, {} tree nodes",
        graph.node_count(),
        graph.edge_count(),
        view.tree().descendant_count()
    );
    Ok(())
}

/// Indented listing; names containing `term` are highlighted
#[must_use]
pub fn render(root: &TreeNode, term: &str, color: bool) -> String {
    let needle = term.to_lowercase();
    let mut out = String::new();

    for row in flatten(root) {
        let indent = "  ".repeat(row.depth);
        let name = if row.node.is_leaf() {
            row.node.name.clone()
        } else {
            format!("{}/", row.node.name)
        };
        let hit = !needle.is_empty() && row.node.name.to_lowercase().contains(&needle);

        let line = match (color, hit, row.node.is_leaf()) {
            (true, true, _) => format!("{indent}{}", name.black().on_yellow()),
            (true, false, false) => format!("{indent}{}", name.blue().bold()),
            (false, true, _) => format!("{indent}{name} *"),
            _ => format!("{indent}{name}"),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
