// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Repograph library - force-directed graph explorer for remote repositories
//!
//! This crate turns a flat repository listing into a node/edge graph for
//! physical layout, keeps a hierarchical tree view in sync with it, and
//! applies live search filtering without refetching.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod session;
pub mod source;
pub mod tree;
pub mod tui;
pub mod view;

/// Core data types shared by the builders, the view engine and the renderer
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::fmt;

    use crate::error::UrlError;

    /// Node identifier: the exact entry path within one snapshot
    pub type NodeId = String;

    // =========================================================================
    // Entries (Data Source output)
    // =========================================================================

    /// Kind of a repository listing entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum EntryKind {
        /// Directory
        Tree,
        /// File
        Blob,
        /// Submodule commit pointer
        Commit,
        /// Annotated tag
        Tag,
    }

    impl EntryKind {
        /// Wire name of this kind
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::Tree => "tree",
                Self::Blob => "blob",
                Self::Commit => "commit",
                Self::Tag => "tag",
            }
        }
    }

    impl fmt::Display for EntryKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// One file-or-directory record from the repository listing
    ///
    /// A missing `path` on the wire decodes to an empty string, which the
    /// graph builder rejects as a malformed entry.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Entry {
        /// Slash-delimited path, unique within a snapshot
        #[serde(default)]
        pub path: String,
        /// Directory, file, or future kinds
        #[serde(rename = "type")]
        pub kind: EntryKind,
        /// Blob size in bytes
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub size: Option<u64>,
        /// Object id
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub sha: Option<String>,
    }

    impl Entry {
        /// Build an entry with just a path and kind
        #[must_use]
        pub fn new(path: impl Into<String>, kind: EntryKind) -> Self {
            Self {
                path: path.into(),
                kind,
                size: None,
                sha: None,
            }
        }

        /// Directory entry
        #[must_use]
        pub fn tree(path: impl Into<String>) -> Self {
            Self::new(path, EntryKind::Tree)
        }

        /// File entry
        #[must_use]
        pub fn blob(path: impl Into<String>) -> Self {
            Self::new(path, EntryKind::Blob)
        }
    }

    // =========================================================================
    // Graph
    // =========================================================================

    /// Canonical graph node; layout state never lives here
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GraphNode {
        /// Entry path
        pub id: NodeId,
        /// Last path segment
        pub name: String,
        /// Entry kind, used for colouring
        pub group: EntryKind,
    }

    /// Directed "target is a direct child of source" edge
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GraphEdge {
        /// Parent directory id
        pub source: NodeId,
        /// Child id
        pub target: NodeId,
    }

    /// Node and edge lists handed to the renderer verbatim
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RepoGraph {
        /// Nodes in entry order
        #[serde(default)]
        pub nodes: Vec<GraphNode>,
        /// Child-of edges
        #[serde(default)]
        pub edges: Vec<GraphEdge>,
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Hierarchical projection keyed by cumulative path prefix
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TreeNode {
        /// Path prefix, or `root` for the synthetic root
        pub id: String,
        /// One path segment
        pub name: String,
        /// Children in first-seen order
        #[serde(default)]
        pub children: Vec<TreeNode>,
    }

    impl TreeNode {
        /// Id of the synthetic root node
        pub const ROOT_ID: &'static str = "root";

        /// Empty synthetic root
        #[must_use]
        pub fn root() -> Self {
            Self {
                id: Self::ROOT_ID.into(),
                name: Self::ROOT_ID.into(),
                children: Vec::new(),
            }
        }

        /// Find a direct child by segment name
        #[must_use]
        pub fn child(&self, name: &str) -> Option<&TreeNode> {
            self.children.iter().find(|c| c.name == name)
        }

        /// Whether this node has no children
        #[must_use]
        pub fn is_leaf(&self) -> bool {
            self.children.is_empty()
        }

        /// Count of nodes below this one
        #[must_use]
        pub fn descendant_count(&self) -> usize {
            self.children
                .iter()
                .map(|c| 1 + c.descendant_count())
                .sum()
        }
    }

    // =========================================================================
    // Repository identity and metadata
    // =========================================================================

    /// Owner/name pair extracted from a repository URL
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct RepoRef {
        /// Account or organisation
        pub owner: String,
        /// Repository name
        pub name: String,
    }

    impl RepoRef {
        /// Build from parts
        #[must_use]
        pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
            Self {
                owner: owner.into(),
                name: name.into(),
            }
        }

        /// Parse `https://<host>/<owner>/<repo>[...]`
        ///
        /// Owner and repository are the 4th and 5th `/`-delimited segments.
        /// Query strings, fragments and a trailing `.git` are stripped from
        /// the repository segment.
        pub fn from_url(url: &str) -> Result<Self, UrlError> {
            let malformed = || UrlError::MalformedUrl(url.to_string());
            let trimmed = url.trim();
            if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
                return Err(malformed());
            }

            let segments: Vec<&str> = trimmed.split('/').collect();
            if segments.len() < 5 || segments[2].is_empty() {
                return Err(malformed());
            }

            let owner = segments[3];
            let name = segments[4]
                .split(['?', '#'])
                .next()
                .unwrap_or_default();
            let name = name.strip_suffix(".git").unwrap_or(name);

            if owner.is_empty() || name.is_empty() {
                return Err(malformed());
            }

            Ok(Self::new(owner, name))
        }

        /// `owner/name`
        #[must_use]
        pub fn slug(&self) -> String {
            format!("{}/{}", self.owner, self.name)
        }
    }

    impl fmt::Display for RepoRef {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}/{}", self.owner, self.name)
        }
    }

    /// Repository owner as reported by the hosting API
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Owner {
        /// Account login
        pub login: String,
    }

    /// Repository metadata shown in the info dialog
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RepoInfo {
        /// Repository name
        pub name: String,
        /// Owning account
        pub owner: Owner,
        /// Star count
        #[serde(default)]
        pub stargazers_count: u64,
        /// Fork count
        #[serde(default)]
        pub forks_count: u64,
        /// Free-text description
        #[serde(default)]
        pub description: Option<String>,
        /// Default branch used for the tree listing
        #[serde(default = "default_branch")]
        pub default_branch: String,
        /// Browser URL
        #[serde(default)]
        pub html_url: Option<String>,
        /// Last update
        #[serde(default)]
        pub updated_at: Option<DateTime<Utc>>,
    }

    fn default_branch() -> String {
        "main".into()
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{GraphError, SourceError, UrlError, VisualizeError};
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
