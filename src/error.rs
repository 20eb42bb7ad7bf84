// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error taxonomy for fetching and transforming repository listings

use thiserror::Error;

/// Message shown for every Data Source failure; detail goes to the log
pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch repository structure. Please check the URL and try again.";

/// Repository URL could not be interpreted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// Owner or repository segment missing
    #[error("Invalid repository URL: {0} (expected https://<host>/<owner>/<repo>)")]
    MalformedUrl(String),
}

/// Failures reported by the repository Data Source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Repository or branch does not exist
    #[error("repository or branch not found: {0}")]
    NotFound(String),
    /// API quota exhausted
    #[error("API rate limit exceeded")]
    RateLimited,
    /// Transport failure, unexpected status or undecodable body
    #[error("network error: {0}")]
    Network(String),
}

/// Graph Builder precondition violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An entry has no path
    #[error("malformed entry at index {index}: missing path")]
    MalformedEntry {
        /// Position in the input listing
        index: usize,
    },
}

/// Everything a visualize action can fail with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisualizeError {
    /// Input rejected before any fetch
    #[error(transparent)]
    Url(#[from] UrlError),
    /// Data Source failure
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Listing could not be turned into a graph
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl VisualizeError {
    /// Text for the user-facing error line
    ///
    /// URL problems are reported as-is; Data Source failures collapse into
    /// one generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Url(e) => e.to_string(),
            Self::Source(_) => FETCH_FAILED_MESSAGE.to_string(),
            Self::Graph(e) => format!("Could not build graph: {e}"),
        }
    }
}
