// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Fetch coordination around one [`ViewState`]
//!
//! Every visualize action takes a [`FetchTicket`]. Only the most recently
//! issued ticket may change the view; outcomes carrying an older ticket are
//! dropped without touching state.

use crate::error::{SourceError, VisualizeError};
use crate::source::RepoSource;
use crate::types::{Entry, RepoInfo, RepoRef};
use crate::view::{ViewPrefs, ViewState};
use tracing::{debug, info, warn};

/// Everything one successful fetch produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Repository the listing belongs to
    pub repo: RepoRef,
    /// Metadata for the info dialog
    pub info: RepoInfo,
    /// Flat listing
    pub entries: Vec<Entry>,
    /// The provider cut the listing short
    pub truncated: bool,
}

/// Fetch metadata, then the listing of the branch the source picks
pub async fn fetch_snapshot<S: RepoSource>(
    source: &S,
    repo: &RepoRef,
) -> Result<Snapshot, SourceError> {
    let info = source.fetch_repo_info(repo).await?;
    let listing = source.fetch_tree(repo, source.listing_ref(&info)).await?;
    Ok(Snapshot {
        repo: repo.clone(),
        info,
        entries: listing.entries,
        truncated: listing.truncated,
    })
}

/// Identifies one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// Sequence number
    #[must_use]
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Observable state of the latest fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing requested yet
    Idle,
    /// Waiting on the Data Source
    Pending(FetchTicket),
    /// Latest fetch applied
    Resolved,
    /// Latest fetch failed
    Failed,
}

/// What [`Session::resolve`] did with an outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Graph, tree and info replaced
    Applied,
    /// A newer request exists; outcome discarded
    Stale,
    /// Latest request failed; prior view kept
    Failed(VisualizeError),
}

/// View state plus fetch bookkeeping
#[derive(Debug, Clone)]
pub struct Session {
    view: ViewState,
    repo: Option<RepoRef>,
    info: Option<RepoInfo>,
    status: FetchStatus,
    issued: u64,
    message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ViewPrefs::default())
    }
}

impl Session {
    /// Empty session
    #[must_use]
    pub fn new(prefs: ViewPrefs) -> Self {
        Self {
            view: ViewState::new(prefs),
            repo: None,
            info: None,
            status: FetchStatus::Idle,
            issued: 0,
            message: None,
        }
    }

    /// Start a visualize action for a repository URL
    ///
    /// A malformed URL still supersedes any pending fetch: the sequence moves
    /// on, so an older outcome landing later is stale, and the status becomes
    /// `Failed` with the error message set. No ticket is handed out for it.
    pub fn request(&mut self, input: &str) -> Result<(FetchTicket, RepoRef), VisualizeError> {
        let repo = match RepoRef::from_url(input) {
            Ok(repo) => repo,
            Err(e) => {
                let err = VisualizeError::from(e);
                self.issued += 1;
                self.status = FetchStatus::Failed;
                self.message = Some(err.user_message());
                warn!("Request #{} rejected: {}", self.issued, err);
                return Err(err);
            }
        };
        let ticket = self.issue();
        info!("Request #{} for {}", ticket.seq(), repo);
        Ok((ticket, repo))
    }

    /// Issue a ticket without parsing input
    pub fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        let ticket = FetchTicket(self.issued);
        self.status = FetchStatus::Pending(ticket);
        self.message = None;
        ticket
    }

    /// Whether `ticket` is the most recently issued one
    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply a fetch outcome if its ticket is still current
    ///
    /// Either graph, tree and info all change together or none of them do.
    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Snapshot, SourceError>,
    ) -> Resolution {
        if !self.is_current(ticket) {
            debug!(
                "Discarding outcome of request #{} (latest is #{})",
                ticket.seq(),
                self.issued
            );
            return Resolution::Stale;
        }

        let result = outcome
            .map_err(VisualizeError::from)
            .and_then(|snapshot| {
                self.view
                    .load_entries(&snapshot.entries)
                    .map_err(VisualizeError::from)?;
                Ok(snapshot)
            });

        match result {
            Ok(snapshot) => {
                info!(
                    "Loaded {}: {} nodes, {} edges",
                    snapshot.repo,
                    self.view.graph().node_count(),
                    self.view.graph().edge_count()
                );
                self.repo = Some(snapshot.repo);
                self.info = Some(snapshot.info);
                self.status = FetchStatus::Resolved;
                self.message = None;
                Resolution::Applied
            }
            Err(err) => {
                warn!("Request #{} failed: {}", ticket.seq(), err);
                self.status = FetchStatus::Failed;
                self.message = Some(err.user_message());
                Resolution::Failed(err)
            }
        }
    }

    /// Request, fetch and resolve in sequence
    pub async fn visualize<S: RepoSource>(&mut self, source: &S, input: &str) -> Resolution {
        let (ticket, repo) = match self.request(input) {
            Ok(issued) => issued,
            Err(err) => return Resolution::Failed(err),
        };
        let outcome = fetch_snapshot(source, &repo).await;
        self.resolve(ticket, outcome)
    }

    /// View engine
    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// View engine, mutable for search, selection and toggles
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Repository currently shown
    #[must_use]
    pub fn repo(&self) -> Option<&RepoRef> {
        self.repo.as_ref()
    }

    /// Metadata of the repository currently shown
    #[must_use]
    pub fn info(&self) -> Option<&RepoInfo> {
        self.info.as_ref()
    }

    /// Latest fetch status
    #[must_use]
    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Whether the latest request is still outstanding
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.status, FetchStatus::Pending(_))
    }

    /// User-visible error line
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::types::Owner;

    fn snapshot(name: &str, entries: Vec<Entry>) -> Snapshot {
        Snapshot {
            repo: RepoRef::new("octo", name),
            info: RepoInfo {
                name: name.into(),
                owner: Owner {
                    login: "octo".into(),
                },
                stargazers_count: 1,
                forks_count: 2,
                description: None,
                default_branch: "main".into(),
                html_url: None,
                updated_at: None,
            },
            entries,
            truncated: false,
        }
    }

    #[test]
    fn test_malformed_url_fails_inline() {
        let mut session = Session::default();
        let err = session.request("github.com/only-owner").unwrap_err();

        assert!(matches!(err, VisualizeError::Url(_)));
        assert_eq!(session.status(), &FetchStatus::Failed);
        assert!(session.message().unwrap().contains("Invalid repository URL"));
    }

    #[test]
    fn test_malformed_url_supersedes_pending_fetch() {
        let mut session = Session::default();
        let (a, _) = session.request("https://github.com/octo/a").unwrap();
        assert!(session.request("not a url").is_err());

        let res = session.resolve(a, Ok(snapshot("a", vec![Entry::blob("a.txt")])));

        assert_eq!(res, Resolution::Stale);
        assert!(session.message().unwrap().contains("Invalid repository URL"));
        assert_eq!(session.status(), &FetchStatus::Failed);
        assert!(!session.view().graph().contains("a.txt"));
        assert!(session.repo().is_none());
    }

    #[test]
    fn test_malformed_url_keeps_prior_view() {
        let mut session = Session::default();
        let (a, _) = session.request("https://github.com/octo/a").unwrap();
        session.resolve(a, Ok(snapshot("a", vec![Entry::tree("src")])));

        assert!(session.request("https://github.com/").is_err());
        assert!(session.view().graph().contains("src"));
        assert_eq!(session.repo().unwrap().name, "a");
    }

    #[test]
    fn test_request_marks_pending() {
        let mut session = Session::default();
        let (ticket, repo) = session.request("https://github.com/octo/hello").unwrap();

        assert_eq!(repo, RepoRef::new("octo", "hello"));
        assert_eq!(session.status(), &FetchStatus::Pending(ticket));
        assert!(session.is_pending());
    }

    #[test]
    fn test_resolve_applies_latest() {
        let mut session = Session::default();
        let (ticket, _) = session.request("https://github.com/octo/a").unwrap();

        let res = session.resolve(ticket, Ok(snapshot("a", vec![Entry::tree("src")])));

        assert_eq!(res, Resolution::Applied);
        assert_eq!(session.status(), &FetchStatus::Resolved);
        assert_eq!(session.view().graph().node_count(), 1);
        assert_eq!(session.info().unwrap().name, "a");
    }

    #[test]
    fn test_last_issued_wins() {
        let mut session = Session::default();
        let (a, _) = session.request("https://github.com/octo/a").unwrap();
        let (b, _) = session.request("https://github.com/octo/b").unwrap();

        let applied = session.resolve(b, Ok(snapshot("b", vec![Entry::blob("b.txt")])));
        let stale = session.resolve(a, Ok(snapshot("a", vec![Entry::blob("a.txt")])));

        assert_eq!(applied, Resolution::Applied);
        assert_eq!(stale, Resolution::Stale);
        assert!(session.view().graph().contains("b.txt"));
        assert!(!session.view().graph().contains("a.txt"));
        assert_eq!(session.repo().unwrap().name, "b");
    }

    #[test]
    fn test_older_resolving_first_is_still_stale() {
        let mut session = Session::default();
        let (a, _) = session.request("https://github.com/octo/a").unwrap();
        let (b, _) = session.request("https://github.com/octo/b").unwrap();

        assert_eq!(
            session.resolve(a, Ok(snapshot("a", vec![Entry::blob("a.txt")]))),
            Resolution::Stale
        );
        assert!(session.is_pending());
        assert!(session.view().graph().is_empty());
        assert_eq!(
            session.resolve(b, Err(SourceError::RateLimited)),
            Resolution::Failed(VisualizeError::Source(SourceError::RateLimited))
        );
    }

    #[test]
    fn test_failure_keeps_prior_view() {
        let mut session = Session::default();
        let (first, _) = session.request("https://github.com/octo/a").unwrap();
        session.resolve(first, Ok(snapshot("a", vec![Entry::tree("src")])));

        let (second, _) = session.request("https://github.com/octo/missing").unwrap();
        let res = session.resolve(second, Err(SourceError::NotFound("octo/missing".into())));

        assert!(matches!(res, Resolution::Failed(_)));
        assert_eq!(session.status(), &FetchStatus::Failed);
        assert!(session.view().graph().contains("src"));
        assert_eq!(session.info().unwrap().name, "a");
        assert_eq!(session.message(), Some(crate::error::FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn test_malformed_entry_keeps_prior_view() {
        let mut session = Session::default();
        let (first, _) = session.request("https://github.com/octo/a").unwrap();
        session.resolve(first, Ok(snapshot("a", vec![Entry::tree("src")])));

        let (second, _) = session.request("https://github.com/octo/b").unwrap();
        let res = session.resolve(second, Ok(snapshot("b", vec![Entry::blob("")])));

        assert_eq!(
            res,
            Resolution::Failed(VisualizeError::Graph(GraphError::MalformedEntry { index: 0 }))
        );
        assert_eq!(session.repo().unwrap().name, "a");
        assert!(session.view().graph().contains("src"));
    }

    #[test]
    fn test_new_request_clears_message() {
        let mut session = Session::default();
        let _ = session.request("not a url");
        assert!(session.message().is_some());
        session.request("https://github.com/octo/a").unwrap();
        assert!(session.message().is_none());
    }
}
