// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Interactive shell state and key handling

use crate::config::Config;
use crate::error::SourceError;
use crate::layout::{ForceLayout, LayoutParams, Position, Theme};
use crate::session::{fetch_snapshot, FetchTicket, Resolution, Session, Snapshot};
use crate::source::RepoSource;
use crate::types::{NodeId, RepoGraph};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

/// Simulation ticks run per drawn frame
const TICKS_PER_FRAME: usize = 4;

/// A finished fetch on its way back to the UI task
pub type Completion = (FetchTicket, Result<Snapshot, SourceError>);

/// Which input receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Repository URL box
    Url,
    /// Live search box
    Search,
    /// Graph navigation keys
    Graph,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Url => Self::Search,
            Self::Search => Self::Graph,
            Self::Graph => Self::Url,
        }
    }
}

/// Interactive shell state
pub struct App<S> {
    source: Arc<S>,
    /// Session owning the view engine
    pub session: Session,
    /// Text of the URL box
    pub url_input: String,
    /// Text of the search box
    pub search_input: String,
    /// Focused input
    pub focus: Focus,
    /// Colour theme
    pub theme: Theme,
    /// Info dialog open
    pub show_info: bool,
    /// Set when the user asks to leave
    pub should_quit: bool,
    params: LayoutParams,
    layout: Option<ForceLayout>,
    layout_for: Option<Arc<RepoGraph>>,
    graph_for: Option<Arc<RepoGraph>>,
    positions: HashMap<NodeId, Position>,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
    in_flight: Option<JoinHandle<()>>,
}

impl<S: RepoSource + 'static> App<S> {
    /// Fresh shell over `source`
    pub fn new(config: &Config, source: Arc<S>) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            source,
            session: Session::new(config.view_prefs()),
            url_input: String::new(),
            search_input: String::new(),
            focus: Focus::Url,
            theme: config.theme,
            show_info: false,
            should_quit: false,
            params: config.layout,
            layout: None,
            layout_for: None,
            graph_for: None,
            positions: HashMap::new(),
            tx,
            rx,
            in_flight: None,
        }
    }

    /// Issue a fetch for the URL box
    ///
    /// The previous fetch task is aborted, even when the new URL is rejected;
    /// should it still deliver, its ticket is stale and the session ignores it.
    pub fn visualize(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        let Ok((ticket, repo)) = self.session.request(&self.url_input) else {
            return;
        };

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = fetch_snapshot(source.as_ref(), &repo).await;
            let _ = tx.send((ticket, outcome));
        }));
    }

    /// Apply every fetch that has finished
    pub fn drain_completions(&mut self) {
        while let Ok((ticket, outcome)) = self.rx.try_recv() {
            self.complete(ticket, outcome);
        }
    }

    /// Wait for the next fetch to finish and apply it
    pub async fn next_completion(&mut self) -> Option<Resolution> {
        let (ticket, outcome) = self.rx.recv().await?;
        Some(self.complete(ticket, outcome))
    }

    fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Snapshot, SourceError>,
    ) -> Resolution {
        let resolution = self.session.resolve(ticket, outcome);
        if resolution == Resolution::Applied {
            self.show_info = false;
            self.focus = Focus::Graph;
        }
        resolution
    }

    /// Keep the simulation in step with the filtered view, then advance it
    ///
    /// Remembered positions only carry over between projections of the same
    /// graph; a new graph starts from a fresh seed.
    pub fn tick(&mut self) {
        let graph = Arc::clone(self.session.view().graph());
        if self.graph_for.as_ref().map_or(true, |g| !Arc::ptr_eq(g, &graph)) {
            self.positions.clear();
            self.layout = None;
            self.layout_for = None;
            self.graph_for = Some(graph);
        }

        let view = Arc::clone(self.session.view().filtered_view());
        let stale = self
            .layout_for
            .as_ref()
            .map_or(true, |g| !Arc::ptr_eq(g, &view));

        if stale {
            if let Some(layout) = &self.layout {
                self.positions.extend(layout.positions());
            }
            debug!("Relayout for {} nodes", view.node_count());
            self.layout = Some(ForceLayout::new(&view, self.params, &self.positions));
            self.layout_for = Some(view);
        }

        if let Some(layout) = &mut self.layout {
            for _ in 0..TICKS_PER_FRAME {
                layout.tick();
            }
        }
    }

    /// Positions of the current simulation
    #[must_use]
    pub fn positions(&self) -> HashMap<NodeId, Position> {
        self.layout
            .as_ref()
            .map(ForceLayout::positions)
            .unwrap_or_default()
    }

    /// Edge segments of the current simulation
    #[must_use]
    pub fn segments(&self) -> Vec<(Position, Position)> {
        self.layout
            .as_ref()
            .map(ForceLayout::segments)
            .unwrap_or_default()
    }

    /// Move the selection through the filtered nodes
    pub fn move_selection(&mut self, delta: isize) {
        let view = self.session.view();
        let nodes = &view.filtered_view().nodes;
        if nodes.is_empty() {
            return;
        }

        let current = view
            .selected()
            .and_then(|id| nodes.iter().position(|n| n.id == id));
        let len = nodes.len();
        let step = delta.unsigned_abs() % len;
        let next = match current {
            Some(i) if delta >= 0 => (i + step) % len,
            Some(i) => (i + len - step) % len,
            None if delta < 0 => len - 1,
            None => 0,
        };
        let id = nodes[next].id.clone();
        self.session.view_mut().select(id);
    }

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Tab {
            self.focus = self.focus.next();
            return;
        }
        if self.show_info {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i' | 'q')) {
                self.show_info = false;
            }
            return;
        }

        match self.focus {
            Focus::Url => match key.code {
                KeyCode::Enter => self.visualize(),
                KeyCode::Esc => self.focus = Focus::Graph,
                KeyCode::Backspace => {
                    self.url_input.pop();
                }
                KeyCode::Char(c) => self.url_input.push(c),
                _ => {}
            },
            Focus::Search => {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => self.focus = Focus::Graph,
                    KeyCode::Backspace => {
                        self.search_input.pop();
                    }
                    KeyCode::Char(c) => self.search_input.push(c),
                    _ => {}
                }
                let term = self.search_input.clone();
                self.session.view_mut().set_search_term(term);
            }
            Focus::Graph => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('l') => self.session.view_mut().toggle_labels(),
                KeyCode::Char('t') => self.session.view_mut().toggle_tree(),
                KeyCode::Char('T') => self.theme = self.theme.toggled(),
                KeyCode::Char('i') => self.show_info = self.session.info().is_some(),
                KeyCode::Char('/') => self.focus = Focus::Search,
                KeyCode::Char('u') => self.focus = Focus::Url,
                KeyCode::Char('r') => {
                    self.positions.clear();
                    self.layout_for = None;
                    self.layout = None;
                }
                KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
                KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
                KeyCode::Esc | KeyCode::Char('c') => self.session.view_mut().clear_selection(),
                _ => {}
            },
        }
    }
}
