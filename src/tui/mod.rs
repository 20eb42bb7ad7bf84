// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Interactive terminal shell
//!
//! URL box, live search, force-directed graph canvas, tree panel and
//! info dialog over one [`Session`](crate::session::Session).

pub mod app;
mod render;

pub use app::{App, Focus};

use crate::config::Config;
use crate::source::RepoSource;
use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Frame interval while polling for input
const FRAME: Duration = Duration::from_millis(33);

/// Run the shell until the user quits
///
/// With `initial_url` set, the first fetch is issued before the first frame.
pub async fn run<S: RepoSource + 'static>(
    config: &Config,
    source: Arc<S>,
    initial_url: Option<String>,
) -> Result<()> {
    let mut app = App::new(config, source);
    if let Some(url) = initial_url {
        app.url_input = url;
        app.visualize();
    }

    info!("Starting interactive session");
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app).await;
    ratatui::restore();
    info!("Interactive session ended");
    result
}

async fn event_loop<S: RepoSource + 'static>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App<S>,
) -> Result<()> {
    while !app.should_quit {
        app.drain_completions();
        app.tick();
        terminal
            .draw(|frame| render::draw(frame, app))
            .context("Failed to draw frame")?;

        if event::poll(FRAME).context("Failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                app.handle_key(key);
            }
        } else {
            // let fetch tasks make progress on the runtime
            tokio::task::yield_now().await;
        }
    }
    Ok(())
}
