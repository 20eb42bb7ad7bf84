// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Frame drawing for the interactive shell

use super::app::{App, Focus};
use crate::commands::info::describe;
use crate::layout::{bounds, node_radius, Palette};
use crate::session::FetchStatus;
use crate::source::RepoSource;
use crate::tree::flatten;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as Segment};
use ratatui::widgets::{Block, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use std::collections::HashSet;

/// Width of the left control panel
const PANEL_WIDTH: u16 = 34;

fn color(token: &str) -> Color {
    token.parse().unwrap_or(Color::Gray)
}

/// Draw one frame
pub fn draw<S: RepoSource + 'static>(frame: &mut Frame, app: &App<S>) {
    let view = app.session.view();
    let constraints = if view.tree_visible() {
        vec![
            Constraint::Length(PANEL_WIDTH),
            Constraint::Min(20),
            Constraint::Percentage(30),
        ]
    } else {
        vec![Constraint::Length(PANEL_WIDTH), Constraint::Min(20)]
    };
    let areas = Layout::horizontal(constraints).split(frame.area());

    draw_panel(frame, app, areas[0]);
    draw_graph(frame, app, areas[1]);
    if view.tree_visible() {
        draw_tree(frame, app, areas[2]);
    }
    if app.show_info {
        draw_info(frame, app);
    }
}

fn input_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::bordered().title(title).border_style(style)
}

fn draw_panel<S: RepoSource + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let view = app.session.view();
    let rows = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(app.url_input.as_str())
            .block(input_block("Repository URL", app.focus == Focus::Url)),
        rows[0],
    );

    let status = match app.session.status() {
        FetchStatus::Idle => Span::raw("Enter a URL and press Enter"),
        FetchStatus::Pending(_) => Span::styled("Loading...", Style::default().fg(Color::Cyan)),
        FetchStatus::Resolved => Span::styled("Ready", Style::default().fg(Color::Green)),
        FetchStatus::Failed => Span::styled("Failed", Style::default().fg(Color::Red)),
    };
    frame.render_widget(
        Paragraph::new(Line::from(status)).block(Block::bordered().title("Status")),
        rows[1],
    );

    frame.render_widget(
        Paragraph::new(app.search_input.as_str())
            .block(input_block("Search nodes", app.focus == Focus::Search)),
        rows[2],
    );

    let on_off = |b: bool| if b { "on" } else { "off" };
    let graph = view.graph();
    let filtered = view.filtered_view();
    let mut lines = vec![
        Line::from(format!(
            "Nodes {}/{}  Edges {}/{}",
            filtered.node_count(),
            graph.node_count(),
            filtered.edge_count(),
            graph.edge_count()
        )),
        Line::from(format!(
            "Labels {}  Tree {}  Theme {:?}",
            on_off(view.show_labels()),
            on_off(view.tree_visible()),
            app.theme
        )),
        Line::from(""),
    ];
    if let Some(node) = view.selected_node() {
        lines.push(Line::from(Span::styled(
            node.id.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("kind: {}", node.group)));
        lines.push(Line::from(""));
    }
    if let Some(message) = app.session.message() {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }
    for help in [
        "Tab focus  Enter visualize",
        "/ search  u url  j/k select",
        "l labels  t tree  i info",
        "T theme  r relayout  q quit",
    ] {
        lines.push(Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title("Repograph")),
        rows[3],
    );
}

fn draw_graph<S: RepoSource + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let view = app.session.view();
    let graph = view.filtered_view();
    let palette: Palette = app.theme.palette();
    let positions = app.positions();
    let segments = app.segments();
    let counts = graph.child_counts();

    let selected = view.selected();
    let highlighted: HashSet<&str> = match selected {
        Some(id) => {
            let mut set = graph.neighbors(id);
            set.insert(id);
            set
        }
        None => HashSet::new(),
    };

    let (x_bounds, y_bounds) = bounds(positions.values(), 20.0);
    let title = app
        .session
        .repo()
        .map_or_else(|| "Graph".to_string(), |r| format!("Graph - {}", r.slug()));

    let canvas = Canvas::default()
        .block(Block::bordered().title(title))
        .background_color(color(palette.background()))
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            let edge_color = if highlighted.is_empty() {
                Color::DarkGray
            } else {
                Color::Rgb(60, 60, 70)
            };
            for (a, b) in &segments {
                ctx.draw(&Segment {
                    x1: a.x,
                    y1: a.y,
                    x2: b.x,
                    y2: b.y,
                    color: edge_color,
                });
            }
            ctx.layer();

            for node in &graph.nodes {
                let Some(p) = positions.get(&node.id) else {
                    continue;
                };
                let dimmed = !highlighted.is_empty() && !highlighted.contains(node.id.as_str());
                let fill = if dimmed {
                    Color::DarkGray
                } else {
                    color(palette.color_for(node.group))
                };
                let radius = node_radius(node, counts.get(node.id.as_str()).copied().unwrap_or(0));
                ctx.draw(&Circle {
                    x: p.x,
                    y: p.y,
                    radius,
                    color: fill,
                });

                let is_selected = selected == Some(node.id.as_str());
                if is_selected || (view.show_labels() && !dimmed) {
                    let style = if is_selected {
                        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
                    } else {
                        Style::default().fg(fill)
                    };
                    ctx.print(p.x + radius, p.y, Span::styled(node.name.clone(), style));
                }
            }
        });

    frame.render_widget(canvas, area);
}

fn draw_tree<S: RepoSource + 'static>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let view = app.session.view();
    let needle = view.search_term().to_lowercase();
    let selected = view.selected();

    let items: Vec<ListItem> = flatten(view.tree())
        .into_iter()
        .map(|row| {
            let icon = if row.node.is_leaf() { "· " } else { "▸ " };
            let text = format!("{}{}{}", "  ".repeat(row.depth), icon, row.node.name);
            let mut style = Style::default();
            if !needle.is_empty() && row.node.name.to_lowercase().contains(&needle) {
                style = style.fg(Color::Yellow);
            }
            if selected == Some(row.node.id.as_str()) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(text).style(style)
        })
        .collect();

    let body = if items.is_empty() {
        List::new(vec![ListItem::new(
            "No repository structure available. Enter a repository URL and press Enter.",
        )])
    } else {
        List::new(items)
    };
    frame.render_widget(body.block(Block::bordered().title("Repository Structure")), area);
}

fn draw_info<S: RepoSource + 'static>(frame: &mut Frame, app: &App<S>) {
    let Some(info) = app.session.info() else {
        return;
    };
    let area = centered(frame.area(), 60, 12);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(describe(info, false))
            .wrap(Wrap { trim: false })
            .block(Block::bordered().title("Repository Info")),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
