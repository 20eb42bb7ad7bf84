// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use repograph::graph::{build_graph, filter_graph};
use repograph::types::Entry;
use repograph::view::ViewState;

#[derive(Debug, Arbitrary)]
struct Input {
    paths: Vec<String>,
    term: String,
}

fuzz_target!(|input: Input| {
    let entries: Vec<Entry> = input.paths.iter().map(|p| Entry::blob(p.as_str())).collect();
    let Ok(graph) = build_graph(&entries) else {
        return;
    };
    for edge in &graph.edges {
        assert!(graph.contains(&edge.source) && graph.contains(&edge.target));
    }
    let filtered = filter_graph(&graph, &input.term);
    assert!(filtered.node_count() <= graph.node_count());

    let mut view = ViewState::default();
    if view.load_entries(&entries).is_ok() {
        view.set_search_term(input.term);
    }
});
