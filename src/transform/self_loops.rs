/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::vec_graph::VecGraph;
use dsi_progress_logger::prelude::*;

/// Adds a loop to every node accepted by `filter`, returning the number of
/// loops actually added (nodes that already have a loop are not counted).
pub fn add_self_loops(g: &mut VecGraph, filter: impl Fn(&VecGraph, usize) -> bool) -> usize {
    let mut pl = progress_logger![
        item_name = "node",
        expected_updates = Some(g.num_nodes()),
    ];
    pl.start("Adding self-loops...");
    let mut added = 0;
    for node in 0..g.num_nodes() {
        if filter(g, node) && g.add_arc(node, node) {
            added += 1;
        }
        pl.light_update();
    }
    pl.done();
    log::info!("Added {added} self-loops");
    added
}

/// Adds a loop to every dead end, so that every node has outdegree at
/// least one, returning the number of loops added.
pub fn patch_dead_ends(g: &mut VecGraph) -> usize {
    add_self_loops(g, |g, node| g.outdegree(node) == 0)
}
