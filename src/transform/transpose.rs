/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::transposed::TransposeWithDegree;
use crate::graphs::vec_graph::VecGraph;
use dsi_progress_logger::prelude::*;

/// Returns the transpose of the provided graph, in which every predecessor
/// is annotated with its outdegree.
///
/// The construction is a two-pass counting sort: the first pass computes
/// the indegrees, the second one scatters the arcs. Since sources are
/// visited in increasing order, predecessor lists come out sorted.
pub fn transpose_with_degree(graph: &VecGraph) -> TransposeWithDegree {
    let n = graph.num_nodes();
    let mut pl = progress_logger![
        item_name = "node",
        expected_updates = Some(n),
        display_memory = true
    ];

    pl.start("Computing indegrees...");
    let mut dcf = vec![0; n + 1];
    let mut outdegrees = Vec::with_capacity(n);
    for (_, succ) in graph.iter() {
        for &v in succ {
            dcf[v + 1] += 1;
        }
        outdegrees.push(succ.len());
        pl.light_update();
    }
    pl.done();

    for i in 0..n {
        dcf[i + 1] += dcf[i];
    }

    pl.expected_updates(Some(n));
    pl.start("Scattering arcs...");
    let mut next = dcf.clone();
    let mut preds = vec![(0, 0); graph.num_arcs() as usize];
    for (u, succ) in graph.iter() {
        for &v in succ {
            preds[next[v]] = (u, outdegrees[u]);
            next[v] += 1;
        }
        pl.light_update();
    }
    pl.done();

    TransposeWithDegree::from_parts(dcf.into(), preds.into(), outdegrees.into())
}
