/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Random graph mutations.
//!
//! These functions add or remove single arcs of a [`VecGraph`] choosing the
//! endpoints either uniformly or proportionally to the outdegree. They are
//! used to perturb a graph between two PageRank computations.
//!
//! All functions accept any [random number generator](Rng), so that
//! experiments can be replicated using a seeded
//! [`SmallRng`](rand::rngs::SmallRng):
//!
//! ```
//! use pagerank_par::graphs::random::*;
//! use pagerank_par::graphs::vec_graph::VecGraph;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut rng = SmallRng::seed_from_u64(0);
//! let mut g = VecGraph::empty(10);
//! for _ in 0..20 {
//!     add_random_arc(&mut g, &mut rng, 10);
//! }
//! assert!(g.num_arcs() > 0);
//! assert!(remove_random_arc_by_degree(&mut g, &mut rng));
//! ```

use crate::graphs::vec_graph::VecGraph;
use rand::Rng;

/// Adds an arc whose endpoints are chosen uniformly in `0..span`, returning
/// true if the arc was not already present.
///
/// Nodes up to `span − 1` are added to the graph if necessary.
///
/// # Panics
///
/// Panics if `span` is zero.
pub fn add_random_arc<R: Rng + ?Sized>(g: &mut VecGraph, rng: &mut R, span: usize) -> bool {
    assert!(span > 0, "The span must be positive");
    g.add_node(span - 1);
    let u = rng.random_range(0..span);
    let v = rng.random_range(0..span);
    g.add_arc(u, v)
}

/// Adds an arc whose endpoints are chosen with probability proportional to
/// their outdegree, returning true if the arc was not already present.
///
/// If the graph has no arcs, endpoints are chosen uniformly.
///
/// # Panics
///
/// Panics if the graph has no nodes.
pub fn add_random_arc_by_degree<R: Rng + ?Sized>(g: &mut VecGraph, rng: &mut R) -> bool {
    let n = g.num_nodes();
    assert!(n > 0, "The graph has no nodes");
    if g.num_arcs() == 0 {
        return add_random_arc(g, rng, n);
    }
    let u = node_by_degree(g, rng.random_range(0..g.num_arcs()));
    let v = node_by_degree(g, rng.random_range(0..g.num_arcs()));
    g.add_arc(u, v)
}

/// Removes a uniformly chosen arc out of `u`, returning false if `u` has no
/// successors.
pub fn remove_random_arc_from<R: Rng + ?Sized>(g: &mut VecGraph, rng: &mut R, u: usize) -> bool {
    let d = g.outdegree(u);
    if d == 0 {
        return false;
    }
    let v = g.successors(u)[rng.random_range(0..d)];
    g.remove_arc(u, v)
}

/// Removes an arc out of a uniformly chosen node, returning false if the
/// chosen node has no successors (or the graph has no nodes).
pub fn remove_random_arc<R: Rng + ?Sized>(g: &mut VecGraph, rng: &mut R) -> bool {
    let n = g.num_nodes();
    if n == 0 {
        return false;
    }
    let u = rng.random_range(0..n);
    remove_random_arc_from(g, rng, u)
}

/// Removes an arc out of a node chosen with probability proportional to its
/// outdegree (that is, a uniformly chosen arc), returning false if the graph
/// has no arcs.
pub fn remove_random_arc_by_degree<R: Rng + ?Sized>(g: &mut VecGraph, rng: &mut R) -> bool {
    if g.num_arcs() == 0 {
        return false;
    }
    let u = node_by_degree(g, rng.random_range(0..g.num_arcs()));
    remove_random_arc_from(g, rng, u)
}

/// Returns the source of the arc of given index in the order induced by the
/// successor lists.
fn node_by_degree(g: &VecGraph, arc: u64) -> usize {
    debug_assert!(arc < g.num_arcs());
    let mut cumul = 0;
    for (node, succ) in g.iter() {
        cumul += succ.len() as u64;
        if arc < cumul {
            return node;
        }
    }
    unreachable!("Arc index {arc} out of bounds ({} arcs)", g.num_arcs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_by_degree() {
        let g = VecGraph::from_arcs(4, [(0, 1), (2, 0), (2, 1), (2, 3), (3, 3)]);
        assert_eq!(node_by_degree(&g, 0), 0);
        assert_eq!(node_by_degree(&g, 1), 2);
        assert_eq!(node_by_degree(&g, 3), 2);
        assert_eq!(node_by_degree(&g, 4), 3);
    }
}
