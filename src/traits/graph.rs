/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// An immutable view of the _transpose_ of a directed graph in which every
/// predecessor comes annotated with its own outdegree in the original graph.
///
/// This is the structure PageRank solvers iterate on: the new rank of node
/// *v* is computed by summing *r*(*u*) / *d*⁺(*u*) over all predecessors *u*
/// of *v*, so having the outdegree next to the predecessor avoids a random
/// access to a separate outdegree array in the innermost loop.
///
/// Nodes are identified by the integers in `0..num_nodes()`. Implementations
/// must never be mutated while a solver is running on them, which the
/// borrow checker enforces as solvers take a shared reference.
pub trait PredecessorGraph {
    /// The type of the iterator over the predecessors of a node, returning
    /// pairs `(predecessor, outdegree of predecessor)`.
    type Predecessors<'a>: IntoIterator<Item = (usize, usize)>
    where
        Self: 'a;

    /// Returns the number of nodes.
    fn num_nodes(&self) -> usize;

    /// Returns the number of arcs.
    fn num_arcs(&self) -> u64;

    /// Returns the outdegree of `node` in the original graph.
    ///
    /// A node with outdegree zero is a _dead end_ (or _dangling node_).
    fn outdegree(&self, node: usize) -> usize;

    /// Returns the predecessors of `node`, each paired with its outdegree.
    ///
    /// # Panics
    ///
    /// Implementations panic if `node` is not smaller than
    /// [`num_nodes`](Self::num_nodes).
    fn predecessors(&self, node: usize) -> Self::Predecessors<'_>;

    /// Returns the list of dead ends, in increasing order.
    fn dangling_nodes(&self) -> Vec<usize> {
        (0..self.num_nodes())
            .filter(|&node| self.outdegree(node) == 0)
            .collect()
    }
}

impl<G: PredecessorGraph> PredecessorGraph for &G {
    type Predecessors<'a>
        = G::Predecessors<'a>
    where
        Self: 'a;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        (**self).num_arcs()
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        (**self).outdegree(node)
    }

    #[inline(always)]
    fn predecessors(&self, node: usize) -> Self::Predecessors<'_> {
        (**self).predecessors(node)
    }
}
