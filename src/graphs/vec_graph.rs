/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::TryReserveError;

/// A mutable directed graph based on a vector of vectors.
///
/// Successor lists are kept sorted and without duplicates, so arcs can be
/// added and removed in any order (in logarithmic time for the search plus
/// linear time for the shift). This is the graph the experiments mutate; the
/// solvers instead run on its
/// [transpose with degrees](crate::graphs::transposed::TransposeWithDegree).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecGraph {
    /// The number of arcs in the graph.
    num_arcs: u64,
    /// For each node, its sorted list of successors.
    succ: Vec<Vec<usize>>,
}

impl VecGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with `n` nodes and no arcs.
    pub fn empty(n: usize) -> Self {
        Self {
            num_arcs: 0,
            succ: Vec::from_iter((0..n).map(|_| Vec::new())),
        }
    }

    /// Creates a new graph with `n` nodes and no arcs, failing instead of
    /// aborting if the node array cannot be allocated.
    pub fn try_empty(n: usize) -> Result<Self, TryReserveError> {
        let mut succ = Vec::new();
        succ.try_reserve_exact(n)?;
        succ.resize_with(n, Vec::new);
        Ok(Self { num_arcs: 0, succ })
    }

    /// Creates a new graph with `n` nodes from an iterator on arcs.
    ///
    /// Duplicate arcs are ignored.
    ///
    /// # Panics
    ///
    /// Panics if an arc has an endpoint not smaller than `n`.
    pub fn from_arcs(n: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = Self::empty(n);
        g.add_arcs(arcs);
        g
    }

    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    /// Returns the number of arcs.
    #[inline(always)]
    pub fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    /// Adds an isolated node to the graph, together with all the missing nodes
    /// with a smaller index, and returns true if it is a new node.
    pub fn add_node(&mut self, node: usize) -> bool {
        let len = self.succ.len();
        self.succ.extend((len..=node).map(|_| Vec::new()));
        len <= node
    }

    /// Adds an arc to the graph and returns true if it was not already present.
    ///
    /// # Panics
    ///
    /// Panics if one of the endpoints is not a node of the graph.
    pub fn add_arc(&mut self, u: usize, v: usize) -> bool {
        self.check_node(u.max(v));
        let succ = &mut self.succ[u];
        match succ.binary_search(&v) {
            Ok(_) => false,
            Err(pos) => {
                succ.insert(pos, v);
                self.num_arcs += 1;
                true
            }
        }
    }

    /// Adds the arcs returned by an iterator, ignoring duplicates.
    pub fn add_arcs(&mut self, arcs: impl IntoIterator<Item = (usize, usize)>) -> &mut Self {
        for (u, v) in arcs {
            self.add_arc(u, v);
        }
        self
    }

    /// Removes an arc from the graph and returns true if it was present.
    ///
    /// # Panics
    ///
    /// Panics if one of the endpoints is not a node of the graph.
    pub fn remove_arc(&mut self, u: usize, v: usize) -> bool {
        self.check_node(u.max(v));
        let succ = &mut self.succ[u];
        match succ.binary_search(&v) {
            Ok(pos) => {
                succ.remove(pos);
                self.num_arcs -= 1;
                true
            }
            Err(_) => false,
        }
    }

    /// Returns true if the arc `(u, v)` is in the graph.
    pub fn has_arc(&self, u: usize, v: usize) -> bool {
        self.succ
            .get(u)
            .is_some_and(|succ| succ.binary_search(&v).is_ok())
    }

    /// Returns the outdegree of a node.
    #[inline(always)]
    pub fn outdegree(&self, node: usize) -> usize {
        self.succ[node].len()
    }

    /// Returns the sorted successors of a node.
    #[inline(always)]
    pub fn successors(&self, node: usize) -> &[usize] {
        &self.succ[node]
    }

    /// Returns an iterator on pairs given by a node and its successors.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.succ
            .iter()
            .enumerate()
            .map(|(node, succ)| (node, succ.as_slice()))
    }

    #[inline(always)]
    fn check_node(&self, node: usize) {
        if node >= self.succ.len() {
            panic!(
                "Node {} does not exist (the graph has {} nodes)",
                node,
                self.succ.len(),
            );
        }
    }
}
